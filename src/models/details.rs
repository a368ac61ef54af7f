//! Per-kind page detail records
//!
//! Each page kind stores its type-specific fields in its own table,
//! keyed by the tree node's id. Image and page references here use
//! set-null-on-delete semantics: removing the referenced record clears
//! the slot without touching the referencing page.

use serde::{Deserialize, Serialize};

use crate::blocks::StreamBody;
use crate::models::blog::{BlogIndexPageDetails, BlogPageDetails};
use crate::models::PageKind;

/// Generic content page: title, image, introduction, body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardPageDetails {
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub image_id: Option<i64>,
    #[serde(default)]
    pub body: StreamBody,
}

/// Home page: hero area, body, promo area, three featured section slots.
///
/// Every featured slot is independently nullable; a slot's title and
/// page reference travel together but neither is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomePageDetails {
    #[serde(default)]
    pub hero_image_id: Option<i64>,
    #[serde(default)]
    pub hero_text: String,
    #[serde(default)]
    pub hero_cta: String,
    #[serde(default)]
    pub hero_cta_link_id: Option<i64>,
    #[serde(default)]
    pub body: StreamBody,
    #[serde(default)]
    pub promo_image_id: Option<i64>,
    #[serde(default)]
    pub promo_title: Option<String>,
    #[serde(default)]
    pub promo_text: Option<String>,
    #[serde(default)]
    pub featured_section_1_title: Option<String>,
    #[serde(default)]
    pub featured_section_1_id: Option<i64>,
    #[serde(default)]
    pub featured_section_2_title: Option<String>,
    #[serde(default)]
    pub featured_section_2_id: Option<i64>,
    #[serde(default)]
    pub featured_section_3_title: Option<String>,
    #[serde(default)]
    pub featured_section_3_id: Option<i64>,
}

/// Gallery page listing an image collection; allows no child pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryPageDetails {
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub image_id: Option<i64>,
    #[serde(default)]
    pub body: StreamBody,
    #[serde(default)]
    pub collection_name: Option<String>,
}

/// Centrum page: logo image plus stream body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentrumPageDetails {
    #[serde(default)]
    pub image_id: Option<i64>,
    #[serde(default)]
    pub body: StreamBody,
}

/// Detail record for any page kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageDetails {
    Standard(StandardPageDetails),
    Home(HomePageDetails),
    Gallery(GalleryPageDetails),
    Centrum(CentrumPageDetails),
    Blog(BlogPageDetails),
    BlogIndex(BlogIndexPageDetails),
    BlogTagIndex,
}

impl PageDetails {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Standard(_) => PageKind::Standard,
            Self::Home(_) => PageKind::Home,
            Self::Gallery(_) => PageKind::Gallery,
            Self::Centrum(_) => PageKind::Centrum,
            Self::Blog(_) => PageKind::Blog,
            Self::BlogIndex(_) => PageKind::BlogIndex,
            Self::BlogTagIndex => PageKind::BlogTagIndex,
        }
    }

    /// Empty detail record for a kind
    pub fn default_for(kind: PageKind) -> Self {
        match kind {
            PageKind::Standard => Self::Standard(StandardPageDetails::default()),
            PageKind::Home => Self::Home(HomePageDetails::default()),
            PageKind::Gallery => Self::Gallery(GalleryPageDetails::default()),
            PageKind::Centrum => Self::Centrum(CentrumPageDetails::default()),
            PageKind::Blog => Self::Blog(BlogPageDetails::default()),
            PageKind::BlogIndex => Self::BlogIndex(BlogIndexPageDetails::default()),
            PageKind::BlogTagIndex => Self::BlogTagIndex,
        }
    }

    /// Parse a detail payload for the given kind; None yields defaults
    pub fn from_input(
        kind: PageKind,
        value: Option<serde_json::Value>,
    ) -> anyhow::Result<Self> {
        let Some(value) = value else {
            return Ok(Self::default_for(kind));
        };
        let details = match kind {
            PageKind::Standard => Self::Standard(serde_json::from_value(value)?),
            PageKind::Home => Self::Home(serde_json::from_value(value)?),
            PageKind::Gallery => Self::Gallery(serde_json::from_value(value)?),
            PageKind::Centrum => Self::Centrum(serde_json::from_value(value)?),
            PageKind::Blog => Self::Blog(serde_json::from_value(value)?),
            PageKind::BlogIndex => Self::BlogIndex(serde_json::from_value(value)?),
            PageKind::BlogTagIndex => Self::BlogTagIndex,
        };
        Ok(details)
    }

    /// The stream body owned by this page, if its kind has one
    pub fn body(&self) -> Option<&StreamBody> {
        match self {
            Self::Standard(d) => Some(&d.body),
            Self::Home(d) => Some(&d.body),
            Self::Gallery(d) => Some(&d.body),
            Self::Centrum(d) => Some(&d.body),
            Self::Blog(_) | Self::BlogIndex(_) | Self::BlogTagIndex => None,
        }
    }
}
