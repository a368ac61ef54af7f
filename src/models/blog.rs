//! Blog page detail records
//!
//! Blog posts carry a post date, intro, rich text body, tags and
//! categories; their ordered gallery images are child records deleted
//! together with the post.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Blog post detail fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPageDetails {
    pub date: NaiveDate,
    #[serde(default)]
    pub intro: String,
    /// Rich text HTML from the editor
    #[serde(default)]
    pub body: String,
}

impl Default for BlogPageDetails {
    fn default() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            intro: String::new(),
            body: String::new(),
        }
    }
}

/// Blog index detail fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogIndexPageDetails {
    #[serde(default)]
    pub intro: String,
}

/// Ordered gallery image attached to a blog post.
///
/// Deleting the post cascades to these records; deleting the image a
/// record points at removes the record too (the image IS the record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogGalleryImage {
    pub id: i64,
    pub page_id: i64,
    pub image_id: i64,
    pub caption: String,
    pub sort_order: i32,
}

/// Input for attaching a gallery image to a blog post
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGalleryImageInput {
    pub image_id: i64,
    #[serde(default)]
    pub caption: String,
}

/// A tag usable on blog posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}
