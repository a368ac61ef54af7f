//! Page tree core model
//!
//! Every content page is a node in a single tree with ordered siblings,
//! a materialized URL path, and a live/draft publication status. The
//! type-specific fields live in a detail record per page kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page kind, one table of detail fields per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Standard,
    Home,
    Gallery,
    Centrum,
    Blog,
    BlogIndex,
    BlogTagIndex,
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Home => write!(f, "home"),
            Self::Gallery => write!(f, "gallery"),
            Self::Centrum => write!(f, "centrum"),
            Self::Blog => write!(f, "blog"),
            Self::BlogIndex => write!(f, "blog_index"),
            Self::BlogTagIndex => write!(f, "blog_tag_index"),
        }
    }
}

impl std::str::FromStr for PageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "home" => Ok(Self::Home),
            "gallery" => Ok(Self::Gallery),
            "centrum" => Ok(Self::Centrum),
            "blog" => Ok(Self::Blog),
            "blog_index" => Ok(Self::BlogIndex),
            "blog_tag_index" => Ok(Self::BlogTagIndex),
            _ => Err(anyhow::anyhow!("Invalid page kind: {}", s)),
        }
    }
}

/// A node in the page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    /// None only for the tree root
    pub parent_id: Option<i64>,
    pub kind: PageKind,
    pub title: String,
    pub slug: String,
    /// Materialized URL path, always starts and ends with '/'
    pub path: String,
    pub live: bool,
    pub show_in_menus: bool,
    /// Position among siblings
    pub sort_order: i32,
    /// Stamped on first publish, kept through unpublish
    pub first_published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn new(kind: PageKind, title: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            parent_id: None,
            kind,
            title,
            path: format!("/{}/", slug),
            slug,
            live: false,
            show_in_menus: false,
            sort_order: 0,
            first_published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Path a child with the given slug would get
    pub fn child_path(&self, slug: &str) -> String {
        format!("{}{}/", self.path, slug)
    }
}

/// Input for creating a page under a parent
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageInput {
    pub parent_id: Option<i64>,
    pub kind: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub show_in_menus: bool,
    /// Kind-specific detail fields; defaults apply when omitted
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Input for updating a page's core fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePageInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub show_in_menus: Option<bool>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Input for moving a page under a new parent
#[derive(Debug, Clone, Deserialize)]
pub struct MovePageInput {
    pub new_parent_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_kind_round_trip() {
        for kind in [
            PageKind::Standard,
            PageKind::Home,
            PageKind::Gallery,
            PageKind::Centrum,
            PageKind::Blog,
            PageKind::BlogIndex,
            PageKind::BlogTagIndex,
        ] {
            let parsed: PageKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_invalid_page_kind() {
        assert!("form".parse::<PageKind>().is_err());
    }

    #[test]
    fn test_new_page_starts_draft() {
        let page = Page::new(PageKind::Standard, "About".to_string(), "about".to_string());
        assert!(!page.live);
        assert!(page.first_published_at.is_none());
        assert_eq!(page.path, "/about/");
    }

    #[test]
    fn test_child_path() {
        let mut page = Page::new(PageKind::Home, "Home".to_string(), "home".to_string());
        page.path = "/".to_string();
        assert_eq!(page.child_path("news"), "/news/");

        page.path = "/blog/".to_string();
        assert_eq!(page.child_path("first-post"), "/blog/first-post/");
    }
}
