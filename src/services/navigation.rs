//! Navigation service
//!
//! Menu construction and footer lookup for templates. The menu is
//! built from the root page's live children that are flagged for
//! menus; the active item is the one whose path prefixes the current
//! request path.

use crate::db::repositories::{PageRepository, SnippetRepository};
use crate::models::Page;
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// One top-level menu entry
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub page: Page,
    /// Whether the entry has menu children worth a dropdown
    pub show_dropdown: bool,
    pub active: bool,
}

pub struct NavigationService {
    pages: Arc<dyn PageRepository>,
    snippets: Arc<dyn SnippetRepository>,
}

impl NavigationService {
    pub fn new(pages: Arc<dyn PageRepository>, snippets: Arc<dyn SnippetRepository>) -> Self {
        Self { pages, snippets }
    }

    /// Every top-level menu entry, flagged for dropdowns and the active
    /// item in one pass
    pub async fn top_menu(&self, current_path: Option<&str>) -> Result<Vec<MenuItem>> {
        let Some(root) = self.pages.get_by_path("/").await? else {
            return Ok(Vec::new());
        };
        let entries = self.pages.menu_children(root.id).await?;

        let mut menu = Vec::with_capacity(entries.len());
        for page in entries {
            let show_dropdown = self.has_menu_children(page.id).await?;
            let active = is_active(&page, current_path);
            menu.push(MenuItem {
                page,
                show_dropdown,
                active,
            });
        }
        Ok(menu)
    }

    /// Whether the page has any live children flagged for menus
    pub async fn has_menu_children(&self, page_id: i64) -> Result<bool> {
        Ok(!self.pages.menu_children(page_id).await?.is_empty())
    }

    /// Menu entries under one parent, for dropdown bodies
    pub async fn menu_children(&self, page_id: i64) -> Result<Vec<Page>> {
        self.pages.menu_children(page_id).await
    }

    /// Footer text for templates. Always yields a string: the stored
    /// body when a record exists, empty otherwise. Lookup failures are
    /// logged and degrade to the empty string rather than breaking
    /// every page render.
    pub async fn footer_text(&self) -> String {
        match self.snippets.get_footer_text().await {
            Ok(Some(footer)) => footer.body,
            Ok(None) => String::new(),
            Err(err) => {
                warn!("Footer text lookup failed: {:#}", err);
                String::new()
            }
        }
    }
}

/// Whether a menu entry is the active one for the current request.
/// No current path means nothing is active.
fn is_active(page: &Page, current_path: Option<&str>) -> bool {
    match current_path {
        Some(current) => current.starts_with(&page.path),
        None => false,
    }
}
