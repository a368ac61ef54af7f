//! Page service
//!
//! Enforces the tree rules the repositories do not know about: which
//! kinds may nest under which, sibling slug uniqueness, materialized
//! path maintenance and the publish state machine.

use crate::db::repositories::PageRepository;
use crate::models::{CreatePageInput, Page, PageDetails, PageKind, UpdatePageInput};
use crate::registry;
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

pub struct PageService {
    repo: Arc<dyn PageRepository>,
}

/// Slugs become path segments, so they must be non-empty and free of
/// separator and pattern characters.
fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        anyhow::bail!("Slug must not be empty");
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        anyhow::bail!(
            "Slug '{}' is invalid: only lowercase letters, digits, '-' and '_' are allowed",
            slug
        );
    }
    Ok(())
}

impl PageService {
    pub fn new(repo: Arc<dyn PageRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreatePageInput) -> Result<Page> {
        let kind: PageKind = input.kind.parse()?;
        validate_slug(&input.slug)?;

        let parent = match input.parent_id {
            Some(parent_id) => Some(
                self.repo
                    .get_by_id(parent_id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Parent page not found"))?,
            ),
            None => None,
        };

        if let Some(ref parent) = parent {
            let descriptor = registry::page_type(parent.kind);
            if !descriptor.allows_child(kind) {
                anyhow::bail!(
                    "Page kind '{}' is not allowed under '{}'",
                    kind,
                    parent.kind
                );
            }
        }

        if self.repo.slug_exists(input.parent_id, &input.slug).await? {
            anyhow::bail!("Page with slug '{}' already exists here", input.slug);
        }

        let mut page = Page::new(kind, input.title, input.slug.clone());
        page.parent_id = input.parent_id;
        page.show_in_menus = input.show_in_menus;
        page.path = match parent {
            Some(ref parent) => parent.child_path(&input.slug),
            None => format!("/{}/", input.slug),
        };
        page.sort_order = self.repo.next_sort_order(input.parent_id).await?;

        let details = PageDetails::from_input(kind, input.details)?;
        if let Some(body) = details.body() {
            body.validate()?;
        }

        self.repo
            .create(&page, &details)
            .await
            .context("Failed to create page")
    }

    /// Create the tree root: a home page served at "/"
    pub async fn create_root(&self, title: String) -> Result<Page> {
        if self.repo.get_by_path("/").await?.is_some() {
            anyhow::bail!("Root page already exists");
        }
        let mut page = Page::new(PageKind::Home, title, String::new());
        page.path = "/".to_string();
        self.repo
            .create(&page, &PageDetails::default_for(PageKind::Home))
            .await
            .context("Failed to create root page")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Page>> {
        self.repo.get_by_id(id).await
    }

    pub async fn get_by_path(&self, path: &str) -> Result<Option<Page>> {
        self.repo.get_by_path(path).await
    }

    /// A live page with its details, for public serving
    pub async fn serve(&self, path: &str) -> Result<Option<(Page, PageDetails)>> {
        let Some(page) = self.repo.get_by_path(path).await? else {
            return Ok(None);
        };
        if !page.live {
            return Ok(None);
        }
        let details = self.repo.get_details(&page).await?;
        Ok(Some((page, details)))
    }

    pub async fn get_details(&self, page: &Page) -> Result<PageDetails> {
        self.repo.get_details(page).await
    }

    pub async fn list(&self) -> Result<Vec<Page>> {
        self.repo.list().await
    }

    pub async fn children(&self, parent_id: i64) -> Result<Vec<Page>> {
        self.repo.children(parent_id).await
    }

    pub async fn live_children(&self, parent_id: i64) -> Result<Vec<Page>> {
        self.repo.live_children(parent_id).await
    }

    pub async fn update(&self, id: i64, input: UpdatePageInput) -> Result<Page> {
        let mut page = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Page not found"))?;

        if let Some(title) = input.title {
            page.title = title;
        }
        if let Some(show) = input.show_in_menus {
            page.show_in_menus = show;
        }
        if let Some(new_slug) = input.slug {
            if new_slug != page.slug {
                if page.is_root() {
                    anyhow::bail!("The root page has no slug");
                }
                validate_slug(&new_slug)?;
                if self.repo.slug_exists(page.parent_id, &new_slug).await? {
                    anyhow::bail!("Page with slug '{}' already exists here", new_slug);
                }
                let parent = self
                    .repo
                    .get_by_id(page.parent_id.unwrap_or_default())
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Parent page not found"))?;
                let old_path = page.path.clone();
                let new_path = parent.child_path(&new_slug);
                page.slug = new_slug;
                page.path = new_path.clone();
                // Descendants keep their suffix under the new prefix
                self.repo.reparent_paths(&old_path, &new_path).await?;
            }
        }

        let page = self.repo.update(&page).await?;

        if let Some(details_value) = input.details {
            let details = PageDetails::from_input(page.kind, Some(details_value))?;
            if let Some(body) = details.body() {
                body.validate()?;
            }
            self.repo.update_details(page.id, &details).await?;
        }

        Ok(page)
    }

    /// Move a page (with its subtree) under a new parent
    pub async fn move_page(&self, id: i64, new_parent_id: i64) -> Result<Page> {
        let mut page = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Page not found"))?;
        if page.is_root() {
            anyhow::bail!("The root page cannot be moved");
        }
        let parent = self
            .repo
            .get_by_id(new_parent_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Parent page not found"))?;

        if parent.path.starts_with(&page.path) {
            anyhow::bail!("Cannot move a page under its own subtree");
        }
        let descriptor = registry::page_type(parent.kind);
        if !descriptor.allows_child(page.kind) {
            anyhow::bail!(
                "Page kind '{}' is not allowed under '{}'",
                page.kind,
                parent.kind
            );
        }
        if self.repo.slug_exists(Some(new_parent_id), &page.slug).await? {
            anyhow::bail!("Page with slug '{}' already exists here", page.slug);
        }

        let old_path = page.path.clone();
        page.parent_id = Some(new_parent_id);
        page.path = parent.child_path(&page.slug);
        page.sort_order = self.repo.next_sort_order(Some(new_parent_id)).await?;

        let new_path = page.path.clone();
        let page = self.repo.update(&page).await?;
        self.repo.reparent_paths(&old_path, &new_path).await?;
        Ok(page)
    }

    pub async fn publish(&self, id: i64) -> Result<Page> {
        self.repo.publish(id, Utc::now()).await?;
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Page not found"))
    }

    pub async fn unpublish(&self, id: i64) -> Result<Page> {
        self.repo.unpublish(id).await?;
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Page not found"))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let page = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Page not found"))?;
        if page.is_root() {
            anyhow::bail!("The root page cannot be deleted");
        }
        self.repo.delete(id).await
    }
}
