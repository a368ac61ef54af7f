//! Blog repository
//!
//! Gallery images, tag and category assignments for blog posts, and the
//! tag-filtered post lookup used by the tag index page.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{BlogGalleryImage, Page, Tag};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{mysql::MySqlRow, sqlite::SqliteRow, MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Ordered gallery images of a post
    async fn gallery_images(&self, page_id: i64) -> Result<Vec<BlogGalleryImage>>;
    async fn add_gallery_image(
        &self,
        page_id: i64,
        image_id: i64,
        caption: &str,
    ) -> Result<BlogGalleryImage>;
    async fn remove_gallery_image(&self, id: i64) -> Result<()>;
    /// Replace a post's tag set; unknown names are created
    async fn set_tags(&self, page_id: i64, names: &[String]) -> Result<()>;
    async fn tags_for(&self, page_id: i64) -> Result<Vec<Tag>>;
    /// Replace a post's category assignments
    async fn set_categories(&self, page_id: i64, category_ids: &[i64]) -> Result<()>;
    async fn category_ids_for(&self, page_id: i64) -> Result<Vec<i64>>;
    /// Live posts carrying the exact tag name, newest publication first
    async fn pages_by_tag(&self, tag_name: &str) -> Result<Vec<Page>>;
}

pub struct SqlxBlogRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn gallery_images(&self, page_id: i64) -> Result<Vec<BlogGalleryImage>> {
        let sql = "SELECT * FROM blog_gallery_images WHERE page_id = ? ORDER BY sort_order";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .bind(page_id)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list gallery images")?;
                Ok(rows.iter().map(row_to_gallery_image_sqlite).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .bind(page_id)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list gallery images")?;
                Ok(rows.iter().map(row_to_gallery_image_mysql).collect())
            }
        }
    }

    async fn add_gallery_image(
        &self,
        page_id: i64,
        image_id: i64,
        caption: &str,
    ) -> Result<BlogGalleryImage> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                add_gallery_image_sqlite(self.pool.as_sqlite().unwrap(), page_id, image_id, caption)
                    .await
            }
            DatabaseDriver::Mysql => {
                add_gallery_image_mysql(self.pool.as_mysql().unwrap(), page_id, image_id, caption)
                    .await
            }
        }
    }

    async fn remove_gallery_image(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM blog_gallery_images WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to remove gallery image")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to remove gallery image")?;
            }
        }
        Ok(())
    }

    async fn set_tags(&self, page_id: i64, names: &[String]) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_tags_sqlite(self.pool.as_sqlite().unwrap(), page_id, names).await
            }
            DatabaseDriver::Mysql => {
                set_tags_mysql(self.pool.as_mysql().unwrap(), page_id, names).await
            }
        }
    }

    async fn tags_for(&self, page_id: i64) -> Result<Vec<Tag>> {
        let sql = "SELECT t.id, t.name FROM tags t \
                   JOIN blog_page_tags bpt ON bpt.tag_id = t.id \
                   WHERE bpt.page_id = ? ORDER BY t.name";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .bind(page_id)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list tags")?;
                Ok(rows
                    .iter()
                    .map(|row| Tag {
                        id: row.get("id"),
                        name: row.get("name"),
                    })
                    .collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .bind(page_id)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list tags")?;
                Ok(rows
                    .iter()
                    .map(|row| Tag {
                        id: row.get("id"),
                        name: row.get("name"),
                    })
                    .collect())
            }
        }
    }

    async fn set_categories(&self, page_id: i64, category_ids: &[i64]) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_categories_sqlite(self.pool.as_sqlite().unwrap(), page_id, category_ids).await
            }
            DatabaseDriver::Mysql => {
                set_categories_mysql(self.pool.as_mysql().unwrap(), page_id, category_ids).await
            }
        }
    }

    async fn category_ids_for(&self, page_id: i64) -> Result<Vec<i64>> {
        let sql =
            "SELECT category_id FROM blog_page_categories WHERE page_id = ? ORDER BY category_id";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .bind(page_id)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list category assignments")?;
                Ok(rows.iter().map(|row| row.get("category_id")).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .bind(page_id)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list category assignments")?;
                Ok(rows.iter().map(|row| row.get("category_id")).collect())
            }
        }
    }

    async fn pages_by_tag(&self, tag_name: &str) -> Result<Vec<Page>> {
        let sql = "SELECT p.* FROM pages p \
                   JOIN blog_page_tags bpt ON bpt.page_id = p.id \
                   JOIN tags t ON t.id = bpt.tag_id \
                   WHERE t.name = ? AND p.live = 1 \
                   ORDER BY p.first_published_at DESC, p.path ASC";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .bind(tag_name)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list pages by tag")?;
                rows.iter().map(super::page::row_to_page_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .bind(tag_name)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list pages by tag")?;
                rows.iter().map(super::page::row_to_page_mysql).collect()
            }
        }
    }
}

fn row_to_gallery_image_sqlite(row: &SqliteRow) -> BlogGalleryImage {
    BlogGalleryImage {
        id: row.get("id"),
        page_id: row.get("page_id"),
        image_id: row.get("image_id"),
        caption: row.get("caption"),
        sort_order: row.get("sort_order"),
    }
}

fn row_to_gallery_image_mysql(row: &MySqlRow) -> BlogGalleryImage {
    BlogGalleryImage {
        id: row.get("id"),
        page_id: row.get("page_id"),
        image_id: row.get("image_id"),
        caption: row.get("caption"),
        sort_order: row.get("sort_order"),
    }
}

const NEXT_GALLERY_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(sort_order), -1) + 1 as next FROM blog_gallery_images WHERE page_id = ?";

const INSERT_GALLERY_IMAGE_SQL: &str =
    "INSERT INTO blog_gallery_images (page_id, image_id, caption, sort_order) VALUES (?, ?, ?, ?)";

async fn add_gallery_image_sqlite(
    pool: &SqlitePool,
    page_id: i64,
    image_id: i64,
    caption: &str,
) -> Result<BlogGalleryImage> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    let row = sqlx::query(NEXT_GALLERY_ORDER_SQL)
        .bind(page_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to compute gallery order")?;
    let sort_order: i64 = row.get("next");
    let result = sqlx::query(INSERT_GALLERY_IMAGE_SQL)
        .bind(page_id)
        .bind(image_id)
        .bind(caption)
        .bind(sort_order)
        .execute(&mut *tx)
        .await
        .context("Failed to add gallery image")?;
    let id = result.last_insert_rowid();
    tx.commit().await.context("Failed to commit gallery image")?;
    Ok(BlogGalleryImage {
        id,
        page_id,
        image_id,
        caption: caption.to_string(),
        sort_order: sort_order as i32,
    })
}

async fn add_gallery_image_mysql(
    pool: &MySqlPool,
    page_id: i64,
    image_id: i64,
    caption: &str,
) -> Result<BlogGalleryImage> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    let row = sqlx::query(NEXT_GALLERY_ORDER_SQL)
        .bind(page_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to compute gallery order")?;
    let sort_order: i64 = row.get("next");
    let result = sqlx::query(INSERT_GALLERY_IMAGE_SQL)
        .bind(page_id)
        .bind(image_id)
        .bind(caption)
        .bind(sort_order)
        .execute(&mut *tx)
        .await
        .context("Failed to add gallery image")?;
    let id = result.last_insert_id() as i64;
    tx.commit().await.context("Failed to commit gallery image")?;
    Ok(BlogGalleryImage {
        id,
        page_id,
        image_id,
        caption: caption.to_string(),
        sort_order: sort_order as i32,
    })
}

async fn set_tags_sqlite(pool: &SqlitePool, page_id: i64, names: &[String]) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    sqlx::query("DELETE FROM blog_page_tags WHERE page_id = ?")
        .bind(page_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear tags")?;
    for name in names {
        sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await
            .context("Failed to ensure tag")?;
        sqlx::query(
            "INSERT INTO blog_page_tags (page_id, tag_id) \
             SELECT ?, id FROM tags WHERE name = ?",
        )
        .bind(page_id)
        .bind(name)
        .execute(&mut *tx)
        .await
        .context("Failed to assign tag")?;
    }
    tx.commit().await.context("Failed to commit tags")?;
    Ok(())
}

async fn set_tags_mysql(pool: &MySqlPool, page_id: i64, names: &[String]) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    sqlx::query("DELETE FROM blog_page_tags WHERE page_id = ?")
        .bind(page_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear tags")?;
    for name in names {
        sqlx::query("INSERT IGNORE INTO tags (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await
            .context("Failed to ensure tag")?;
        sqlx::query(
            "INSERT INTO blog_page_tags (page_id, tag_id) \
             SELECT ?, id FROM tags WHERE name = ?",
        )
        .bind(page_id)
        .bind(name)
        .execute(&mut *tx)
        .await
        .context("Failed to assign tag")?;
    }
    tx.commit().await.context("Failed to commit tags")?;
    Ok(())
}

async fn set_categories_sqlite(pool: &SqlitePool, page_id: i64, category_ids: &[i64]) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    sqlx::query("DELETE FROM blog_page_categories WHERE page_id = ?")
        .bind(page_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear category assignments")?;
    for category_id in category_ids {
        sqlx::query("INSERT INTO blog_page_categories (page_id, category_id) VALUES (?, ?)")
            .bind(page_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .context("Failed to assign category")?;
    }
    tx.commit().await.context("Failed to commit categories")?;
    Ok(())
}

async fn set_categories_mysql(pool: &MySqlPool, page_id: i64, category_ids: &[i64]) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    sqlx::query("DELETE FROM blog_page_categories WHERE page_id = ?")
        .bind(page_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear category assignments")?;
    for category_id in category_ids {
        sqlx::query("INSERT INTO blog_page_categories (page_id, category_id) VALUES (?, ?)")
            .bind(page_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .context("Failed to assign category")?;
    }
    tx.commit().await.context("Failed to commit categories")?;
    Ok(())
}
