//! Image repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateImageInput, Image};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{mysql::MySqlRow, sqlite::SqliteRow, Row};
use std::sync::Arc;

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, input: &CreateImageInput) -> Result<Image>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Image>>;
    async fn list(&self) -> Result<Vec<Image>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxImageRepository {
    pool: DynDatabasePool,
}

impl SqlxImageRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ImageRepository> {
        Arc::new(Self::new(pool))
    }
}

const INSERT_IMAGE_SQL: &str =
    "INSERT INTO images (title, file_path, width, height, created_at) VALUES (?, ?, ?, ?, ?)";

#[async_trait]
impl ImageRepository for SqlxImageRepository {
    async fn create(&self, input: &CreateImageInput) -> Result<Image> {
        let created_at = Utc::now();
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let result = sqlx::query(INSERT_IMAGE_SQL)
                    .bind(&input.title)
                    .bind(&input.file_path)
                    .bind(input.width)
                    .bind(input.height)
                    .bind(created_at)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to create image")?;
                result.last_insert_rowid()
            }
            DatabaseDriver::Mysql => {
                let result = sqlx::query(INSERT_IMAGE_SQL)
                    .bind(&input.title)
                    .bind(&input.file_path)
                    .bind(input.width)
                    .bind(input.height)
                    .bind(created_at)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to create image")?;
                result.last_insert_id() as i64
            }
        };
        Ok(Image {
            id,
            title: input.title.clone(),
            file_path: input.file_path.clone(),
            width: input.width,
            height: input.height,
            created_at,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Image>> {
        let sql = "SELECT * FROM images WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get image")?;
                Ok(row.as_ref().map(row_to_image_sqlite))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get image")?;
                Ok(row.as_ref().map(row_to_image_mysql))
            }
        }
    }

    async fn list(&self) -> Result<Vec<Image>> {
        let sql = "SELECT * FROM images ORDER BY created_at DESC, id DESC";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list images")?;
                Ok(rows.iter().map(row_to_image_sqlite).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list images")?;
                Ok(rows.iter().map(row_to_image_mysql).collect())
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM images WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete image")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete image")?;
            }
        }
        Ok(())
    }
}

fn row_to_image_sqlite(row: &SqliteRow) -> Image {
    Image {
        id: row.get("id"),
        title: row.get("title"),
        file_path: row.get("file_path"),
        width: row.get("width"),
        height: row.get("height"),
        created_at: row.get("created_at"),
    }
}

fn row_to_image_mysql(row: &MySqlRow) -> Image {
    Image {
        id: row.get("id"),
        title: row.get("title"),
        file_path: row.get("file_path"),
        width: row.get("width"),
        height: row.get("height"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxImageRepository {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxImageRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let repo = setup().await;
        let created = repo
            .create(&CreateImageInput {
                title: "Hero".to_string(),
                file_path: "images/hero.jpg".to_string(),
                width: 1920,
                height: 1080,
            })
            .await
            .expect("create failed");

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Hero");
        assert_eq!(fetched.width, 1920);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = setup().await;
        for title in ["a", "b", "c"] {
            repo.create(&CreateImageInput {
                title: title.to_string(),
                file_path: format!("images/{}.jpg", title),
                width: 0,
                height: 0,
            })
            .await
            .unwrap();
        }
        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].title, "c");
    }
}
