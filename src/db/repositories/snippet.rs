//! Snippet repository
//!
//! Footer text (single row), people records, and blog categories.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{BlogCategory, FooterText, Person};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{mysql::MySqlRow, sqlite::SqliteRow, Row};
use std::sync::Arc;

#[async_trait]
pub trait SnippetRepository: Send + Sync {
    async fn get_footer_text(&self) -> Result<Option<FooterText>>;
    /// Insert or replace the single footer record
    async fn set_footer_text(&self, body: &str) -> Result<FooterText>;

    async fn create_person(&self, person: &Person) -> Result<Person>;
    async fn get_person(&self, id: i64) -> Result<Option<Person>>;
    async fn list_people(&self) -> Result<Vec<Person>>;
    async fn update_person(&self, person: &Person) -> Result<()>;
    async fn delete_person(&self, id: i64) -> Result<()>;

    async fn create_category(&self, category: &BlogCategory) -> Result<BlogCategory>;
    async fn get_category(&self, id: i64) -> Result<Option<BlogCategory>>;
    async fn list_categories(&self) -> Result<Vec<BlogCategory>>;
    async fn update_category(&self, category: &BlogCategory) -> Result<()>;
    async fn delete_category(&self, id: i64) -> Result<()>;
}

pub struct SqlxSnippetRepository {
    pool: DynDatabasePool,
}

impl SqlxSnippetRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SnippetRepository> {
        Arc::new(Self::new(pool))
    }
}

const INSERT_PERSON_SQL: &str = "INSERT INTO people (first_name, last_name, job_title, image_id, created_at) VALUES (?, ?, ?, ?, ?)";
const UPDATE_PERSON_SQL: &str =
    "UPDATE people SET first_name = ?, last_name = ?, job_title = ?, image_id = ? WHERE id = ?";

const INSERT_CATEGORY_SQL: &str =
    "INSERT INTO blog_categories (name, icon_image_id) VALUES (?, ?)";
const UPDATE_CATEGORY_SQL: &str =
    "UPDATE blog_categories SET name = ?, icon_image_id = ? WHERE id = ?";

#[async_trait]
impl SnippetRepository for SqlxSnippetRepository {
    async fn get_footer_text(&self) -> Result<Option<FooterText>> {
        let sql = "SELECT body, updated_at FROM footer_text WHERE id = 1";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(sql)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get footer text")?;
                Ok(row.map(|row| FooterText {
                    body: row.get("body"),
                    updated_at: row.get("updated_at"),
                }))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(sql)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get footer text")?;
                Ok(row.map(|row| FooterText {
                    body: row.get("body"),
                    updated_at: row.get("updated_at"),
                }))
            }
        }
    }

    async fn set_footer_text(&self, body: &str) -> Result<FooterText> {
        let updated_at = Utc::now();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(
                    "INSERT INTO footer_text (id, body, updated_at) VALUES (1, ?, ?) \
                     ON CONFLICT(id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                )
                .bind(body)
                .bind(updated_at)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to set footer text")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(
                    "INSERT INTO footer_text (id, body, updated_at) VALUES (1, ?, ?) \
                     ON DUPLICATE KEY UPDATE body = VALUES(body), updated_at = VALUES(updated_at)",
                )
                .bind(body)
                .bind(updated_at)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to set footer text")?;
            }
        }
        Ok(FooterText {
            body: body.to_string(),
            updated_at,
        })
    }

    async fn create_person(&self, person: &Person) -> Result<Person> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let result = sqlx::query(INSERT_PERSON_SQL)
                    .bind(&person.first_name)
                    .bind(&person.last_name)
                    .bind(&person.job_title)
                    .bind(person.image_id)
                    .bind(person.created_at)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to create person")?;
                result.last_insert_rowid()
            }
            DatabaseDriver::Mysql => {
                let result = sqlx::query(INSERT_PERSON_SQL)
                    .bind(&person.first_name)
                    .bind(&person.last_name)
                    .bind(&person.job_title)
                    .bind(person.image_id)
                    .bind(person.created_at)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to create person")?;
                result.last_insert_id() as i64
            }
        };
        let mut created = person.clone();
        created.id = id;
        Ok(created)
    }

    async fn get_person(&self, id: i64) -> Result<Option<Person>> {
        let sql = "SELECT * FROM people WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get person")?;
                Ok(row.as_ref().map(row_to_person_sqlite))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get person")?;
                Ok(row.as_ref().map(row_to_person_mysql))
            }
        }
    }

    async fn list_people(&self) -> Result<Vec<Person>> {
        let sql = "SELECT * FROM people ORDER BY last_name, first_name";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list people")?;
                Ok(rows.iter().map(row_to_person_sqlite).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list people")?;
                Ok(rows.iter().map(row_to_person_mysql).collect())
            }
        }
    }

    async fn update_person(&self, person: &Person) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_PERSON_SQL)
                    .bind(&person.first_name)
                    .bind(&person.last_name)
                    .bind(&person.job_title)
                    .bind(person.image_id)
                    .bind(person.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update person")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_PERSON_SQL)
                    .bind(&person.first_name)
                    .bind(&person.last_name)
                    .bind(&person.job_title)
                    .bind(person.image_id)
                    .bind(person.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update person")?;
            }
        }
        Ok(())
    }

    async fn delete_person(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM people WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete person")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete person")?;
            }
        }
        Ok(())
    }

    async fn create_category(&self, category: &BlogCategory) -> Result<BlogCategory> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let result = sqlx::query(INSERT_CATEGORY_SQL)
                    .bind(&category.name)
                    .bind(category.icon_image_id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to create category")?;
                result.last_insert_rowid()
            }
            DatabaseDriver::Mysql => {
                let result = sqlx::query(INSERT_CATEGORY_SQL)
                    .bind(&category.name)
                    .bind(category.icon_image_id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to create category")?;
                result.last_insert_id() as i64
            }
        };
        let mut created = category.clone();
        created.id = id;
        Ok(created)
    }

    async fn get_category(&self, id: i64) -> Result<Option<BlogCategory>> {
        let sql = "SELECT * FROM blog_categories WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get category")?;
                Ok(row.as_ref().map(row_to_category_sqlite))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get category")?;
                Ok(row.as_ref().map(row_to_category_mysql))
            }
        }
    }

    async fn list_categories(&self) -> Result<Vec<BlogCategory>> {
        let sql = "SELECT * FROM blog_categories ORDER BY name, id";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list categories")?;
                Ok(rows.iter().map(row_to_category_sqlite).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list categories")?;
                Ok(rows.iter().map(row_to_category_mysql).collect())
            }
        }
    }

    async fn update_category(&self, category: &BlogCategory) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_CATEGORY_SQL)
                    .bind(&category.name)
                    .bind(category.icon_image_id)
                    .bind(category.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update category")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_CATEGORY_SQL)
                    .bind(&category.name)
                    .bind(category.icon_image_id)
                    .bind(category.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update category")?;
            }
        }
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM blog_categories WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete category")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete category")?;
            }
        }
        Ok(())
    }
}

fn row_to_person_sqlite(row: &SqliteRow) -> Person {
    Person {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        job_title: row.get("job_title"),
        image_id: row.get("image_id"),
        created_at: row.get("created_at"),
    }
}

fn row_to_person_mysql(row: &MySqlRow) -> Person {
    Person {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        job_title: row.get("job_title"),
        image_id: row.get("image_id"),
        created_at: row.get("created_at"),
    }
}

fn row_to_category_sqlite(row: &SqliteRow) -> BlogCategory {
    BlogCategory {
        id: row.get("id"),
        name: row.get("name"),
        icon_image_id: row.get("icon_image_id"),
    }
}

fn row_to_category_mysql(row: &MySqlRow) -> BlogCategory {
    BlogCategory {
        id: row.get("id"),
        name: row.get("name"),
        icon_image_id: row.get("icon_image_id"),
    }
}
