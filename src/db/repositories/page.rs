//! Page repository
//!
//! Persistence for the page tree core and the per-kind detail tables.
//! A page is created and updated together with its detail record; tree
//! queries (children, menu items, publication ordering) operate on the
//! core table only.

use crate::blocks::StreamBody;
use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{
    BlogIndexPageDetails, BlogPageDetails, CentrumPageDetails, GalleryPageDetails,
    HomePageDetails, Page, PageDetails, PageKind, StandardPageDetails,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, sqlite::SqliteRow, MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Insert the tree node and its detail record in one transaction
    async fn create(&self, page: &Page, details: &PageDetails) -> Result<Page>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Page>>;
    async fn get_by_path(&self, path: &str) -> Result<Option<Page>>;
    async fn get_details(&self, page: &Page) -> Result<PageDetails>;
    async fn list(&self) -> Result<Vec<Page>>;
    async fn update(&self, page: &Page) -> Result<Page>;
    async fn update_details(&self, page_id: i64, details: &PageDetails) -> Result<()>;
    /// All immediate children in sibling order
    async fn children(&self, parent_id: i64) -> Result<Vec<Page>>;
    /// Immediate live children in sibling order
    async fn live_children(&self, parent_id: i64) -> Result<Vec<Page>>;
    /// Immediate children that are live and shown in menus
    async fn menu_children(&self, parent_id: i64) -> Result<Vec<Page>>;
    /// Immediate live children, newest first publication first,
    /// ties broken by path for a stable order
    async fn live_children_newest_first(&self, parent_id: i64) -> Result<Vec<Page>>;
    /// Mark live; stamps first_published_at only if never published
    async fn publish(&self, id: i64, at: DateTime<Utc>) -> Result<()>;
    /// Mark draft; first_published_at is kept
    async fn unpublish(&self, id: i64) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn slug_exists(&self, parent_id: Option<i64>, slug: &str) -> Result<bool>;
    async fn next_sort_order(&self, parent_id: Option<i64>) -> Result<i32>;
    /// Rewrite the path prefix of a page and all its descendants
    async fn reparent_paths(&self, old_prefix: &str, new_prefix: &str) -> Result<()>;
}

pub struct SqlxPageRepository {
    pool: DynDatabasePool,
}

impl SqlxPageRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PageRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PageRepository for SqlxPageRepository {
    async fn create(&self, page: &Page, details: &PageDetails) -> Result<Page> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().unwrap(), page, details).await
            }
            DatabaseDriver::Mysql => {
                create_mysql(self.pool.as_mysql().unwrap(), page, details).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Page>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_path(&self, path: &str) -> Result<Option<Page>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_path_sqlite(self.pool.as_sqlite().unwrap(), path).await
            }
            DatabaseDriver::Mysql => get_by_path_mysql(self.pool.as_mysql().unwrap(), path).await,
        }
    }

    async fn get_details(&self, page: &Page) -> Result<PageDetails> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_details_sqlite(self.pool.as_sqlite().unwrap(), page).await
            }
            DatabaseDriver::Mysql => get_details_mysql(self.pool.as_mysql().unwrap(), page).await,
        }
    }

    async fn list(&self) -> Result<Vec<Page>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, page: &Page) -> Result<Page> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), page).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), page).await,
        }
    }

    async fn update_details(&self, page_id: i64, details: &PageDetails) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_details_sqlite(self.pool.as_sqlite().unwrap(), page_id, details).await
            }
            DatabaseDriver::Mysql => {
                update_details_mysql(self.pool.as_mysql().unwrap(), page_id, details).await
            }
        }
    }

    async fn children(&self, parent_id: i64) -> Result<Vec<Page>> {
        self.children_query(parent_id, ChildFilter::All).await
    }

    async fn live_children(&self, parent_id: i64) -> Result<Vec<Page>> {
        self.children_query(parent_id, ChildFilter::Live).await
    }

    async fn menu_children(&self, parent_id: i64) -> Result<Vec<Page>> {
        self.children_query(parent_id, ChildFilter::LiveInMenu).await
    }

    async fn live_children_newest_first(&self, parent_id: i64) -> Result<Vec<Page>> {
        self.children_query(parent_id, ChildFilter::LiveNewestFirst)
            .await
    }

    async fn publish(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let sql = "UPDATE pages SET live = 1, first_published_at = COALESCE(first_published_at, ?), updated_at = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(at)
                    .bind(Utc::now())
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to publish page")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(at)
                    .bind(Utc::now())
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to publish page")?;
            }
        }
        Ok(())
    }

    async fn unpublish(&self, id: i64) -> Result<()> {
        let sql = "UPDATE pages SET live = 0, updated_at = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(Utc::now())
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to unpublish page")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(Utc::now())
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to unpublish page")?;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Descendants and detail rows follow via cascading foreign keys
        let sql = "DELETE FROM pages WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete page")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete page")?;
            }
        }
        Ok(())
    }

    async fn slug_exists(&self, parent_id: Option<i64>, slug: &str) -> Result<bool> {
        let sql = match parent_id {
            Some(_) => "SELECT COUNT(*) as count FROM pages WHERE parent_id = ? AND slug = ?",
            None => "SELECT COUNT(*) as count FROM pages WHERE parent_id IS NULL AND slug = ?",
        };
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let mut query = sqlx::query(sql);
                if let Some(parent_id) = parent_id {
                    query = query.bind(parent_id);
                }
                let row = query
                    .bind(slug)
                    .fetch_one(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to check slug")?;
                row.get("count")
            }
            DatabaseDriver::Mysql => {
                let mut query = sqlx::query(sql);
                if let Some(parent_id) = parent_id {
                    query = query.bind(parent_id);
                }
                let row = query
                    .bind(slug)
                    .fetch_one(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to check slug")?;
                row.get("count")
            }
        };
        Ok(count > 0)
    }

    async fn next_sort_order(&self, parent_id: Option<i64>) -> Result<i32> {
        let sql = match parent_id {
            Some(_) => "SELECT COALESCE(MAX(sort_order), -1) + 1 as next FROM pages WHERE parent_id = ?",
            None => "SELECT COALESCE(MAX(sort_order), -1) + 1 as next FROM pages WHERE parent_id IS NULL",
        };
        let next: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let mut query = sqlx::query(sql);
                if let Some(parent_id) = parent_id {
                    query = query.bind(parent_id);
                }
                let row = query
                    .fetch_one(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to compute sort order")?;
                row.get("next")
            }
            DatabaseDriver::Mysql => {
                let mut query = sqlx::query(sql);
                if let Some(parent_id) = parent_id {
                    query = query.bind(parent_id);
                }
                let row = query
                    .fetch_one(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to compute sort order")?;
                row.get("next")
            }
        };
        Ok(next as i32)
    }

    async fn reparent_paths(&self, old_prefix: &str, new_prefix: &str) -> Result<()> {
        let pattern = like_prefix_pattern(old_prefix);
        // Concatenation syntax differs between the drivers
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(
                    "UPDATE pages SET path = ? || SUBSTR(path, ?) WHERE path LIKE ? ESCAPE '\\'",
                )
                .bind(new_prefix)
                .bind(old_prefix.len() as i64 + 1)
                .bind(&pattern)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to rewrite paths")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(
                    "UPDATE pages SET path = CONCAT(?, SUBSTR(path, ?)) WHERE path LIKE ? ESCAPE '\\\\'",
                )
                .bind(new_prefix)
                .bind(old_prefix.len() as i64 + 1)
                .bind(&pattern)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to rewrite paths")?;
            }
        }
        Ok(())
    }
}

/// LIKE prefix match with `_`, `%` and `\` in the prefix treated literally.
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '_' | '%' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

enum ChildFilter {
    All,
    Live,
    LiveInMenu,
    LiveNewestFirst,
}

impl ChildFilter {
    fn sql(&self) -> &'static str {
        match self {
            Self::All => {
                "SELECT * FROM pages WHERE parent_id = ? ORDER BY sort_order"
            }
            Self::Live => {
                "SELECT * FROM pages WHERE parent_id = ? AND live = 1 ORDER BY sort_order"
            }
            Self::LiveInMenu => {
                "SELECT * FROM pages WHERE parent_id = ? AND live = 1 AND show_in_menus = 1 ORDER BY sort_order"
            }
            Self::LiveNewestFirst => {
                "SELECT * FROM pages WHERE parent_id = ? AND live = 1 ORDER BY first_published_at DESC, path ASC"
            }
        }
    }
}

impl SqlxPageRepository {
    async fn children_query(&self, parent_id: i64, filter: ChildFilter) -> Result<Vec<Page>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(filter.sql())
                    .bind(parent_id)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list children")?;
                rows.iter().map(row_to_page_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(filter.sql())
                    .bind(parent_id)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list children")?;
                rows.iter().map(row_to_page_mysql).collect()
            }
        }
    }
}

pub(super) fn row_to_page_sqlite(row: &SqliteRow) -> Result<Page> {
    let kind: String = row.get("kind");
    Ok(Page {
        id: row.get("id"),
        parent_id: row.get("parent_id"),
        kind: kind.parse()?,
        title: row.get("title"),
        slug: row.get("slug"),
        path: row.get("path"),
        live: row.get("live"),
        show_in_menus: row.get("show_in_menus"),
        sort_order: row.get("sort_order"),
        first_published_at: row.get("first_published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub(super) fn row_to_page_mysql(row: &MySqlRow) -> Result<Page> {
    let kind: String = row.get("kind");
    Ok(Page {
        id: row.get("id"),
        parent_id: row.get("parent_id"),
        kind: kind.parse()?,
        title: row.get("title"),
        slug: row.get("slug"),
        path: row.get("path"),
        live: row.get("live"),
        show_in_menus: row.get("show_in_menus"),
        sort_order: row.get("sort_order"),
        first_published_at: row.get("first_published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const INSERT_PAGE_SQL: &str = "INSERT INTO pages (parent_id, kind, title, slug, path, live, show_in_menus, sort_order, first_published_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE_PAGE_SQL: &str = "UPDATE pages SET title = ?, slug = ?, path = ?, show_in_menus = ?, sort_order = ?, parent_id = ?, updated_at = ? WHERE id = ?";

// Detail table DML, shared between the drivers

const INSERT_STANDARD_SQL: &str =
    "INSERT INTO standard_pages (page_id, introduction, image_id, body) VALUES (?, ?, ?, ?)";
const UPDATE_STANDARD_SQL: &str =
    "UPDATE standard_pages SET introduction = ?, image_id = ?, body = ? WHERE page_id = ?";

const INSERT_HOME_SQL: &str = "INSERT INTO home_pages (page_id, hero_image_id, hero_text, hero_cta, hero_cta_link_id, body, promo_image_id, promo_title, promo_text, featured_section_1_title, featured_section_1_id, featured_section_2_title, featured_section_2_id, featured_section_3_title, featured_section_3_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE_HOME_SQL: &str = "UPDATE home_pages SET hero_image_id = ?, hero_text = ?, hero_cta = ?, hero_cta_link_id = ?, body = ?, promo_image_id = ?, promo_title = ?, promo_text = ?, featured_section_1_title = ?, featured_section_1_id = ?, featured_section_2_title = ?, featured_section_2_id = ?, featured_section_3_title = ?, featured_section_3_id = ? WHERE page_id = ?";

const INSERT_GALLERY_SQL: &str = "INSERT INTO gallery_pages (page_id, introduction, image_id, body, collection_name) VALUES (?, ?, ?, ?, ?)";
const UPDATE_GALLERY_SQL: &str = "UPDATE gallery_pages SET introduction = ?, image_id = ?, body = ?, collection_name = ? WHERE page_id = ?";

const INSERT_CENTRUM_SQL: &str =
    "INSERT INTO centrum_pages (page_id, image_id, body) VALUES (?, ?, ?)";
const UPDATE_CENTRUM_SQL: &str =
    "UPDATE centrum_pages SET image_id = ?, body = ? WHERE page_id = ?";

const INSERT_BLOG_SQL: &str =
    "INSERT INTO blog_pages (page_id, date, intro, body) VALUES (?, ?, ?, ?)";
const UPDATE_BLOG_SQL: &str =
    "UPDATE blog_pages SET date = ?, intro = ?, body = ? WHERE page_id = ?";

const INSERT_BLOG_INDEX_SQL: &str =
    "INSERT INTO blog_index_pages (page_id, intro) VALUES (?, ?)";
const UPDATE_BLOG_INDEX_SQL: &str =
    "UPDATE blog_index_pages SET intro = ? WHERE page_id = ?";

const INSERT_BLOG_TAG_INDEX_SQL: &str =
    "INSERT INTO blog_tag_index_pages (page_id) VALUES (?)";

fn encode_body(body: &StreamBody) -> Result<String> {
    body.to_json().context("Failed to encode stream body")
}

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, page: &Page, details: &PageDetails) -> Result<Page> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let result = sqlx::query(INSERT_PAGE_SQL)
        .bind(page.parent_id)
        .bind(page.kind.to_string())
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.path)
        .bind(page.live)
        .bind(page.show_in_menus)
        .bind(page.sort_order)
        .bind(page.first_published_at)
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(&mut *tx)
        .await
        .context("Failed to create page")?;

    let id = result.last_insert_rowid();

    match details {
        PageDetails::Standard(d) => {
            sqlx::query(INSERT_STANDARD_SQL)
                .bind(id)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .execute(&mut *tx)
                .await
                .context("Failed to create standard page details")?;
        }
        PageDetails::Home(d) => {
            sqlx::query(INSERT_HOME_SQL)
                .bind(id)
                .bind(d.hero_image_id)
                .bind(&d.hero_text)
                .bind(&d.hero_cta)
                .bind(d.hero_cta_link_id)
                .bind(encode_body(&d.body)?)
                .bind(d.promo_image_id)
                .bind(&d.promo_title)
                .bind(&d.promo_text)
                .bind(&d.featured_section_1_title)
                .bind(d.featured_section_1_id)
                .bind(&d.featured_section_2_title)
                .bind(d.featured_section_2_id)
                .bind(&d.featured_section_3_title)
                .bind(d.featured_section_3_id)
                .execute(&mut *tx)
                .await
                .context("Failed to create home page details")?;
        }
        PageDetails::Gallery(d) => {
            sqlx::query(INSERT_GALLERY_SQL)
                .bind(id)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(&d.collection_name)
                .execute(&mut *tx)
                .await
                .context("Failed to create gallery page details")?;
        }
        PageDetails::Centrum(d) => {
            sqlx::query(INSERT_CENTRUM_SQL)
                .bind(id)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .execute(&mut *tx)
                .await
                .context("Failed to create centrum page details")?;
        }
        PageDetails::Blog(d) => {
            sqlx::query(INSERT_BLOG_SQL)
                .bind(id)
                .bind(d.date)
                .bind(&d.intro)
                .bind(&d.body)
                .execute(&mut *tx)
                .await
                .context("Failed to create blog page details")?;
        }
        PageDetails::BlogIndex(d) => {
            sqlx::query(INSERT_BLOG_INDEX_SQL)
                .bind(id)
                .bind(&d.intro)
                .execute(&mut *tx)
                .await
                .context("Failed to create blog index details")?;
        }
        PageDetails::BlogTagIndex => {
            sqlx::query(INSERT_BLOG_TAG_INDEX_SQL)
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to create blog tag index details")?;
        }
    }

    tx.commit().await.context("Failed to commit page create")?;

    let mut created = page.clone();
    created.id = id;
    Ok(created)
}

async fn create_mysql(pool: &MySqlPool, page: &Page, details: &PageDetails) -> Result<Page> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let result = sqlx::query(INSERT_PAGE_SQL)
        .bind(page.parent_id)
        .bind(page.kind.to_string())
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.path)
        .bind(page.live)
        .bind(page.show_in_menus)
        .bind(page.sort_order)
        .bind(page.first_published_at)
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(&mut *tx)
        .await
        .context("Failed to create page")?;

    let id = result.last_insert_id() as i64;

    match details {
        PageDetails::Standard(d) => {
            sqlx::query(INSERT_STANDARD_SQL)
                .bind(id)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .execute(&mut *tx)
                .await
                .context("Failed to create standard page details")?;
        }
        PageDetails::Home(d) => {
            sqlx::query(INSERT_HOME_SQL)
                .bind(id)
                .bind(d.hero_image_id)
                .bind(&d.hero_text)
                .bind(&d.hero_cta)
                .bind(d.hero_cta_link_id)
                .bind(encode_body(&d.body)?)
                .bind(d.promo_image_id)
                .bind(&d.promo_title)
                .bind(&d.promo_text)
                .bind(&d.featured_section_1_title)
                .bind(d.featured_section_1_id)
                .bind(&d.featured_section_2_title)
                .bind(d.featured_section_2_id)
                .bind(&d.featured_section_3_title)
                .bind(d.featured_section_3_id)
                .execute(&mut *tx)
                .await
                .context("Failed to create home page details")?;
        }
        PageDetails::Gallery(d) => {
            sqlx::query(INSERT_GALLERY_SQL)
                .bind(id)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(&d.collection_name)
                .execute(&mut *tx)
                .await
                .context("Failed to create gallery page details")?;
        }
        PageDetails::Centrum(d) => {
            sqlx::query(INSERT_CENTRUM_SQL)
                .bind(id)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .execute(&mut *tx)
                .await
                .context("Failed to create centrum page details")?;
        }
        PageDetails::Blog(d) => {
            sqlx::query(INSERT_BLOG_SQL)
                .bind(id)
                .bind(d.date)
                .bind(&d.intro)
                .bind(&d.body)
                .execute(&mut *tx)
                .await
                .context("Failed to create blog page details")?;
        }
        PageDetails::BlogIndex(d) => {
            sqlx::query(INSERT_BLOG_INDEX_SQL)
                .bind(id)
                .bind(&d.intro)
                .execute(&mut *tx)
                .await
                .context("Failed to create blog index details")?;
        }
        PageDetails::BlogTagIndex => {
            sqlx::query(INSERT_BLOG_TAG_INDEX_SQL)
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to create blog tag index details")?;
        }
    }

    tx.commit().await.context("Failed to commit page create")?;

    let mut created = page.clone();
    created.id = id;
    Ok(created)
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Page>> {
    let row = sqlx::query("SELECT * FROM pages WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get page")?;
    row.as_ref().map(row_to_page_sqlite).transpose()
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Page>> {
    let row = sqlx::query("SELECT * FROM pages WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get page")?;
    row.as_ref().map(row_to_page_mysql).transpose()
}

async fn get_by_path_sqlite(pool: &SqlitePool, path: &str) -> Result<Option<Page>> {
    let row = sqlx::query("SELECT * FROM pages WHERE path = ?")
        .bind(path)
        .fetch_optional(pool)
        .await
        .context("Failed to get page by path")?;
    row.as_ref().map(row_to_page_sqlite).transpose()
}

async fn get_by_path_mysql(pool: &MySqlPool, path: &str) -> Result<Option<Page>> {
    let row = sqlx::query("SELECT * FROM pages WHERE path = ?")
        .bind(path)
        .fetch_optional(pool)
        .await
        .context("Failed to get page by path")?;
    row.as_ref().map(row_to_page_mysql).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Page>> {
    let rows = sqlx::query("SELECT * FROM pages ORDER BY path")
        .fetch_all(pool)
        .await
        .context("Failed to list pages")?;
    rows.iter().map(row_to_page_sqlite).collect()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Page>> {
    let rows = sqlx::query("SELECT * FROM pages ORDER BY path")
        .fetch_all(pool)
        .await
        .context("Failed to list pages")?;
    rows.iter().map(row_to_page_mysql).collect()
}

async fn update_sqlite(pool: &SqlitePool, page: &Page) -> Result<Page> {
    sqlx::query(UPDATE_PAGE_SQL)
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.path)
        .bind(page.show_in_menus)
        .bind(page.sort_order)
        .bind(page.parent_id)
        .bind(Utc::now())
        .bind(page.id)
        .execute(pool)
        .await
        .context("Failed to update page")?;
    Ok(page.clone())
}

async fn update_mysql(pool: &MySqlPool, page: &Page) -> Result<Page> {
    sqlx::query(UPDATE_PAGE_SQL)
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.path)
        .bind(page.show_in_menus)
        .bind(page.sort_order)
        .bind(page.parent_id)
        .bind(Utc::now())
        .bind(page.id)
        .execute(pool)
        .await
        .context("Failed to update page")?;
    Ok(page.clone())
}

async fn get_details_sqlite(pool: &SqlitePool, page: &Page) -> Result<PageDetails> {
    let details = match page.kind {
        PageKind::Standard => {
            let row = sqlx::query("SELECT * FROM standard_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get standard page details")?;
            match row {
                Some(row) => PageDetails::Standard(StandardPageDetails {
                    introduction: row.get("introduction"),
                    image_id: row.get("image_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Home => {
            let row = sqlx::query("SELECT * FROM home_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get home page details")?;
            match row {
                Some(row) => PageDetails::Home(HomePageDetails {
                    hero_image_id: row.get("hero_image_id"),
                    hero_text: row.get("hero_text"),
                    hero_cta: row.get("hero_cta"),
                    hero_cta_link_id: row.get("hero_cta_link_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                    promo_image_id: row.get("promo_image_id"),
                    promo_title: row.get("promo_title"),
                    promo_text: row.get("promo_text"),
                    featured_section_1_title: row.get("featured_section_1_title"),
                    featured_section_1_id: row.get("featured_section_1_id"),
                    featured_section_2_title: row.get("featured_section_2_title"),
                    featured_section_2_id: row.get("featured_section_2_id"),
                    featured_section_3_title: row.get("featured_section_3_title"),
                    featured_section_3_id: row.get("featured_section_3_id"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Gallery => {
            let row = sqlx::query("SELECT * FROM gallery_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get gallery page details")?;
            match row {
                Some(row) => PageDetails::Gallery(GalleryPageDetails {
                    introduction: row.get("introduction"),
                    image_id: row.get("image_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                    collection_name: row.get("collection_name"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Centrum => {
            let row = sqlx::query("SELECT * FROM centrum_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get centrum page details")?;
            match row {
                Some(row) => PageDetails::Centrum(CentrumPageDetails {
                    image_id: row.get("image_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Blog => {
            let row = sqlx::query("SELECT * FROM blog_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get blog page details")?;
            match row {
                Some(row) => PageDetails::Blog(BlogPageDetails {
                    date: row.get("date"),
                    intro: row.get("intro"),
                    body: row.get("body"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::BlogIndex => {
            let row = sqlx::query("SELECT * FROM blog_index_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get blog index details")?;
            match row {
                Some(row) => PageDetails::BlogIndex(BlogIndexPageDetails {
                    intro: row.get("intro"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::BlogTagIndex => PageDetails::BlogTagIndex,
    };
    Ok(details)
}

async fn get_details_mysql(pool: &MySqlPool, page: &Page) -> Result<PageDetails> {
    let details = match page.kind {
        PageKind::Standard => {
            let row = sqlx::query("SELECT * FROM standard_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get standard page details")?;
            match row {
                Some(row) => PageDetails::Standard(StandardPageDetails {
                    introduction: row.get("introduction"),
                    image_id: row.get("image_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Home => {
            let row = sqlx::query("SELECT * FROM home_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get home page details")?;
            match row {
                Some(row) => PageDetails::Home(HomePageDetails {
                    hero_image_id: row.get("hero_image_id"),
                    hero_text: row.get("hero_text"),
                    hero_cta: row.get("hero_cta"),
                    hero_cta_link_id: row.get("hero_cta_link_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                    promo_image_id: row.get("promo_image_id"),
                    promo_title: row.get("promo_title"),
                    promo_text: row.get("promo_text"),
                    featured_section_1_title: row.get("featured_section_1_title"),
                    featured_section_1_id: row.get("featured_section_1_id"),
                    featured_section_2_title: row.get("featured_section_2_title"),
                    featured_section_2_id: row.get("featured_section_2_id"),
                    featured_section_3_title: row.get("featured_section_3_title"),
                    featured_section_3_id: row.get("featured_section_3_id"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Gallery => {
            let row = sqlx::query("SELECT * FROM gallery_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get gallery page details")?;
            match row {
                Some(row) => PageDetails::Gallery(GalleryPageDetails {
                    introduction: row.get("introduction"),
                    image_id: row.get("image_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                    collection_name: row.get("collection_name"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Centrum => {
            let row = sqlx::query("SELECT * FROM centrum_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get centrum page details")?;
            match row {
                Some(row) => PageDetails::Centrum(CentrumPageDetails {
                    image_id: row.get("image_id"),
                    body: StreamBody::from_json(row.get::<String, _>("body").as_str())?,
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::Blog => {
            let row = sqlx::query("SELECT * FROM blog_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get blog page details")?;
            match row {
                Some(row) => PageDetails::Blog(BlogPageDetails {
                    date: row.get("date"),
                    intro: row.get("intro"),
                    body: row.get("body"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::BlogIndex => {
            let row = sqlx::query("SELECT * FROM blog_index_pages WHERE page_id = ?")
                .bind(page.id)
                .fetch_optional(pool)
                .await
                .context("Failed to get blog index details")?;
            match row {
                Some(row) => PageDetails::BlogIndex(BlogIndexPageDetails {
                    intro: row.get("intro"),
                }),
                None => PageDetails::default_for(page.kind),
            }
        }
        PageKind::BlogTagIndex => PageDetails::BlogTagIndex,
    };
    Ok(details)
}

async fn update_details_sqlite(
    pool: &SqlitePool,
    page_id: i64,
    details: &PageDetails,
) -> Result<()> {
    match details {
        PageDetails::Standard(d) => {
            sqlx::query(UPDATE_STANDARD_SQL)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update standard page details")?;
        }
        PageDetails::Home(d) => {
            sqlx::query(UPDATE_HOME_SQL)
                .bind(d.hero_image_id)
                .bind(&d.hero_text)
                .bind(&d.hero_cta)
                .bind(d.hero_cta_link_id)
                .bind(encode_body(&d.body)?)
                .bind(d.promo_image_id)
                .bind(&d.promo_title)
                .bind(&d.promo_text)
                .bind(&d.featured_section_1_title)
                .bind(d.featured_section_1_id)
                .bind(&d.featured_section_2_title)
                .bind(d.featured_section_2_id)
                .bind(&d.featured_section_3_title)
                .bind(d.featured_section_3_id)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update home page details")?;
        }
        PageDetails::Gallery(d) => {
            sqlx::query(UPDATE_GALLERY_SQL)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(&d.collection_name)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update gallery page details")?;
        }
        PageDetails::Centrum(d) => {
            sqlx::query(UPDATE_CENTRUM_SQL)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update centrum page details")?;
        }
        PageDetails::Blog(d) => {
            sqlx::query(UPDATE_BLOG_SQL)
                .bind(d.date)
                .bind(&d.intro)
                .bind(&d.body)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update blog page details")?;
        }
        PageDetails::BlogIndex(d) => {
            sqlx::query(UPDATE_BLOG_INDEX_SQL)
                .bind(&d.intro)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update blog index details")?;
        }
        PageDetails::BlogTagIndex => {}
    }
    Ok(())
}

async fn update_details_mysql(
    pool: &MySqlPool,
    page_id: i64,
    details: &PageDetails,
) -> Result<()> {
    match details {
        PageDetails::Standard(d) => {
            sqlx::query(UPDATE_STANDARD_SQL)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update standard page details")?;
        }
        PageDetails::Home(d) => {
            sqlx::query(UPDATE_HOME_SQL)
                .bind(d.hero_image_id)
                .bind(&d.hero_text)
                .bind(&d.hero_cta)
                .bind(d.hero_cta_link_id)
                .bind(encode_body(&d.body)?)
                .bind(d.promo_image_id)
                .bind(&d.promo_title)
                .bind(&d.promo_text)
                .bind(&d.featured_section_1_title)
                .bind(d.featured_section_1_id)
                .bind(&d.featured_section_2_title)
                .bind(d.featured_section_2_id)
                .bind(&d.featured_section_3_title)
                .bind(d.featured_section_3_id)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update home page details")?;
        }
        PageDetails::Gallery(d) => {
            sqlx::query(UPDATE_GALLERY_SQL)
                .bind(&d.introduction)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(&d.collection_name)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update gallery page details")?;
        }
        PageDetails::Centrum(d) => {
            sqlx::query(UPDATE_CENTRUM_SQL)
                .bind(d.image_id)
                .bind(encode_body(&d.body)?)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update centrum page details")?;
        }
        PageDetails::Blog(d) => {
            sqlx::query(UPDATE_BLOG_SQL)
                .bind(d.date)
                .bind(&d.intro)
                .bind(&d.body)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update blog page details")?;
        }
        PageDetails::BlogIndex(d) => {
            sqlx::query(UPDATE_BLOG_INDEX_SQL)
                .bind(&d.intro)
                .bind(page_id)
                .execute(pool)
                .await
                .context("Failed to update blog index details")?;
        }
        PageDetails::BlogTagIndex => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Block, HeadingSize};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (DynDatabasePool, SqlxPageRepository) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxPageRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_root(repo: &SqlxPageRepository) -> Page {
        let mut page = Page::new(PageKind::Home, "Home".to_string(), "home".to_string());
        page.path = "/".to_string();
        repo.create(&page, &PageDetails::default_for(PageKind::Home))
            .await
            .expect("Failed to create root")
    }

    #[tokio::test]
    async fn test_create_and_get_page_with_details() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        let mut page = Page::new(PageKind::Standard, "About".to_string(), "about".to_string());
        page.parent_id = Some(root.id);
        page.path = root.child_path("about");
        let details = PageDetails::Standard(StandardPageDetails {
            introduction: "Who we are".to_string(),
            image_id: None,
            body: StreamBody::new(vec![Block::Heading {
                heading_text: "About us".to_string(),
                size: HeadingSize::H2,
            }]),
        });

        let created = repo.create(&page, &details).await.expect("create failed");
        assert!(created.id > 0);

        let fetched = repo
            .get_by_id(created.id)
            .await
            .expect("get failed")
            .expect("page missing");
        assert_eq!(fetched.kind, PageKind::Standard);
        assert_eq!(fetched.path, "/about/");

        let fetched_details = repo.get_details(&fetched).await.expect("details failed");
        assert_eq!(details, fetched_details);
    }

    #[tokio::test]
    async fn test_get_by_path() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        let found = repo.get_by_path("/").await.unwrap().unwrap();
        assert_eq!(found.id, root.id);
        assert!(repo.get_by_path("/missing/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_menu_children_filters_live_and_in_menu() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        for (slug, live, in_menu) in [
            ("a", true, true),
            ("b", true, false),
            ("c", false, true),
        ] {
            let mut page =
                Page::new(PageKind::Standard, slug.to_uppercase(), slug.to_string());
            page.parent_id = Some(root.id);
            page.path = root.child_path(slug);
            page.show_in_menus = in_menu;
            let created = repo
                .create(&page, &PageDetails::default_for(PageKind::Standard))
                .await
                .unwrap();
            if live {
                repo.publish(created.id, Utc::now()).await.unwrap();
            }
        }

        let menu = repo.menu_children(root.id).await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].slug, "a");

        let live = repo.live_children(root.id).await.unwrap();
        assert_eq!(live.len(), 2);

        let all = repo.children(root.id).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_live_children_newest_first() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        let t1 = Utc::now() - chrono::Duration::days(3);
        let t2 = Utc::now() - chrono::Duration::days(2);
        let t3 = Utc::now() - chrono::Duration::days(1);

        for (slug, at) in [("one", t1), ("two", t2), ("three", t3)] {
            let mut page = Page::new(PageKind::Blog, slug.to_string(), slug.to_string());
            page.parent_id = Some(root.id);
            page.path = root.child_path(slug);
            let created = repo
                .create(&page, &PageDetails::default_for(PageKind::Blog))
                .await
                .unwrap();
            repo.publish(created.id, at).await.unwrap();
        }

        let ordered = repo.live_children_newest_first(root.id).await.unwrap();
        let slugs: Vec<&str> = ordered.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["three", "two", "one"]);
    }

    #[tokio::test]
    async fn test_publish_stamps_first_published_only_once() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        let first = Utc::now() - chrono::Duration::days(5);
        repo.publish(root.id, first).await.unwrap();
        let page = repo.get_by_id(root.id).await.unwrap().unwrap();
        assert!(page.live);
        let stamped = page.first_published_at.unwrap();

        repo.unpublish(root.id).await.unwrap();
        let page = repo.get_by_id(root.id).await.unwrap().unwrap();
        assert!(!page.live);
        assert_eq!(page.first_published_at.unwrap(), stamped);

        // Republishing keeps the original stamp
        repo.publish(root.id, Utc::now()).await.unwrap();
        let page = repo.get_by_id(root.id).await.unwrap().unwrap();
        assert_eq!(page.first_published_at.unwrap(), stamped);
    }

    #[tokio::test]
    async fn test_slug_exists_and_sort_order() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        assert!(!repo.slug_exists(Some(root.id), "about").await.unwrap());
        assert_eq!(repo.next_sort_order(Some(root.id)).await.unwrap(), 0);

        let mut page = Page::new(PageKind::Standard, "About".to_string(), "about".to_string());
        page.parent_id = Some(root.id);
        page.path = root.child_path("about");
        repo.create(&page, &PageDetails::default_for(PageKind::Standard))
            .await
            .unwrap();

        assert!(repo.slug_exists(Some(root.id), "about").await.unwrap());
        assert_eq!(repo.next_sort_order(Some(root.id)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reparent_paths_rewrites_subtree() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        let mut section =
            Page::new(PageKind::Standard, "News".to_string(), "news".to_string());
        section.parent_id = Some(root.id);
        section.path = "/news/".to_string();
        let section = repo
            .create(&section, &PageDetails::default_for(PageKind::Standard))
            .await
            .unwrap();

        let mut item = Page::new(PageKind::Standard, "Item".to_string(), "item".to_string());
        item.parent_id = Some(section.id);
        item.path = "/news/item/".to_string();
        repo.create(&item, &PageDetails::default_for(PageKind::Standard))
            .await
            .unwrap();

        repo.reparent_paths("/news/", "/archive/news/").await.unwrap();

        assert!(repo.get_by_path("/archive/news/item/").await.unwrap().is_some());
        assert!(repo.get_by_path("/news/item/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reparent_paths_matches_underscore_literally() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        for slug in ["a_b", "axb"] {
            let mut section =
                Page::new(PageKind::Standard, slug.to_uppercase(), slug.to_string());
            section.parent_id = Some(root.id);
            section.path = format!("/{}/", slug);
            let section = repo
                .create(&section, &PageDetails::default_for(PageKind::Standard))
                .await
                .unwrap();

            let mut item = Page::new(PageKind::Standard, "Item".to_string(), "item".to_string());
            item.parent_id = Some(section.id);
            item.path = section.child_path("item");
            repo.create(&item, &PageDetails::default_for(PageKind::Standard))
                .await
                .unwrap();
        }

        // `_` in the old prefix must not act as a LIKE wildcard
        repo.reparent_paths("/a_b/", "/renamed/").await.unwrap();

        assert!(repo.get_by_path("/renamed/item/").await.unwrap().is_some());
        assert!(repo.get_by_path("/axb/item/").await.unwrap().is_some());
        assert!(repo.get_by_path("/a_b/item/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_details_round_trip() {
        let (_pool, repo) = setup().await;
        let root = create_root(&repo).await;

        let details = PageDetails::Home(HomePageDetails {
            hero_text: "Welcome".to_string(),
            featured_section_1_title: Some("Featured".to_string()),
            ..Default::default()
        });
        repo.update_details(root.id, &details).await.unwrap();

        let fetched = repo.get_details(&root).await.unwrap();
        assert_eq!(fetched, details);
    }

    #[tokio::test]
    async fn test_details_survive_image_delete() {
        let (pool, repo) = setup().await;
        let root = create_root(&repo).await;

        use crate::db::repositories::{ImageRepository, SqlxImageRepository};
        let images = SqlxImageRepository::new(pool);
        let image = images
            .create(&crate::models::CreateImageInput {
                title: "Banner".to_string(),
                file_path: "images/banner.jpg".to_string(),
                width: 800,
                height: 600,
            })
            .await
            .unwrap();

        let mut page = Page::new(PageKind::Standard, "About".to_string(), "about".to_string());
        page.parent_id = Some(root.id);
        page.path = root.child_path("about");
        let details = PageDetails::Standard(StandardPageDetails {
            introduction: String::new(),
            image_id: Some(image.id),
            body: StreamBody::default(),
        });
        let created = repo.create(&page, &details).await.unwrap();

        images.delete(image.id).await.unwrap();

        // The page survives with the reference cleared, not cascaded.
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        match repo.get_details(&fetched).await.unwrap() {
            PageDetails::Standard(d) => assert_eq!(d.image_id, None),
            other => panic!("unexpected details: {:?}", other),
        }
    }
}
