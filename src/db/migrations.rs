//! Database migrations module
//!
//! Code-based migrations for the Serce CMS. All migrations are embedded
//! as SQL strings, supporting both SQLite and MySQL for single-binary
//! deployment. The applied set is tracked in an append-only `_migrations`
//! table and pending migrations run in version order.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the Serce CMS, in application order.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: images referenced by pages, blocks and snippets
    Migration {
        version: 1,
        name: "create_images",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                file_path VARCHAR(500) NOT NULL,
                width INTEGER NOT NULL DEFAULT 0,
                height INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS images (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(255) NOT NULL,
                file_path VARCHAR(500) NOT NULL,
                width INT NOT NULL DEFAULT 0,
                height INT NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 2: the page tree core; one row per page of any kind
    Migration {
        version: 2,
        name: "create_pages",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id INTEGER,
                kind VARCHAR(20) NOT NULL,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                path VARCHAR(1024) NOT NULL UNIQUE,
                live INTEGER NOT NULL DEFAULT 0,
                show_in_menus INTEGER NOT NULL DEFAULT 0,
                sort_order INTEGER NOT NULL DEFAULT 0,
                first_published_at TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (parent_id) REFERENCES pages(id) ON DELETE CASCADE,
                UNIQUE (parent_id, slug)
            );
            CREATE INDEX IF NOT EXISTS idx_pages_parent_id ON pages(parent_id);
            CREATE INDEX IF NOT EXISTS idx_pages_path ON pages(path);
            CREATE INDEX IF NOT EXISTS idx_pages_live ON pages(live);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS pages (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                parent_id BIGINT,
                kind VARCHAR(20) NOT NULL,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                path VARCHAR(1024) NOT NULL,
                live TINYINT NOT NULL DEFAULT 0,
                show_in_menus TINYINT NOT NULL DEFAULT 0,
                sort_order INT NOT NULL DEFAULT 0,
                first_published_at TIMESTAMP NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
                FOREIGN KEY (parent_id) REFERENCES pages(id) ON DELETE CASCADE,
                UNIQUE KEY uk_pages_parent_slug (parent_id, slug),
                UNIQUE KEY uk_pages_path (path(255))
            );
            CREATE INDEX idx_pages_parent_id ON pages(parent_id);
            CREATE INDEX idx_pages_live ON pages(live);
        "#,
    },
    // Migration 3: home and standard page detail tables.
    // Image and page references clear on delete instead of cascading.
    Migration {
        version: 3,
        name: "create_home_and_standard_pages",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS standard_pages (
                page_id INTEGER PRIMARY KEY,
                introduction TEXT NOT NULL DEFAULT '',
                image_id INTEGER,
                body TEXT NOT NULL DEFAULT '[]',
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
            CREATE TABLE IF NOT EXISTS home_pages (
                page_id INTEGER PRIMARY KEY,
                hero_image_id INTEGER,
                hero_text VARCHAR(255) NOT NULL DEFAULT '',
                hero_cta VARCHAR(255) NOT NULL DEFAULT '',
                hero_cta_link_id INTEGER,
                body TEXT NOT NULL DEFAULT '[]',
                promo_image_id INTEGER,
                promo_title VARCHAR(255),
                promo_text TEXT,
                featured_section_1_title VARCHAR(255),
                featured_section_1_id INTEGER,
                featured_section_2_title VARCHAR(255),
                featured_section_2_id INTEGER,
                featured_section_3_title VARCHAR(255),
                featured_section_3_id INTEGER,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (hero_image_id) REFERENCES images(id) ON DELETE SET NULL,
                FOREIGN KEY (hero_cta_link_id) REFERENCES pages(id) ON DELETE SET NULL,
                FOREIGN KEY (promo_image_id) REFERENCES images(id) ON DELETE SET NULL,
                FOREIGN KEY (featured_section_1_id) REFERENCES pages(id) ON DELETE SET NULL,
                FOREIGN KEY (featured_section_2_id) REFERENCES pages(id) ON DELETE SET NULL,
                FOREIGN KEY (featured_section_3_id) REFERENCES pages(id) ON DELETE SET NULL
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS standard_pages (
                page_id BIGINT PRIMARY KEY,
                introduction TEXT NOT NULL,
                image_id BIGINT,
                body TEXT NOT NULL,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
            CREATE TABLE IF NOT EXISTS home_pages (
                page_id BIGINT PRIMARY KEY,
                hero_image_id BIGINT,
                hero_text VARCHAR(255) NOT NULL DEFAULT '',
                hero_cta VARCHAR(255) NOT NULL DEFAULT '',
                hero_cta_link_id BIGINT,
                body TEXT NOT NULL,
                promo_image_id BIGINT,
                promo_title VARCHAR(255),
                promo_text TEXT,
                featured_section_1_title VARCHAR(255),
                featured_section_1_id BIGINT,
                featured_section_2_title VARCHAR(255),
                featured_section_2_id BIGINT,
                featured_section_3_title VARCHAR(255),
                featured_section_3_id BIGINT,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (hero_image_id) REFERENCES images(id) ON DELETE SET NULL,
                FOREIGN KEY (hero_cta_link_id) REFERENCES pages(id) ON DELETE SET NULL,
                FOREIGN KEY (promo_image_id) REFERENCES images(id) ON DELETE SET NULL,
                FOREIGN KEY (featured_section_1_id) REFERENCES pages(id) ON DELETE SET NULL,
                FOREIGN KEY (featured_section_2_id) REFERENCES pages(id) ON DELETE SET NULL,
                FOREIGN KEY (featured_section_3_id) REFERENCES pages(id) ON DELETE SET NULL
            );
        "#,
    },
    // Migration 4: gallery and centrum page detail tables
    Migration {
        version: 4,
        name: "create_gallery_and_centrum_pages",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS gallery_pages (
                page_id INTEGER PRIMARY KEY,
                introduction TEXT NOT NULL DEFAULT '',
                image_id INTEGER,
                body TEXT NOT NULL DEFAULT '[]',
                collection_name VARCHAR(255),
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
            CREATE TABLE IF NOT EXISTS centrum_pages (
                page_id INTEGER PRIMARY KEY,
                image_id INTEGER,
                body TEXT NOT NULL DEFAULT '[]',
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS gallery_pages (
                page_id BIGINT PRIMARY KEY,
                introduction TEXT NOT NULL,
                image_id BIGINT,
                body TEXT NOT NULL,
                collection_name VARCHAR(255),
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
            CREATE TABLE IF NOT EXISTS centrum_pages (
                page_id BIGINT PRIMARY KEY,
                image_id BIGINT,
                body TEXT NOT NULL,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
        "#,
    },
    // Migration 5: snippet tables. footer_text is a single-row table;
    // the id = 1 check enforces the at-most-one-instance invariant.
    Migration {
        version: 5,
        name: "create_footer_text_and_people",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS footer_text (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                body TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name VARCHAR(254) NOT NULL,
                last_name VARCHAR(254) NOT NULL,
                job_title VARCHAR(254) NOT NULL,
                image_id INTEGER,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS footer_text (
                id TINYINT PRIMARY KEY CHECK (id = 1),
                body TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS people (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                first_name VARCHAR(254) NOT NULL,
                last_name VARCHAR(254) NOT NULL,
                job_title VARCHAR(254) NOT NULL,
                image_id BIGINT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE SET NULL
            );
        "#,
    },
    // Migration 6: blog page detail tables and ordered gallery images.
    // Gallery images cascade with their post AND with their image.
    Migration {
        version: 6,
        name: "create_blog_pages",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS blog_index_pages (
                page_id INTEGER PRIMARY KEY,
                intro TEXT NOT NULL DEFAULT '',
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_tag_index_pages (
                page_id INTEGER PRIMARY KEY,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_pages (
                page_id INTEGER PRIMARY KEY,
                date DATE NOT NULL,
                intro VARCHAR(250) NOT NULL DEFAULT '',
                body TEXT NOT NULL DEFAULT '',
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_gallery_images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                page_id INTEGER NOT NULL,
                image_id INTEGER NOT NULL,
                caption VARCHAR(250) NOT NULL DEFAULT '',
                sort_order INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (page_id) REFERENCES blog_pages(page_id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_blog_gallery_images_page_id ON blog_gallery_images(page_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS blog_index_pages (
                page_id BIGINT PRIMARY KEY,
                intro TEXT NOT NULL,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_tag_index_pages (
                page_id BIGINT PRIMARY KEY,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_pages (
                page_id BIGINT PRIMARY KEY,
                date DATE NOT NULL,
                intro VARCHAR(250) NOT NULL DEFAULT '',
                body TEXT NOT NULL,
                FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_gallery_images (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                page_id BIGINT NOT NULL,
                image_id BIGINT NOT NULL,
                caption VARCHAR(250) NOT NULL DEFAULT '',
                sort_order INT NOT NULL DEFAULT 0,
                FOREIGN KEY (page_id) REFERENCES blog_pages(page_id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_blog_gallery_images_page_id ON blog_gallery_images(page_id);
        "#,
    },
    // Migration 7: blog taxonomy. Tag names are unique and shared
    // across posts; category names carry no uniqueness constraint.
    Migration {
        version: 7,
        name: "create_blog_taxonomy",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS blog_page_tags (
                page_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (page_id, tag_id),
                FOREIGN KEY (page_id) REFERENCES blog_pages(page_id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                icon_image_id INTEGER,
                FOREIGN KEY (icon_image_id) REFERENCES images(id) ON DELETE SET NULL
            );
            CREATE TABLE IF NOT EXISTS blog_page_categories (
                page_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                PRIMARY KEY (page_id, category_id),
                FOREIGN KEY (page_id) REFERENCES blog_pages(page_id) ON DELETE CASCADE,
                FOREIGN KEY (category_id) REFERENCES blog_categories(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_blog_page_tags_tag_id ON blog_page_tags(tag_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(100) NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS blog_page_tags (
                page_id BIGINT NOT NULL,
                tag_id BIGINT NOT NULL,
                PRIMARY KEY (page_id, tag_id),
                FOREIGN KEY (page_id) REFERENCES blog_pages(page_id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS blog_categories (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(255) NOT NULL,
                icon_image_id BIGINT,
                FOREIGN KEY (icon_image_id) REFERENCES images(id) ON DELETE SET NULL
            );
            CREATE TABLE IF NOT EXISTS blog_page_categories (
                page_id BIGINT NOT NULL,
                category_id BIGINT NOT NULL,
                PRIMARY KEY (page_id, category_id),
                FOREIGN KEY (page_id) REFERENCES blog_pages(page_id) ON DELETE CASCADE,
                FOREIGN KEY (category_id) REFERENCES blog_categories(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_blog_page_tags_tag_id ON blog_page_tags(tag_id);
        "#,
    },
];

/// Run all pending migrations
///
/// Creates the tracking table if needed, skips already-applied versions
/// and applies the rest in order. Returns the number applied.
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => get_applied_migrations_sqlite(pool.as_sqlite().unwrap()).await,
        DatabaseDriver::Mysql => get_applied_migrations_mysql(pool.as_mysql().unwrap()).await,
    }
}

async fn get_applied_migrations_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

async fn get_applied_migrations_mysql(pool: &MySqlPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration
async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            apply_migration_sqlite(pool.as_sqlite().unwrap(), migration).await
        }
        DatabaseDriver::Mysql => apply_migration_mysql(pool.as_mysql().unwrap(), migration).await,
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_sqlite) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

async fn apply_migration_mysql(pool: &MySqlPool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_mysql) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual statements, handling comments properly
fn split_sql_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut current_start = 0;
    let mut in_statement = false;

    for (i, c) in sql.char_indices() {
        match c {
            ';' => {
                if in_statement {
                    let stmt = sql[current_start..i].trim();
                    if !stmt.is_empty() && !is_comment_only(stmt) {
                        statements.push(stmt);
                    }
                    in_statement = false;
                }
                current_start = i + 1;
            }
            _ if !c.is_whitespace() && !in_statement => {
                current_start = i;
                in_statement = true;
            }
            _ => {}
        }
    }

    if in_statement {
        let stmt = sql[current_start..].trim();
        if !stmt.is_empty() && !is_comment_only(stmt) {
            statements.push(stmt);
        }
    }

    statements
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    for line in s.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("--") {
            return false;
        }
    }
    true
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &DynDatabasePool) -> Result<bool> {
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(applied.len() == MIGRATIONS.len())
}

/// Get pending migrations count
pub async fn pending_count(pool: &DynDatabasePool) -> Result<usize> {
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(MIGRATIONS.len().saturating_sub(applied.len()))
}

/// Get the total number of migrations defined
pub fn total_migrations() -> usize {
    MIGRATIONS.len()
}

/// Get migration by version
pub fn get_migration(version: i32) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.version == version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());

        // Running again should apply 0 migrations
        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_is_up_to_date() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let up_to_date = is_up_to_date(&pool).await.expect("Failed to check");
        assert!(!up_to_date);

        run_migrations(&pool).await.expect("Failed to run migrations");
        let up_to_date = is_up_to_date(&pool).await.expect("Failed to check");
        assert!(up_to_date);
    }

    #[tokio::test]
    async fn test_pending_count() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let pending = pending_count(&pool).await.expect("Failed to check");
        assert_eq!(pending, MIGRATIONS.len());

        run_migrations(&pool).await.expect("Failed to run migrations");
        let pending = pending_count(&pool).await.expect("Failed to check");
        assert_eq!(pending, 0);
    }

    #[tokio::test]
    async fn test_pages_table_created() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        let result = sqlx::query(
            "INSERT INTO pages (kind, title, slug, path) VALUES ('home', 'Home', 'home', '/')",
        )
        .execute(sqlite_pool)
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_sibling_slug_uniqueness() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        sqlx::query(
            "INSERT INTO pages (kind, title, slug, path) VALUES ('home', 'Home', 'home', '/')",
        )
        .execute(sqlite_pool)
        .await
        .expect("Failed to create root");

        sqlx::query(
            "INSERT INTO pages (parent_id, kind, title, slug, path) VALUES (1, 'standard', 'A', 'about', '/about/')",
        )
        .execute(sqlite_pool)
        .await
        .expect("Failed to create child");

        // Same slug under the same parent must be rejected
        let result = sqlx::query(
            "INSERT INTO pages (parent_id, kind, title, slug, path) VALUES (1, 'standard', 'B', 'about', '/about-2/')",
        )
        .execute(sqlite_pool)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_image_delete_clears_page_reference() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        sqlx::query("INSERT INTO images (title, file_path) VALUES ('Photo', 'photo.jpg')")
            .execute(sqlite_pool)
            .await
            .expect("Failed to create image");
        sqlx::query(
            "INSERT INTO pages (kind, title, slug, path) VALUES ('standard', 'About', 'about', '/about/')",
        )
        .execute(sqlite_pool)
        .await
        .expect("Failed to create page");
        sqlx::query("INSERT INTO standard_pages (page_id, image_id) VALUES (1, 1)")
            .execute(sqlite_pool)
            .await
            .expect("Failed to create detail row");

        sqlx::query("DELETE FROM images WHERE id = 1")
            .execute(sqlite_pool)
            .await
            .expect("Failed to delete image");

        // Page record survives with the reference cleared
        let row = sqlx::query("SELECT image_id FROM standard_pages WHERE page_id = 1")
            .fetch_one(sqlite_pool)
            .await
            .expect("Detail row should survive");
        let image_id: Option<i64> = row.get("image_id");
        assert!(image_id.is_none());
    }

    #[tokio::test]
    async fn test_blog_delete_cascades_gallery_and_tags() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        sqlx::query("INSERT INTO images (title, file_path) VALUES ('Photo', 'photo.jpg')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO pages (kind, title, slug, path) VALUES ('blog', 'Post', 'post', '/post/')",
        )
        .execute(sqlite_pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO blog_pages (page_id, date) VALUES (1, '2024-01-01')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO blog_gallery_images (page_id, image_id, caption) VALUES (1, 1, 'c')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO tags (name) VALUES ('news')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO blog_page_tags (page_id, tag_id) VALUES (1, 1)")
            .execute(sqlite_pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM pages WHERE id = 1")
            .execute(sqlite_pool)
            .await
            .expect("Failed to delete page");

        let row = sqlx::query("SELECT COUNT(*) as count FROM blog_gallery_images")
            .fetch_one(sqlite_pool)
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 0);

        let row = sqlx::query("SELECT COUNT(*) as count FROM blog_page_tags")
            .fetch_one(sqlite_pool)
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 0);

        // The tag itself survives
        let row = sqlx::query("SELECT COUNT(*) as count FROM tags")
            .fetch_one(sqlite_pool)
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_subtree_cascade_on_parent_delete() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        sqlx::query(
            "INSERT INTO pages (kind, title, slug, path) VALUES ('home', 'Home', 'home', '/')",
        )
        .execute(sqlite_pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO pages (parent_id, kind, title, slug, path) VALUES (1, 'blog_index', 'Blog', 'blog', '/blog/')",
        )
        .execute(sqlite_pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO pages (parent_id, kind, title, slug, path) VALUES (2, 'blog', 'Post', 'post', '/blog/post/')",
        )
        .execute(sqlite_pool)
        .await
        .unwrap();

        sqlx::query("DELETE FROM pages WHERE id = 2")
            .execute(sqlite_pool)
            .await
            .unwrap();

        let row = sqlx::query("SELECT COUNT(*) as count FROM pages")
            .fetch_one(sqlite_pool)
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_footer_text_single_row() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        sqlx::query("INSERT INTO footer_text (id, body) VALUES (1, '<p>hi</p>')")
            .execute(sqlite_pool)
            .await
            .expect("First footer row should insert");

        let result = sqlx::query("INSERT INTO footer_text (id, body) VALUES (2, '<p>again</p>')")
            .execute(sqlite_pool)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_migration() {
        let migration = get_migration(1);
        assert!(migration.is_some());
        assert_eq!(migration.unwrap().name, "create_images");

        let migration = get_migration(999);
        assert!(migration.is_none());
    }

    #[tokio::test]
    async fn test_total_migrations() {
        assert_eq!(total_migrations(), 7);
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INT); CREATE TABLE b (id INT);";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);

        let sql_with_comments = "-- Comment\nCREATE TABLE a (id INT);";
        let statements = split_sql_statements(sql_with_comments);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_is_comment_only() {
        assert!(is_comment_only("-- This is a comment"));
        assert!(is_comment_only("-- Line 1\n-- Line 2"));
        assert!(!is_comment_only("CREATE TABLE test"));
        assert!(!is_comment_only("-- Comment\nCREATE TABLE test"));
    }
}
