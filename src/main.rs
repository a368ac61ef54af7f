//! Serce - a page-tree CMS engine

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use serce::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxBlogRepository, SqlxImageRepository, SqlxPageRepository, SqlxSnippetRepository,
        },
    },
    render::StreamRenderer,
    services::{BlogService, ImageService, NavigationService, PageService, SnippetService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serce=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Serce CMS...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let page_repo = SqlxPageRepository::boxed(pool.clone());
    let blog_repo = SqlxBlogRepository::boxed(pool.clone());
    let snippet_repo = SqlxSnippetRepository::boxed(pool.clone());
    let image_repo = SqlxImageRepository::boxed(pool.clone());

    // Initialize services
    let page_service = Arc::new(PageService::new(page_repo.clone()));
    let nav_service = Arc::new(NavigationService::new(
        page_repo.clone(),
        snippet_repo.clone(),
    ));
    let blog_service = Arc::new(BlogService::new(page_repo, blog_repo));
    let snippet_service = Arc::new(SnippetService::new(snippet_repo, image_repo.clone()));
    let image_service = Arc::new(ImageService::new(image_repo));

    let renderer = Arc::new(StreamRenderer::new()?);
    tracing::info!("Block renderer initialized");

    let state = AppState {
        pool: pool.clone(),
        page_service,
        nav_service,
        blog_service,
        snippet_service,
        image_service,
        renderer,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
