//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints:
//! - Page tree management and public page serving
//! - Blog gallery and taxonomy endpoints
//! - Snippet endpoints (footer text, people, categories)
//! - Image endpoints
//! - Navigation helpers for templates
//! - Content model metadata

pub mod blog;
pub mod images;
pub mod meta;
pub mod middleware;
pub mod nav;
pub mod pages;
pub mod snippets;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState};

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/pages", pages::router())
        .nest("/blog", blog::router())
        .nest("/snippets", snippets::router())
        .nest("/images", images::router())
        .nest("/nav", nav::router())
        .nest("/meta", meta::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("*")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api/v1", build_api_router())
        .merge(pages::public_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
