//! Content model metadata endpoints
//!
//! Exposes the page type registry, the block specs and the snippet
//! registry so admin clients can build their forms without hard-coded
//! knowledge of the content model.

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::blocks::{BlockSpec, BLOCK_SPECS};
use crate::registry::{PageTypeDescriptor, SnippetDescriptor, PAGE_TYPES, SNIPPETS};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/page-types", get(list_page_types))
        .route("/blocks", get(list_blocks))
        .route("/snippets", get(list_snippets))
}

#[derive(Serialize)]
struct PageTypesResponse {
    page_types: &'static [PageTypeDescriptor],
}

#[derive(Serialize)]
struct BlocksResponse {
    blocks: &'static [BlockSpec],
}

#[derive(Serialize)]
struct SnippetsResponse {
    snippets: &'static [SnippetDescriptor],
}

async fn list_page_types() -> impl IntoResponse {
    Json(PageTypesResponse {
        page_types: PAGE_TYPES,
    })
}

async fn list_blocks() -> impl IntoResponse {
    Json(BlocksResponse {
        blocks: BLOCK_SPECS,
    })
}

async fn list_snippets() -> impl IntoResponse {
    Json(SnippetsResponse { snippets: SNIPPETS })
}
