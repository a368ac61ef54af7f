//! Page API endpoints
//!
//! Admin CRUD on the page tree plus the public serving endpoint that
//! resolves a URL path to a live page with its rendered body and the
//! navigation context templates need.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    BlogGalleryImage, CreatePageInput, MovePageInput, Page, PageDetails, Tag, UpdatePageInput,
};
use crate::services::MenuItem;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages))
        .route("/", post(create_page))
        .route("/root", post(create_root))
        .route("/{id}", get(get_page))
        .route("/{id}", put(update_page))
        .route("/{id}", delete(delete_page))
        .route("/{id}/children", get(list_children))
        .route("/{id}/publish", post(publish_page))
        .route("/{id}/unpublish", post(unpublish_page))
        .route("/{id}/move", post(move_page))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_root))
        .route("/{*path}", get(serve_page))
}

#[derive(Serialize)]
struct PagesResponse {
    pages: Vec<Page>,
}

#[derive(Serialize)]
struct PageResponse {
    page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<PageDetails>,
}

#[derive(Serialize)]
struct ServeResponse {
    page: Page,
    details: PageDetails,
    /// Rendered stream body, when the page kind has one
    #[serde(skip_serializing_if = "Option::is_none")]
    body_html: Option<String>,
    /// Post listing, present on blog index and tag index pages
    #[serde(skip_serializing_if = "Option::is_none")]
    posts: Option<Vec<Page>>,
    /// Gallery images and tags, present on blog posts
    #[serde(skip_serializing_if = "Option::is_none")]
    gallery: Option<Vec<BlogGalleryImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<Tag>>,
    menu: Vec<MenuItem>,
    footer_text: String,
}

#[derive(Deserialize)]
struct RootInput {
    title: String,
}

async fn list_pages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pages = state
        .page_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(PagesResponse { pages }))
}

async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .page_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Page not found"))?;
    let details = state
        .page_service
        .get_details(&page)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(PageResponse {
        page,
        details: Some(details),
    }))
}

async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pages = state
        .page_service
        .children(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(PagesResponse { pages }))
}

async fn create_page(
    State(state): State<AppState>,
    Json(input): Json<CreatePageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .page_service
        .create(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok((
        StatusCode::CREATED,
        Json(PageResponse {
            page,
            details: None,
        }),
    ))
}

async fn create_root(
    State(state): State<AppState>,
    Json(input): Json<RootInput>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .page_service
        .create_root(input.title)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok((
        StatusCode::CREATED,
        Json(PageResponse {
            page,
            details: None,
        }),
    ))
}

async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .page_service
        .update(id, input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(PageResponse {
        page,
        details: None,
    }))
}

async fn move_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MovePageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .page_service
        .move_page(id, input.new_parent_id)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(PageResponse {
        page,
        details: None,
    }))
}

async fn publish_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .page_service
        .publish(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(PageResponse {
        page,
        details: None,
    }))
}

async fn unpublish_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .page_service
        .unpublish(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(PageResponse {
        page,
        details: None,
    }))
}

async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .page_service
        .delete(id)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct ServeQuery {
    /// Tag filter, honored by tag index pages only
    tag: Option<String>,
}

async fn serve_root(
    state: State<AppState>,
    query: Query<ServeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    serve(state, "/".to_string(), query).await
}

async fn serve_page(
    state: State<AppState>,
    Path(path): Path<String>,
    query: Query<ServeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let path = format!("/{}/", path.trim_matches('/'));
    serve(state, path, query).await
}

async fn serve(
    State(state): State<AppState>,
    path: String,
    Query(query): Query<ServeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, details) = state
        .page_service
        .serve(&path)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Page not found"))?;

    let body_html = match details.body() {
        Some(body) => Some(
            state
                .renderer
                .render_body(body)
                .map_err(|e| ApiError::internal_error(e.to_string()))?,
        ),
        None => None,
    };

    // Index kinds carry their post listing; a tag index without a tag
    // yields the empty list
    let posts = match &details {
        PageDetails::BlogIndex(_) => Some(
            state
                .blog_service
                .posts(page.id)
                .await
                .map_err(|e| ApiError::internal_error(e.to_string()))?,
        ),
        PageDetails::BlogTagIndex => Some(
            state
                .blog_service
                .posts_by_tag(query.tag.as_deref())
                .await
                .map_err(|e| ApiError::internal_error(e.to_string()))?,
        ),
        _ => None,
    };

    let (gallery, tags) = match &details {
        PageDetails::Blog(_) => {
            let gallery = state
                .blog_service
                .gallery_images(page.id)
                .await
                .map_err(|e| ApiError::internal_error(e.to_string()))?;
            let tags = state
                .blog_service
                .tags_for(page.id)
                .await
                .map_err(|e| ApiError::internal_error(e.to_string()))?;
            (Some(gallery), Some(tags))
        }
        _ => (None, None),
    };

    let menu = state
        .nav_service
        .top_menu(Some(&page.path))
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    let footer_text = state.nav_service.footer_text().await;

    Ok(Json(ServeResponse {
        page,
        details,
        body_html,
        posts,
        gallery,
        tags,
        menu,
        footer_text,
    }))
}
