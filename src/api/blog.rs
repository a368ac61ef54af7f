//! Blog API endpoints
//!
//! Gallery image management and taxonomy assignment for blog posts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{BlogGalleryImage, CreateGalleryImageInput, Page, Tag};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tagged", get(list_tagged))
        .route("/{id}/posts", get(list_posts))
        .route("/{id}/gallery", get(list_gallery))
        .route("/{id}/gallery", post(add_gallery_image))
        .route("/gallery/{id}", delete(remove_gallery_image))
        .route("/{id}/main-image", get(get_main_image))
        .route("/{id}/tags", get(list_tags))
        .route("/{id}/tags", put(set_tags))
        .route("/{id}/categories", get(list_category_ids))
        .route("/{id}/categories", put(set_categories))
}

#[derive(Serialize)]
struct PostsResponse {
    posts: Vec<Page>,
}

#[derive(Serialize)]
struct GalleryResponse {
    images: Vec<BlogGalleryImage>,
}

#[derive(Serialize)]
struct GalleryImageResponse {
    image: BlogGalleryImage,
}

#[derive(Serialize)]
struct TagsResponse {
    tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct SetTagsInput {
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct CategoriesInput {
    category_ids: Vec<i64>,
}

#[derive(Serialize)]
struct MainImageResponse {
    image_id: Option<i64>,
}

#[derive(Deserialize)]
struct TaggedQuery {
    tag: Option<String>,
}

async fn list_posts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .blog_service
        .posts(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(PostsResponse { posts }))
}

async fn list_tagged(
    State(state): State<AppState>,
    Query(query): Query<TaggedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .blog_service
        .posts_by_tag(query.tag.as_deref())
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(PostsResponse { posts }))
}

async fn list_gallery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let images = state
        .blog_service
        .gallery_images(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(GalleryResponse { images }))
}

async fn add_gallery_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CreateGalleryImageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .blog_service
        .add_gallery_image(id, input.image_id, &input.caption)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(GalleryImageResponse { image })))
}

async fn remove_gallery_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .blog_service
        .remove_gallery_image(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_main_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let image_id = state
        .blog_service
        .main_image(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(MainImageResponse { image_id }))
}

async fn list_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state
        .blog_service
        .tags_for(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(TagsResponse { tags }))
}

async fn set_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<SetTagsInput>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state
        .blog_service
        .set_tags(id, input.tags)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(TagsResponse { tags }))
}

async fn list_category_ids(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let category_ids = state
        .blog_service
        .category_ids_for(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(CategoriesInput { category_ids }))
}

async fn set_categories(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CategoriesInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category_ids = state
        .blog_service
        .set_categories(id, input.category_ids)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(CategoriesInput { category_ids }))
}
