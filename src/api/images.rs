//! Image API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateImageInput, Image};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_images))
        .route("/", post(create_image))
        .route("/{id}", get(get_image))
        .route("/{id}", delete(delete_image))
}

#[derive(Serialize)]
struct ImagesResponse {
    images: Vec<Image>,
}

#[derive(Serialize)]
struct ImageResponse {
    image: Image,
}

async fn list_images(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let images = state
        .image_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(ImagesResponse { images }))
}

async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .image_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Image not found"))?;
    Ok(Json(ImageResponse { image }))
}

async fn create_image(
    State(state): State<AppState>,
    Json(input): Json<CreateImageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .image_service
        .create(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(ImageResponse { image })))
}

async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .image_service
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
