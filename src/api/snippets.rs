//! Snippet API endpoints
//!
//! Footer text, people and blog categories. Person listings include
//! the thumbnail tag templates would otherwise compute per row.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    BlogCategory, CreateCategoryInput, CreatePersonInput, Person, UpdateCategoryInput,
    UpdatePersonInput,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/footer-text", get(get_footer_text))
        .route("/footer-text", put(set_footer_text))
        .route("/people", get(list_people))
        .route("/people", post(create_person))
        .route("/people/{id}", get(get_person))
        .route("/people/{id}", put(update_person))
        .route("/people/{id}", delete(delete_person))
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{id}", get(get_category))
        .route("/categories/{id}", put(update_category))
        .route("/categories/{id}", delete(delete_category))
}

#[derive(Serialize, Deserialize)]
struct FooterTextBody {
    body: String,
}

#[derive(Serialize)]
struct PersonEntry {
    #[serde(flatten)]
    person: Person,
    /// Rendered avatar tag, empty when unavailable
    thumbnail: String,
}

#[derive(Serialize)]
struct PeopleResponse {
    people: Vec<PersonEntry>,
}

#[derive(Serialize)]
struct PersonResponse {
    person: Person,
}

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<BlogCategory>,
}

#[derive(Serialize)]
struct CategoryResponse {
    category: BlogCategory,
}

async fn get_footer_text(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let footer = state
        .snippet_service
        .footer_text()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    let body = footer.map(|f| f.body).unwrap_or_default();
    Ok(Json(FooterTextBody { body }))
}

async fn set_footer_text(
    State(state): State<AppState>,
    Json(input): Json<FooterTextBody>,
) -> Result<impl IntoResponse, ApiError> {
    let footer = state
        .snippet_service
        .set_footer_text(&input.body)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(FooterTextBody { body: footer.body }))
}

async fn list_people(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let people = state
        .snippet_service
        .list_people()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let mut entries = Vec::with_capacity(people.len());
    for person in people {
        let thumbnail = state.snippet_service.person_thumb(&person).await;
        entries.push(PersonEntry { person, thumbnail });
    }
    Ok(Json(PeopleResponse { people: entries }))
}

async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let person = state
        .snippet_service
        .get_person(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Person not found"))?;
    Ok(Json(PersonResponse { person }))
}

async fn create_person(
    State(state): State<AppState>,
    Json(input): Json<CreatePersonInput>,
) -> Result<impl IntoResponse, ApiError> {
    let person = state
        .snippet_service
        .create_person(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(PersonResponse { person })))
}

async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePersonInput>,
) -> Result<impl IntoResponse, ApiError> {
    let person = state
        .snippet_service
        .update_person(id, input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(PersonResponse { person }))
}

async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .snippet_service
        .delete_person(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .snippet_service
        .list_categories()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(CategoriesResponse { categories }))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .snippet_service
        .get_category(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(Json(CategoryResponse { category }))
}

async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .snippet_service
        .create_category(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .snippet_service
        .update_category(id, input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(CategoryResponse { category }))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .snippet_service
        .delete_category(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
