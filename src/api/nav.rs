//! Navigation API endpoints

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json, Router,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::services::MenuItem;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/footer", get(get_footer))
}

#[derive(Deserialize)]
struct MenuQuery {
    /// Request path used to flag the active entry
    current: Option<String>,
}

#[derive(Serialize)]
struct MenuResponse {
    items: Vec<MenuItem>,
}

#[derive(Serialize)]
struct FooterResponse {
    footer_text: String,
}

async fn get_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .nav_service
        .top_menu(query.current.as_deref())
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(MenuResponse { items }))
}

async fn get_footer(State(state): State<AppState>) -> impl IntoResponse {
    Json(FooterResponse {
        footer_text: state.nav_service.footer_text().await,
    })
}
