//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::category;
use crate::services::{StoreError, catalog};
use crate::utils::AppResult;
use crate::utils::validation::ValidJson;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(category::find_all(&state.pool).await?))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let found = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;
    Ok(Json(found))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let created = catalog::create_category(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    Ok(Json(catalog::update_category(&state.pool, id, payload).await?))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    catalog::delete_category(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
