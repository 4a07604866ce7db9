//! Product API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::{catalog, reporting, stock};
use crate::utils::AppResult;
use crate::utils::validation::{JsonBody, QueryParams, ValidJson};
use shared::models::{Product, ProductCreate, ProductQuery, ProductUpdate, StockAdjustment};

/// GET /api/products?category= - 启用商品 (分类 id 或名称过滤)
pub async fn list(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = catalog::list_products(&state.pool, query.category.as_deref()).await?;
    Ok(Json(products))
}

/// GET /api/products/low-stock
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(reporting::list_low_stock(&state.pool).await?))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    Ok(Json(catalog::get_product(&state.pool, id).await?))
}

/// POST /api/products - 初始库存记为 restock 日志
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidJson(payload): ValidJson<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let created = catalog::create_product(&state.pool, payload, current_user.id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<ProductUpdate>,
) -> AppResult<Json<Product>> {
    Ok(Json(catalog::update_product(&state.pool, id, payload).await?))
}

/// DELETE /api/products/{id} - 软删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    catalog::delete_product(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/products/{id}/stock
pub async fn adjust_stock(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<StockAdjustment>,
) -> AppResult<Json<Product>> {
    let updated = stock::adjust_stock(
        &state.pool,
        id,
        payload.quantity,
        payload.reason.as_deref(),
        current_user.id,
    )
    .await?;
    Ok(Json(updated))
}
