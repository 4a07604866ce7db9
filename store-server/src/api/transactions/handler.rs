//! Transaction API Handlers

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::{reporting, sale};
use crate::utils::AppResult;
use crate::utils::validation::{QueryParams, ValidJson};
use shared::models::{SaleRequest, SaleTransaction, TransactionQuery};

/// POST /api/transactions - 结账
///
/// 卖家取自当前登录用户
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidJson(payload): ValidJson<SaleRequest>,
) -> AppResult<(StatusCode, Json<SaleTransaction>)> {
    let created = sale::process_sale(
        &state.pool,
        state.config.price_source,
        &payload,
        current_user.id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/transactions?studentId=&startDate=&endDate=
pub async fn list(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<TransactionQuery>,
) -> AppResult<Json<Vec<SaleTransaction>>> {
    let rows = reporting::list_transactions(&state.pool, &query, state.config.timezone).await?;
    Ok(Json(rows))
}
