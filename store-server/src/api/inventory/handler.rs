//! Inventory Log API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::services::reporting;
use crate::utils::AppResult;
use crate::utils::validation::QueryParams;
use shared::models::{InventoryLog, InventoryLogQuery};

/// GET /api/inventory/logs?search=&action=&dateRange=
///
/// 最新在前，最多 100 条
pub async fn logs(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<InventoryLogQuery>,
) -> AppResult<Json<Vec<InventoryLog>>> {
    let rows = reporting::inventory_logs(
        &state.pool,
        &query,
        shared::util::now_millis(),
        state.config.timezone,
    )
    .await?;
    Ok(Json(rows))
}
