//! Dashboard API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::services::reporting;
use crate::utils::AppResult;
use crate::utils::validation::QueryParams;
use shared::models::{DashboardStats, RecentQuery, SaleTransaction};

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let stats = reporting::dashboard_stats(
        &state.pool,
        shared::util::now_millis(),
        state.config.timezone,
    )
    .await?;
    Ok(Json(stats))
}

/// GET /api/dashboard/recent-transactions?limit= (默认 5, 最大 50)
pub async fn recent_transactions(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<RecentQuery>,
) -> AppResult<Json<Vec<SaleTransaction>>> {
    Ok(Json(
        reporting::recent_transactions(&state.pool, query.limit).await?,
    ))
}
