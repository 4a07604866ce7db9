//! Analytics API 模块

use axum::{Json, Router, extract::State, middleware, routing::get};

use super::ADMIN_ACCOUNTANT;
use crate::auth::require_roles;
use crate::core::ServerState;
use crate::services::reporting;
use crate::utils::AppResult;
use shared::models::Analytics;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/analytics", get(analytics))
        .layer(middleware::from_fn(require_roles(ADMIN_ACCOUNTANT)))
}

/// GET /api/analytics
async fn analytics(State(state): State<ServerState>) -> AppResult<Json<Analytics>> {
    let result = reporting::compute_analytics(
        &state.pool,
        shared::util::now_millis(),
        state.config.timezone,
    )
    .await?;
    Ok(Json(result))
}
