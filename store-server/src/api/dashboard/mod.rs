//! Dashboard API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use super::ADMIN;
use crate::auth::require_roles;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/stats", get(handler::stats))
        .route("/recent-transactions", get(handler::recent_transactions))
        .layer(middleware::from_fn(require_roles(ADMIN)))
}
