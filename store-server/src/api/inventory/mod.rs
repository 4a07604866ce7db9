//! Inventory Log API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use super::ADMIN;
use crate::auth::require_roles;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/logs", get(handler::logs))
        .layer(middleware::from_fn(require_roles(ADMIN)))
}
