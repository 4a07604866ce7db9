//! Category API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use super::ADMIN;
use crate::auth::require_roles;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：登录即可
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    // 管理路由：仅管理员
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", patch(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_roles(ADMIN)));

    read_routes.merge(manage_routes)
}
