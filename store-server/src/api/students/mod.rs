//! Student API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use super::{ADMIN_ACCOUNTANT, ALL_STAFF};
use crate::auth::require_roles;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/students", routes())
}

fn routes() -> Router<ServerState> {
    // 查询单个学生：收银也需要 (按学号结账)
    let lookup_routes = Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/roll/{roll_number}", get(handler::get_by_roll_number))
        .layer(middleware::from_fn(require_roles(ALL_STAFF)));

    // 管理路由：管理员与会计
    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", patch(handler::update).delete(handler::delete))
        .route("/{id}/balance", patch(handler::adjust_balance))
        .layer(middleware::from_fn(require_roles(ADMIN_ACCOUNTANT)));

    lookup_routes.merge(manage_routes)
}
