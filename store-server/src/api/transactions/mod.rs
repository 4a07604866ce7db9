//! Transaction API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::{ADMIN_ACCOUNTANT, ADMIN_SELLER};
use crate::auth::require_roles;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/transactions", routes())
}

fn routes() -> Router<ServerState> {
    // 收银：管理员与收银员
    let sale_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_roles(ADMIN_SELLER)));

    // 查询：管理员与会计
    let query_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_roles(ADMIN_ACCOUNTANT)));

    sale_routes.merge(query_routes)
}
