//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录与当前用户
//! - [`students`] - 学生与余额
//! - [`categories`] - 分类管理
//! - [`products`] - 商品与库存调整
//! - [`transactions`] - 销售交易
//! - [`inventory`] - 库存日志
//! - [`analytics`] - 销售统计
//! - [`dashboard`] - 管理面板

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod products;
pub mod students;
pub mod transactions;

use shared::models::UserRole;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

// ── Role sets ───────────────────────────────────────────────────────

pub(crate) const ADMIN: &[UserRole] = &[UserRole::Admin];
pub(crate) const ADMIN_ACCOUNTANT: &[UserRole] = &[UserRole::Admin, UserRole::Accountant];
pub(crate) const ADMIN_SELLER: &[UserRole] = &[UserRole::Admin, UserRole::Seller];
pub(crate) const ALL_STAFF: &[UserRole] =
    &[UserRole::Admin, UserRole::Accountant, UserRole::Seller];
