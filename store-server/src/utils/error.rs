//! 统一错误处理
//!
//! 请求级错误统一使用 `shared::error::AppError`，渲染为
//! `{code, message, details?}` 信封，HTTP 状态码由 [`ErrorCode`] 决定。
//!
//! ```ignore
//! Err(AppError::new(ErrorCode::StudentNotFound))
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
