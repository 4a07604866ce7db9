//! Unified error system for the hostel store
//!
//! - [`ErrorCode`]: standardized numeric codes for every failure
//! - [`ErrorCategory`]: classification of codes by domain
//! - [`AppError`]: error with code, message and structured details
//! - [`ApiResponse`]: the JSON envelope errors are rendered into
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Student / balance errors
//! - 4xxx: Transaction errors
//! - 6xxx: Product / category / stock errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::StudentNotFound);
//!
//! let err = AppError::with_message(ErrorCode::InsufficientStock, "Only 2 left")
//!     .with_detail("available", 2)
//!     .with_detail("requested", 5);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(6003));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
