//! Shared types for the hostel store
//!
//! Models exchanged over the HTTP API (and mapped to SQLite rows when the
//! `db` feature is enabled), the unified error system and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
