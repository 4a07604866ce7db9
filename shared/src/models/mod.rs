//! Data models
//!
//! Shared between store-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, timestamps are Unix millis.
//! JSON field names are camelCase.

pub mod category;
pub mod inventory_log;
pub mod product;
pub mod report;
pub mod student;
pub mod transaction;
pub mod user;

// Re-exports
pub use category::*;
pub use inventory_log::*;
pub use product::*;
pub use report::*;
pub use student::*;
pub use transaction::*;
pub use user::*;
