//! Student Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Student account status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

/// Student entity (hostel resident holding a prepaid balance)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// Human-readable unique key
    pub roll_number: String,
    pub standard: String,
    /// Never negative
    pub balance: f64,
    pub status: StudentStatus,
    pub created_at: i64,
}

/// Create student payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub roll_number: String,
    #[validate(length(min = 1, max = 100))]
    pub standard: String,
    #[validate(range(min = 0.0))]
    pub balance: Option<f64>,
    pub status: Option<StudentStatus>,
}

/// Update student payload (balance is changed through [`BalanceAdjustment`] only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub roll_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub standard: Option<String>,
    pub status: Option<StudentStatus>,
}

/// Signed balance delta: positive for a top-up, negative for a correction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub amount: f64,
}
