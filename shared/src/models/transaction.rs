//! Sale Transaction Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::MAX_STOCK_QUANTITY;

/// Maximum number of line items per sale
pub const MAX_SALE_ITEMS: usize = 100;
/// `MAX_SALE_ITEMS` typed as `u64` for the `validator` length attribute.
const MAX_SALE_ITEMS_U64: u64 = MAX_SALE_ITEMS as u64;

/// Transaction status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TransactionStatus {
    #[default]
    Completed,
    Failed,
    Refunded,
}

/// One line of a sale (price at time of sale)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub product_id: i64,
    /// Product name (joined, read-only)
    pub product_name: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

/// Sale transaction, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleTransaction {
    pub id: i64,
    pub student_id: i64,
    pub student_name: Option<String>,
    pub student_roll_number: Option<String>,
    /// Authenticated user who rang up the sale
    pub seller_id: i64,
    /// Σ quantity × price over the items
    pub total_amount: f64,
    pub status: TransactionStatus,
    pub created_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<TransactionItem>,
}

/// Student reference in a sale request: numeric id or roll number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentRef {
    Id(i64),
    Key(String),
}

impl StudentRef {
    /// Candidate primary key, when the reference looks like one
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Key(key) => key.trim().parse().ok(),
        }
    }

    /// Roll number lookup key
    pub fn as_roll_number(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Key(key) => key.trim().to_string(),
        }
    }
}

/// Sale line in a request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: i64,
    #[validate(range(min = 1, max = MAX_STOCK_QUANTITY))]
    pub quantity: i64,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// Sale request (`POST /api/transactions`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub student_id: StudentRef,
    #[validate(length(min = 1, max = MAX_SALE_ITEMS_U64), nested)]
    pub items: Vec<SaleItemInput>,
}

/// Transaction list query (`GET /api/transactions`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub student_id: Option<i64>,
    /// Inclusive, RFC3339 or `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive, RFC3339 or `YYYY-MM-DD`
    pub end_date: Option<String>,
}

/// Recent transactions query (`GET /api/dashboard/recent-transactions`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_ref_accepts_number_or_string() {
        let req: SaleRequest = serde_json::from_str(
            r#"{"studentId": 42, "items": [{"productId": 1, "quantity": 2, "price": 30}]}"#,
        )
        .unwrap();
        assert_eq!(req.student_id, StudentRef::Id(42));
        assert_eq!(req.items[0].price, 30.0);

        let req: SaleRequest =
            serde_json::from_str(r#"{"studentId": "R-101", "items": []}"#).unwrap();
        assert_eq!(req.student_id.as_id(), None);
        assert_eq!(req.student_id.as_roll_number(), "R-101");
    }

    #[test]
    fn item_count_and_quantity_limits() {
        let line = |quantity| SaleItemInput {
            product_id: 1,
            quantity,
            price: 1.0,
        };
        let request = |items| SaleRequest {
            student_id: StudentRef::Id(1),
            items,
        };

        assert!(request(vec![line(1); MAX_SALE_ITEMS]).validate().is_ok());
        assert!(request(vec![line(1); MAX_SALE_ITEMS + 1]).validate().is_err());
        assert!(request(vec![]).validate().is_err());
        assert!(request(vec![line(MAX_STOCK_QUANTITY)]).validate().is_ok());
        assert!(request(vec![line(MAX_STOCK_QUANTITY + 1)]).validate().is_err());
        assert!(request(vec![line(i64::MAX)]).validate().is_err());
    }

    #[test]
    fn numeric_string_ref_is_tried_as_id() {
        let r = StudentRef::Key(" 12345 ".into());
        assert_eq!(r.as_id(), Some(12345));
        assert_eq!(r.as_roll_number(), "12345");
    }
}
