//! Product Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default `low_stock_threshold` for new products
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Upper bound for any single quantity: initial stock, stock delta, sale line
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    /// Category name (joined, read-only)
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl Product {
    /// Stock at or below the configured threshold
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub category_id: i64,
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Initial stock (default 0), recorded as a restock log entry
    #[validate(range(min = 0, max = MAX_STOCK_QUANTITY))]
    pub stock: Option<i64>,
    #[validate(range(min = 0))]
    pub low_stock_threshold: Option<i64>,
    #[validate(length(max = 100))]
    pub barcode: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Update product payload
///
/// Stock is not part of this payload; it only moves through stock
/// adjustments and sales so the inventory log stays complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub category_id: Option<i64>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub low_stock_threshold: Option<i64>,
    #[validate(length(max = 100))]
    pub barcode: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Stock adjustment payload (`PATCH /api/products/{id}/stock`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Signed delta, never zero
    pub quantity: i64,
    pub reason: Option<String>,
}

/// Product list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Category id or category name
    pub category: Option<String>,
}
