//! Inventory Log Model
//!
//! Append-only movement ledger: every stock change writes one row, so a
//! product's stock equals the sum of its `quantity_change` values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum InventoryAction {
    Restock,
    Sale,
    Adjustment,
}

impl InventoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restock => "restock",
            Self::Sale => "sale",
            Self::Adjustment => "adjustment",
        }
    }

    /// Manual adjustments: increases are restocks, decreases are adjustments
    pub fn for_manual_delta(delta: i64) -> Self {
        if delta > 0 {
            Self::Restock
        } else {
            Self::Adjustment
        }
    }
}

impl fmt::Display for InventoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restock" => Ok(Self::Restock),
            "sale" => Ok(Self::Sale),
            "adjustment" => Ok(Self::Adjustment),
            other => Err(format!("unknown inventory action: {other}")),
        }
    }
}

/// Inventory log entry, joined with product display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct InventoryLog {
    pub id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub action: InventoryAction,
    /// Signed; `new_stock == previous_stock + quantity_change`
    pub quantity_change: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub reason: Option<String>,
    pub user_id: i64,
    pub created_at: i64,
}

/// Relative window for log queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    #[default]
    All,
}

/// Inventory log query (`GET /api/inventory/logs`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLogQuery {
    /// Product name substring (case-insensitive) or exact product id
    pub search: Option<String>,
    /// Action name, or `all`
    pub action: Option<String>,
    pub date_range: Option<DateRange>,
}
