//! Read-side report views

use serde::{Deserialize, Serialize};

/// Sales analytics (`GET /api/analytics`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Σ total_amount over completed transactions
    pub total_revenue: f64,
    /// Same sum restricted to the current local day
    pub today_sales: f64,
    pub total_transactions: i64,
    /// 0 when there are no transactions
    pub avg_transaction: f64,
}

/// Admin dashboard counters (`GET /api/dashboard/stats`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: i64,
    /// Active products only
    pub total_products: i64,
    pub today_sales: f64,
    pub today_transactions: i64,
    pub low_stock_count: i64,
}
