//! Reporting façade (read-only)
//!
//! Aggregates and filtered listings over the ledger. "Today" is the
//! current local day in the configured business timezone.

use chrono_tz::Tz;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use super::{StoreError, StoreResult};
use crate::db::repository::inventory_log::{self, LogFilter};
use crate::db::repository::transaction::{self, TransactionFilter};
use crate::db::repository::{product, student};
use crate::utils::{money, time};
use shared::models::{
    Analytics, DashboardStats, InventoryAction, InventoryLog, InventoryLogQuery, Product,
    SaleTransaction, TransactionQuery,
};

/// Default / maximum row count for recent transactions
pub const DEFAULT_RECENT_LIMIT: i64 = 5;
pub const MAX_RECENT_LIMIT: i64 = 50;

fn sum_amounts(amounts: &[f64]) -> f64 {
    money::to_f64(amounts.iter().map(|a| money::to_decimal(*a)).sum::<Decimal>())
}

pub async fn compute_analytics(pool: &SqlitePool, now: i64, tz: Tz) -> StoreResult<Analytics> {
    let all = transaction::completed_amounts(pool, None, None).await?;
    let (start, end) = time::today_window(now, tz);
    let today = transaction::completed_amounts(pool, Some(start), Some(end)).await?;

    let total_revenue = sum_amounts(&all);
    let total_transactions = all.len() as i64;
    Ok(Analytics {
        total_revenue,
        today_sales: sum_amounts(&today),
        total_transactions,
        avg_transaction: money::average(total_revenue, total_transactions),
    })
}

pub async fn list_low_stock(pool: &SqlitePool) -> StoreResult<Vec<Product>> {
    Ok(product::find_low_stock(pool).await?)
}

pub async fn dashboard_stats(pool: &SqlitePool, now: i64, tz: Tz) -> StoreResult<DashboardStats> {
    let (start, end) = time::today_window(now, tz);
    let today = transaction::completed_amounts(pool, Some(start), Some(end)).await?;
    Ok(DashboardStats {
        total_students: student::count(pool).await?,
        total_products: product::count_active(pool).await?,
        today_sales: sum_amounts(&today),
        today_transactions: today.len() as i64,
        low_stock_count: product::count_low_stock(pool).await?,
    })
}

/// Newest transactions with items; limit defaults to 5, clamped to 1..=50
pub async fn recent_transactions(
    pool: &SqlitePool,
    limit: Option<i64>,
) -> StoreResult<Vec<SaleTransaction>> {
    let limit = limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);
    let mut conn = pool.acquire().await?;
    Ok(transaction::find_filtered(&mut conn, &TransactionFilter::default(), Some(limit)).await?)
}

pub async fn inventory_logs(
    pool: &SqlitePool,
    query: &InventoryLogQuery,
    now: i64,
    tz: Tz,
) -> StoreResult<Vec<InventoryLog>> {
    let action = match query.action.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse::<InventoryAction>().map_err(StoreError::Validation)?),
    };
    let filter = LogFilter {
        search: query.search.clone(),
        action,
        since: query
            .date_range
            .and_then(|range| time::range_start_millis(range, now, tz)),
    };
    Ok(inventory_log::find_filtered(pool, &filter).await?)
}

/// Transactions by student and/or inclusive date bounds, newest first
pub async fn list_transactions(
    pool: &SqlitePool,
    query: &TransactionQuery,
    tz: Tz,
) -> StoreResult<Vec<SaleTransaction>> {
    let bound = |value: &Option<String>, is_end: bool| -> StoreResult<Option<i64>> {
        match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => time::parse_bound(v, tz, is_end)
                .map(Some)
                .map_err(|e| StoreError::Validation(e.message)),
            None => Ok(None),
        }
    };
    let filter = TransactionFilter {
        student_id: query.student_id,
        from: bound(&query.start_date, false)?,
        until: bound(&query.end_date, true)?,
    };
    let mut conn = pool.acquire().await?;
    Ok(transaction::find_filtered(&mut conn, &filter, None).await?)
}
