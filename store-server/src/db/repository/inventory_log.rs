//! Inventory Log Repository (append-only)

use super::RepoResult;
use shared::models::{InventoryAction, InventoryLog};
use sqlx::{SqliteConnection, SqliteExecutor};

/// Row cap for log queries
pub const MAX_LOG_ROWS: i64 = 100;

const LOG_SELECT: &str = "SELECT l.id, l.product_id, p.name as product_name, c.name as product_category, l.action, l.quantity_change, l.previous_stock, l.new_stock, l.reason, l.user_id, l.created_at FROM inventory_log l LEFT JOIN product p ON l.product_id = p.id LEFT JOIN category c ON p.category_id = c.id";

/// New movement to append
#[derive(Debug, Clone)]
pub struct NewLogEntry<'a> {
    pub product_id: i64,
    pub action: InventoryAction,
    pub quantity_change: i64,
    pub new_stock: i64,
    pub reason: &'a str,
    pub user_id: i64,
}

/// Filters for [`find_filtered`]; all optional
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Product name substring, or an exact product id
    pub search: Option<String>,
    pub action: Option<InventoryAction>,
    /// Lower bound on `created_at` (millis, inclusive)
    pub since: Option<i64>,
}

/// Append one log row; `previous_stock` is derived from `new_stock`
pub async fn insert(conn: &mut SqliteConnection, entry: NewLogEntry<'_>) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO inventory_log (id, product_id, action, quantity_change, previous_stock, new_stock, reason, user_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(entry.product_id)
    .bind(entry.action)
    .bind(entry.quantity_change)
    .bind(entry.new_stock - entry.quantity_change)
    .bind(entry.new_stock)
    .bind(entry.reason)
    .bind(entry.user_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

/// Newest first, capped at [`MAX_LOG_ROWS`]
pub async fn find_filtered<'e>(
    db: impl SqliteExecutor<'e>,
    filter: &LogFilter,
) -> RepoResult<Vec<InventoryLog>> {
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let pattern = search.map(|s| format!("%{}%", s.to_lowercase()));
    let search_id = search.and_then(|s| s.parse::<i64>().ok());

    let sql = format!(
        "{LOG_SELECT} WHERE (?1 IS NULL OR LOWER(p.name) LIKE ?1 OR l.product_id = ?2) AND (?3 IS NULL OR l.action = ?3) AND (?4 IS NULL OR l.created_at >= ?4) ORDER BY l.created_at DESC, l.id DESC LIMIT ?5"
    );
    let rows = sqlx::query_as::<_, InventoryLog>(&sql)
        .bind(pattern)
        .bind(search_id)
        .bind(filter.action)
        .bind(filter.since)
        .bind(MAX_LOG_ROWS)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_product<'e>(
    db: impl SqliteExecutor<'e>,
    product_id: i64,
) -> RepoResult<Vec<InventoryLog>> {
    let sql = format!("{LOG_SELECT} WHERE l.product_id = ? ORDER BY l.created_at, l.id");
    let rows = sqlx::query_as::<_, InventoryLog>(&sql)
        .bind(product_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Σ quantity_change over a product's log
pub async fn sum_changes<'e>(db: impl SqliteExecutor<'e>, product_id: i64) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity_change), 0) FROM inventory_log WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_one(db)
    .await?;
    Ok(total)
}
