//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{DEFAULT_LOW_STOCK_THRESHOLD, Product, ProductCreate, ProductUpdate};
use sqlx::{SqliteConnection, SqliteExecutor};

const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.category_id, c.name as category, p.price, p.stock, p.low_stock_threshold, p.barcode, p.description, p.is_active, p.created_at FROM product p JOIN category c ON p.category_id = c.id";

/// Active products, optionally restricted to one category
pub async fn find_all_active<'e>(
    db: impl SqliteExecutor<'e>,
    category_id: Option<i64>,
) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE p.is_active = 1 AND (?1 IS NULL OR p.category_id = ?1) ORDER BY p.created_at DESC, p.id DESC"
    );
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(category_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Active products with `stock <= low_stock_threshold`, newest first
pub async fn find_low_stock<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE p.is_active = 1 AND p.stock <= p.low_stock_threshold ORDER BY p.created_at DESC, p.id DESC"
    );
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn count_low_stock<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM product WHERE is_active = 1 AND stock <= low_stock_threshold",
    )
    .fetch_one(db)
    .await?;
    Ok(n)
}

pub async fn count_active<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE is_active = 1")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Find by id, including soft-deleted products
pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_active_by_id<'e>(
    db: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = ? AND p.is_active = 1");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Insert a product row with its initial stock
///
/// The caller records the matching restock log in the same transaction.
pub async fn create(conn: &mut SqliteConnection, data: &ProductCreate) -> RepoResult<Product> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO product (id, name, category_id, price, stock, low_stock_threshold, barcode, description, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.category_id)
    .bind(data.price)
    .bind(data.stock.unwrap_or(0))
    .bind(
        data.low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
    )
    .bind(data.barcode.as_deref())
    .bind(data.description.as_deref())
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(&mut *conn)
    .await?;
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    data: &ProductUpdate,
) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), category_id = COALESCE(?2, category_id), price = COALESCE(?3, price), low_stock_threshold = COALESCE(?4, low_stock_threshold), barcode = COALESCE(?5, barcode), description = COALESCE(?6, description), is_active = COALESCE(?7, is_active) WHERE id = ?8",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.category_id)
    .bind(data.price)
    .bind(data.low_stock_threshold)
    .bind(data.barcode.as_deref())
    .bind(data.description.as_deref())
    .bind(data.is_active)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Soft delete (`is_active = 0`)
pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE product SET is_active = 0 WHERE id = ? AND is_active = 1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Guarded stock change on an active product
///
/// Returns the stock after the change, or `None` when the product is
/// missing/inactive or the result would be negative.
pub async fn apply_stock_delta(
    conn: &mut SqliteConnection,
    id: i64,
    delta: i64,
) -> RepoResult<Option<i64>> {
    let stock: Option<i64> = sqlx::query_scalar(
        "UPDATE product SET stock = stock + ?1 WHERE id = ?2 AND is_active = 1 AND stock + ?1 >= 0 RETURNING stock",
    )
    .bind(delta)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(stock)
}
