//! Sale Transaction Repository
//!
//! Header rows live in `sale_transaction`, ordered lines in
//! `transaction_item`. Rows are never updated after insert.

use super::{RepoError, RepoResult};
use shared::models::{SaleTransaction, TransactionItem, TransactionStatus};
use sqlx::{SqliteConnection, SqliteExecutor};

const TRANSACTION_SELECT: &str = "SELECT t.id, t.student_id, s.name as student_name, s.roll_number as student_roll_number, t.seller_id, t.total_amount, t.status, t.created_at FROM sale_transaction t LEFT JOIN student s ON t.student_id = s.id";

/// Line to persist: product, quantity and unit price charged
#[derive(Debug, Clone, Copy)]
pub struct NewItem {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Filters for [`find_filtered`]
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub student_id: Option<i64>,
    /// Inclusive lower bound (millis)
    pub from: Option<i64>,
    /// Exclusive upper bound (millis)
    pub until: Option<i64>,
}

/// Insert header and items, returning the stored transaction
pub async fn insert(
    conn: &mut SqliteConnection,
    student_id: i64,
    seller_id: i64,
    total_amount: f64,
    items: &[NewItem],
) -> RepoResult<SaleTransaction> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO sale_transaction (id, student_id, seller_id, total_amount, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(student_id)
    .bind(seller_id)
    .bind(total_amount)
    .bind(TransactionStatus::Completed)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    for (line_no, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO transaction_item (transaction_id, line_no, product_id, quantity, price) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(id)
        .bind(line_no as i64)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *conn)
        .await?;
    }

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create transaction".into()))
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<SaleTransaction>> {
    let sql = format!("{TRANSACTION_SELECT} WHERE t.id = ?");
    let row = sqlx::query_as::<_, SaleTransaction>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(mut txn) => {
            txn.items = find_items(&mut *conn, id).await?;
            Ok(Some(txn))
        }
        None => Ok(None),
    }
}

pub async fn find_items<'e>(
    db: impl SqliteExecutor<'e>,
    transaction_id: i64,
) -> RepoResult<Vec<TransactionItem>> {
    let rows = sqlx::query_as::<_, TransactionItem>(
        "SELECT i.product_id, p.name as product_name, i.quantity, i.price FROM transaction_item i LEFT JOIN product p ON i.product_id = p.id WHERE i.transaction_id = ? ORDER BY i.line_no",
    )
    .bind(transaction_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Newest first, with items attached
pub async fn find_filtered(
    conn: &mut SqliteConnection,
    filter: &TransactionFilter,
    limit: Option<i64>,
) -> RepoResult<Vec<SaleTransaction>> {
    let sql = format!(
        "{TRANSACTION_SELECT} WHERE (?1 IS NULL OR t.student_id = ?1) AND (?2 IS NULL OR t.created_at >= ?2) AND (?3 IS NULL OR t.created_at < ?3) ORDER BY t.created_at DESC, t.id DESC LIMIT ?4"
    );
    let mut rows = sqlx::query_as::<_, SaleTransaction>(&sql)
        .bind(filter.student_id)
        .bind(filter.from)
        .bind(filter.until)
        // LIMIT -1 is unbounded in SQLite
        .bind(limit.unwrap_or(-1))
        .fetch_all(&mut *conn)
        .await?;
    for txn in &mut rows {
        txn.items = find_items(&mut *conn, txn.id).await?;
    }
    Ok(rows)
}

/// Amounts of completed transactions in `[from, until)`
pub async fn completed_amounts<'e>(
    db: impl SqliteExecutor<'e>,
    from: Option<i64>,
    until: Option<i64>,
) -> RepoResult<Vec<f64>> {
    let rows: Vec<f64> = sqlx::query_scalar(
        "SELECT total_amount FROM sale_transaction WHERE status = 'completed' AND (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2)",
    )
    .bind(from)
    .bind(until)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_transaction")
        .fetch_one(db)
        .await?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use crate::db::repository::{product, student};
    use shared::models::{ProductCreate, StudentCreate};

    async fn seed(pool: &sqlx::SqlitePool) -> (i64, i64) {
        let s = student::create(
            pool,
            StudentCreate {
                name: "Ravi".into(),
                roll_number: "R-7".into(),
                standard: "8".into(),
                balance: Some(100.0),
                status: None,
            },
        )
        .await
        .unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let p = product::create(
            &mut conn,
            &ProductCreate {
                name: "Pencil".into(),
                category_id: 2,
                price: 5.0,
                stock: Some(10),
                low_stock_threshold: None,
                barcode: None,
                description: None,
                is_active: None,
            },
        )
        .await
        .unwrap();
        (s.id, p.id)
    }

    #[tokio::test]
    async fn insert_keeps_item_order_and_joins() {
        let pool = test_pool().await;
        let (student_id, product_id) = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        let items = [
            NewItem { product_id, quantity: 2, price: 5.0 },
            NewItem { product_id, quantity: 1, price: 4.5 },
        ];
        let txn = insert(&mut conn, student_id, 9, 14.5, &items).await.unwrap();

        assert_eq!(txn.status, TransactionStatus::Completed);
        assert_eq!(txn.seller_id, 9);
        assert_eq!(txn.student_roll_number.as_deref(), Some("R-7"));
        assert_eq!(txn.items.len(), 2);
        assert_eq!(txn.items[0].quantity, 2);
        assert_eq!(txn.items[1].price, 4.5);
        assert_eq!(txn.items[1].product_name.as_deref(), Some("Pencil"));
    }

    #[tokio::test]
    async fn filters_by_student_and_window() {
        let pool = test_pool().await;
        let (student_id, product_id) = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let items = [NewItem { product_id, quantity: 1, price: 5.0 }];
        let first = insert(&mut conn, student_id, 1, 5.0, &items).await.unwrap();
        let second = insert(&mut conn, student_id, 1, 5.0, &items).await.unwrap();

        let all = find_filtered(&mut conn, &TransactionFilter::default(), None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);

        let recent = find_filtered(&mut conn, &TransactionFilter::default(), Some(1))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);

        let other = TransactionFilter {
            student_id: Some(student_id + 1),
            ..Default::default()
        };
        assert!(find_filtered(&mut conn, &other, None).await.unwrap().is_empty());

        let window = TransactionFilter {
            from: Some(first.created_at),
            until: Some(first.created_at),
            ..Default::default()
        };
        assert!(find_filtered(&mut conn, &window, None).await.unwrap().is_empty());

        let amounts = completed_amounts(&mut *conn, None, None).await.unwrap();
        assert_eq!(amounts, vec![5.0, 5.0]);
        assert_eq!(count(&mut *conn).await.unwrap(), 2);
    }
}
