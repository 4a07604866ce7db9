//! Student Repository

use super::{RepoError, RepoResult};
use shared::models::{Student, StudentCreate, StudentUpdate};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const STUDENT_SELECT: &str =
    "SELECT id, name, roll_number, standard, balance, status, created_at FROM student";

pub async fn find_all<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<Vec<Student>> {
    let sql = format!("{STUDENT_SELECT} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Student>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Student>> {
    let sql = format!("{STUDENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Student>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_roll_number<'e>(
    db: impl SqliteExecutor<'e>,
    roll_number: &str,
) -> RepoResult<Option<Student>> {
    let sql = format!("{STUDENT_SELECT} WHERE roll_number = ?");
    let row = sqlx::query_as::<_, Student>(&sql)
        .bind(roll_number)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn count<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM student")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn create(pool: &SqlitePool, data: StudentCreate) -> RepoResult<Student> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let status = data.status.unwrap_or_default();
    sqlx::query(
        "INSERT INTO student (id, name, roll_number, standard, balance, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.roll_number.trim())
    .bind(data.standard.trim())
    .bind(data.balance.unwrap_or(0.0))
    .bind(status)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create student".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: StudentUpdate) -> RepoResult<Student> {
    let rows = sqlx::query(
        "UPDATE student SET name = COALESCE(?1, name), roll_number = COALESCE(?2, roll_number), standard = COALESCE(?3, standard), status = COALESCE(?4, status) WHERE id = ?5",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.roll_number.as_deref().map(str::trim))
    .bind(data.standard.as_deref().map(str::trim))
    .bind(data.status)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Student {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Student {id} not found")))
}

/// Hard delete; callers check [`has_transactions`] first
pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM student WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn has_transactions<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sale_transaction WHERE student_id = ?)")
            .bind(id)
            .fetch_one(db)
            .await?;
    Ok(exists)
}

/// Apply a signed balance delta only if the result stays >= 0
///
/// Returns the new balance, or `None` when the guard rejected the change
/// (or the student does not exist).
pub async fn apply_balance_delta(
    conn: &mut SqliteConnection,
    id: i64,
    delta: f64,
) -> RepoResult<Option<f64>> {
    let balance: Option<f64> = sqlx::query_scalar(
        "UPDATE student SET balance = ROUND(balance + ?1, 2) WHERE id = ?2 AND ROUND(balance + ?1, 2) >= 0 RETURNING balance",
    )
    .bind(delta)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(balance)
}

/// Debit a sale total; fails the guard when `balance < amount`
pub async fn debit(conn: &mut SqliteConnection, id: i64, amount: f64) -> RepoResult<Option<f64>> {
    apply_balance_delta(conn, id, -amount).await
}
