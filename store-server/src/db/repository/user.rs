//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserRole};
use sqlx::{SqliteExecutor, SqlitePool};

const USER_SELECT: &str = "SELECT id, username, password_hash, role, is_active, created_at FROM app_user";

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_username<'e>(
    db: impl SqliteExecutor<'e>,
    username: &str,
) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn count<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_user")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Insert a user with an already-hashed password
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO app_user (id, username, password_hash, role, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn create_and_find() {
        let pool = test_pool().await;
        assert_eq!(count(&pool).await.unwrap(), 0);

        let u = create(&pool, "meena", "$argon2id$x", UserRole::Seller)
            .await
            .unwrap();
        assert!(u.is_active);

        let found = find_by_username(&pool, "meena").await.unwrap().unwrap();
        assert_eq!(found.id, u.id);
        assert_eq!(found.role, UserRole::Seller);
        assert_eq!(found.password_hash, "$argon2id$x");

        let err = create(&pool, "meena", "h", UserRole::Admin).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
