//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const CATEGORY_SELECT: &str = "SELECT id, name, description, is_active, created_at FROM category";

pub async fn find_all<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<Vec<Category>> {
    let sql = format!("{CATEGORY_SELECT} ORDER BY name");
    let rows = sqlx::query_as::<_, Category>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Case-insensitive name lookup
pub async fn find_by_name<'e>(
    db: impl SqliteExecutor<'e>,
    name: &str,
) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE name = ? COLLATE NOCASE");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(name.trim())
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO category (id, name, description, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.description)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let rows = sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), description = COALESCE(?2, description), is_active = COALESCE(?3, is_active) WHERE id = ?4",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Number of active products in the category
pub async fn count_active_products<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<i64> {
    let n: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE category_id = ? AND is_active = 1")
            .bind(id)
            .fetch_one(db)
            .await?;
    Ok(n)
}

/// Delete a category
///
/// Categories still referenced by soft-deleted products are deactivated
/// instead, so inventory history keeps its category name. Runs on the
/// caller's connection; callers wrap it in a write transaction.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM product WHERE category_id = ?)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

    let rows = if referenced {
        sqlx::query("UPDATE category SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?
    } else {
        sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?
    };

    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn default_categories_are_seeded() {
        let pool = test_pool().await;
        let names: Vec<String> = find_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["daily-use", "food", "pooja", "stationery"]);
    }

    #[tokio::test]
    async fn find_by_name_ignores_case() {
        let pool = test_pool().await;
        let food = find_by_name(&pool, " FOOD ").await.unwrap().unwrap();
        assert_eq!(food.id, 1);
        assert!(find_by_name(&pool, "toys").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_update_delete() {
        let pool = test_pool().await;
        let c = create(
            &pool,
            CategoryCreate {
                name: "books".into(),
                description: None,
                is_active: None,
            },
        )
        .await
        .unwrap();
        assert!(c.is_active);

        let c = update(
            &pool,
            c.id,
            CategoryUpdate {
                description: Some("Story books".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(c.description.as_deref(), Some("Story books"));
        assert_eq!(c.name, "books");

        let mut conn = pool.acquire().await.unwrap();
        assert!(delete(&mut conn, c.id).await.unwrap());
        assert!(find_by_id(&mut *conn, c.id).await.unwrap().is_none());
        assert!(!delete(&mut conn, c.id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let pool = test_pool().await;
        let err = create(
            &pool,
            CategoryCreate {
                name: "food".into(),
                description: None,
                is_active: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
