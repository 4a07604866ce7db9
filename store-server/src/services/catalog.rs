//! Catalog Service - 商品与分类的写入规则
//!
//! - 商品引用的分类必须存在且启用
//! - 初始库存写入一条 restock 日志 ("Initial stock")
//! - 商品软删除; 仍有启用商品的分类不可删除

use sqlx::{SqliteConnection, SqlitePool};

use super::{StoreError, StoreResult, begin_write, stock};
use crate::db::repository::{RepoError, category, product};
use crate::utils::money::MAX_AMOUNT;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MAX_STOCK_QUANTITY, Product, ProductCreate,
    ProductUpdate,
};

// ── Categories ──────────────────────────────────────────────────────

/// Resolve a category by id or (case-insensitive) name
pub async fn resolve_category(pool: &SqlitePool, key: &str) -> StoreResult<Category> {
    let key = key.trim();
    if let Ok(id) = key.parse::<i64>()
        && let Some(found) = category::find_by_id(pool, id).await?
    {
        return Ok(found);
    }
    category::find_by_name(pool, key)
        .await?
        .ok_or_else(|| StoreError::CategoryNotFound(key.to_string()))
}

pub async fn create_category(pool: &SqlitePool, data: CategoryCreate) -> StoreResult<Category> {
    let name = data.name.trim().to_string();
    if name.is_empty() {
        return Err(StoreError::Validation("name must not be empty".into()));
    }
    if category::find_by_name(pool, &name).await?.is_some() {
        return Err(StoreError::CategoryNameExists(name));
    }
    let created = category::create(pool, data).await.map_err(|e| match e {
        RepoError::Duplicate(_) => StoreError::CategoryNameExists(name.clone()),
        other => other.into(),
    })?;
    tracing::info!(category_id = created.id, name = %created.name, "Category created");
    Ok(created)
}

pub async fn update_category(
    pool: &SqlitePool,
    id: i64,
    data: CategoryUpdate,
) -> StoreResult<Category> {
    if let Some(name) = data.name.as_deref().map(str::trim) {
        if name.is_empty() {
            return Err(StoreError::Validation("name must not be empty".into()));
        }
        if let Some(existing) = category::find_by_name(pool, name).await?
            && existing.id != id
        {
            return Err(StoreError::CategoryNameExists(name.to_string()));
        }
    }
    category::update(pool, id, data).await.map_err(|e| match e {
        RepoError::NotFound(_) => StoreError::CategoryNotFound(id.to_string()),
        other => other.into(),
    })
}

/// Existence check, active-product check and delete share one write transaction
pub async fn delete_category(pool: &SqlitePool, id: i64) -> StoreResult<()> {
    let mut tx = begin_write(pool).await?;
    if category::find_by_id(&mut *tx, id).await?.is_none() {
        return Err(StoreError::CategoryNotFound(id.to_string()));
    }
    let count = category::count_active_products(&mut *tx, id).await?;
    if count > 0 {
        return Err(StoreError::CategoryHasProducts { id, count });
    }
    category::delete(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!(category_id = id, "Category deleted");
    Ok(())
}

async fn require_active_category(conn: &mut SqliteConnection, id: i64) -> StoreResult<Category> {
    let found = category::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;
    if !found.is_active {
        return Err(StoreError::CategoryInactive(id));
    }
    Ok(found)
}

// ── Products ────────────────────────────────────────────────────────

/// Active products, optionally filtered by category id or name
pub async fn list_products(pool: &SqlitePool, category: Option<&str>) -> StoreResult<Vec<Product>> {
    let category_id = match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(key) => Some(resolve_category(pool, key).await?.id),
        None => None,
    };
    Ok(product::find_all_active(pool, category_id).await?)
}

pub async fn get_product(pool: &SqlitePool, id: i64) -> StoreResult<Product> {
    product::find_by_id(pool, id)
        .await?
        .ok_or(StoreError::ProductNotFound(id))
}

fn check_price(price: f64) -> StoreResult<()> {
    if !price.is_finite() || price < 0.0 || price > MAX_AMOUNT {
        return Err(StoreError::Validation(format!(
            "price must be between 0 and {MAX_AMOUNT}, got {price}"
        )));
    }
    Ok(())
}

pub async fn create_product(
    pool: &SqlitePool,
    data: ProductCreate,
    user_id: i64,
) -> StoreResult<Product> {
    if data.name.trim().is_empty() {
        return Err(StoreError::Validation("name must not be empty".into()));
    }
    check_price(data.price)?;
    if let Some(stock) = data.stock
        && !(0..=MAX_STOCK_QUANTITY).contains(&stock)
    {
        return Err(StoreError::Validation(format!(
            "stock must be between 0 and {MAX_STOCK_QUANTITY}, got {stock}"
        )));
    }

    let mut tx = begin_write(pool).await?;
    require_active_category(&mut tx, data.category_id).await?;
    let created = product::create(&mut tx, &data).await?;
    stock::record_initial_stock(&mut tx, &created, user_id).await?;
    tx.commit().await?;

    tracing::info!(
        product_id = created.id,
        name = %created.name,
        category_id = created.category_id,
        stock = created.stock,
        "Product created"
    );
    Ok(created)
}

pub async fn update_product(pool: &SqlitePool, id: i64, data: ProductUpdate) -> StoreResult<Product> {
    if let Some(price) = data.price {
        check_price(price)?;
    }
    if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(StoreError::Validation("name must not be empty".into()));
    }

    let mut tx = begin_write(pool).await?;
    if let Some(category_id) = data.category_id {
        require_active_category(&mut tx, category_id).await?;
    }
    let updated = product::update(&mut tx, id, &data).await.map_err(|e| match e {
        RepoError::NotFound(_) => StoreError::ProductNotFound(id),
        other => other.into(),
    })?;
    tx.commit().await?;
    Ok(updated)
}

/// Soft delete; inventory history keeps referencing the row
pub async fn delete_product(pool: &SqlitePool, id: i64) -> StoreResult<()> {
    if !product::delete(pool, id).await? {
        return Err(StoreError::ProductNotFound(id));
    }
    tracing::info!(product_id = id, "Product deactivated");
    Ok(())
}
