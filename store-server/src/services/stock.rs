//! Stock Adjustment Service
//!
//! Manual stock changes: one guarded update plus one inventory log row,
//! committed together.

use sqlx::{SqliteConnection, SqlitePool};

use super::{StoreError, StoreResult, begin_write};
use crate::db::repository::inventory_log::{self, NewLogEntry};
use crate::db::repository::product;
use crate::utils::validation::MAX_NOTE_LEN;
use shared::models::{InventoryAction, MAX_STOCK_QUANTITY, Product};

/// Apply a signed stock delta to an active product
///
/// Positive deltas are logged as `restock`, negative ones as `adjustment`.
pub async fn adjust_stock(
    pool: &SqlitePool,
    product_id: i64,
    quantity: i64,
    reason: Option<&str>,
    user_id: i64,
) -> StoreResult<Product> {
    if quantity == 0 {
        return Err(StoreError::Validation("quantity must not be zero".into()));
    }
    if quantity.unsigned_abs() > MAX_STOCK_QUANTITY.unsigned_abs() {
        return Err(StoreError::Validation(format!(
            "quantity must be within ±{MAX_STOCK_QUANTITY}, got {quantity}"
        )));
    }
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    if let Some(r) = reason
        && r.len() > MAX_NOTE_LEN
    {
        return Err(StoreError::Validation(format!(
            "reason is too long ({} chars, max {MAX_NOTE_LEN})",
            r.len()
        )));
    }

    let action = InventoryAction::for_manual_delta(quantity);
    let reason = reason.unwrap_or(match action {
        InventoryAction::Restock => "Restock",
        _ => "Adjustment",
    });

    let mut tx = begin_write(pool).await?;

    let current = product::find_active_by_id(&mut *tx, product_id)
        .await?
        .ok_or(StoreError::ProductNotFound(product_id))?;
    if current.stock.checked_add(quantity).is_none() {
        return Err(StoreError::Validation(format!(
            "stock of product {product_id} would overflow"
        )));
    }

    let Some(new_stock) = product::apply_stock_delta(&mut tx, product_id, quantity).await? else {
        tracing::warn!(
            product_id,
            stock = current.stock,
            quantity,
            "Stock adjustment rejected: stock would go negative"
        );
        return Err(StoreError::InsufficientStock {
            product_id,
            product: current.name,
            available: current.stock,
            requested: -quantity,
        });
    };

    inventory_log::insert(
        &mut tx,
        NewLogEntry {
            product_id,
            action,
            quantity_change: quantity,
            new_stock,
            reason,
            user_id,
        },
    )
    .await?;

    let updated = product::find_by_id(&mut *tx, product_id)
        .await?
        .ok_or(StoreError::ProductNotFound(product_id))?;
    tx.commit().await?;

    tracing::info!(
        product_id,
        action = %action,
        quantity,
        previous_stock = new_stock - quantity,
        new_stock,
        user_id,
        "Stock adjusted"
    );
    Ok(updated)
}

/// Log the opening stock of a freshly created product
pub(crate) async fn record_initial_stock(
    conn: &mut SqliteConnection,
    product: &Product,
    user_id: i64,
) -> StoreResult<()> {
    if product.stock > 0 {
        inventory_log::insert(
            conn,
            NewLogEntry {
                product_id: product.id,
                action: InventoryAction::Restock,
                quantity_change: product.stock,
                new_stock: product.stock,
                reason: "Initial stock",
                user_id,
            },
        )
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Fixture, ADMIN_ID};
    use shared::ErrorCode;

    #[tokio::test]
    async fn restock_increases_stock_and_logs() {
        let fx = Fixture::new().await;
        let p = fx.product("Maggi", 12.0, 5).await;

        let updated = adjust_stock(&fx.pool, p.id, 20, None, ADMIN_ID).await.unwrap();
        assert_eq!(updated.stock, 25);

        let logs = inventory_log::find_by_product(&fx.pool, p.id).await.unwrap();
        let last = logs.last().unwrap();
        assert_eq!(last.action, InventoryAction::Restock);
        assert_eq!(last.quantity_change, 20);
        assert_eq!(last.previous_stock, 5);
        assert_eq!(last.new_stock, 25);
        assert_eq!(last.reason.as_deref(), Some("Restock"));
        assert_eq!(last.user_id, ADMIN_ID);
    }

    #[tokio::test]
    async fn decrease_is_logged_as_adjustment() {
        let fx = Fixture::new().await;
        let p = fx.product("Soap", 20.0, 8).await;

        let updated = adjust_stock(&fx.pool, p.id, -3, Some("  damaged  "), ADMIN_ID)
            .await
            .unwrap();
        assert_eq!(updated.stock, 5);

        let logs = inventory_log::find_by_product(&fx.pool, p.id).await.unwrap();
        let last = logs.last().unwrap();
        assert_eq!(last.action, InventoryAction::Adjustment);
        assert_eq!(last.quantity_change, -3);
        assert_eq!(last.reason.as_deref(), Some("damaged"));
    }

    #[tokio::test]
    async fn drain_to_zero_allowed_overdrain_rejected() {
        let fx = Fixture::new().await;
        let p = fx.product("Pen", 10.0, 4).await;

        let err = adjust_stock(&fx.pool, p.id, -5, None, ADMIN_ID)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientStock { available: 4, requested: 5, .. }
        ));
        assert_eq!(fx.stock_of(p.id).await, 4);

        let drained = adjust_stock(&fx.pool, p.id, -4, None, ADMIN_ID).await.unwrap();
        assert_eq!(drained.stock, 0);
    }

    #[tokio::test]
    async fn zero_quantity_and_missing_product_rejected() {
        let fx = Fixture::new().await;
        let p = fx.product("Pen", 10.0, 4).await;

        let err = adjust_stock(&fx.pool, p.id, 0, None, ADMIN_ID).await.unwrap_err();
        assert_eq!(shared::AppError::from(err).code, ErrorCode::ValidationFailed);

        let err = adjust_stock(&fx.pool, 424242, 1, None, ADMIN_ID)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ProductNotFound(424242)));
    }

    #[tokio::test]
    async fn out_of_range_quantity_rejected_without_change() {
        let fx = Fixture::new().await;
        let p = fx.product("Pen", 10.0, 4).await;

        for quantity in [i64::MIN, i64::MAX, MAX_STOCK_QUANTITY + 1, -(MAX_STOCK_QUANTITY + 1)] {
            let err = adjust_stock(&fx.pool, p.id, quantity, None, ADMIN_ID)
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)), "{quantity}: {err:?}");
            assert_eq!(shared::AppError::from(err).code, ErrorCode::ValidationFailed);
        }
        assert_eq!(fx.stock_of(p.id).await, 4);
        assert_eq!(inventory_log::find_by_product(&fx.pool, p.id).await.unwrap().len(), 1);

        let updated = adjust_stock(&fx.pool, p.id, MAX_STOCK_QUANTITY, None, ADMIN_ID)
            .await
            .unwrap();
        assert_eq!(updated.stock, MAX_STOCK_QUANTITY + 4);

        let updated = adjust_stock(&fx.pool, p.id, -MAX_STOCK_QUANTITY, None, ADMIN_ID)
            .await
            .unwrap();
        assert_eq!(updated.stock, 4);
    }

    #[tokio::test]
    async fn log_reconstructs_stock() {
        let fx = Fixture::new().await;
        let p = fx.product("Notebook", 40.0, 7).await;

        for delta in [5, -2, 10, -20, 3] {
            adjust_stock(&fx.pool, p.id, delta, None, ADMIN_ID).await.unwrap();
        }
        let stock = fx.stock_of(p.id).await;
        assert_eq!(stock, 3);
        assert_eq!(inventory_log::sum_changes(&fx.pool, p.id).await.unwrap(), stock);
    }
}
