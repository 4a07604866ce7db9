//! Sale Transaction Orchestrator
//!
//! Cart → committed transaction with balance debit, stock decrements and
//! sale log rows. Everything after payload validation runs in one SQLite
//! write transaction; any failure rolls back every write.
//!
//! 1. 校验请求 (items 非空, 数量 >= 1, 单价有限且 >= 0)
//! 2. 解析学生 (id 优先, 回退到学号)
//! 3. 商品与库存检查 (同一商品多行时合并数量)
//! 4. 余额检查
//! 5. 写入交易记录
//! 6. 扣减余额 (条件更新)
//! 7. 逐行扣减库存并写 sale 日志

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use super::{StoreError, StoreResult, begin_write};
use crate::core::PriceSource;
use crate::db::repository::inventory_log::{self, NewLogEntry};
use crate::db::repository::transaction::{self, NewItem};
use crate::db::repository::{product, student};
use crate::utils::money::{self, MAX_AMOUNT};
use shared::models::{
    InventoryAction, MAX_SALE_ITEMS, MAX_STOCK_QUANTITY, Product, SaleRequest, SaleTransaction, Student,
    StudentRef, StudentStatus,
};

/// One priced line, ready to persist
#[derive(Debug, Clone)]
pub(crate) struct PlannedLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Result of the validation pass
#[derive(Debug, Clone)]
pub(crate) struct SalePlan {
    pub student: Student,
    pub lines: Vec<PlannedLine>,
    pub total: f64,
}

/// Run the whole sale workflow for `seller_id`
pub async fn process_sale(
    pool: &SqlitePool,
    price_source: PriceSource,
    request: &SaleRequest,
    seller_id: i64,
) -> StoreResult<SaleTransaction> {
    validate_request(request)?;

    let mut tx = begin_write(pool).await?;
    let plan = plan_sale(&mut tx, request, price_source).await?;
    let sale = commit_sale(&mut tx, &plan, seller_id).await?;
    tx.commit().await?;

    tracing::info!(
        transaction_id = sale.id,
        student_id = plan.student.id,
        seller_id,
        items = sale.items.len(),
        total_amount = sale.total_amount,
        balance_after = money::add(plan.student.balance, -plan.total),
        "Sale completed"
    );
    Ok(sale)
}

fn validate_request(request: &SaleRequest) -> StoreResult<()> {
    if request.items.is_empty() {
        return Err(StoreError::Validation("a sale needs at least one item".into()));
    }
    if request.items.len() > MAX_SALE_ITEMS {
        return Err(StoreError::Validation(format!(
            "a sale may have at most {MAX_SALE_ITEMS} items, got {}",
            request.items.len()
        )));
    }
    for (idx, item) in request.items.iter().enumerate() {
        if !(1..=MAX_STOCK_QUANTITY).contains(&item.quantity) {
            return Err(StoreError::Validation(format!(
                "items[{idx}].quantity must be between 1 and {MAX_STOCK_QUANTITY}"
            )));
        }
        if !item.price.is_finite() || item.price < 0.0 || item.price > MAX_AMOUNT {
            return Err(StoreError::Validation(format!(
                "items[{idx}].price must be between 0 and {MAX_AMOUNT}"
            )));
        }
    }
    Ok(())
}

/// Numeric references are tried as ids first, then as roll numbers
pub(crate) async fn resolve_student(
    conn: &mut SqliteConnection,
    reference: &StudentRef,
) -> StoreResult<Student> {
    if let Some(id) = reference.as_id()
        && let Some(found) = student::find_by_id(&mut *conn, id).await?
    {
        return Ok(found);
    }
    let roll_number = reference.as_roll_number();
    student::find_by_roll_number(&mut *conn, &roll_number)
        .await?
        .ok_or(StoreError::StudentNotFound(roll_number))
}

/// Validation pass: no writes
pub(crate) async fn plan_sale(
    conn: &mut SqliteConnection,
    request: &SaleRequest,
    price_source: PriceSource,
) -> StoreResult<SalePlan> {
    let student = resolve_student(conn, &request.student_id).await?;
    if student.status != StudentStatus::Active {
        tracing::warn!(student_id = student.id, "Sale rejected: student inactive");
        return Err(StoreError::StudentInactive(student.id));
    }

    let mut products: HashMap<i64, Product> = HashMap::new();
    let mut requested: Vec<(i64, i64)> = Vec::new();
    let mut lines = Vec::with_capacity(request.items.len());

    for item in &request.items {
        if !products.contains_key(&item.product_id) {
            let found = product::find_active_by_id(&mut *conn, item.product_id)
                .await?
                .ok_or(StoreError::ProductNotFound(item.product_id))?;
            products.insert(item.product_id, found);
        }
        let Some(catalog) = products.get(&item.product_id) else {
            return Err(StoreError::ProductNotFound(item.product_id));
        };

        match requested.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, qty)) => {
                *qty = qty.checked_add(item.quantity).ok_or_else(|| {
                    StoreError::Validation(format!(
                        "total quantity of product {} is too large",
                        item.product_id
                    ))
                })?;
            }
            None => requested.push((item.product_id, item.quantity)),
        }

        let price = match price_source {
            PriceSource::Catalog => catalog.price,
            PriceSource::Request => {
                if !money::money_eq(item.price, catalog.price) {
                    tracing::warn!(
                        product_id = item.product_id,
                        request_price = item.price,
                        catalog_price = catalog.price,
                        "Sale line price differs from catalog price"
                    );
                }
                item.price
            }
        };

        lines.push(PlannedLine {
            product_id: item.product_id,
            product_name: catalog.name.clone(),
            quantity: item.quantity,
            price: money::to_f64(money::to_decimal(price)),
        });
    }

    for (product_id, qty) in &requested {
        if let Some(p) = products.get(product_id)
            && p.stock < *qty
        {
            tracing::warn!(
                product_id,
                stock = p.stock,
                requested = qty,
                "Sale rejected: insufficient stock"
            );
            return Err(StoreError::InsufficientStock {
                product_id: *product_id,
                product: p.name.clone(),
                available: p.stock,
                requested: *qty,
            });
        }
    }

    let total = money::sum_lines(lines.iter().map(|l| (l.quantity, l.price)));
    if !money::covers(student.balance, total) {
        tracing::warn!(
            student_id = student.id,
            balance = student.balance,
            required = total,
            "Sale rejected: insufficient balance"
        );
        return Err(StoreError::InsufficientBalance {
            balance: student.balance,
            required: total,
        });
    }

    Ok(SalePlan {
        student,
        lines,
        total,
    })
}

/// Write pass; guards re-check balance and stock at write time
pub(crate) async fn commit_sale(
    conn: &mut SqliteConnection,
    plan: &SalePlan,
    seller_id: i64,
) -> StoreResult<SaleTransaction> {
    let items: Vec<NewItem> = plan
        .lines
        .iter()
        .map(|l| NewItem {
            product_id: l.product_id,
            quantity: l.quantity,
            price: l.price,
        })
        .collect();
    let sale = transaction::insert(&mut *conn, plan.student.id, seller_id, plan.total, &items).await?;

    if student::debit(&mut *conn, plan.student.id, plan.total)
        .await?
        .is_none()
    {
        let balance = student::find_by_id(&mut *conn, plan.student.id)
            .await?
            .map(|s| s.balance)
            .unwrap_or_default();
        return Err(StoreError::InsufficientBalance {
            balance,
            required: plan.total,
        });
    }

    let reason = format!("Sale - Transaction #{}", sale.id);
    for line in &plan.lines {
        let Some(new_stock) =
            product::apply_stock_delta(&mut *conn, line.product_id, -line.quantity).await?
        else {
            let available = product::find_by_id(&mut *conn, line.product_id)
                .await?
                .map(|p| p.stock)
                .unwrap_or_default();
            return Err(StoreError::InsufficientStock {
                product_id: line.product_id,
                product: line.product_name.clone(),
                available,
                requested: line.quantity,
            });
        };
        inventory_log::insert(
            &mut *conn,
            NewLogEntry {
                product_id: line.product_id,
                action: InventoryAction::Sale,
                quantity_change: -line.quantity,
                new_stock,
                reason: &reason,
                user_id: seller_id,
            },
        )
        .await?;
    }

    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::transaction as txn_repo;
    use crate::services::accounts;
    use crate::services::testing::{Fixture, SELLER_ID, sale_request};
    use shared::models::{SaleItemInput, TransactionStatus};

    #[tokio::test]
    async fn successful_sale_debits_balance_and_stock() {
        let fx = Fixture::new().await;
        let s = fx.student("R-101", 100.0).await;
        let p = fx.product("Chips", 30.0, 10).await;

        let sale = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 2, 30.0)]),
            SELLER_ID,
        )
        .await
        .unwrap();

        assert_eq!(sale.total_amount, 60.0);
        assert_eq!(sale.status, TransactionStatus::Completed);
        assert_eq!(sale.seller_id, SELLER_ID);
        assert_eq!(sale.student_id, s.id);
        assert_eq!(sale.items.len(), 1);
        assert_eq!(fx.balance_of(s.id).await, 40.0);
        assert_eq!(fx.stock_of(p.id).await, 8);

        let logs = inventory_log::find_by_product(&fx.pool, p.id).await.unwrap();
        let sale_logs: Vec<_> = logs
            .iter()
            .filter(|l| l.action == InventoryAction::Sale)
            .collect();
        assert_eq!(sale_logs.len(), 1);
        assert_eq!(sale_logs[0].quantity_change, -2);
        assert_eq!(sale_logs[0].user_id, SELLER_ID);
        assert_eq!(
            sale_logs[0].reason.as_deref(),
            Some(format!("Sale - Transaction #{}", sale.id).as_str())
        );
    }

    #[tokio::test]
    async fn insufficient_balance_leaves_no_trace() {
        let fx = Fixture::new().await;
        let s = fx.student("R-102", 50.0).await;
        let p = fx.product("Chips", 30.0, 10).await;

        let err = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 2, 30.0)]),
            SELLER_ID,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            StoreError::InsufficientBalance { balance, required } if balance == 50.0 && required == 60.0
        ));
        assert_eq!(txn_repo::count(&fx.pool).await.unwrap(), 0);
        assert_eq!(fx.balance_of(s.id).await, 50.0);
        assert_eq!(fx.stock_of(p.id).await, 10);
    }

    #[tokio::test]
    async fn insufficient_stock_fails_before_any_write() {
        let fx = Fixture::new().await;
        let s = fx.student("R-103", 500.0).await;
        let p = fx.product("Soap", 20.0, 3).await;

        let err = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 5, 20.0)]),
            SELLER_ID,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            StoreError::InsufficientStock { available: 3, requested: 5, .. }
        ));
        assert_eq!(txn_repo::count(&fx.pool).await.unwrap(), 0);
        assert_eq!(fx.balance_of(s.id).await, 500.0);
        assert_eq!(fx.stock_of(p.id).await, 3);
    }

    #[tokio::test]
    async fn repeated_product_lines_are_summed_for_stock_check() {
        let fx = Fixture::new().await;
        let s = fx.student("R-104", 500.0).await;
        let p = fx.product("Pen", 10.0, 4).await;

        let err = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 3, 10.0), (p.id, 2, 10.0)]),
            SELLER_ID,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::InsufficientStock { requested: 5, .. }));

        let sale = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 2, 10.0), (p.id, 2, 10.0)]),
            SELLER_ID,
        )
        .await
        .unwrap();
        assert_eq!(sale.items.len(), 2);
        assert_eq!(fx.stock_of(p.id).await, 0);
    }

    #[tokio::test]
    async fn unknown_student_by_id_or_roll_number() {
        let fx = Fixture::new().await;
        let p = fx.product("Pen", 10.0, 4).await;

        for reference in [StudentRef::Id(987654), StudentRef::Key("NO-SUCH-ROLL".into())] {
            let err = process_sale(
                &fx.pool,
                PriceSource::Request,
                &sale_request(reference, &[(p.id, 1, 10.0)]),
                SELLER_ID,
            )
            .await
            .unwrap_err();
            assert!(matches!(err, StoreError::StudentNotFound(_)));
        }
    }

    #[tokio::test]
    async fn numeric_roll_number_falls_back_after_id_miss() {
        let fx = Fixture::new().await;
        let s = fx.student("2024", 100.0).await;
        let p = fx.product("Pen", 10.0, 4).await;

        for reference in [StudentRef::Id(2024), StudentRef::Key("2024".into())] {
            let sale = process_sale(
                &fx.pool,
                PriceSource::Request,
                &sale_request(reference, &[(p.id, 1, 10.0)]),
                SELLER_ID,
            )
            .await
            .unwrap();
            assert_eq!(sale.student_id, s.id);
        }
        assert_eq!(fx.balance_of(s.id).await, 80.0);
    }

    #[tokio::test]
    async fn total_is_sum_of_lines_in_decimal() {
        let fx = Fixture::new().await;
        let s = fx.student("R-105", 100.0).await;
        let a = fx.product("Toffee", 0.1, 50).await;
        let b = fx.product("Eraser", 0.2, 50).await;

        let sale = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(a.id, 3, 0.1), (b.id, 1, 0.2)]),
            SELLER_ID,
        )
        .await
        .unwrap();

        let expected = money::sum_lines(sale.items.iter().map(|i| (i.quantity, i.price)));
        assert_eq!(sale.total_amount, expected);
        assert_eq!(sale.total_amount, 0.5);
        assert_eq!(fx.balance_of(s.id).await, 99.5);
    }

    #[tokio::test]
    async fn catalog_price_source_ignores_request_price() {
        let fx = Fixture::new().await;
        let s = fx.student("R-106", 100.0).await;
        let p = fx.product("Notebook", 45.0, 10).await;

        let sale = process_sale(
            &fx.pool,
            PriceSource::Catalog,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 2, 1.0)]),
            SELLER_ID,
        )
        .await
        .unwrap();
        assert_eq!(sale.items[0].price, 45.0);
        assert_eq!(sale.total_amount, 90.0);

        let sale = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 1, 5.0)]),
            SELLER_ID,
        )
        .await
        .unwrap();
        assert_eq!(sale.total_amount, 5.0);
    }

    #[tokio::test]
    async fn payload_validation() {
        let fx = Fixture::new().await;
        let s = fx.student("R-107", 100.0).await;
        let p = fx.product("Pen", 10.0, 10).await;

        let bad = [
            sale_request(StudentRef::Id(s.id), &[]),
            sale_request(StudentRef::Id(s.id), &[(p.id, 0, 10.0)]),
            sale_request(StudentRef::Id(s.id), &[(p.id, 1, -1.0)]),
            sale_request(StudentRef::Id(s.id), &[(p.id, 1, f64::NAN)]),
            SaleRequest {
                student_id: StudentRef::Id(s.id),
                items: vec![
                    SaleItemInput {
                        product_id: p.id,
                        quantity: 1,
                        price: 0.0,
                    };
                    MAX_SALE_ITEMS + 1
                ],
            },
        ];
        for request in &bad {
            let err = process_sale(&fx.pool, PriceSource::Request, request, SELLER_ID)
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)));
        }
        assert_eq!(txn_repo::count(&fx.pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn oversized_quantities_rejected_without_overflow() {
        let fx = Fixture::new().await;
        let s = fx.student("R-113", 100.0).await;
        let p = fx.product("Pen", 10.0, 10).await;

        let huge = sale_request(
            StudentRef::Id(s.id),
            &[(p.id, i64::MAX, 0.0), (p.id, i64::MAX, 0.0)],
        );
        let err = process_sale(&fx.pool, PriceSource::Request, &huge, SELLER_ID)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let over_cap = sale_request(StudentRef::Id(s.id), &[(p.id, MAX_STOCK_QUANTITY + 1, 0.0)]);
        let err = process_sale(&fx.pool, PriceSource::Request, &over_cap, SELLER_ID)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // the per-product sum is checked even when planning directly
        let mut tx = fx.pool.begin().await.unwrap();
        let err = plan_sale(&mut tx, &huge, PriceSource::Request).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        drop(tx);

        assert_eq!(fx.stock_of(p.id).await, 10);
        assert_eq!(fx.balance_of(s.id).await, 100.0);
        assert_eq!(txn_repo::count(&fx.pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn inactive_product_or_student_rejected() {
        let fx = Fixture::new().await;
        let s = fx.student("R-108", 100.0).await;
        let p = fx.product("Pen", 10.0, 10).await;
        crate::services::catalog::delete_product(&fx.pool, p.id).await.unwrap();

        let err = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(p.id, 1, 10.0)]),
            SELLER_ID,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::ProductNotFound(_)));

        let q = fx.product("Ink", 10.0, 10).await;
        accounts::update_student(
            &fx.pool,
            s.id,
            shared::models::StudentUpdate {
                status: Some(StudentStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let err = process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Id(s.id), &[(q.id, 1, 10.0)]),
            SELLER_ID,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::StudentInactive(_)));
    }

    #[tokio::test]
    async fn stock_guard_failure_after_record_rolls_everything_back() {
        let fx = Fixture::new().await;
        let s = fx.student("R-109", 100.0).await;
        let p = fx.product("Chips", 30.0, 5).await;
        let request = sale_request(StudentRef::Id(s.id), &[(p.id, 2, 30.0)]);

        let mut tx = fx.pool.begin().await.unwrap();
        let plan = plan_sale(&mut tx, &request, PriceSource::Request).await.unwrap();
        // stock drained between validation and write
        product::apply_stock_delta(&mut tx, p.id, -5).await.unwrap();

        let err = commit_sale(&mut tx, &plan, SELLER_ID).await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientStock { available: 0, .. }));
        // the record and debit were already written inside the transaction
        assert_eq!(txn_repo::count(&mut *tx).await.unwrap(), 1);
        drop(tx);

        assert_eq!(txn_repo::count(&fx.pool).await.unwrap(), 0);
        assert_eq!(fx.balance_of(s.id).await, 100.0);
        assert_eq!(fx.stock_of(p.id).await, 5);
        assert_eq!(
            inventory_log::sum_changes(&fx.pool, p.id).await.unwrap(),
            fx.stock_of(p.id).await
        );
    }

    #[tokio::test]
    async fn balance_guard_failure_rolls_back_record() {
        let fx = Fixture::new().await;
        let s = fx.student("R-110", 60.0).await;
        let p = fx.product("Chips", 30.0, 5).await;
        let request = sale_request(StudentRef::Id(s.id), &[(p.id, 2, 30.0)]);

        let mut tx = fx.pool.begin().await.unwrap();
        let plan = plan_sale(&mut tx, &request, PriceSource::Request).await.unwrap();
        // a concurrent sale spent part of the balance
        student::debit(&mut tx, s.id, 10.0).await.unwrap();

        let err = commit_sale(&mut tx, &plan, SELLER_ID).await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientBalance { balance, .. } if balance == 50.0));
        drop(tx);

        assert_eq!(txn_repo::count(&fx.pool).await.unwrap(), 0);
        assert_eq!(fx.balance_of(s.id).await, 60.0);
    }

    #[tokio::test]
    async fn referenced_student_cannot_be_deleted() {
        let fx = Fixture::new().await;
        let s = fx.student("R-111", 100.0).await;
        let p = fx.product("Pen", 10.0, 10).await;
        process_sale(
            &fx.pool,
            PriceSource::Request,
            &sale_request(StudentRef::Key("R-111".into()), &[(p.id, 1, 10.0)]),
            SELLER_ID,
        )
        .await
        .unwrap();

        let err = accounts::delete_student(&fx.pool, s.id).await.unwrap_err();
        assert!(matches!(err, StoreError::StudentHasTransactions(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sales_never_overdraw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let db = crate::db::DbService::new(path.to_str().unwrap(), 5).await.unwrap();
        let fx = Fixture {
            pool: db.pool.clone(),
        };
        let s = fx.student("R-120", 50.0).await;
        let p = fx.product("Chips", 10.0, 100).await;

        let mut handles = Vec::new();
        for _ in 0..12 {
            let pool = db.pool.clone();
            let request = sale_request(StudentRef::Id(s.id), &[(p.id, 1, 10.0)]);
            handles.push(tokio::spawn(async move {
                process_sale(&pool, PriceSource::Request, &request, SELLER_ID).await
            }));
        }

        let mut completed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => completed += 1,
                Err(e) => assert!(
                    matches!(e, StoreError::InsufficientBalance { .. }),
                    "unexpected error: {e:?}"
                ),
            }
        }

        assert_eq!(completed, 5);
        assert_eq!(fx.balance_of(s.id).await, 0.0);
        assert_eq!(fx.stock_of(p.id).await, 95);
        assert_eq!(txn_repo::count(&fx.pool).await.unwrap(), 5);
        assert_eq!(inventory_log::sum_changes(&fx.pool, p.id).await.unwrap(), 95);
    }

    #[tokio::test]
    async fn stock_equals_sum_of_log_changes_after_mixed_activity() {
        let fx = Fixture::new().await;
        let s = fx.student("R-112", 1000.0).await;
        let p = fx.product("Biscuit", 15.0, 20).await;

        crate::services::stock::adjust_stock(&fx.pool, p.id, 10, None, SELLER_ID)
            .await
            .unwrap();
        for qty in [3, 1, 4] {
            process_sale(
                &fx.pool,
                PriceSource::Request,
                &sale_request(StudentRef::Id(s.id), &[(p.id, qty, 15.0)]),
                SELLER_ID,
            )
            .await
            .unwrap();
        }
        crate::services::stock::adjust_stock(&fx.pool, p.id, -2, Some("expired"), SELLER_ID)
            .await
            .unwrap();

        let stock = fx.stock_of(p.id).await;
        assert_eq!(stock, 20);
        assert_eq!(inventory_log::sum_changes(&fx.pool, p.id).await.unwrap(), stock);
        assert_eq!(fx.balance_of(s.id).await, 880.0);
    }
}
