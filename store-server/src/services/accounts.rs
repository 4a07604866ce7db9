//! Student accounts: registration rules and balance top-ups

use sqlx::SqlitePool;

use super::{StoreError, StoreResult, begin_write};
use crate::db::repository::{RepoError, student};
use crate::utils::money::{self, MAX_AMOUNT};
use shared::models::{Student, StudentCreate, StudentUpdate};

pub async fn get_student(pool: &SqlitePool, id: i64) -> StoreResult<Student> {
    student::find_by_id(pool, id)
        .await?
        .ok_or_else(|| StoreError::StudentNotFound(id.to_string()))
}

pub async fn get_by_roll_number(pool: &SqlitePool, roll_number: &str) -> StoreResult<Student> {
    let roll_number = roll_number.trim();
    student::find_by_roll_number(pool, roll_number)
        .await?
        .ok_or_else(|| StoreError::StudentNotFound(roll_number.to_string()))
}

pub async fn create_student(pool: &SqlitePool, mut data: StudentCreate) -> StoreResult<Student> {
    let roll_number = data.roll_number.trim().to_string();
    if roll_number.is_empty() || data.name.trim().is_empty() {
        return Err(StoreError::Validation(
            "name and rollNumber must not be empty".into(),
        ));
    }
    if let Some(balance) = data.balance {
        if !balance.is_finite() || !(0.0..=MAX_AMOUNT).contains(&balance) {
            return Err(StoreError::Validation(format!(
                "balance must be between 0 and {MAX_AMOUNT}"
            )));
        }
        data.balance = Some(money::to_f64(money::to_decimal(balance)));
    }
    if student::find_by_roll_number(pool, &roll_number).await?.is_some() {
        return Err(StoreError::RollNumberExists(roll_number));
    }

    let created = student::create(pool, data).await.map_err(|e| match e {
        RepoError::Duplicate(_) => StoreError::RollNumberExists(roll_number.clone()),
        other => other.into(),
    })?;
    tracing::info!(
        student_id = created.id,
        roll_number = %created.roll_number,
        balance = created.balance,
        "Student registered"
    );
    Ok(created)
}

pub async fn update_student(pool: &SqlitePool, id: i64, data: StudentUpdate) -> StoreResult<Student> {
    if let Some(roll) = data.roll_number.as_deref().map(str::trim) {
        if roll.is_empty() {
            return Err(StoreError::Validation("rollNumber must not be empty".into()));
        }
        if let Some(existing) = student::find_by_roll_number(pool, roll).await?
            && existing.id != id
        {
            return Err(StoreError::RollNumberExists(roll.to_string()));
        }
    }
    student::update(pool, id, data).await.map_err(|e| match e {
        RepoError::NotFound(_) => StoreError::StudentNotFound(id.to_string()),
        RepoError::Duplicate(msg) => StoreError::RollNumberExists(msg),
        other => other.into(),
    })
}

/// Delete a student that no transaction references
pub async fn delete_student(pool: &SqlitePool, id: i64) -> StoreResult<()> {
    let mut tx = begin_write(pool).await?;
    if student::find_by_id(&mut *tx, id).await?.is_none() {
        return Err(StoreError::StudentNotFound(id.to_string()));
    }
    if student::has_transactions(&mut *tx, id).await? {
        tracing::warn!(student_id = id, "Delete rejected: student has transactions");
        return Err(StoreError::StudentHasTransactions(id));
    }
    student::delete(&mut *tx, id).await?;
    tx.commit().await?;
    tracing::info!(student_id = id, "Student deleted");
    Ok(())
}

/// Top-up (positive) or correction (negative); the balance never goes below 0
pub async fn adjust_balance(
    pool: &SqlitePool,
    id: i64,
    amount: f64,
    user_id: i64,
) -> StoreResult<Student> {
    if !amount.is_finite() || amount.abs() > MAX_AMOUNT {
        return Err(StoreError::Validation(format!(
            "amount must be a finite number within ±{MAX_AMOUNT}"
        )));
    }
    let delta = money::to_f64(money::to_decimal(amount));
    if delta == 0.0 {
        return Err(StoreError::Validation("amount must not be zero".into()));
    }

    let mut tx = begin_write(pool).await?;
    let current = student::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::StudentNotFound(id.to_string()))?;

    let Some(new_balance) = student::apply_balance_delta(&mut tx, id, delta).await? else {
        tracing::warn!(
            student_id = id,
            balance = current.balance,
            amount = delta,
            "Balance adjustment rejected: balance would go negative"
        );
        return Err(StoreError::InsufficientBalance {
            balance: current.balance,
            required: -delta,
        });
    };
    let updated = student::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::StudentNotFound(id.to_string()))?;
    tx.commit().await?;

    tracing::info!(
        student_id = id,
        amount = delta,
        previous_balance = current.balance,
        new_balance,
        user_id,
        "Balance adjusted"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{ADMIN_ID, Fixture};

    #[tokio::test]
    async fn top_up_and_correction() {
        let fx = Fixture::new().await;
        let s = fx.student("R-1", 10.0).await;

        let s2 = adjust_balance(&fx.pool, s.id, 0.1, ADMIN_ID).await.unwrap();
        let s2 = adjust_balance(&fx.pool, s2.id, 0.2, ADMIN_ID).await.unwrap();
        assert_eq!(s2.balance, 10.3);

        let s3 = adjust_balance(&fx.pool, s.id, -10.3, ADMIN_ID).await.unwrap();
        assert_eq!(s3.balance, 0.0);

        let err = adjust_balance(&fx.pool, s.id, -0.01, ADMIN_ID).await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientBalance { .. }));
        assert_eq!(get_student(&fx.pool, s.id).await.unwrap().balance, 0.0);
    }

    #[tokio::test]
    async fn invalid_amounts_rejected() {
        let fx = Fixture::new().await;
        let s = fx.student("R-1", 10.0).await;
        for amount in [0.0, 0.001, f64::NAN, f64::INFINITY, 2.0e6] {
            let err = adjust_balance(&fx.pool, s.id, amount, ADMIN_ID).await.unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)), "amount {amount}");
        }
        let err = adjust_balance(&fx.pool, 999, 5.0, ADMIN_ID).await.unwrap_err();
        assert!(matches!(err, StoreError::StudentNotFound(_)));
    }

    #[tokio::test]
    async fn roll_number_conflicts() {
        let fx = Fixture::new().await;
        let a = fx.student("R-1", 0.0).await;
        fx.student("R-2", 0.0).await;

        let err = create_student(
            &fx.pool,
            StudentCreate {
                name: "Dup".into(),
                roll_number: "R-1".into(),
                standard: "7".into(),
                balance: None,
                status: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::RollNumberExists(_)));

        let err = update_student(
            &fx.pool,
            a.id,
            StudentUpdate {
                roll_number: Some("R-2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::RollNumberExists(_)));

        // keeping its own roll number is fine
        update_student(
            &fx.pool,
            a.id,
            StudentUpdate {
                roll_number: Some("R-1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn delete_unreferenced_student() {
        let fx = Fixture::new().await;
        let s = fx.student("R-1", 0.0).await;
        delete_student(&fx.pool, s.id).await.unwrap();
        let err = get_student(&fx.pool, s.id).await.unwrap_err();
        assert!(matches!(err, StoreError::StudentNotFound(_)));
        let err = get_by_roll_number(&fx.pool, "R-1").await.unwrap_err();
        assert!(matches!(err, StoreError::StudentNotFound(_)));
    }
}
