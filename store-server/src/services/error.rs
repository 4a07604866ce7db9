use crate::db::repository::RepoError;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Business errors raised by the store services
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Student {0} is inactive")]
    StudentInactive(i64),

    #[error("Roll number already exists: {0}")]
    RollNumberExists(String),

    #[error("Student {0} has recorded transactions")]
    StudentHasTransactions(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category {0} is inactive")]
    CategoryInactive(i64),

    #[error("Category name already exists: {0}")]
    CategoryNameExists(String),

    #[error("Category {id} still has {count} active products")]
    CategoryHasProducts { id: i64, count: i64 },

    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        product: String,
        available: i64,
        requested: i64,
    },

    #[error("Insufficient balance: {balance:.2} available, {required:.2} required")]
    InsufficientBalance { balance: f64, required: f64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Repo(#[from] RepoError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Repo(err.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::StudentNotFound(key) => {
                AppError::with_message(ErrorCode::StudentNotFound, message).with_detail("student", key)
            }
            StoreError::StudentInactive(id) => {
                AppError::with_message(ErrorCode::StudentInactive, message).with_detail("studentId", id)
            }
            StoreError::RollNumberExists(roll) => {
                AppError::with_message(ErrorCode::StudentRollNumberExists, message)
                    .with_detail("rollNumber", roll)
            }
            StoreError::StudentHasTransactions(id) => {
                AppError::with_message(ErrorCode::StudentHasTransactions, message)
                    .with_detail("studentId", id)
            }
            StoreError::ProductNotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, message).with_detail("productId", id)
            }
            StoreError::CategoryNotFound(key) => {
                AppError::with_message(ErrorCode::CategoryNotFound, message).with_detail("category", key)
            }
            StoreError::CategoryInactive(id) => {
                AppError::with_message(ErrorCode::CategoryInactive, message)
                    .with_detail("categoryId", id)
            }
            StoreError::CategoryNameExists(name) => {
                AppError::with_message(ErrorCode::CategoryNameExists, message).with_detail("name", name)
            }
            StoreError::CategoryHasProducts { id, count } => {
                AppError::with_message(ErrorCode::CategoryHasProducts, message)
                    .with_detail("categoryId", id)
                    .with_detail("activeProducts", count)
            }
            StoreError::InsufficientStock {
                product_id,
                product,
                available,
                requested,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("productId", product_id)
                .with_detail("product", product)
                .with_detail("available", available)
                .with_detail("requested", requested),
            StoreError::InsufficientBalance { balance, required } => {
                AppError::with_message(ErrorCode::InsufficientBalance, message)
                    .with_detail("balance", balance)
                    .with_detail("required", required)
            }
            StoreError::Validation(msg) => AppError::validation(msg),
            StoreError::Repo(e) => AppError::from(e),
        }
    }
}
