//! Test fixtures shared by the service tests

use sqlx::SqlitePool;

use crate::db::repository::{product, student, test_support::test_pool};
use crate::services::{accounts, catalog};
use shared::models::{
    Product, ProductCreate, SaleItemInput, SaleRequest, Student, StudentCreate, StudentRef,
};

pub const ADMIN_ID: i64 = 1;
pub const SELLER_ID: i64 = 2;

pub struct Fixture {
    pub pool: SqlitePool,
}

impl Fixture {
    pub async fn new() -> Self {
        Self {
            pool: test_pool().await,
        }
    }

    pub async fn student(&self, roll_number: &str, balance: f64) -> Student {
        accounts::create_student(
            &self.pool,
            StudentCreate {
                name: format!("Student {roll_number}"),
                roll_number: roll_number.into(),
                standard: "10".into(),
                balance: Some(balance),
                status: None,
            },
        )
        .await
        .unwrap()
    }

    /// Stationery product with default threshold
    pub async fn product(&self, name: &str, price: f64, stock: i64) -> Product {
        catalog::create_product(&self.pool, product_input(name, 2, price, stock), ADMIN_ID)
            .await
            .unwrap()
    }

    pub async fn stock_of(&self, product_id: i64) -> i64 {
        product::find_by_id(&self.pool, product_id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    pub async fn balance_of(&self, student_id: i64) -> f64 {
        student::find_by_id(&self.pool, student_id)
            .await
            .unwrap()
            .unwrap()
            .balance
    }
}

pub fn product_input(name: &str, category_id: i64, price: f64, stock: i64) -> ProductCreate {
    ProductCreate {
        name: name.into(),
        category_id,
        price,
        stock: Some(stock),
        low_stock_threshold: None,
        barcode: None,
        description: None,
        is_active: None,
    }
}

/// `(product_id, quantity, price)` lines
pub fn sale_request(student: StudentRef, lines: &[(i64, i64, f64)]) -> SaleRequest {
    SaleRequest {
        student_id: student,
        items: lines
            .iter()
            .map(|&(product_id, quantity, price)| SaleItemInput {
                product_id,
                quantity,
                price,
            })
            .collect(),
    }
}
