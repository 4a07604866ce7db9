//! 业务服务层
//!
//! - [`stock`]: 库存调整
//! - [`sale`]: 销售事务编排
//! - [`reporting`]: 报表与查询
//! - [`catalog`] / [`accounts`]: 商品分类、学生账户写入规则
//! - [`bootstrap`]: 初始管理员

pub mod accounts;
pub mod bootstrap;
pub mod catalog;
mod error;
pub mod reporting;
pub mod sale;
pub mod stock;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{StoreError, StoreResult};

use sqlx::{Sqlite, SqlitePool, Transaction};

/// Start a write transaction that takes the SQLite write lock up front
///
/// Read-then-write transactions started with a plain `BEGIN` can fail with
/// `SQLITE_BUSY` on lock upgrade; `BEGIN IMMEDIATE` waits on `busy_timeout`.
pub(crate) async fn begin_write(pool: &SqlitePool) -> StoreResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
