//! Hostel Store Server - 宿舍小卖部后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 存储学生、商品、分类、交易与库存日志
//! - **业务服务** (`services`): 库存调整、销售事务编排、报表查询
//! - **认证** (`auth`): JWT + Argon2 认证与角色控制
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码、角色
//! ├── db/            # 连接池、迁移、repository
//! ├── services/      # 库存 / 销售 / 报表
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 应用组装与中间件
//! └── utils/         # 日志、时间、金额、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: dotenv、工作目录、日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    init_logger_with_file(Some(&level), Some(json), log_dir.to_str());

    if let Err(e) = utils::logger::cleanup_old_logs(&log_dir, chrono::Local::now().date_naive()) {
        tracing::warn!(error = %e, "Failed to clean up old log files");
    }
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  __           __       __   _____ __
   / / / /___  _____/ /____  / /  / ___// /_____  ________
  / /_/ / __ \/ ___/ __/ _ \/ /   \__ \/ __/ __ \/ ___/ _ \
 / __  / /_/ (__  ) /_/  __/ /   ___/ / /_/ /_/ / /  /  __/
/_/ /_/\____/____/\__/\___/_/   /____/\__/\____/_/   \___/
    "#
    );
}
