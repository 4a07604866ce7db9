use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;

use super::error::ServerError;
use crate::auth::JwtConfig;

/// 销售行单价来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceSource {
    /// 使用请求中提交的单价 (与目录价不一致时记录 warn)
    #[default]
    Request,
    /// 使用商品目录中的当前价格
    Catalog,
}

impl FromStr for PriceSource {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "request" => Ok(Self::Request),
            "catalog" => Ok(Self::Catalog),
            other => Err(ServerError::Config(format!(
                "SALE_PRICE_SOURCE must be 'request' or 'catalog', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("request"),
            Self::Catalog => f.write_str("catalog"),
        }
    }
}

/// 首个管理员账号 (仅当用户表为空时创建)
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_MAX_CONNECTIONS | 5 | SQLite 连接池大小 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | UTC | 业务时区 (今日/本周统计窗口) |
/// | SALE_PRICE_SOURCE | request | 销售单价来源: request / catalog |
/// | JWT_SECRET | 开发环境自动生成 | JWT 密钥 (至少 32 字符) |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | BOOTSTRAP_ADMIN_USERNAME | admin | 初始管理员用户名 |
/// | BOOTSTRAP_ADMIN_PASSWORD | - | 初始管理员密码 (未设置则不创建) |
///
/// `LOG_LEVEL` / `LOG_JSON` 在 [`crate::setup_environment`] 中读取。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/store HTTP_PORT=8080 TIMEZONE=Asia/Kolkata cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库与日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 连接池最大连接数
    pub database_max_connections: u32,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | production
    pub environment: String,
    /// 业务时区
    pub timezone: Tz,
    /// 销售单价来源
    pub price_source: PriceSource,
    /// 初始管理员
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值，格式错误的项返回 [`ServerError::Config`]
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let production = environment == "production";

        let timezone = match std::env::var("TIMEZONE") {
            Ok(tz) => tz
                .parse::<Tz>()
                .map_err(|e| ServerError::Config(format!("Invalid TIMEZONE '{tz}': {e}")))?,
            Err(_) => Tz::UTC,
        };

        let price_source = match std::env::var("SALE_PRICE_SOURCE") {
            Ok(v) => v.parse()?,
            Err(_) => PriceSource::default(),
        };

        let bootstrap_admin = std::env::var("BOOTSTRAP_ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .map(|password| BootstrapAdmin {
                username: std::env::var("BOOTSTRAP_ADMIN_USERNAME")
                    .unwrap_or_else(|_| "admin".into()),
                password,
            });

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: parse_env("HTTP_PORT", 3000)?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt: JwtConfig::from_env(production)?,
            environment,
            timezone,
            price_source,
            bootstrap_admin,
        })
    }

    /// SQLite 数据库文件路径
    pub fn database_path(&self) -> String {
        std::path::Path::new(&self.work_dir)
            .join("store.db")
            .to_string_lossy()
            .into_owned()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "./data".into(),
            http_port: 3000,
            database_max_connections: 5,
            jwt: JwtConfig::default(),
            environment: "development".into(),
            timezone: Tz::UTC,
            price_source: PriceSource::default(),
            bootstrap_admin: None,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, ServerError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ServerError::Config(format!("Invalid {key}: '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_source_parses_case_insensitively() {
        assert_eq!("Catalog".parse::<PriceSource>().unwrap(), PriceSource::Catalog);
        assert_eq!(" request ".parse::<PriceSource>().unwrap(), PriceSource::Request);
        assert!("client".parse::<PriceSource>().is_err());
    }

    #[test]
    fn database_path_is_under_work_dir() {
        let config = Config {
            work_dir: "/tmp/store".into(),
            ..Config::default()
        };
        assert_eq!(config.database_path(), "/tmp/store/store.db");
    }

    #[test]
    fn bootstrap_admin_debug_hides_password() {
        let admin = BootstrapAdmin {
            username: "admin".into(),
            password: "hunter2-hunter2".into(),
        };
        let printed = format!("{admin:?}");
        assert!(!printed.contains("hunter2"));
    }
}
