//! Logging Infrastructure
//!
//! Structured logging via `tracing-subscriber`, with optional JSON output and
//! daily rolling files via `tracing-appender`.
//! Rolled files older than [`LOG_RETENTION_DAYS`] are removed at startup.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Daily log file prefix (`store-server.YYYY-MM-DD`)
const LOG_FILE_PREFIX: &str = "store-server";

pub const LOG_RETENTION_DAYS: i64 = 14;

/// 删除超过保留期的滚动日志文件，返回删除数量
pub fn cleanup_old_logs(log_dir: &Path, today: chrono::NaiveDate) -> anyhow::Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }
    let cutoff = today - chrono::Duration::days(LOG_RETENTION_DAYS);

    let mut removed = 0;
    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = name
            .strip_prefix(LOG_FILE_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        if date < cutoff {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Initialize the logger (stdout, info level)
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON format and file output
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this more
/// than once is a no-op (the first subscriber wins).
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file_dir = log_dir
        .map(Path::new)
        .filter(|p| p.exists())
        .and_then(|p| p.to_str());

    let result = match (file_dir, json.unwrap_or(false)) {
        (Some(dir), true) => builder
            .json()
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (Some(dir), false) => builder
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_only_expired_rolled_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "store-server.2026-01-01",
            "store-server.2026-01-20",
            "store-server.2026-01-31",
            "store-server.not-a-date",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let today = chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let removed = cleanup_old_logs(dir.path(), today).unwrap();
        assert_eq!(removed, 1);

        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(
            left,
            vec![
                "notes.txt",
                "store-server.2026-01-20",
                "store-server.2026-01-31",
                "store-server.not-a-date",
            ]
        );
    }

    #[test]
    fn cleanup_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(cleanup_old_logs(&missing, chrono::Utc::now().date_naive()).unwrap(), 0);
    }
}
