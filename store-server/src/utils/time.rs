//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在此完成，repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, Months, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use shared::models::DateRange;

use super::{AppError, AppResult};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let Some(naive) = date.and_hms_opt(hour, min, sec) else {
        return date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis();
    };
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// 业务时区下 `now` 所在日期
pub fn local_date(now_millis: i64, tz: Tz) -> NaiveDate {
    tz.timestamp_millis_opt(now_millis)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| {
            DateTime::<Utc>::from_timestamp_millis(now_millis)
                .unwrap_or_default()
                .date_naive()
        })
}

/// 今日窗口 `[今日零点, 次日零点)` (业务时区)
pub fn today_window(now_millis: i64, tz: Tz) -> (i64, i64) {
    let today = local_date(now_millis, tz);
    (day_start_millis(today, tz), day_end_millis(today, tz))
}

/// 相对时间窗口的起点 (含)；`All` 返回 `None`
///
/// - today: 今日零点 (业务时区)
/// - week: now - 7 天
/// - month: now - 1 个自然月
pub fn range_start_millis(range: DateRange, now_millis: i64, tz: Tz) -> Option<i64> {
    match range {
        DateRange::Today => Some(today_window(now_millis, tz).0),
        DateRange::Week => Some(now_millis - 7 * DAY_MILLIS),
        DateRange::Month => {
            let now = tz.timestamp_millis_opt(now_millis).single()?;
            Some(
                now.checked_sub_months(Months::new(1))
                    .map(|dt| dt.timestamp_millis())
                    .unwrap_or(now_millis - 30 * DAY_MILLIS),
            )
        }
        DateRange::All => None,
    }
}

/// 解析查询边界: RFC3339 时间戳或 `YYYY-MM-DD`
///
/// 日期形式按业务时区取整天：起点取当日零点，终点取次日零点 (不含)。
/// RFC3339 形式的终点按含端点处理，返回值 +1ms 以统一 `< end` 语义。
pub fn parse_bound(value: &str, tz: Tz, is_end: bool) -> AppResult<i64> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        let millis = dt.timestamp_millis();
        return Ok(if is_end { millis + 1 } else { millis });
    }
    let date = parse_date(value)?;
    Ok(if is_end {
        day_end_millis(date, tz)
    } else {
        day_start_millis(date, tz)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(s: &str) -> i64 {
        DateTime::parse_from_rfc3339(s).unwrap().timestamp_millis()
    }

    #[test]
    fn today_window_utc() {
        let now = millis("2025-03-10T15:30:00Z");
        let (start, end) = today_window(now, Tz::UTC);
        assert_eq!(start, millis("2025-03-10T00:00:00Z"));
        assert_eq!(end, millis("2025-03-11T00:00:00Z"));
    }

    #[test]
    fn today_window_follows_business_timezone() {
        // 2025-03-10 20:00 UTC is already 2025-03-11 01:30 in Kolkata
        let now = millis("2025-03-10T20:00:00Z");
        let (start, end) = today_window(now, chrono_tz::Asia::Kolkata);
        assert_eq!(start, millis("2025-03-11T00:00:00+05:30"));
        assert_eq!(end, millis("2025-03-12T00:00:00+05:30"));
    }

    #[test]
    fn relative_ranges() {
        let now = millis("2025-03-31T12:00:00Z");
        assert_eq!(range_start_millis(DateRange::All, now, Tz::UTC), None);
        assert_eq!(
            range_start_millis(DateRange::Week, now, Tz::UTC),
            Some(millis("2025-03-24T12:00:00Z"))
        );
        // month offset clamps to the last day of February
        assert_eq!(
            range_start_millis(DateRange::Month, now, Tz::UTC),
            Some(millis("2025-02-28T12:00:00Z"))
        );
    }

    #[test]
    fn bounds_accept_dates_and_rfc3339() {
        let tz = Tz::UTC;
        assert_eq!(
            parse_bound("2025-03-10", tz, false).unwrap(),
            millis("2025-03-10T00:00:00Z")
        );
        assert_eq!(
            parse_bound("2025-03-10", tz, true).unwrap(),
            millis("2025-03-11T00:00:00Z")
        );
        assert_eq!(
            parse_bound("2025-03-10T08:00:00Z", tz, true).unwrap(),
            millis("2025-03-10T08:00:00Z") + 1
        );
        assert!(parse_bound("10/03/2025", tz, false).is_err());
    }
}
