//! 时间工具函数 — 业务时区转换
//!
//! Business-day math lives here; repositories only ever see `i64` Unix
//! millis and pre-formatted date strings.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// 解析 cutoff 时间字符串 (HH:MM)，失败返回 00:00
pub fn parse_cutoff(cutoff: &str) -> NaiveTime {
    NaiveTime::parse_from_str(cutoff, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse business_day_cutoff '{}': {}, falling back to 00:00",
            cutoff,
            e
        );
        NaiveTime::MIN
    })
}

/// 解析 IANA 时区名，失败回退到给定默认值
pub fn parse_timezone(name: &str, fallback: Tz) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to {}", name, fallback);
        fallback
    })
}

/// 计算当前营业日起始日期 (业务时区)
///
/// 当前时间 < cutoff → 还在"昨天"的营业日
/// 当前时间 >= cutoff → 当前营业日 = 今天
pub fn current_business_date(cutoff: NaiveTime, tz: Tz) -> NaiveDate {
    let now = chrono::Utc::now().with_timezone(&tz);
    if now.time() < cutoff {
        (now - chrono::Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// 当前营业日, "YYYY-MM-DD" (check_in.date 的存储格式)
pub fn current_business_date_string(cutoff: NaiveTime, tz: Tz) -> String {
    current_business_date(cutoff, tz).format("%Y-%m-%d").to_string()
}

/// 计算距离下一次 cutoff 的 Duration (EOD 调度)
pub fn duration_until_next_cutoff(cutoff_time: NaiveTime, tz: Tz) -> std::time::Duration {
    let now = chrono::Utc::now().with_timezone(&tz);
    let today = now.date_naive();

    let target_date = if now.time() >= cutoff_time {
        // 今天的 cutoff 已过，等明天
        today + chrono::Duration::days(1)
    } else {
        today
    };

    let target_datetime = target_date
        .and_time(cutoff_time)
        .and_local_timezone(tz)
        .single()
        .unwrap_or_else(|| {
            // DST edge case: fallback to +1 min
            (target_date.and_time(cutoff_time) + chrono::Duration::minutes(1))
                .and_local_timezone(tz)
                .latest()
                .unwrap_or_else(|| {
                    tracing::error!("Cannot resolve local time for EOD cutoff, using fallback");
                    now + chrono::Duration::hours(1)
                })
        });

    let duration = target_datetime.signed_duration_since(now);
    if duration.num_seconds() <= 0 {
        // Safety: 不应该发生，但以防万一用 1 分钟兜底
        std::time::Duration::from_secs(60)
    } else {
        duration
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60))
    }
}
