use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// 过期时间输入框使用的格式（`YYYY-MM-DDTHH:MM`，UTC）
pub const INPUT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_FORMATS: &[&str] = &[
    INPUT_DATETIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

const OUT_OF_RANGE: &str = "Expiration time is out of range";

pub struct TimeParser;

impl TimeParser {
    /// 解析时间字符串，支持多种格式：
    /// - RFC3339：2024-10-01T12:00:00Z
    /// - 表单输入（按 UTC 解释）：2024-10-01T12:00
    /// - 日期：2024-10-01（当天 00:00 UTC）
    /// - 相对时间：1d, 2w, 3M, 1y, 1h30m, 2d12h
    pub fn parse_expire_time(input: &str) -> Result<DateTime<Utc>, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("Time cannot be empty".to_string());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(naive.and_utc());
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            && let Some(naive) = date.and_hms_opt(0, 0, 0)
        {
            return Ok(naive.and_utc());
        }

        Self::parse_relative_time(input)
    }

    fn parse_relative_time(input: &str) -> Result<DateTime<Utc>, String> {
        let mut total_duration = Duration::zero();
        let mut remaining = input;

        while !remaining.is_empty() {
            let digits = remaining
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(remaining.len());
            if digits == 0 {
                return Err(format!("Invalid time format: '{}'", input));
            }

            let num: i64 = remaining[..digits]
                .parse()
                .map_err(|_| format!("Invalid number: '{}'", &remaining[..digits]))?;
            remaining = &remaining[digits..];

            let unit_len = remaining
                .find(|c: char| !c.is_alphabetic())
                .unwrap_or(remaining.len());
            if unit_len == 0 {
                return Err(format!("Missing time unit after '{}'", num));
            }
            let unit = &remaining[..unit_len];

            // "M" 表示月，"m" 表示分钟
            let duration = match unit {
                "M" => num.checked_mul(30).and_then(Duration::try_days),
                _ => match unit.to_lowercase().as_str() {
                    "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
                    "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
                    "h" | "hour" | "hours" => Duration::try_hours(num),
                    "d" | "day" | "days" => Duration::try_days(num),
                    "w" | "week" | "weeks" => Duration::try_weeks(num),
                    "month" | "months" => num.checked_mul(30).and_then(Duration::try_days),
                    "y" | "year" | "years" => num.checked_mul(365).and_then(Duration::try_days),
                    _ => return Err(format!("Unsupported time unit: '{}'", unit)),
                },
            };

            total_duration = duration
                .and_then(|d| total_duration.checked_add(&d))
                .ok_or_else(|| OUT_OF_RANGE.to_string())?;
            remaining = &remaining[unit_len..];
        }

        if total_duration == Duration::zero() {
            return Err("Time interval cannot be zero".to_string());
        }

        Utc::now()
            .checked_add_signed(total_duration)
            .ok_or_else(|| OUT_OF_RANGE.to_string())
    }

    /// 格式化持续时间为人类可读的字符串
    pub fn format_duration_human(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
        let duration = to.signed_duration_since(from);

        if duration.num_seconds() < 0 {
            return "expired".to_string();
        }

        let days = duration.num_days();
        let hours = (duration.num_seconds() % 86400) / 3600;
        let minutes = (duration.num_seconds() % 3600) / 60;

        if days > 0 {
            if hours > 0 {
                format!("{}d {}h", days, hours)
            } else {
                format!("{}d", days)
            }
        } else if hours > 0 {
            if minutes > 0 {
                format!("{}h {}m", hours, minutes)
            } else {
                format!("{}h", hours)
            }
        } else if minutes > 0 {
            format!("{}m", minutes)
        } else {
            format!("{}s", duration.num_seconds())
        }
    }
}

/// 格式化为过期时间输入框的值，舍去秒
pub fn format_date_for_input(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format(INPUT_DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// `expires_at` 严格早于当前时间时为 true，没有过期时间则永不过期
pub fn is_expired(expires_at: Option<DateTime<Utc>>) -> bool {
    is_expired_at(expires_at, Utc::now())
}

pub fn is_expired_at(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|exp| exp < now)
}
