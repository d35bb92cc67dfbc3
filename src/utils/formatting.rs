//! 仪表盘和 CLI 共用的显示格式化

use chrono::{DateTime, Utc};

use crate::models::ShortCode;

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// 保留一位小数的可读大小，最大单位为 GB
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, SIZE_UNITS[unit])
}

/// 相对日期（"Today"、"Yesterday"、"3 days ago"），超过一周显示日历日期
pub fn format_date(date: DateTime<Utc>) -> String {
    format_date_at(date, Utc::now())
}

pub fn format_date_at(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(date);

    if diff.num_milliseconds() >= 0 {
        match diff.num_days() {
            0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            n if n < 7 => format!("{} days ago", n),
            _ => date.format("%Y-%m-%d").to_string(),
        }
    } else {
        match date.signed_duration_since(now).num_days() {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            n if n < 7 => format!("In {} days", n),
            _ => date.format("%Y-%m-%d").to_string(),
        }
    }
}

pub fn format_date_time(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "Never".to_string(),
    }
}

pub fn file_icon(mime_type: &str) -> &'static str {
    match mime_type {
        "" => "📄",
        m if m.starts_with("image/") => "🖼️",
        m if m.starts_with("video/") => "🎥",
        m if m.starts_with("audio/") => "🎵",
        m if m.contains("pdf") => "📄",
        m if m.contains("document") || m.contains("word") => "📝",
        m if m.contains("spreadsheet") || m.contains("excel") => "📊",
        m if m.contains("presentation") || m.contains("powerpoint") => "📋",
        m if m.contains("zip") || m.contains("rar") || m.contains("tar") => "📦",
        _ => "📄",
    }
}

/// 把 `url` 截断到最多 `max_len` 个字符，以 "..." 结尾
pub fn truncate_url(url: &str, max_len: usize) -> String {
    if url.chars().count() <= max_len {
        return url.to_string();
    }
    let kept: String = url.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 记录的展示短码：优先主短码，其次第一个，都没有时为 "N/A"
pub fn format_short_code(codes: &[ShortCode]) -> &str {
    codes
        .iter()
        .find(|c| c.is_primary)
        .or_else(|| codes.first())
        .map(|c| c.short_code.as_str())
        .unwrap_or("N/A")
}

/// 短码的公开地址，例如 `http://host/s/docs`
pub fn short_url(base_url: &str, prefix: &str, code: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        prefix.trim_matches('/'),
        code
    )
}
