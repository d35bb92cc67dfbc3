//! 表单字段验证
//!
//! 每个验证函数返回 `Ok(())` 或面向用户的错误信息；`ValidationErrors`
//! 按字段顺序收集一次表单提交中的所有错误。

use std::fmt;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::helpers::parse_short_codes;
use super::time_parser::TimeParser;

pub type FieldResult = Result<(), String>;

/// 保留短码（不区分大小写）
pub const RESERVED_SHORT_CODES: &[&str] =
    &["api", "www", "app", "admin", "root", "null", "undefined"];

pub const MAX_SHORT_CODE_LENGTH: usize = 100;
pub const MAX_TOKEN_NAME_LENGTH: usize = 100;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 100;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email regex: {e}"))
});

static CODE_CHARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap_or_else(|e| panic!("code regex: {e}"))
});

/// 验证 URL 格式（任何可被解析的绝对 URL 都有效）
pub fn validate_url(url: &str) -> FieldResult {
    Url::parse(url.trim())
        .map(|_| ())
        .map_err(|_| "Please enter a valid URL".to_string())
}

pub fn validate_email(email: &str) -> FieldResult {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

pub fn validate_username(username: &str) -> FieldResult {
    let len = username.chars().count();
    if username.is_empty() {
        return Err("Username is required".to_string());
    }
    if len < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }
    if len > 50 {
        return Err("Username must be less than 50 characters".to_string());
    }
    if !CODE_CHARS_RE.is_match(username) {
        return Err(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        );
    }
    Ok(())
}

pub fn validate_password(password: &str) -> FieldResult {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    Ok(())
}

/// 验证单个短码：1-100 个 `[A-Za-z0-9_-]` 字符，且不是保留字
pub fn validate_short_code(code: &str) -> FieldResult {
    if code.is_empty() {
        return Err("Short code cannot be empty".to_string());
    }
    if code.chars().count() > MAX_SHORT_CODE_LENGTH {
        return Err("Short code must be less than 100 characters".to_string());
    }
    if !CODE_CHARS_RE.is_match(code) {
        return Err(
            "Short code can only contain letters, numbers, underscores, and hyphens".to_string(),
        );
    }
    let lower = code.to_lowercase();
    if RESERVED_SHORT_CODES.contains(&lower.as_str()) {
        return Err("This short code is reserved".to_string());
    }
    Ok(())
}

/// 验证逗号分隔的短码输入，空输入表示由服务端生成
pub fn validate_short_codes(input: &str) -> FieldResult {
    parse_short_codes(input)
        .iter()
        .try_for_each(|code| validate_short_code(code))
}

pub fn validate_file_size(size_bytes: Option<u64>, max_size_mb: u64) -> FieldResult {
    let Some(size) = size_bytes else {
        return Err("Please select a file".to_string());
    };
    if size > max_size_mb.saturating_mul(1024 * 1024) {
        return Err(format!("File size must be less than {}MB", max_size_mb));
    }
    Ok(())
}

pub fn validate_token_name(name: &str) -> FieldResult {
    if name.is_empty() {
        return Err("Token name is required".to_string());
    }
    if name.chars().count() > MAX_TOKEN_NAME_LENGTH {
        return Err("Token name must be less than 100 characters".to_string());
    }
    Ok(())
}

/// 过期时间可选；填写时必须能解析且晚于当前时间
pub fn validate_expiration_date(input: &str) -> FieldResult {
    let input = input.trim();
    if input.is_empty() {
        return Ok(());
    }
    let expires_at = TimeParser::parse_expire_time(input)?;
    if expires_at <= Utc::now() {
        return Err("Expiration date must be in the future".to_string());
    }
    Ok(())
}

/// 单个字段的验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 一次提交中收集到的验证错误（保持字段顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录字段的验证结果，失败时追加错误
    pub fn check(&mut self, field: &'static str, result: FieldResult) -> &mut Self {
        if let Err(message) = result {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://localhost:8080/path?q=1#frag").is_ok());
        assert!(validate_url("ftp://files.example.com/a.zip").is_ok());
        assert!(validate_url("mailto:someone@example.com").is_ok());

        assert!(validate_url("").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("http://").is_err());
        assert_eq!(
            validate_url("/relative/path").unwrap_err(),
            "Please enter a valid URL"
        );
    }

    #[test]
    fn test_validate_short_code_accepts_valid() {
        for code in ["a", "docs", "my-link_2", "API1", &"x".repeat(100)] {
            assert!(validate_short_code(code).is_ok(), "{code} should be valid");
        }
    }

    #[test]
    fn test_validate_short_code_rejects_invalid() {
        let too_long = "x".repeat(101);
        for code in ["", "has space", "slash/", "ünï", "dot.code", too_long.as_str()] {
            assert!(validate_short_code(code).is_err(), "{code} should be invalid");
        }
    }

    #[test]
    fn test_validate_short_code_reserved() {
        for code in RESERVED_SHORT_CODES {
            assert_eq!(
                validate_short_code(code).unwrap_err(),
                "This short code is reserved"
            );
        }
        assert!(validate_short_code("Admin").is_err());
        assert!(validate_short_code("NULL").is_err());
    }

    #[test]
    fn test_validate_short_codes_list() {
        assert!(validate_short_codes("").is_ok());
        assert!(validate_short_codes(" , ,").is_ok());
        assert!(validate_short_codes("one, two,three").is_ok());
        assert!(validate_short_codes("one, www").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("bo").is_err());
        assert!(validate_username(&"b".repeat(51)).is_err());
        assert!(validate_username("bob smith").is_err());
        assert_eq!(validate_username("").unwrap_err(), "Username is required");
    }

    #[test]
    fn test_validate_email_and_password() {
        assert!(validate_email("bob@example.com").is_ok());
        assert!(validate_email("bob@example").is_err());
        assert!(validate_email("").is_err());
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_file_size() {
        assert_eq!(
            validate_file_size(None, 100).unwrap_err(),
            "Please select a file"
        );
        assert!(validate_file_size(Some(100 * 1024 * 1024), 100).is_ok());
        assert_eq!(
            validate_file_size(Some(100 * 1024 * 1024 + 1), 100).unwrap_err(),
            "File size must be less than 100MB"
        );
        // 上限乘法饱和而不是溢出
        assert!(validate_file_size(Some(u64::MAX), u64::MAX).is_ok());
        assert!(validate_file_size(Some(u64::MAX), u64::MAX / 2).is_ok());
    }

    #[test]
    fn test_validate_token_name() {
        assert!(validate_token_name("ci").is_ok());
        assert!(validate_token_name("").is_err());
        assert!(validate_token_name(&"n".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_expiration_date() {
        assert!(validate_expiration_date("").is_ok());
        assert!(validate_expiration_date("7d").is_ok());
        assert!(validate_expiration_date("2099-01-01T00:00").is_ok());
        assert_eq!(
            validate_expiration_date("2001-01-01T00:00").unwrap_err(),
            "Expiration date must be in the future"
        );
        assert!(validate_expiration_date("someday").is_err());
    }

    #[test]
    fn test_validation_errors_collects_in_order() {
        let mut errors = ValidationErrors::new();
        errors
            .check("original_url", validate_url("nope"))
            .check("short_codes", validate_short_codes("ok"))
            .check("expires_at", validate_expiration_date("2001-01-01"));

        assert_eq!(errors.len(), 2);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["original_url", "expires_at"]);
        assert_eq!(errors.get("original_url"), Some("Please enter a valid URL"));
        assert!(errors.into_result().is_err());
    }
}
