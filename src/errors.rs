use std::fmt;

use crate::client::ClientError;

#[derive(Debug, Clone)]
pub enum LinkerError {
    Validation(String),
    Network(String),
    Api(String),
    Unauthorized(String),
    NotFound(String),
    Serialization(String),
    FileOperation(String),
    Config(String),
    Session(String),
    Clipboard(String),
    DateParse(String),
    Terminal(String),
}

impl LinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkerError::Validation(_) => "E001",
            LinkerError::Network(_) => "E002",
            LinkerError::Api(_) => "E003",
            LinkerError::Unauthorized(_) => "E004",
            LinkerError::NotFound(_) => "E005",
            LinkerError::Serialization(_) => "E006",
            LinkerError::FileOperation(_) => "E007",
            LinkerError::Config(_) => "E008",
            LinkerError::Session(_) => "E009",
            LinkerError::Clipboard(_) => "E010",
            LinkerError::DateParse(_) => "E011",
            LinkerError::Terminal(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkerError::Validation(_) => "Validation Error",
            LinkerError::Network(_) => "Network Error",
            LinkerError::Api(_) => "API Error",
            LinkerError::Unauthorized(_) => "Authentication Required",
            LinkerError::NotFound(_) => "Resource Not Found",
            LinkerError::Serialization(_) => "Serialization Error",
            LinkerError::FileOperation(_) => "File Operation Error",
            LinkerError::Config(_) => "Configuration Error",
            LinkerError::Session(_) => "Session Error",
            LinkerError::Clipboard(_) => "Clipboard Error",
            LinkerError::DateParse(_) => "Date Parse Error",
            LinkerError::Terminal(_) => "Terminal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkerError::Validation(msg) => msg,
            LinkerError::Network(msg) => msg,
            LinkerError::Api(msg) => msg,
            LinkerError::Unauthorized(msg) => msg,
            LinkerError::NotFound(msg) => msg,
            LinkerError::Serialization(msg) => msg,
            LinkerError::FileOperation(msg) => msg,
            LinkerError::Config(msg) => msg,
            LinkerError::Session(msg) => msg,
            LinkerError::Clipboard(msg) => msg,
            LinkerError::DateParse(msg) => msg,
            LinkerError::Terminal(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 TUI 状态栏和日志）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkerError {}

// 便捷的构造函数
impl LinkerError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkerError::Validation(msg.into())
    }

    pub fn network<T: Into<String>>(msg: T) -> Self {
        LinkerError::Network(msg.into())
    }

    pub fn api<T: Into<String>>(msg: T) -> Self {
        LinkerError::Api(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinkerError::Unauthorized(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkerError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkerError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkerError::FileOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkerError::Config(msg.into())
    }

    pub fn session<T: Into<String>>(msg: T) -> Self {
        LinkerError::Session(msg.into())
    }

    pub fn clipboard<T: Into<String>>(msg: T) -> Self {
        LinkerError::Clipboard(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LinkerError::DateParse(msg.into())
    }

    pub fn terminal<T: Into<String>>(msg: T) -> Self {
        LinkerError::Terminal(msg.into())
    }
}

impl From<ClientError> for LinkerError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(msg) => LinkerError::Network(msg),
            ClientError::Unauthorized(msg) => LinkerError::Unauthorized(msg),
            ClientError::Api { status: 404, message } => LinkerError::NotFound(message),
            ClientError::Api { message, .. } => LinkerError::Api(message),
            ClientError::Serialization(msg) => LinkerError::Serialization(msg),
            ClientError::Io(msg) => LinkerError::FileOperation(msg),
            ClientError::Session(msg) => LinkerError::Session(msg),
        }
    }
}

impl From<std::io::Error> for LinkerError {
    fn from(err: std::io::Error) -> Self {
        LinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkerError {
    fn from(err: serde_json::Error) -> Self {
        LinkerError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for LinkerError {
    fn from(err: config::ConfigError) -> Self {
        LinkerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LinkerError {
    fn from(err: toml::ser::Error) -> Self {
        LinkerError::Config(err.to_string())
    }
}

impl From<csv::Error> for LinkerError {
    fn from(err: csv::Error) -> Self {
        LinkerError::FileOperation(err.to_string())
    }
}

impl From<chrono::ParseError> for LinkerError {
    fn from(err: chrono::ParseError) -> Self {
        LinkerError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            LinkerError::validation("a"),
            LinkerError::network("a"),
            LinkerError::api("a"),
            LinkerError::unauthorized("a"),
            LinkerError::not_found("a"),
            LinkerError::serialization("a"),
            LinkerError::file_operation("a"),
            LinkerError::config("a"),
            LinkerError::session("a"),
            LinkerError::clipboard("a"),
            LinkerError::date_parse("a"),
            LinkerError::terminal("a"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let err = LinkerError::validation("Please enter a valid URL");
        assert_eq!(
            err.format_simple(),
            "Validation Error: Please enter a valid URL"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_from_client_error_not_found() {
        let err: LinkerError = ClientError::Api {
            status: 404,
            message: "Link not found".into(),
        }
        .into();
        assert!(matches!(err, LinkerError::NotFound(ref m) if m == "Link not found"));
    }

    #[test]
    fn test_from_client_error_unauthorized() {
        let err: LinkerError = ClientError::Unauthorized("Invalid token".into()).into();
        assert_eq!(err.code(), "E004");
        assert_eq!(err.message(), "Invalid token");
    }
}
