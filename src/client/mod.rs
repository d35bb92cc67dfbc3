//! Linker REST API 的 HTTP 客户端
//!
//! # 架构
//!
//! ```text
//! 功能管理器 / CLI → ApiClient ──→ Transport（ureq，运行在阻塞线程池）
//!                              └→ SessionStore（token、user、api_url）
//! ```
//!
//! `ApiClient` 是 bearer token 的唯一持有者，通过 `Arc` 共享给所有功能管理器。
//!
//! # 错误归一化
//!
//! - 传输失败 → `ClientError::Network`
//! - HTTP 401 → `ClientError::Unauthorized`
//! - 其他非 2xx → `ClientError::Api { status, message }`，message 取响应体的
//!   `error` 字段，否则为 `"HTTP <status>: Request failed"`
//! - 成功响应无法解析 → `ClientError::Serialization`

mod api_client;
mod multipart;
mod session;
mod transport;

pub use api_client::{API_PREFIX, ApiClient, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use multipart::{MultipartBody, guess_content_type};
pub use session::{FileSessionStore, MemorySessionStore, SessionState, SessionStore};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;

/// 按配置构建客户端：ureq 传输层、会话文件和可选的 API 地址覆盖
pub fn connect(config: &AppConfig, api_url: Option<&str>) -> Result<ApiClient, ClientError> {
    let transport = Arc::new(UreqTransport::new(Duration::from_secs(config.api.timeout_secs)));
    let store = Arc::new(FileSessionStore::from_config(config.session.path.as_deref()));
    let mut api = ApiClient::restore(&config.api.base_url, transport, store)?;
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        api.set_api_url(url)?;
    }
    Ok(api)
}

// ============ ClientError ============

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// 请求没有得到 HTTP 响应
    Network(String),
    /// HTTP 401
    Unauthorized(String),
    /// 其他非 2xx 状态
    Api { status: u16, message: String },
    /// 请求体编码或响应体解码失败
    Serialization(String),
    /// 无法读取本地文件（上传）
    Io(String),
    /// 会话持久化失败
    Session(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Unauthorized(msg) => write!(f, "{}", msg),
            ClientError::Api { message, .. } => write!(f, "{}", message),
            ClientError::Serialization(msg) => write!(f, "Invalid response: {}", msg),
            ClientError::Io(msg) => write!(f, "I/O error: {}", msg),
            ClientError::Session(msg) => write!(f, "Session storage error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_server_message_verbatim() {
        let err = ClientError::Api {
            status: 409,
            message: "Short code already exists".into(),
        };
        assert_eq!(err.to_string(), "Short code already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_network_display() {
        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(err.status(), None);
    }
}
