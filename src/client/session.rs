//! 持久化的登录状态：bearer token、缓存的用户和 API 地址覆盖

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ClientError;
use crate::models::User;

const SESSION_FILE_NAME: &str = "session.json";
const APP_DIR_NAME: &str = "linker";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub api_url: Option<String>,
}

pub trait SessionStore: Send + Sync {
    /// 会话文件不存在时返回空状态而不是错误
    fn load(&self) -> Result<SessionState, ClientError>;
    fn save(&self, state: &SessionState) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// 平台配置目录下的 `session.json`，例如 `~/.config/linker/`
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 配置了 `path` 时使用它，否则使用平台默认位置
    pub fn from_config(path: Option<&str>) -> Self {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => Self::new(p),
            None => Self::new(Self::default_path()),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(format!(".{}", APP_DIR_NAME)))
            .join(SESSION_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<SessionState, ClientError> {
        if !self.path.exists() {
            return Ok(SessionState::default());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Session(format!("Failed to read session: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(SessionState::default());
        }
        serde_json::from_str(&content)
            .map_err(|e| ClientError::Session(format!("Corrupt session file: {}", e)))
    }

    fn save(&self, state: &SessionState) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ClientError::Session(format!("Failed to create dir: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, content)
            .map_err(|e| ClientError::Session(format!("Failed to write session: {}", e)))?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(format!(
                "Failed to remove session: {}",
                e
            ))),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: Mutex<SessionState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<SessionState, ClientError> {
        Ok(self.state.lock().clone())
    }

    fn save(&self, state: &SessionState) -> Result<(), ClientError> {
        *self.state.lock() = state.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.state.lock() = SessionState::default();
        Ok(())
    }
}
