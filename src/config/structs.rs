use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{LinkerError, Result};
use crate::utils::validation::validate_url;

/// 默认配置文件名（当前目录）
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
/// 环境变量前缀，例如 `LINKER__API__BASE_URL`
pub const ENV_PREFIX: &str = "LINKER";
/// TUI 未配置日志文件时使用的文件名
pub const DEFAULT_LOG_FILE: &str = "linker.log";

/// 客户端配置
///
/// 优先级：ENV > config.toml > 默认值
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置，失败时返回错误
    ///
    /// `path` 为空时使用 `config.toml`（可不存在）；显式指定的文件必须存在。
    pub fn try_load(path: Option<&Path>) -> Result<Self> {
        use config::{Config, Environment, File};

        // .env 只在存在时加载
        let _ = dotenvy::dotenv();

        let file_source = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置，出错时打印原因并回退到默认值
    pub fn load(path: Option<&Path>) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e.message());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_url(&self.api.base_url).map_err(|_| {
            LinkerError::config(format!("api.base_url is not a valid URL: '{}'", self.api.base_url))
        })?;
        if self.api.timeout_secs == 0 {
            return Err(LinkerError::config("api.timeout_secs must be greater than 0"));
        }
        if self.ui.page_size == 0 {
            return Err(LinkerError::config("ui.page_size must be greater than 0"));
        }
        if self.api.link_prefix.trim_matches('/').is_empty()
            || self.api.file_prefix.trim_matches('/').is_empty()
        {
            return Err(LinkerError::config("route prefixes cannot be empty"));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let body = toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# Error generating sample config: {}\n", e));
        format!(
            "# linker configuration\n\
             # Every key can be overridden with {}__<SECTION>__<KEY>, e.g. {}__API__BASE_URL\n\n{}",
            ENV_PREFIX, ENV_PREFIX, body
        )
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 后端 API 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 链接短地址前缀：`{base_url}/{link_prefix}/{code}`
    #[serde(default = "default_link_prefix")]
    pub link_prefix: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

/// 会话文件配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionConfig {
    /// 为空时使用平台配置目录下的 `linker/session.json`
    #[serde(default)]
    pub path: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// CLI 未配置时输出到 stderr；TUI 未配置时写入 `linker.log`
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

/// 终端界面配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    #[serde(default = "default_message_duration_ms")]
    pub message_duration_ms: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

// ============================================================
// 默认值函数
// ============================================================

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_link_prefix() -> String {
    "s".to_string()
}

fn default_file_prefix() -> String {
    "f".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_backups() -> u32 {
    5
}

fn default_message_duration_ms() -> u64 {
    5000
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_page_size() -> u32 {
    50
}

fn default_max_upload_mb() -> u64 {
    100
}

fn default_tick_rate_ms() -> u64 {
    100
}

// ============================================================
// Default 实现
// ============================================================

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            link_prefix: default_link_prefix(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            message_duration_ms: default_message_duration_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            page_size: default_page_size(),
            max_upload_mb: default_max_upload_mb(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.message_duration_ms, 5000);
        assert_eq!(config.ui.max_upload_mb, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.api.base_url = "localhost".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_parses_back() {
        let sample = AppConfig::generate_sample_config();
        assert!(sample.contains("LINKER__API__BASE_URL"));
        let parsed: AppConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
