//! 日志系统初始化
//!
//! TUI 占用终端，该模式下日志总是写入文件。
//! CLI 默认写 stderr，设置了 `logging.file` 时写文件。

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_LOG_FILE, LoggingConfig};
use crate::system::panic_handler::RunMode;

/// 日志输出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File { path: String, rotate: bool },
}

/// 按 `mode` 决定输出位置
pub fn log_target(config: &LoggingConfig, mode: RunMode) -> LogTarget {
    let configured = config.file.as_deref().filter(|f| !f.is_empty());
    match (configured, mode) {
        (Some(path), _) => LogTarget::File {
            path: path.to_string(),
            rotate: config.enable_rotation,
        },
        (None, RunMode::Tui) => LogTarget::File {
            path: DEFAULT_LOG_FILE.to_string(),
            rotate: config.enable_rotation,
        },
        (None, RunMode::Cli) => LogTarget::Stderr,
    }
}

fn build_writer(
    config: &LoggingConfig,
    target: &LogTarget,
) -> Box<dyn Write + Send + Sync> {
    let LogTarget::File { path, rotate } = target else {
        return Box::new(std::io::stderr());
    };

    let file_path = Path::new(path);
    if *rotate {
        let dir = file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = file_path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE);
        match rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(file_name.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
        {
            Ok(appender) => return Box::new(appender),
            Err(e) => eprintln!("[WARN] Failed to create rolling log appender: {}", e),
        }
    } else {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)
        {
            Ok(file) => return Box::new(file),
            Err(e) => eprintln!("[WARN] Failed to open log file {}: {}", path, e),
        }
    }

    // 文件不可用时回退到 stderr
    Box::new(std::io::stderr())
}

/// 初始化全局 subscriber
///
/// `RUST_LOG` 优先于 `logging.level`。返回的 guard 必须存活到程序结束，
/// 否则缓冲的日志不会写出。重复调用时保留第一次的 subscriber。
pub fn init_logging(config: &LoggingConfig, mode: RunMode) -> WorkerGuard {
    let target = log_target(config, mode);
    let writer = build_writer(config, &target);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_target(false)
        .with_ansi(target == LogTarget::Stderr);

    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("[WARN] Logging already initialized: {}", e);
    }

    guard
}
