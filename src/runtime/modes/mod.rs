//! 模式路由
//!
//! 为各运行模式提供统一入口：
//! - CLI 模式（脚本子命令）
//! - TUI 模式（终端仪表盘）
//!
//! 按解析出的命令和启用的 feature 选择模式。

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "cli")]
pub use cli::run_cli;

#[cfg(feature = "tui")]
pub use tui::run_tui;

use crate::cli::Commands;
use crate::system::panic_handler::RunMode;

/// 模式检测结果
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "cli")]
    Cli,
    #[cfg(feature = "tui")]
    Tui,
    Unknown,
}

impl Mode {
    /// 日志和 panic hook 对应的终端处理方式
    pub fn run_mode(&self) -> RunMode {
        match self {
            #[cfg(feature = "tui")]
            Mode::Tui => RunMode::Tui,
            _ => RunMode::Cli,
        }
    }
}

/// 根据解析出的命令决定运行模式
///
/// # 检测规则
/// 1. 无命令或 `tui`，且启用了 TUI feature -> TUI 模式
/// 2. 其他命令且启用了 CLI feature -> CLI 模式
/// 3. 其余情况 -> Unknown
pub fn detect_mode(command: Option<&Commands>) -> Mode {
    match command {
        #[cfg(feature = "tui")]
        None | Some(Commands::Tui) => Mode::Tui,
        #[cfg(feature = "cli")]
        Some(_) => Mode::Cli,
        #[allow(unreachable_patterns)]
        _ => Mode::Unknown,
    }
}
