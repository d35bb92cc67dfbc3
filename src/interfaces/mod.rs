//! 用户界面
//!
//! - `cli`：脚本子命令
//! - `tui`：终端仪表盘

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "tui")]
pub mod tui;
