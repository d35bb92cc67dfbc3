//! 系统级模块
//!
//! - 日志初始化
//! - Panic hook（恢复终端、写 crash.log）
//! - 剪贴板访问

pub mod clipboard;
pub mod logging;
pub mod panic_handler;
