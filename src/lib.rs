//! Linker 客户端：Linker API 的终端仪表盘与 CLI
//!
//! 本库提供 Linker 链接、文件和 API 令牌管理服务的客户端：
//! 带持久化会话的 HTTP 客户端、持有仪表盘状态的功能管理器，
//! 以及构建在其上的用户界面。
//!
//! # Feature
//! - **cli**：命令行子命令
//! - **tui**：终端仪表盘（未给出命令时的默认模式）
//!
//! # 架构
//! - `client`：REST 客户端、传输层和会话持久化
//! - `features`：链接、文件、令牌、统计和认证管理器
//! - `ui`：提示消息、弹窗栈和表单状态
//! - `app`：仪表盘编排（标签页、快捷键、刷新）
//! - `interfaces`：用户界面（CLI、TUI）
//! - `config`：配置管理
//! - `runtime`：运行模式
//! - `system`：日志、panic hook 与剪贴板

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod features;
pub mod interfaces;
pub mod models;
pub mod runtime;
pub mod system;
pub mod ui;
pub mod utils;
