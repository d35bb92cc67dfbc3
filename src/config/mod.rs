//! 配置加载
//!
//! 分层来源：默认值 → `config.toml`（或 `--config` 指定的文件）→ `LINKER__*` 环境变量。
//! 配置值在启动时加载一次并显式传递，不存在全局配置。

mod structs;

pub use structs::*;
