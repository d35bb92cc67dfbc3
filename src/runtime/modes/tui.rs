//! TUI 模式
//!
//! TUI 模式的启动逻辑，实际工作交给 TUI 实现。

use tracing::debug;

use crate::config::AppConfig;
use crate::errors::Result;

/// 运行 TUI 模式
pub async fn run_tui(config: &AppConfig, api_url: Option<&str>) -> Result<()> {
    debug!("TUI mode, tick rate {}ms", config.ui.tick_rate_ms);
    crate::interfaces::tui::run_tui(config, api_url).await
}
