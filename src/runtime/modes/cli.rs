//! CLI 模式
//!
//! CLI 模式的启动逻辑，实际工作交给 CLI 实现。

use tracing::debug;

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::interfaces::cli::{CliError, run_cli_command};

/// 运行 CLI 模式
pub async fn run_cli(
    cmd: Commands,
    config: &AppConfig,
    api_url: Option<&str>,
) -> Result<(), CliError> {
    debug!("Running CLI command");
    run_cli_command(cmd, config, api_url).await
}
