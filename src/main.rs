//! linker：Linker API 的终端仪表盘与 CLI

use std::process;

use clap::{CommandFactory, Parser};

use linker_client::cli::Cli;
use linker_client::config::AppConfig;
use linker_client::runtime::modes::{self, Mode};
use linker_client::system::logging::init_logging;
use linker_client::system::panic_handler::install_panic_hook;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());

    let mode = modes::detect_mode(cli.command.as_ref());
    install_panic_hook(mode.run_mode());
    let guard = init_logging(&config.logging, mode.run_mode());

    let api_url = cli.api_url.as_deref();
    let failure = match mode {
        #[cfg(feature = "tui")]
        Mode::Tui => modes::run_tui(&config, api_url)
            .await
            .err()
            .map(|e| e.format_colored()),

        #[cfg(feature = "cli")]
        Mode::Cli => match cli.command {
            Some(cmd) => modes::run_cli(cmd, &config, api_url)
                .await
                .err()
                .map(|e| e.format_colored()),
            None => None,
        },

        Mode::Unknown => {
            Cli::command().print_help()?;
            None
        }
    };

    if let Some(message) = failure {
        eprintln!("{}", message);
        // 退出前刷新日志
        drop(guard);
        process::exit(1);
    }

    Ok(())
}
