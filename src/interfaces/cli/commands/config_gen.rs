//! 生成配置命令

use std::path::Path;

use colored::Colorize;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::interfaces::cli::CliError;

/// 写入带注释的示例配置文件
pub fn generate_config(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    if Path::new(&path).exists() && !force {
        return Err(CliError::CommandError(format!(
            "{} already exists. Use --force to overwrite it",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    if let Some(parent) = Path::new(&path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    match std::fs::write(&path, AppConfig::generate_sample_config()) {
        Ok(()) => {
            println!(
                "  {} {}",
                "Configuration file generated successfully".green(),
                path.blue()
            );
            println!(
                "  {} {}",
                "Edit it, or override keys with LINKER__<SECTION>__<KEY>".yellow(),
                "🔧".blue()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "  {} {}",
                "Failed to generate configuration file".red(),
                e.to_string().red()
            );
            Err(CliError::CommandError(format!(
                "Unable to write configuration file: {}",
                e
            )))
        }
    }
}
