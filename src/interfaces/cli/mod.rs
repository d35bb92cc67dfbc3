//! CLI 接口模块
//!
//! 与仪表盘共用 `ApiClient` 的脚本化前端，每个命令在发送请求前先在本地校验输入。

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::client::{ApiClient, ClientError, connect};
use crate::config::AppConfig;
use crate::errors::LinkerError;
use crate::utils::validation::ValidationErrors;
use commands::{analytics, auth, config_gen, files, links, tokens};

#[derive(Debug)]
pub enum CliError {
    /// 已分类的请求或本地 I/O 失败
    ApiError(LinkerError),
    /// 发送前被拒绝的输入
    ValidationError(ValidationErrors),
    CommandError(String),
}

impl CliError {
    /// 格式化为简单输出
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ApiError(err) => err.format_simple(),
            CliError::ValidationError(errors) => format!("Validation error: {}", errors),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ApiError(err) => err.format_colored(),
            CliError::ValidationError(errors) => {
                let mut out = "Validation error:".yellow().bold().to_string();
                for error in errors.iter() {
                    out.push_str(&format!(
                        "\n  {} {}",
                        format!("{}:", error.field).yellow(),
                        error.message.white()
                    ));
                }
                out
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<LinkerError> for CliError {
    fn from(err: LinkerError) -> Self {
        CliError::ApiError(err)
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        CliError::ApiError(err.into())
    }
}

impl From<ValidationErrors> for CliError {
    fn from(errors: ValidationErrors) -> Self {
        CliError::ValidationError(errors)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::ApiError(err.into())
    }
}

/// 需要已登录用户的命令所用的客户端
fn signed_in(config: &AppConfig, api_url: Option<&str>) -> Result<ApiClient, CliError> {
    let api = connect(config, api_url)?;
    if !api.has_token() {
        return Err(CliError::ApiError(LinkerError::unauthorized(
            "Not signed in. Run `linker login <username>` first",
        )));
    }
    Ok(api)
}

/// 执行 clap 解析出的 CLI 命令
pub async fn run_cli_command(
    cmd: Commands,
    config: &AppConfig,
    api_url: Option<&str>,
) -> Result<(), CliError> {
    match cmd {
        // 不需要服务器也不需要会话
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_gen::generate_config(output_path, force),

        Commands::Login { username, password } => {
            let api = connect(config, api_url)?;
            auth::login(&api, &username, password).await
        }

        Commands::Register {
            username,
            email,
            password,
        } => {
            let api = connect(config, api_url)?;
            auth::register(&api, &username, &email, password).await
        }

        Commands::Logout => {
            let api = connect(config, api_url)?;
            auth::logout(&api)
        }

        Commands::Whoami => auth::whoami(&signed_in(config, api_url)?).await,

        Commands::Links { action } => {
            links::run(&signed_in(config, api_url)?, config, action).await
        }

        Commands::Files { action } => {
            files::run(&signed_in(config, api_url)?, config, action).await
        }

        Commands::Tokens { action } => tokens::run(&signed_in(config, api_url)?, action).await,

        Commands::Analytics { link, file } => {
            analytics::show(&signed_in(config, api_url)?, link, file).await
        }

        #[cfg(feature = "tui")]
        Commands::Tui => unreachable!("TUI handled in main"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors
            .check("original_url", Err("Please enter a valid URL".to_string()))
            .check("title", Ok(()));
        let err = CliError::from(errors);

        assert_eq!(
            err.format_simple(),
            "Validation error: original_url: Please enter a valid URL"
        );
        colored::control::set_override(false);
        assert!(err.format_colored().contains("original_url: Please enter a valid URL"));
    }

    #[test]
    fn test_client_error_is_classified() {
        let err = CliError::from(ClientError::Api {
            status: 404,
            message: "Link not found".to_string(),
        });
        assert_eq!(err.format_simple(), "Resource Not Found: Link not found");
    }
}
