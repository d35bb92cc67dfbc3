//! CLI 命令的公共辅助函数

use std::io::{self, BufRead, IsTerminal, Write};

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::interfaces::cli::CliError;
use crate::utils::time_parser::{TimeParser, is_expired};
use crate::utils::validation::ValidationErrors;

/// 获取密码：命令行参数优先，其次 TTY 交互输入，最后从 stdin 读取一行
pub fn get_password(password: Option<String>) -> Result<String, CliError> {
    if let Some(pwd) = password {
        return Ok(pwd);
    }

    if io::stdin().is_terminal() {
        print!("Password: ");
        io::stdout().flush()?;
        return rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)));
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// 删除前确认；`--yes` 跳过
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, CliError> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::CommandError(
            "Refusing to delete without confirmation. Pass --yes to skip the prompt".to_string(),
        ));
    }

    print!("{} {} ", prompt.yellow(), "[y/N]".dimmed());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::CommandError(format!("Failed to encode JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// 解析可选的过期时间；空字符串表示清除
pub fn parse_expires(
    field: &'static str,
    input: Option<&str>,
) -> Result<Option<Option<DateTime<Utc>>>, CliError> {
    let Some(input) = input else {
        return Ok(None);
    };
    if input.trim().is_empty() {
        return Ok(Some(None));
    }
    match TimeParser::parse_expire_time(input) {
        Ok(dt) => Ok(Some(Some(dt))),
        Err(message) => {
            let mut errors = ValidationErrors::new();
            errors.check(field, Err(message));
            Err(errors.into())
        }
    }
}

pub fn status_label(expires_at: Option<DateTime<Utc>>) -> ColoredString {
    if is_expired(expires_at) {
        "expired".red()
    } else {
        "active".green()
    }
}

pub fn info(msg: &str) {
    println!("{} {}", "ℹ".bold().blue(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".bold().green(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_parse_expires() {
        assert_eq!(parse_expires("expires_at", None).unwrap(), None);
        assert_eq!(parse_expires("expires_at", Some("  ")).unwrap(), Some(None));
        assert!(matches!(
            parse_expires("expires_at", Some("2030-01-01T00:00:00Z")),
            Ok(Some(Some(_)))
        ));
        assert!(matches!(
            parse_expires("expires_at", Some("whenever")),
            Err(CliError::ValidationError(_))
        ));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }
}
