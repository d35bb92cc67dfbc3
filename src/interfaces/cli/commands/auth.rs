//! 会话命令：login、register、logout、whoami

use colored::Colorize;
use tracing::info;

use super::helpers::{get_password, info as print_info, success};
use crate::client::ApiClient;
use crate::features::AuthManager;
use crate::interfaces::cli::CliError;
use crate::models::AuthResponse;

pub async fn login(
    api: &ApiClient,
    username: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let username = username.trim();
    let password = get_password(password)?;
    AuthManager::validate_login(username, &password)?;

    let response = api.login(username, &password).await?;
    let name = store_session(api, response)?;
    info!("Signed in as {}", name);
    success(&format!("Welcome back, {}!", name.cyan()));
    Ok(())
}

pub async fn register(
    api: &ApiClient,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let (username, email) = (username.trim(), email.trim());
    let password = get_password(password)?;
    AuthManager::validate_register(username, email, &password)?;

    let response = api.register(username, email, &password).await?;
    let name = store_session(api, response)?;
    info!("Registered {}", name);
    success(&format!("Welcome, {}!", name.cyan()));
    Ok(())
}

fn store_session(api: &ApiClient, response: AuthResponse) -> Result<String, CliError> {
    let name = response.user.username.clone();
    api.set_token(Some(response.token))?;
    api.save_user(Some(response.user))?;
    Ok(name)
}

pub fn logout(api: &ApiClient) -> Result<(), CliError> {
    if !api.has_token() {
        print_info("Not signed in");
        return Ok(());
    }
    api.set_token(None)?;
    api.save_user(None)?;
    success("Logged out successfully");
    Ok(())
}

/// 向服务器校验已保存的 token，被拒绝时清除
pub async fn whoami(api: &ApiClient) -> Result<(), CliError> {
    match api.profile().await {
        Ok(profile) => {
            println!("{} {}", "User:".bold(), profile.username.cyan());
            println!("{} {}", "ID:".bold(), profile.id.dimmed());
            if let Some(user) = api.stored_user().filter(|u| !u.email.is_empty()) {
                println!("{} {}", "Email:".bold(), user.email);
            }
            println!("{} {}", "Server:".bold(), api.base_url().blue().underline());
            Ok(())
        }
        Err(e) => {
            if e.status() == Some(401) {
                api.set_token(None)?;
                api.save_user(None)?;
            }
            Err(e.into())
        }
    }
}
