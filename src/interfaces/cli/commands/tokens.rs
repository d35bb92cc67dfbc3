//! API 令牌命令

use colored::Colorize;
use tracing::info;

use super::helpers::{confirm, info as print_info, print_json, status_label, success};
use crate::cli::TokenCommands;
use crate::client::ApiClient;
use crate::interfaces::cli::CliError;
use crate::models::CreateTokenRequest;
use crate::ui::modal::token_usage_example;
use crate::utils::formatting::{format_date, format_date_time};
use crate::utils::time_parser::TimeParser;
use crate::utils::validation::{ValidationErrors, validate_expiration_date, validate_token_name};

pub async fn run(api: &ApiClient, action: TokenCommands) -> Result<(), CliError> {
    match action {
        TokenCommands::List { json } => list_tokens(api, json).await,
        TokenCommands::Create { name, expires } => {
            let request = create_request(&name, expires.as_deref())?;
            create_token(api, request).await
        }
        TokenCommands::Delete { id, yes } => delete_token(api, &id, yes).await,
    }
}

async fn list_tokens(api: &ApiClient, json: bool) -> Result<(), CliError> {
    let tokens = api.list_tokens().await?;
    if json {
        return print_json(&tokens);
    }

    if tokens.is_empty() {
        print_info("No API tokens yet");
        return Ok(());
    }

    println!("{}", "API tokens:".bold().green());
    println!();
    for token in &tokens {
        let name = token.name.as_deref().unwrap_or("Unnamed");
        let last_used = token
            .last_used_at
            .map(format_date)
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {} {} {} {} {} {}",
            token.id.dimmed(),
            name.cyan().bold(),
            format!("created {}", format_date(token.created_at)).dimmed(),
            format!("last used {}", last_used).dimmed(),
            format!("expires {}", format_date_time(token.expires_at)).dimmed(),
            status_label(token.expires_at)
        );
    }
    println!();
    println!(
        "{} Total {} tokens",
        "ℹ".bold().blue(),
        tokens.len().to_string().green()
    );
    Ok(())
}

pub fn create_request(name: &str, expires: Option<&str>) -> Result<CreateTokenRequest, ValidationErrors> {
    let name = name.trim();
    let expires = expires.unwrap_or("").trim();

    let mut errors = ValidationErrors::new();
    errors
        .check("name", validate_token_name(name))
        .check("expires_at", validate_expiration_date(expires));
    errors.into_result()?;

    Ok(CreateTokenRequest {
        name: Some(name.to_string()),
        expires_at: if expires.is_empty() {
            None
        } else {
            TimeParser::parse_expire_time(expires).ok()
        },
    })
}

async fn create_token(api: &ApiClient, request: CreateTokenRequest) -> Result<(), CliError> {
    let created = api.create_token(&request).await?;
    info!("created API token {}", created.api_token.id);

    success("API token created");
    println!(
        "  {}",
        "Copy it now. It will not be shown again.".yellow().bold()
    );
    println!();
    println!("  {}", created.token.green().bold());
    println!();
    println!("  {}", "Usage:".dimmed());
    println!("  {}", token_usage_example(&created.token, api.base_url()).dimmed());
    Ok(())
}

async fn delete_token(api: &ApiClient, id: &str, yes: bool) -> Result<(), CliError> {
    if !confirm(
        "Are you sure you want to delete this token? Applications using it will stop working.",
        yes,
    )? {
        print_info("Cancelled");
        return Ok(());
    }

    api.delete_token(id).await?;
    info!("deleted API token {}", id);
    success(&format!("Deleted token: {}", id.cyan()));
    Ok(())
}
