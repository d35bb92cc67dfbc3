//! 链接命令

use std::path::Path;

use colored::Colorize;
use tracing::info;

use super::helpers::{confirm, info as print_info, parse_expires, print_json, status_label, success};
use crate::cli::{LinkCommands, ListArgs};
use crate::client::{ApiClient, DEFAULT_PAGE};
use crate::config::AppConfig;
use crate::interfaces::cli::CliError;
use crate::models::{CreateLinkRequest, Link, UpdateLinkRequest};
use crate::utils::export::{ExportFormat, export_links};
use crate::utils::formatting::{format_date, format_short_code, short_url, truncate_url};
use crate::utils::helpers::{filter_items, parse_short_codes};
use crate::utils::time_parser::TimeParser;
use crate::utils::validation::{
    ValidationErrors, validate_expiration_date, validate_short_codes, validate_url,
};

const TARGET_WIDTH: usize = 60;

pub async fn run(api: &ApiClient, config: &AppConfig, action: LinkCommands) -> Result<(), CliError> {
    match action {
        LinkCommands::List(args) => list_links(api, config, args).await,
        LinkCommands::Create {
            url,
            title,
            description,
            codes,
            expires,
            no_analytics,
        } => {
            let request = create_request(
                &url,
                title,
                description,
                codes.as_deref(),
                expires.as_deref(),
                !no_analytics,
            )?;
            create_link(api, config, request).await
        }
        LinkCommands::Update {
            id,
            url,
            title,
            description,
            expires,
        } => update_link(api, &id, url, title, description, expires.as_deref()).await,
        LinkCommands::Delete { id, yes } => delete_link(api, &id, yes).await,
        LinkCommands::Export { path, format } => {
            export(api, config, &path, format).await
        }
    }
}

async fn fetch_links(api: &ApiClient, config: &AppConfig) -> Result<Vec<Link>, CliError> {
    Ok(api.list_links(DEFAULT_PAGE, config.ui.page_size).await?)
}

async fn list_links(api: &ApiClient, config: &AppConfig, args: ListArgs) -> Result<(), CliError> {
    let links = fetch_links(api, config).await?;
    let visible = filter_items(&links, args.search.as_deref().unwrap_or(""), args.filter);

    if args.json {
        return print_json(&visible);
    }

    if visible.is_empty() {
        print_info("No links found");
        return Ok(());
    }

    println!("{}", "Short links:".bold().green());
    println!();
    for link in &visible {
        let code = format_short_code(&link.short_codes);
        let mut parts = vec![format!(
            "{} -> {}",
            short_url(api.base_url(), &config.api.link_prefix, code).cyan(),
            truncate_url(&link.original_url, TARGET_WIDTH).blue().underline()
        )];

        if link.short_codes.len() > 1 {
            parts.push(format!("(+{} codes)", link.short_codes.len() - 1).dimmed().to_string());
        }
        if let Some(title) = link.title.as_deref().filter(|t| !t.is_empty()) {
            parts.push(format!("\"{}\"", title));
        }
        parts.push(format!("(clicks: {})", link.clicks).dimmed().cyan().to_string());
        parts.push(format_date(link.created_at).dimmed().to_string());
        parts.push(status_label(link.expires_at).to_string());

        println!("  {} {}", link.id.dimmed(), parts.join(" "));
    }
    println!();
    println!(
        "{} Showing {} of {} links",
        "ℹ".bold().blue(),
        visible.len().to_string().green(),
        links.len()
    );
    Ok(())
}

/// 构建创建请求，任一字段校验失败都不发送
pub fn create_request(
    url: &str,
    title: Option<String>,
    description: Option<String>,
    codes: Option<&str>,
    expires: Option<&str>,
    analytics: bool,
) -> Result<CreateLinkRequest, ValidationErrors> {
    let codes = codes.unwrap_or("");
    let expires = expires.unwrap_or("").trim();

    let mut errors = ValidationErrors::new();
    errors
        .check("original_url", validate_url(url))
        .check("short_codes", validate_short_codes(codes))
        .check("expires_at", validate_expiration_date(expires));
    errors.into_result()?;

    Ok(CreateLinkRequest {
        original_url: url.trim().to_string(),
        short_codes: parse_short_codes(codes),
        title: title.filter(|t| !t.trim().is_empty()),
        description: description.filter(|d| !d.trim().is_empty()),
        analytics,
        expires_at: if expires.is_empty() {
            None
        } else {
            TimeParser::parse_expire_time(expires).ok()
        },
    })
}

async fn create_link(
    api: &ApiClient,
    config: &AppConfig,
    request: CreateLinkRequest,
) -> Result<(), CliError> {
    let link = api.create_link(&request).await?;
    info!("created link {} -> {}", link.id, link.original_url);

    success("Link created successfully!");
    for code in &link.short_codes {
        println!(
            "  {}",
            short_url(api.base_url(), &config.api.link_prefix, &code.short_code).cyan()
        );
    }
    println!("  {} {}", "ID:".dimmed(), link.id);
    Ok(())
}

async fn update_link(
    api: &ApiClient,
    id: &str,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    expires: Option<&str>,
) -> Result<(), CliError> {
    if let Some(url) = &url {
        let mut errors = ValidationErrors::new();
        errors.check("original_url", validate_url(url));
        errors.into_result()?;
    }
    let expires_at = parse_expires("expires_at", expires)?;

    let current = api.get_link(id).await?;
    let mut request = UpdateLinkRequest::from(&current);
    if let Some(url) = url {
        request.original_url = Some(url.trim().to_string());
    }
    if let Some(title) = title {
        request.title = Some(title).filter(|t| !t.trim().is_empty());
    }
    if let Some(description) = description {
        request.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    if let Some(expires_at) = expires_at {
        request.expires_at = expires_at;
    }

    api.update_link(id, &request).await?;
    info!("updated link {}", id);
    success(&format!("Link updated: {}", id.cyan()));
    Ok(())
}

async fn delete_link(api: &ApiClient, id: &str, yes: bool) -> Result<(), CliError> {
    if !confirm(
        "Are you sure you want to delete this link? This action cannot be undone.",
        yes,
    )? {
        print_info("Cancelled");
        return Ok(());
    }

    api.delete_link(id).await?;
    info!("deleted link {}", id);
    success(&format!("Deleted link: {}", id.cyan()));
    Ok(())
}

async fn export(
    api: &ApiClient,
    config: &AppConfig,
    path: &Path,
    format: ExportFormat,
) -> Result<(), CliError> {
    let links = fetch_links(api, config).await?;
    let refs: Vec<&Link> = links.iter().collect();
    export_links(&refs, path, format, api.base_url(), &config.api.link_prefix)?;

    info!("exported {} links to {}", refs.len(), path.display());
    success(&format!(
        "Exported {} links to {} ({})",
        refs.len().to_string().green(),
        path.display().to_string().blue(),
        format
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_bad_input() {
        let errors = create_request("not a url", None, None, Some("ok,admin"), Some("yesterday"), true)
            .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("original_url"), Some("Please enter a valid URL"));
        assert!(errors.get("short_codes").is_some());
    }

    #[test]
    fn test_create_request_trims_and_splits() {
        let request = create_request(
            " https://example.com/a ",
            Some("Report".to_string()),
            Some("  ".to_string()),
            Some("q3, q3-report ,"),
            None,
            false,
        )
        .unwrap();

        assert_eq!(request.original_url, "https://example.com/a");
        assert_eq!(request.short_codes, vec!["q3", "q3-report"]);
        assert_eq!(request.title.as_deref(), Some("Report"));
        assert_eq!(request.description, None);
        assert!(!request.analytics);
        assert_eq!(request.expires_at, None);
    }

    #[test]
    fn test_create_request_relative_expiry() {
        let request = create_request("https://example.com", None, None, None, Some("7d"), true).unwrap();
        assert!(request.expires_at.is_some());
    }
}
