//! 文件命令

use std::path::Path;

use colored::Colorize;
use tracing::info;

use super::helpers::{confirm, info as print_info, parse_expires, print_json, status_label, success};
use crate::cli::{FileCommands, ListArgs};
use crate::client::{ApiClient, DEFAULT_PAGE, guess_content_type};
use crate::config::AppConfig;
use crate::interfaces::cli::CliError;
use crate::models::{FileUpload, UpdateFileRequest};
use crate::utils::formatting::{file_icon, format_date, format_file_size, format_short_code, short_url};
use crate::utils::helpers::{filter_items, parse_short_codes};
use crate::utils::validation::{ValidationErrors, validate_file_size, validate_short_codes};

/// 命令行收集的上传选项
#[derive(Debug, Default)]
pub struct UploadOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub codes: Option<String>,
    pub private: bool,
    pub password: Option<String>,
    pub analytics: bool,
}

pub async fn run(api: &ApiClient, config: &AppConfig, action: FileCommands) -> Result<(), CliError> {
    match action {
        FileCommands::List(args) => list_files(api, config, args).await,
        FileCommands::Upload {
            path,
            title,
            description,
            codes,
            private,
            password,
            no_analytics,
        } => {
            let options = UploadOptions {
                title,
                description,
                codes,
                private,
                password,
                analytics: !no_analytics,
            };
            upload_file(api, config, &path, options).await
        }
        FileCommands::Update {
            id,
            title,
            description,
            expires,
            public,
            private,
        } => {
            let visibility = match (public, private) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            update_file(api, &id, title, description, expires.as_deref(), visibility).await
        }
        FileCommands::Delete { id, yes } => delete_file(api, &id, yes).await,
    }
}

async fn list_files(api: &ApiClient, config: &AppConfig, args: ListArgs) -> Result<(), CliError> {
    let files = api.list_files(DEFAULT_PAGE, config.ui.page_size).await?;
    let visible = filter_items(&files, args.search.as_deref().unwrap_or(""), args.filter);

    if args.json {
        return print_json(&visible);
    }

    if visible.is_empty() {
        print_info("No files found");
        return Ok(());
    }

    println!("{}", "Files:".bold().green());
    println!();
    for file in &visible {
        let code = format_short_code(&file.short_codes);
        let mut parts = vec![
            format!("{} {}", file_icon(&file.mime_type), file.display_name().bold()),
            short_url(api.base_url(), &config.api.file_prefix, code).cyan().to_string(),
            format_file_size(file.file_size.max(0) as u64).dimmed().to_string(),
            format!("(downloads: {})", file.downloads).dimmed().cyan().to_string(),
            format_date(file.created_at).dimmed().to_string(),
        ];
        if !file.is_public {
            parts.push("🔒".to_string());
        }
        parts.push(status_label(file.expires_at).to_string());

        println!("  {} {}", file.id.dimmed(), parts.join(" "));
    }
    println!();
    println!(
        "{} Showing {} of {} files",
        "ℹ".bold().blue(),
        visible.len().to_string().green(),
        files.len()
    );
    Ok(())
}

/// 按本地文件和大小上限校验上传
pub async fn validate_upload(
    path: &Path,
    codes: &str,
    max_upload_mb: u64,
) -> Result<(), ValidationErrors> {
    let size = tokio::fs::metadata(path)
        .await
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len());

    let mut errors = ValidationErrors::new();
    errors
        .check("file", validate_file_size(size, max_upload_mb))
        .check("short_codes", validate_short_codes(codes));
    errors.into_result()
}

async fn upload_file(
    api: &ApiClient,
    config: &AppConfig,
    path: &Path,
    options: UploadOptions,
) -> Result<(), CliError> {
    let codes = options.codes.as_deref().unwrap_or("");
    validate_upload(path, codes, config.ui.max_upload_mb).await?;

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let upload = FileUpload {
        file_name,
        content_type: guess_content_type(path).to_string(),
        bytes,
        title: options.title.filter(|t| !t.trim().is_empty()),
        description: options.description.filter(|d| !d.trim().is_empty()),
        short_codes: parse_short_codes(codes),
        analytics: options.analytics,
        is_public: !options.private,
        password: options.password.filter(|p| !p.is_empty()),
    };

    println!("{} {}", "Uploading file...".yellow(), upload.file_name.blue());
    let file = api.upload_file(&upload).await?;
    info!("uploaded {} as {}", upload.file_name, file.id);

    success("File uploaded successfully!");
    for code in &file.short_codes {
        println!(
            "  {}",
            short_url(api.base_url(), &config.api.file_prefix, &code.short_code).cyan()
        );
    }
    println!("  {} {}", "ID:".dimmed(), file.id);
    Ok(())
}

async fn update_file(
    api: &ApiClient,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    expires: Option<&str>,
    visibility: Option<bool>,
) -> Result<(), CliError> {
    let expires_at = parse_expires("expires_at", expires)?;

    let current = api.get_file(id).await?;
    let mut request = UpdateFileRequest::from(&current);
    if let Some(title) = title {
        request.title = Some(title).filter(|t| !t.trim().is_empty());
    }
    if let Some(description) = description {
        request.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    if let Some(expires_at) = expires_at {
        request.expires_at = expires_at;
    }
    if let Some(is_public) = visibility {
        request.is_public = is_public;
    }

    api.update_file(id, &request).await?;
    info!("updated file {}", id);
    success(&format!("File updated: {}", id.cyan()));
    Ok(())
}

async fn delete_file(api: &ApiClient, id: &str, yes: bool) -> Result<(), CliError> {
    if !confirm(
        "Are you sure you want to delete this file? This action cannot be undone.",
        yes,
    )? {
        print_info("Cancelled");
        return Ok(());
    }

    api.delete_file(id).await?;
    info!("deleted file {}", id);
    success(&format!("Deleted file: {}", id.cyan()));
    Ok(())
}
