//! 统计命令

use colored::Colorize;

use crate::client::ApiClient;
use crate::features::analytics::{
    AnalyticsOverview, LOAD_ANALYTICS_ERROR, file_lines, file_rows, link_lines, overview_lines,
};
use crate::interfaces::cli::CliError;

const TOP_ROWS: usize = 10;

/// 默认显示概览，或单个链接/文件的详情
pub async fn show(
    api: &ApiClient,
    link: Option<String>,
    file: Option<String>,
) -> Result<(), CliError> {
    if let Some(id) = link {
        let analytics = api.link_analytics(&id).await?;
        print_section("📊 Link Analytics", &link_lines(&analytics));
        return Ok(());
    }
    if let Some(id) = file {
        let summary = api.file_analytics(&id).await?;
        print_section("📊 File Analytics", &file_lines(&summary));
        return Ok(());
    }

    let (user, files) = tokio::try_join!(api.user_analytics(), api.user_file_analytics())
        .map_err(|e| CliError::CommandError(format!("{}: {}", LOAD_ANALYTICS_ERROR, e)))?;
    print_overview(&AnalyticsOverview { user, files });
    Ok(())
}

fn print_section(title: &str, lines: &[String]) {
    println!("{}", title.bold().green());
    println!();
    for line in lines {
        println!("  {}", line);
    }
}

fn print_overview(overview: &AnalyticsOverview) {
    println!("{}", "📊 Analytics Overview".bold().green());
    println!();
    for (label, value) in overview_lines(overview) {
        println!("  {:<20} {}", label.dimmed(), value.cyan().bold());
    }

    if !overview.user.top_links.is_empty() {
        println!();
        println!("{}", "Top links:".bold());
        for link in overview.user.top_links.iter().take(TOP_ROWS) {
            let label = if link.title.is_empty() {
                &link.original_url
            } else {
                &link.title
            };
            println!(
                "  {:<12} {:>8}  {}",
                link.short_code.cyan(),
                link.total_clicks,
                label
            );
        }
    }

    let rows = file_rows(&overview.files);
    if !rows.is_empty() {
        println!();
        println!("{}", "Files:".bold());
        for [name, size, total, recent] in rows.iter().take(TOP_ROWS) {
            println!(
                "  {:<30} {:>10} {:>8} {}",
                name,
                size.dimmed(),
                total,
                format!("({} recent)", recent).dimmed()
            );
        }
    }
}
