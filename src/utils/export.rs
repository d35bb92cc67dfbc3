//! 链接导出
//!
//! 供 CLI `links export` 使用，支持 CSV、JSON 与 HTML 三种格式。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::errors::{LinkerError, Result};
use crate::models::Link;

use super::formatting::{escape_html, format_short_code, short_url};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Html,
}

/// CSV 行数据结构（一条链接一行，短码以空格分隔）
#[derive(Debug, Clone, Serialize)]
pub struct LinkExportRow {
    pub id: String,
    pub short_code: String,
    pub short_codes: String,
    pub original_url: String,
    pub title: String,
    pub description: String,
    pub clicks: i64,
    pub analytics: bool,
    pub created_at: String,
    pub expires_at: Option<String>,
}

impl From<&Link> for LinkExportRow {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            short_code: format_short_code(&link.short_codes).to_string(),
            short_codes: link
                .short_codes
                .iter()
                .map(|c| c.short_code.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            original_url: link.original_url.clone(),
            title: link.title.clone().unwrap_or_default(),
            description: link.description.clone().unwrap_or_default(),
            clicks: link.clicks,
            analytics: link.analytics,
            created_at: link.created_at.to_rfc3339(),
            expires_at: link.expires_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// 导出链接到文件
pub fn export_links<P: AsRef<Path>>(
    links: &[&Link],
    path: P,
    format: ExportFormat,
    base_url: &str,
    link_prefix: &str,
) -> Result<()> {
    let file = File::create(path.as_ref())
        .map_err(|e| LinkerError::file_operation(format!("Failed to create file: {}", e)))?;
    let writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => write_csv(links, writer),
        ExportFormat::Json => write_json(links, writer),
        ExportFormat::Html => write_html(links, writer, base_url, link_prefix),
    }
}

pub fn write_csv<W: Write>(links: &[&Link], writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    for link in links {
        csv_writer.serialize(LinkExportRow::from(*link)).map_err(|e| {
            LinkerError::serialization(format!("Failed to write CSV row: {}", e))
        })?;
    }

    csv_writer
        .flush()
        .map_err(|e| LinkerError::file_operation(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}

pub fn write_json<W: Write>(links: &[&Link], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, links)?;
    writer.flush()?;
    Ok(())
}

/// 所有插值都经过 `escape_html`
pub fn write_html<W: Write>(
    links: &[&Link],
    mut writer: W,
    base_url: &str,
    link_prefix: &str,
) -> Result<()> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html><head><meta charset=\"utf-8\"><title>Links</title></head><body>")?;
    writeln!(writer, "<table>")?;
    writeln!(
        writer,
        "<tr><th>Short URL</th><th>Title</th><th>Original URL</th><th>Clicks</th><th>Created</th></tr>"
    )?;

    for link in links {
        let code = format_short_code(&link.short_codes);
        let url = short_url(base_url, link_prefix, code);
        writeln!(
            writer,
            "<tr><td><a href=\"{url}\">{url}</a></td><td>{title}</td><td><a href=\"{orig}\">{orig}</a></td><td>{clicks}</td><td>{created}</td></tr>",
            url = escape_html(&url),
            title = escape_html(link.title.as_deref().unwrap_or("")),
            orig = escape_html(&link.original_url),
            clicks = link.clicks,
            created = link.created_at.format("%Y-%m-%d"),
        )?;
    }

    writeln!(writer, "</table>")?;
    writeln!(writer, "</body></html>")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShortCode;
    use chrono::{TimeZone, Utc};

    fn sample_link() -> Link {
        Link {
            id: "l1".into(),
            original_url: "https://example.com/?a=1&b=2".into(),
            title: Some("<script>alert('x')</script>".into()),
            description: None,
            analytics: true,
            expires_at: None,
            clicks: 4,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            short_codes: vec![ShortCode::new("docs", true), ShortCode::new("d", false)],
        }
    }

    #[test]
    fn test_write_csv() {
        let link = sample_link();
        let mut out = Vec::new();
        write_csv(&[&link], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,short_code,short_codes"));
        assert!(lines.next().unwrap().starts_with("l1,docs,docs d,"));
    }

    #[test]
    fn test_write_html_escapes_values() {
        let link = sample_link();
        let mut out = Vec::new();
        write_html(&[&link], &mut out, "http://localhost:8080", "s").unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
        assert!(html.contains("https://example.com/?a=1&amp;b=2"));
        assert!(html.contains("http://localhost:8080/s/docs"));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
