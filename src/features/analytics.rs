//! 访问统计
//!
//! 概览需要链接和文件两份统计，任一请求失败则不显示。

use std::sync::Arc;

use tracing::warn;

use super::RegionState;
use crate::client::{ApiClient, ClientError};
use crate::models::{FileAnalyticsSummary, LinkAnalytics, UserAnalytics, UserFileAnalytics};
use crate::ui::{ModalId, Ui};
use crate::utils::formatting::{format_date_time, format_file_size};

pub const LOAD_ANALYTICS_ERROR: &str = "Failed to load analytics";

/// 详情弹窗最多列出的行数
const DETAIL_ROWS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsOverview {
    pub user: UserAnalytics,
    pub files: UserFileAnalytics,
}

impl AnalyticsOverview {
    pub fn total_downloads(&self) -> i64 {
        self.files.files.iter().map(|f| f.total_downloads).sum()
    }
}

pub struct AnalyticsManager {
    api: Arc<ApiClient>,
    overview: Option<AnalyticsOverview>,
    state: RegionState,
}

impl AnalyticsManager {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            overview: None,
            state: RegionState::Idle,
        }
    }

    pub fn overview(&self) -> Option<&AnalyticsOverview> {
        self.overview.as_ref()
    }

    pub fn state(&self) -> &RegionState {
        &self.state
    }

    pub fn begin_load(&mut self) {
        self.state = RegionState::Loading;
    }

    pub async fn fetch(&self) -> Result<AnalyticsOverview, ClientError> {
        let (user, files) =
            tokio::try_join!(self.api.user_analytics(), self.api.user_file_analytics())?;
        Ok(AnalyticsOverview { user, files })
    }

    pub fn apply(&mut self, result: Result<AnalyticsOverview, ClientError>, ui: &mut Ui) -> bool {
        match result {
            Ok(overview) => {
                self.overview = Some(overview);
                self.state = RegionState::Loaded;
                true
            }
            Err(e) => {
                warn!("{}: {}", LOAD_ANALYTICS_ERROR, e);
                self.state = RegionState::Error(LOAD_ANALYTICS_ERROR.to_string());
                ui.messages.error(LOAD_ANALYTICS_ERROR);
                false
            }
        }
    }

    pub async fn load_analytics(&mut self, ui: &mut Ui) -> bool {
        self.begin_load();
        let result = self.fetch().await;
        self.apply(result, ui)
    }

    /// 打开弹窗显示单个链接的点击记录
    pub async fn show_link_details(&self, id: &str, ui: &mut Ui) -> Option<ModalId> {
        match self.api.link_analytics(id).await {
            Ok(analytics) => Some(ui.modals.show_info("📊 Link Analytics", link_lines(&analytics))),
            Err(e) => {
                ui.messages.show_api_error(&e);
                None
            }
        }
    }

    pub async fn show_file_details(&self, id: &str, ui: &mut Ui) -> Option<ModalId> {
        match self.api.file_analytics(id).await {
            Ok(summary) => Some(ui.modals.show_info("📊 File Analytics", file_lines(&summary))),
            Err(e) => {
                ui.messages.show_api_error(&e);
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.overview = None;
        self.state = RegionState::Idle;
    }
}

/// 概览面板的汇总行
pub fn overview_lines(overview: &AnalyticsOverview) -> Vec<(String, String)> {
    let user = &overview.user;
    vec![
        ("Total Links".into(), user.total_links.to_string()),
        ("Total Clicks".into(), user.total_clicks.to_string()),
        ("Clicks Today".into(), user.clicks_today.to_string()),
        ("Clicks This Week".into(), user.clicks_this_week.to_string()),
        ("Clicks This Month".into(), user.clicks_this_month.to_string()),
        ("Total Files".into(), overview.files.total.to_string()),
        ("Total Downloads".into(), overview.total_downloads().to_string()),
    ]
}

pub fn link_lines(analytics: &LinkAnalytics) -> Vec<String> {
    let mut lines = vec![format!("Total clicks: {}", analytics.total), String::new()];
    if analytics.clicks.is_empty() {
        lines.push("No clicks recorded yet".to_string());
    }
    for click in analytics.clicks.iter().take(DETAIL_ROWS) {
        lines.push(format!(
            "{}  {}  {}  {}",
            format_date_time(Some(click.created_at)),
            click.country.as_deref().unwrap_or("-"),
            click.referer.as_deref().unwrap_or("direct"),
            click.ip_address,
        ));
    }
    lines
}

pub fn file_lines(summary: &FileAnalyticsSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Total downloads: {}", summary.total_downloads),
        format!("Today: {}", summary.downloads_today),
        format!("This week: {}", summary.downloads_this_week),
        format!("This month: {}", summary.downloads_this_month),
        format!("Unique visitors: {}", summary.unique_visitors),
    ];
    if !summary.top_referrers.is_empty() {
        lines.push(String::new());
        lines.push("Top referrers:".to_string());
        lines.extend(
            summary
                .top_referrers
                .iter()
                .take(DETAIL_ROWS)
                .map(|r| format!("  {} ({})", r.referer, r.count)),
        );
    }
    lines
}

/// 概览表格中每个文件一行
pub fn file_rows(files: &UserFileAnalytics) -> Vec<[String; 4]> {
    files
        .files
        .iter()
        .map(|f| {
            let name = if f.original_name.is_empty() {
                f.filename.clone()
            } else {
                f.original_name.clone()
            };
            [
                name,
                format_file_size(f.file_size.max(0) as u64),
                f.total_downloads.to_string(),
                f.recent_downloads.to_string(),
            ]
        })
        .collect()
}
