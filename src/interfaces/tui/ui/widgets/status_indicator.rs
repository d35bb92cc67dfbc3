//! 记录状态指示器
//!
//! 活跃 / 即将过期（24 小时内）/ 已过期，文件另带 PRIVATE 标记

use chrono::{DateTime, Utc};
use ratatui::style::{Color, Style};

use crate::interfaces::tui::constants::{colors, status_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Active,
    Expiring,
    Expired,
}

impl RecordStatus {
    pub fn at(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match expires_at {
            Some(exp) if exp < now => Self::Expired,
            Some(exp) if (exp - now).num_hours() < 24 => Self::Expiring,
            _ => Self::Active,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Active => status_text::ACTIVE,
            Self::Expiring => status_text::EXPIRING,
            Self::Expired => status_text::EXPIRED,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Active => colors::SUCCESS,
            Self::Expiring => colors::WARNING,
            Self::Expired => colors::ERROR,
        }
    }
}

pub struct StatusIndicator {
    pub private: bool,
    pub status: RecordStatus,
}

impl StatusIndicator {
    pub fn new(private: bool, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            private,
            status: RecordStatus::at(expires_at, Utc::now()),
        }
    }

    pub fn text(&self) -> String {
        if self.private {
            format!("{} {}", status_text::PRIVATE, self.status.text())
        } else {
            self.status.text().to_string()
        }
    }

    pub fn style(&self) -> Style {
        Style::default().fg(self.status.color())
    }
}
