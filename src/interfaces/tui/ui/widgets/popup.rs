//! 居中弹窗容器

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Clear},
};

use crate::interfaces::tui::constants::PopupSize;

pub struct Popup<'a> {
    title: &'a str,
    color: Color,
    size: PopupSize,
    /// 关闭动画期间变暗
    dimmed: bool,
}

impl<'a> Popup<'a> {
    pub fn new(title: &'a str, size: PopupSize) -> Self {
        Self {
            title,
            color: Color::Cyan,
            size,
            dimmed: false,
        }
    }

    /// 标题与边框颜色
    pub fn theme_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    /// 渲染弹窗，返回 (外框区域, 内部区域)
    pub fn render(&self, frame: &mut Frame, area: Rect) -> (Rect, Rect) {
        let popup_area = centered_rect(self.size.width, self.size.height, area);
        frame.render_widget(Clear, popup_area);

        let color = if self.dimmed { Color::DarkGray } else { self.color };
        let block = Block::default()
            .title(self.title)
            .title_style(Style::default().fg(color).bold())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(color));
        frame.render_widget(block, popup_area);

        (popup_area, popup_area.inner(Margin::new(2, 1)))
    }
}

/// 按百分比在给定区域中居中
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
