// UI 子模块
mod analytics;
mod common;
mod files;
mod links;
mod modal;
mod sign_in;
mod toasts;
mod tokens;
pub mod widgets;

pub use common::{draw_footer, draw_search_bar, draw_tabs, draw_title_bar};

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
};

use crate::app::{Application, Focus, Screen, Tab};
use crate::ui::MessageId;

/// 上一次绘制记录的可点击区域
#[derive(Debug, Default)]
pub struct HitAreas {
    pub tabs: Vec<(Rect, Tab)>,
    pub toasts: Vec<(Rect, MessageId)>,
    /// 最上层弹窗的外框
    pub modal: Option<Rect>,
}

impl HitAreas {
    pub fn tab_at(&self, pos: Position) -> Option<Tab> {
        self.tabs
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, tab)| *tab)
    }

    pub fn toast_at(&self, pos: Position) -> Option<MessageId> {
        self.toasts
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, id)| *id)
    }

    pub fn inside_modal(&self, pos: Position) -> bool {
        self.modal.is_some_and(|rect| rect.contains(pos))
    }
}

/// UI 渲染入口
pub fn ui(frame: &mut Frame, app: &Application, hit: &mut HitAreas) {
    *hit = HitAreas::default();
    let area = frame.area();
    let now = Instant::now();

    match app.screen {
        Screen::SignIn => sign_in::draw_sign_in_screen(frame, app, area),
        Screen::Dashboard => draw_dashboard(frame, app, area, hit),
    }

    // 浮层
    hit.modal = modal::draw_modals(frame, app, area, now);
    toasts::draw_toasts(frame, app, area, hit);
}

fn draw_dashboard(frame: &mut Frame, app: &Application, area: Rect, hit: &mut HitAreas) {
    let tab = app.view.active_tab;
    let mut constraints = vec![
        Constraint::Length(3), // 标题
        Constraint::Length(3), // 标签栏
    ];
    if tab.is_list() {
        constraints.push(Constraint::Length(3)); // 搜索与筛选
    }
    constraints.push(Constraint::Min(8)); // 内容
    constraints.push(Constraint::Length(2)); // 底栏

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_title_bar(frame, app, chunks[0]);
    hit.tabs = draw_tabs(frame, app, chunks[1]);

    let content = if tab.is_list() {
        draw_search_bar(frame, app, chunks[2]);
        chunks[3]
    } else {
        chunks[2]
    };
    let footer = chunks[chunks.len() - 1];

    // 创建表单打开时与列表并排显示
    let (list_area, form_area) = if app.focus == Focus::Form && tab.is_list() {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(content);
        (split[0], Some(split[1]))
    } else {
        (content, None)
    };

    match tab {
        Tab::Links => {
            links::draw_links_table(frame, app, list_area);
            if let Some(form_area) = form_area {
                links::draw_link_form(frame, app, form_area);
            }
        }
        Tab::Files => {
            files::draw_files_table(frame, app, list_area);
            if let Some(form_area) = form_area {
                files::draw_upload_form(frame, app, form_area);
            }
        }
        Tab::Tokens => {
            tokens::draw_tokens_table(frame, app, list_area);
            if let Some(form_area) = form_area {
                tokens::draw_token_form(frame, app, form_area);
            }
        }
        Tab::Analytics => analytics::draw_analytics(frame, app, list_area),
    }

    draw_footer(frame, app, footer);
}
