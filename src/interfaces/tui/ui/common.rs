use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use strum::IntoEnumIterator;

use super::widgets::InputField;
use crate::app::{Application, Focus, Tab};
use crate::features::RegionState;
use crate::interfaces::tui::constants::colors;

/// 绘制标题栏：版本、用户和记录数
pub fn draw_title_bar(frame: &mut Frame, app: &Application, area: Rect) {
    let mut spans = vec![
        Span::styled("Linker", Style::default().fg(colors::PRIMARY).bold()),
        Span::styled(
            format!(" v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(colors::MUTED),
        ),
    ];

    if let Some(user) = app.auth.current_user() {
        spans.push(Span::styled("| ", Style::default().fg(colors::MUTED)));
        spans.push(Span::styled(
            format!("{} ", user.username),
            Style::default().fg(Color::White),
        ));
    }

    let count = match app.view.active_tab {
        Tab::Links => Some(app.links.count_text()),
        Tab::Files => Some(app.files.count_text()),
        Tab::Tokens => Some(app.tokens.count_text()),
        Tab::Analytics => None,
    };
    if let Some(count) = count {
        spans.push(Span::styled("| ", Style::default().fg(colors::MUTED)));
        spans.push(Span::styled(
            format!("{} ", count),
            Style::default().fg(colors::WARNING),
        ));
    }

    let title = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(colors::PRIMARY)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(title, area);
}

/// 绘制标签栏，返回每个标签的可点击区域
pub fn draw_tabs(frame: &mut Frame, app: &Application, area: Rect) -> Vec<(Rect, Tab)> {
    let tabs: Vec<Tab> = Tab::iter().collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, tabs.len() as u32); tabs.len()])
        .split(area);

    tabs.into_iter()
        .zip(cells.iter())
        .map(|(tab, cell)| {
            let active = tab == app.view.active_tab;
            let style = if active {
                Style::default()
                    .fg(colors::HIGHLIGHT_FG)
                    .bg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let label = Paragraph::new(format!("{} {} [{}]", tab.icon(), tab, tab.number()))
                .style(style)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(if active {
                            colors::PRIMARY
                        } else {
                            colors::MUTED
                        })),
                );
            frame.render_widget(label, *cell);
            (*cell, tab)
        })
        .collect()
}

/// 搜索框与当前筛选条件
pub fn draw_search_bar(frame: &mut Frame, app: &Application, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    InputField::new("🔍 Search (/)", &app.view.search)
        .active(app.focus == Focus::Search)
        .render(frame, chunks[0]);

    let filter = Paragraph::new(Line::from(vec![
        Span::styled("Filter: ", Style::default().fg(colors::MUTED)),
        Span::styled(
            app.view.filter.label(),
            Style::default().fg(colors::WARNING).bold(),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("[f]"),
    );
    frame.render_widget(filter, chunks[1]);
}

/// 绘制底部快捷键提示
pub fn draw_footer(frame: &mut Frame, app: &Application, area: Rect) {
    let shortcuts = match (app.focus, app.view.active_tab) {
        (Focus::Search, _) => vec![
            ("Enter", "Apply", colors::SUCCESS),
            ("Esc", "Clear", colors::ERROR),
        ],
        (Focus::Form, _) => vec![
            ("Tab", "Next Field", colors::PRIMARY),
            ("Space", "Toggle", colors::PRIMARY),
            ("Enter", "Submit", colors::SUCCESS),
            ("Esc", "Close", colors::ERROR),
        ],
        (Focus::List, Tab::Analytics) => vec![
            ("Ctrl+1-4", "Tabs", colors::PRIMARY),
            ("r", "Reload", colors::PRIMARY),
            ("Ctrl+L", "Logout", Color::Magenta),
            ("q", "Quit", Color::Magenta),
        ],
        (Focus::List, tab) => {
            let mut keys = vec![
                ("j/k", "Navigate", colors::PRIMARY),
                ("/", "Search", colors::PRIMARY),
                ("f", "Filter", colors::PRIMARY),
                ("a", "New", colors::SUCCESS),
            ];
            if tab != Tab::Tokens {
                keys.push(("e", "Edit", colors::WARNING));
                keys.push(("c", "Copy", colors::INFO));
                keys.push(("i", "Stats", colors::INFO));
            }
            keys.push(("d", "Delete", colors::ERROR));
            keys.push(("R", "Refresh All", colors::PRIMARY));
            keys.push(("q", "Quit", Color::Magenta));
            keys
        }
    };

    frame.render_widget(shortcut_line(&shortcuts), area);
}

/// 底栏和对话框使用的 `[key] desc | [key] desc` 行
pub fn shortcut_line(shortcuts: &[(&str, &str, Color)]) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (i, (key, desc, color)) in shortcuts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(colors::MUTED)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(*color).bold(),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(Color::White),
        ));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

/// 列表区域的加载中/错误/空白占位，需要绘制行时返回 `None`
pub fn region_placeholder(
    state: &RegionState,
    visible: usize,
    title: &str,
    empty_hint: &str,
) -> Option<Paragraph<'static>> {
    let (text, color) = match state {
        RegionState::Idle | RegionState::Loading if visible == 0 => {
            ("Loading...".to_string(), colors::PRIMARY)
        }
        RegionState::Error(message) if visible == 0 => (message.clone(), colors::ERROR),
        _ if visible == 0 => (empty_hint.to_string(), Color::Gray),
        _ => return None,
    };

    Some(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(colors::MUTED))
                .title(title.to_string())
                .title_style(Style::default().fg(colors::PRIMARY)),
        ),
    )
}

/// 列表和表单区域使用的带边框面板
pub fn panel(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            colors::PRIMARY
        } else {
            colors::MUTED
        }))
        .title(title)
        .title_style(Style::default().fg(colors::PRIMARY).bold())
}

/// 空状态提示，视搜索或筛选是否缩小了视图而定
pub fn empty_hint(app: &Application, noun: &str) -> String {
    if app.view.search.is_empty() && app.view.filter == Default::default() {
        format!("No {}s yet. Press [a] to create one", noun)
    } else {
        format!("No {}s match the current search or filter", noun)
    }
}
