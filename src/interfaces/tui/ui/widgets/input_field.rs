//! 表单输入框组件
//!
//! 支持：
//! - 焦点高亮
//! - 验证错误显示
//! - 密码遮蔽
//! - 开关字段（复选框）

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::interfaces::tui::constants::colors;
use crate::ui::{FieldKind, FormField, FormState};

/// 输入框组件
///
/// ```rust,ignore
/// InputField::new("Target URL", form.value(LinkField::OriginalUrl))
///     .active(true)
///     .error(form.get_error(LinkField::OriginalUrl))
///     .render(frame, area);
/// ```
pub struct InputField<'a> {
    title: &'a str,
    value: &'a str,
    is_active: bool,
    error: Option<&'a str>,
    masked: bool,
    required: bool,
}

impl<'a> InputField<'a> {
    pub fn new(title: &'a str, value: &'a str) -> Self {
        Self {
            title,
            value,
            is_active: false,
            error: None,
            masked: false,
            required: false,
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// 密码遮蔽模式
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    fn display_title(&self) -> String {
        if self.required {
            format!("{} *", self.title)
        } else {
            self.title.to_string()
        }
    }

    fn border_style(&self) -> Style {
        if self.error.is_some() {
            Style::default().fg(colors::ERROR)
        } else if self.is_active {
            Style::default().fg(colors::PRIMARY).bold()
        } else {
            Style::default().fg(Color::White)
        }
    }

    fn display_value(&self) -> String {
        let value = if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.to_string()
        };
        if self.is_active {
            format!("{}▏", value)
        } else {
            value
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let input = Paragraph::new(self.display_value()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(self.display_title())
                .border_style(self.border_style()),
        );
        frame.render_widget(input, chunks[0]);

        if let Some(error) = self.error {
            let error_text = Paragraph::new(error).style(Style::default().fg(colors::ERROR));
            frame.render_widget(error_text, chunks[1]);
        }
    }
}

/// 开关字段的单行显示
pub fn toggle_line(title: &str, checked: bool, active: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if active {
        Style::default().fg(colors::PRIMARY).bold()
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(format!(" {} ", mark), style),
        Span::styled(title.to_string(), style),
        if active {
            Span::styled("  (Space to toggle)", Style::default().fg(colors::MUTED))
        } else {
            Span::raw("")
        },
    ])
}

/// 渲染整张表单：文本字段依次排列，开关字段各占一行
pub fn render_form<F: FormField>(
    frame: &mut Frame,
    form: &FormState<F>,
    required: &[F],
    area: Rect,
) {
    let constraints: Vec<Constraint> = F::ALL
        .iter()
        .map(|field| match field.kind() {
            FieldKind::Toggle => Constraint::Length(1),
            _ if form.get_error(*field).is_some() => Constraint::Length(4),
            _ => Constraint::Length(3),
        })
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (field, row) in F::ALL.iter().zip(rows.iter()) {
        let active = form.focus() == Some(*field);
        match field.kind() {
            FieldKind::Toggle => {
                let line = toggle_line(field.display_title(), form.flag(*field), active);
                frame.render_widget(Paragraph::new(line), *row);
            }
            kind => InputField::new(field.display_title(), form.value(*field))
                .active(active)
                .masked(kind == FieldKind::Secret)
                .required(required.contains(field))
                .error(form.get_error(*field))
                .render(frame, *row),
        }
    }
}
