//! 登录 / 注册页

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::common::shortcut_line;
use super::widgets::{Popup, render_form};
use crate::app::Application;
use crate::features::{AuthMode, LoginField, RegisterField};
use crate::interfaces::tui::constants::{colors, popup};

pub fn draw_sign_in_screen(frame: &mut Frame, app: &Application, area: Rect) {
    let title = match app.auth.mode {
        AuthMode::Login => " 🔐 Sign In ",
        AuthMode::Register => " 📝 Create Account ",
    };
    let (_, inner) = Popup::new(title, popup::SIGN_IN)
        .theme_color(colors::PRIMARY)
        .render(frame, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Linker", Style::default().fg(colors::PRIMARY).bold()),
        Span::styled(
            format!("  {}", app.api().base_url()),
            Style::default().fg(colors::MUTED),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    match app.auth.mode {
        AuthMode::Login => render_form(
            frame,
            &app.auth.login_form,
            &[LoginField::Username, LoginField::Password],
            chunks[1],
        ),
        AuthMode::Register => render_form(
            frame,
            &app.auth.register_form,
            &[
                RegisterField::Username,
                RegisterField::Email,
                RegisterField::Password,
            ],
            chunks[1],
        ),
    }

    let switch = match app.auth.mode {
        AuthMode::Login => "Create account",
        AuthMode::Register => "Back to sign in",
    };
    frame.render_widget(
        shortcut_line(&[
            ("Tab", "Next Field", colors::PRIMARY),
            ("Enter", "Submit", colors::SUCCESS),
            ("Ctrl+T", switch, Color::Magenta),
        ]),
        chunks[2],
    );
    frame.render_widget(
        shortcut_line(&[("Ctrl+Q", "Quit", Color::Magenta)]),
        chunks[3],
    );
}
