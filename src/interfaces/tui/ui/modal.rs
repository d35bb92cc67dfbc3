//! 弹窗浮层：从下到上依次绘制，最上层的弹窗在最前面

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::common::shortcut_line;
use super::widgets::{Popup, render_form};
use crate::app::Application;
use crate::interfaces::tui::constants::{colors, popup};
use crate::ui::FormField;
use crate::ui::modal::{EditDialog, EditLinkField, Modal, ModalKind, token_usage_example};

/// 绘制所有弹窗，返回最上层弹窗的外框
pub fn draw_modals(frame: &mut Frame, app: &Application, area: Rect, now: Instant) -> Option<Rect> {
    let mut top = None;
    for modal in app.ui.modals.modals() {
        top = Some(draw_modal(frame, modal, area, now));
    }
    top
}

fn draw_modal(frame: &mut Frame, modal: &Modal, area: Rect, now: Instant) -> Rect {
    let (size, color) = match &modal.kind {
        ModalKind::Confirm { .. } => (popup::CONFIRM, colors::ERROR),
        ModalKind::TokenReveal { .. } => (popup::TOKEN, colors::SUCCESS),
        ModalKind::EditLink(_) | ModalKind::EditFile(_) => (popup::EDIT, colors::WARNING),
        ModalKind::Info { .. } => (popup::INFO, colors::INFO),
    };

    let title = format!(" {} ", modal.title);
    let (outer, inner) = Popup::new(&title, size)
        .theme_color(color)
        .dimmed(modal.is_closing())
        .render(frame, area);

    match &modal.kind {
        ModalKind::Confirm { message, .. } => draw_confirm(frame, message, inner),
        ModalKind::TokenReveal { token, api_url, .. } => {
            draw_token(frame, token, api_url, modal.shows_copied(now), inner)
        }
        ModalKind::EditLink(dialog) => {
            draw_edit(frame, dialog, &[EditLinkField::OriginalUrl], inner)
        }
        ModalKind::EditFile(dialog) => draw_edit(frame, dialog, &[], inner),
        ModalKind::Info { lines } => draw_info(frame, lines, inner),
    }

    outer
}

fn draw_confirm(frame: &mut Frame, message: &str, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::White).bold(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(text, chunks[0]);

    frame.render_widget(
        shortcut_line(&[
            ("y", "Yes", colors::SUCCESS),
            ("n", "No", colors::ERROR),
        ]),
        chunks[1],
    );
}

fn draw_token(frame: &mut Frame, token: &str, api_url: &str, copied: bool, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let warning = Paragraph::new(Span::styled(
        "⚠️  Copy this token now. You won't be able to see it again!",
        Style::default().fg(colors::WARNING).bold(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(warning, chunks[0]);

    let token_box = Paragraph::new(token.to_string())
        .style(Style::default().fg(colors::PRIMARY).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(if copied { "✓ Copied!" } else { "Token" }),
        );
    frame.render_widget(token_box, chunks[1]);

    let usage = Paragraph::new(vec![
        Line::from(Span::styled("Usage:", Style::default().fg(colors::MUTED))),
        Line::from(token_usage_example(token, api_url)),
    ])
    .wrap(Wrap { trim: false });
    frame.render_widget(usage, chunks[2]);

    frame.render_widget(
        shortcut_line(&[
            ("c", "Copy", colors::INFO),
            ("Enter", "Done", colors::SUCCESS),
        ]),
        chunks[3],
    );
}

fn draw_edit<F: FormField>(frame: &mut Frame, dialog: &EditDialog<F>, required: &[F], area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_form(frame, &dialog.form, required, chunks[0]);

    let status = if dialog.saving {
        Some(Span::styled("Saving...", Style::default().fg(colors::PRIMARY)))
    } else {
        dialog
            .error
            .as_deref()
            .map(|e| Span::styled(e.to_string(), Style::default().fg(colors::ERROR)))
    };
    if let Some(status) = status {
        frame.render_widget(Paragraph::new(status), chunks[1]);
    }

    frame.render_widget(
        shortcut_line(&[
            ("Tab", "Next Field", colors::PRIMARY),
            ("Enter", "Save", colors::SUCCESS),
            ("Esc", "Cancel", colors::ERROR),
        ]),
        chunks[2],
    );
}

fn draw_info(frame: &mut Frame, lines: &[String], area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let body: Vec<Line> = lines.iter().map(|l| Line::from(l.clone())).collect();
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), chunks[0]);
    frame.render_widget(
        shortcut_line(&[("Enter/Esc", "Close", colors::ERROR)]),
        chunks[1],
    );
}
