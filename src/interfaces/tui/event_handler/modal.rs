use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::app::Application;
use crate::interfaces::tui::input_handler::{FormInput, handle_form_key};
use crate::ui::ModalKind;

enum ModalAction {
    Submit,
    Decline,
    CopyToken,
    None,
}

/// 最上层弹窗的按键处理，弹窗打开时背景收不到任何按键
pub async fn handle_modal_key(app: &mut Application, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.ui.modals.handle_escape();
        return;
    }

    let Some(modal) = app.ui.modals.top_mut() else {
        return;
    };
    let id = modal.id;

    let action = match &mut modal.kind {
        ModalKind::Confirm { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ModalAction::Submit,
            KeyCode::Char('n') | KeyCode::Char('N') => ModalAction::Decline,
            _ => ModalAction::None,
        },
        ModalKind::TokenReveal { .. } => match key.code {
            KeyCode::Char('c') => ModalAction::CopyToken,
            KeyCode::Enter => ModalAction::Submit,
            _ => ModalAction::None,
        },
        ModalKind::EditLink(dialog) => form_action(handle_form_key(&mut dialog.form, key)),
        ModalKind::EditFile(dialog) => form_action(handle_form_key(&mut dialog.form, key)),
        ModalKind::Info { .. } => match key.code {
            KeyCode::Enter | KeyCode::Char('q') => ModalAction::Submit,
            _ => ModalAction::None,
        },
    };

    match action {
        ModalAction::Submit => app.submit_modal().await,
        ModalAction::Decline => app.decline_modal(),
        ModalAction::CopyToken => app.ui.copy_token(id, Instant::now()),
        ModalAction::None => {}
    }
}

fn form_action(input: FormInput) -> ModalAction {
    match input {
        FormInput::Submit => ModalAction::Submit,
        // Esc 在表单之前处理
        FormInput::Cancel | FormInput::Handled | FormInput::Ignored => ModalAction::None,
    }
}
