use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Application;
use crate::features::AuthMode;
use crate::interfaces::tui::input_handler::{FormInput, handle_form_key};

pub async fn handle_sign_in_key(app: &mut Application, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
        app.auth.toggle_mode();
        return;
    }

    let input = match app.auth.mode {
        AuthMode::Login => handle_form_key(&mut app.auth.login_form, key),
        AuthMode::Register => handle_form_key(&mut app.auth.register_form, key),
    };

    match input {
        FormInput::Submit => match app.auth.mode {
            AuthMode::Login => app.handle_login().await,
            AuthMode::Register => app.handle_register().await,
        },
        FormInput::Cancel => app.ui.messages.dismiss_latest(),
        FormInput::Handled | FormInput::Ignored => {}
    }
}
