use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;

use crate::app::{Application, Focus, Shortcut, Tab};
use crate::interfaces::tui::input_handler::{FormInput, handle_form_key};
use crate::ui::{FormField, FormState};

pub async fn handle_dashboard_key(app: &mut Application, key: KeyEvent) {
    match app.focus {
        Focus::List => handle_list_key(app, key).await,
        Focus::Search => handle_search_key(app, key),
        Focus::Form => handle_create_form_key(app, key).await,
    }
}

async fn handle_list_key(app: &mut Application, key: KeyEvent) {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return;
    }
    let tab = app.view.active_tab;

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Left | KeyCode::BackTab => {
            app.switch_tab(adjacent_tab(tab, false)).await;
        }
        KeyCode::Right | KeyCode::Tab => {
            app.switch_tab(adjacent_tab(tab, true)).await;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                app.handle_shortcut(Shortcut::SwitchTab(tab)).await;
            }
        }
        KeyCode::Char('r') => {
            app.handle_shortcut(Shortcut::Refresh).await;
        }
        KeyCode::Char('R') => {
            app.refresh_all().await;
        }
        KeyCode::Char('/') if tab.is_list() => app.focus = Focus::Search,
        KeyCode::Char('f') if tab.is_list() => app.cycle_filter(),
        KeyCode::Char('a') | KeyCode::Char('n') if tab.is_list() => open_create_form(app),
        KeyCode::Char('e') => app.edit_selected().await,
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('c') => app.copy_selected(),
        KeyCode::Char('i') | KeyCode::Enter => app.details_selected().await,
        KeyCode::Esc => app.ui.messages.dismiss_latest(),
        _ => {}
    }
}

fn handle_search_key(app: &mut Application, key: KeyEvent) {
    let mut query = app.view.search.clone();
    match key.code {
        KeyCode::Enter => {
            app.set_search(&query);
            app.focus = Focus::List;
        }
        KeyCode::Esc => {
            app.set_search("");
            app.focus = Focus::List;
        }
        KeyCode::Backspace => {
            query.pop();
            app.type_search(&query, Instant::now());
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            query.push(c);
            app.type_search(&query, Instant::now());
        }
        _ => {}
    }
}

async fn handle_create_form_key(app: &mut Application, key: KeyEvent) {
    let input = match app.view.active_tab {
        Tab::Links => handle_form_key(&mut app.links.form, key),
        Tab::Files => handle_form_key(&mut app.files.form, key),
        Tab::Tokens => handle_form_key(&mut app.tokens.form, key),
        Tab::Analytics => FormInput::Cancel,
    };

    match input {
        FormInput::Submit => {
            if app.submit_form().await {
                app.focus = Focus::List;
            }
        }
        FormInput::Cancel => {
            unfocus_create_form(app);
            app.focus = Focus::List;
        }
        FormInput::Handled | FormInput::Ignored => {}
    }
}

fn open_create_form(app: &mut Application) {
    match app.view.active_tab {
        Tab::Links => focus_first(&mut app.links.form),
        Tab::Files => focus_first(&mut app.files.form),
        Tab::Tokens => focus_first(&mut app.tokens.form),
        Tab::Analytics => return,
    }
    app.focus = Focus::Form;
}

fn focus_first<F: FormField>(form: &mut FormState<F>) {
    if form.focus().is_none() {
        form.next_field();
    }
}

fn unfocus_create_form(app: &mut Application) {
    match app.view.active_tab {
        Tab::Links => app.links.form.unfocus(),
        Tab::Files => app.files.form.unfocus(),
        Tab::Tokens => app.tokens.form.unfocus(),
        Tab::Analytics => {}
    }
}

fn adjacent_tab(tab: Tab, forward: bool) -> Tab {
    let tabs: Vec<Tab> = Tab::iter().collect();
    let idx = tabs.iter().position(|t| *t == tab).unwrap_or(0);
    let next = if forward {
        (idx + 1) % tabs.len()
    } else {
        (idx + tabs.len() - 1) % tabs.len()
    };
    tabs[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_tab_wraps() {
        assert_eq!(adjacent_tab(Tab::Links, true), Tab::Files);
        assert_eq!(adjacent_tab(Tab::Analytics, true), Tab::Links);
        assert_eq!(adjacent_tab(Tab::Links, false), Tab::Analytics);
    }
}
