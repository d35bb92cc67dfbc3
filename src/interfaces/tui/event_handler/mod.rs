//! TUI 事件处理
//!
//! 把终端事件交给最上层的接收者：
//! - modal：打开的弹窗栈总是最先收到按键
//! - sign_in：登录与注册表单
//! - dashboard：列表导航、搜索框和创建表单

use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{Application, Screen, Shortcut, Tab};
use crate::interfaces::tui::ui::HitAreas;

mod dashboard;
mod modal;
mod sign_in;

use dashboard::handle_dashboard_key;
use modal::handle_modal_key;
use sign_in::handle_sign_in_key;

/// 处理一个终端事件
pub async fn handle_event(app: &mut Application, hit: &HitAreas, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key).await,
        Event::Mouse(mouse) => handle_mouse_event(app, hit, mouse).await,
        _ => {}
    }
}

/// 按当前界面处理键盘输入
pub async fn handle_key_event(app: &mut Application, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.quit();
        return;
    }

    if app.ui.modals.is_open() {
        handle_modal_key(app, key).await;
        return;
    }

    if let Some(shortcut) = shortcut_for(&key)
        && app.handle_shortcut(shortcut).await
    {
        return;
    }

    match app.screen {
        Screen::SignIn => handle_sign_in_key(app, key).await,
        Screen::Dashboard => handle_dashboard_key(app, key).await,
    }
}

/// `key` 绑定的全局快捷键
fn shortcut_for(key: &KeyEvent) -> Option<Shortcut> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char(c @ '1'..='4') if ctrl => {
            Tab::from_number(c as u8 - b'0').map(Shortcut::SwitchTab)
        }
        KeyCode::Char('r') if ctrl => Some(Shortcut::Refresh),
        KeyCode::Char('l') if ctrl => Some(Shortcut::Logout),
        KeyCode::Char('q') if key.modifiers.is_empty() => Some(Shortcut::Quit),
        _ => None,
    }
}

async fn handle_mouse_event(app: &mut Application, hit: &HitAreas, mouse: MouseEvent) {
    let pos = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(id) = hit.toast_at(pos) {
                app.ui.messages.dismiss(id);
                return;
            }
            if app.ui.modals.is_open() {
                if !hit.inside_modal(pos) {
                    app.ui.modals.handle_backdrop_click();
                }
                return;
            }
            if app.screen == Screen::Dashboard
                && let Some(tab) = hit.tab_at(pos)
            {
                app.switch_tab(tab).await;
            }
        }
        MouseEventKind::ScrollDown if !app.ui.modals.is_open() => app.select_next(),
        MouseEventKind::ScrollUp if !app.ui.modals.is_open() => app.select_prev(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_mapping() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(shortcut_for(&ctrl('2')), Some(Shortcut::SwitchTab(Tab::Files)));
        assert_eq!(shortcut_for(&ctrl('r')), Some(Shortcut::Refresh));
        assert_eq!(shortcut_for(&ctrl('l')), Some(Shortcut::Logout));
        assert_eq!(
            shortcut_for(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Shortcut::Quit)
        );
        assert_eq!(
            shortcut_for(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE)),
            None
        );
    }
}
