//! 输入处理工具
//!
//! 所有表单的统一按键处理：创建表单、登录表单和编辑框都共用 `FormState`。

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::{FormField, FormState};

/// 按键交给表单后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Handled,
    Submit,
    Cancel,
    Ignored,
}

/// 用 `key` 编辑 `form`。字符写入聚焦的文本框，空格切换聚焦的开关
pub fn handle_form_key<F: FormField>(form: &mut FormState<F>, key: KeyEvent) -> FormInput {
    match key.code {
        KeyCode::Enter => FormInput::Submit,
        KeyCode::Esc => FormInput::Cancel,
        KeyCode::Tab | KeyCode::Down => {
            form.next_field();
            FormInput::Handled
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.prev_field();
            FormInput::Handled
        }
        KeyCode::Backspace => {
            form.pop_char();
            FormInput::Handled
        }
        KeyCode::Char(' ') if form.toggle_current() => FormInput::Handled,
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            if form.focus().is_none() {
                form.next_field();
            }
            form.push_char(c);
            FormInput::Handled
        }
        _ => FormInput::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::LinkField;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_navigation() {
        let mut form = FormState::<LinkField>::new();
        handle_form_key(&mut form, key(KeyCode::Char('h')));
        handle_form_key(&mut form, key(KeyCode::Char('i')));
        assert_eq!(form.value(LinkField::OriginalUrl), "hi");

        handle_form_key(&mut form, key(KeyCode::Backspace));
        assert_eq!(form.value(LinkField::OriginalUrl), "h");

        handle_form_key(&mut form, key(KeyCode::Tab));
        assert_eq!(form.focus(), Some(LinkField::ShortCodes));
        handle_form_key(&mut form, key(KeyCode::BackTab));
        assert_eq!(form.focus(), Some(LinkField::OriginalUrl));
    }

    #[test]
    fn test_space_toggles_switch() {
        let mut form = FormState::<LinkField>::new();
        form.focus_field(LinkField::Analytics);
        assert!(form.flag(LinkField::Analytics));
        assert_eq!(handle_form_key(&mut form, key(KeyCode::Char(' '))), FormInput::Handled);
        assert!(!form.flag(LinkField::Analytics));
    }

    #[test]
    fn test_submit_cancel_and_ctrl() {
        let mut form = FormState::<LinkField>::new();
        assert_eq!(handle_form_key(&mut form, key(KeyCode::Enter)), FormInput::Submit);
        assert_eq!(handle_form_key(&mut form, key(KeyCode::Esc)), FormInput::Cancel);
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(handle_form_key(&mut form, ctrl_r), FormInput::Ignored);
        assert_eq!(form.value(LinkField::OriginalUrl), "");
    }
}
