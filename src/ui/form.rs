//! 表单状态管理
//!
//! 管理创建/编辑表单的输入、焦点和验证错误。字段集合由实现
//! `FormField` 的枚举描述，文本字段与开关字段共用同一套焦点顺序。

use std::collections::HashMap;
use std::fmt::Debug;

use crate::utils::validation::ValidationErrors;

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// 文本字段，显示时以掩码替代
    Secret,
    /// 布尔开关（Space 切换）
    Toggle,
}

pub trait FormField: Copy + Eq + Debug + 'static {
    /// 所有字段的顺序
    const ALL: &'static [Self];

    /// 字段名称（用于验证错误的 key）
    fn field_name(&self) -> &'static str;

    /// 字段显示标题
    fn display_title(&self) -> &'static str;

    fn kind(&self) -> FieldKind {
        FieldKind::Text
    }

    /// 开关字段的初始值
    fn default_flag(&self) -> bool {
        false
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// 切换到下一个字段
    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// 切换到上一个字段
    fn prev(&self) -> Self {
        let idx = self.index();
        if idx == 0 {
            Self::ALL[Self::ALL.len() - 1]
        } else {
            Self::ALL[idx - 1]
        }
    }
}

/// 表单状态
#[derive(Debug, Clone)]
pub struct FormState<F: FormField> {
    values: Vec<String>,
    flags: Vec<bool>,
    /// 当前编辑的字段
    focus: Option<F>,
    /// 验证错误 (field_name -> error_message)
    errors: HashMap<&'static str, String>,
}

impl<F: FormField> Default for FormState<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FormField> FormState<F> {
    pub fn new() -> Self {
        Self {
            values: vec![String::new(); F::ALL.len()],
            flags: F::ALL.iter().map(|f| f.default_flag()).collect(),
            focus: None,
            errors: HashMap::new(),
        }
    }

    /// 恢复初始状态
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn value(&self, field: F) -> &str {
        &self.values[field.index()]
    }

    /// 去除首尾空白后的值
    pub fn trimmed(&self, field: F) -> &str {
        self.value(field).trim()
    }

    /// 空白输入视为未填写
    pub fn optional(&self, field: F) -> Option<String> {
        let value = self.trimmed(field);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn set_value(&mut self, field: F, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn flag(&self, field: F) -> bool {
        self.flags[field.index()]
    }

    pub fn set_flag(&mut self, field: F, value: bool) {
        self.flags[field.index()] = value;
    }

    pub fn focus(&self) -> Option<F> {
        self.focus
    }

    pub fn focus_field(&mut self, field: F) {
        self.focus = Some(field);
    }

    pub fn unfocus(&mut self) {
        self.focus = None;
    }

    /// 切换到下一个编辑字段
    pub fn next_field(&mut self) {
        self.focus = Some(match self.focus {
            Some(field) => field.next(),
            None => F::ALL[0],
        });
    }

    pub fn prev_field(&mut self) {
        self.focus = Some(match self.focus {
            Some(field) => field.prev(),
            None => F::ALL[F::ALL.len() - 1],
        });
    }

    /// 焦点是否在文本输入上（此时全局快捷键被屏蔽）
    pub fn is_editing_text(&self) -> bool {
        self.focus.is_some_and(|f| f.kind() != FieldKind::Toggle)
    }

    /// 向当前编辑字段添加字符
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focus
            && field.kind() != FieldKind::Toggle
        {
            self.values[field.index()].push(c);
        }
    }

    /// 从当前编辑字段删除最后一个字符
    pub fn pop_char(&mut self) {
        if let Some(field) = self.focus
            && field.kind() != FieldKind::Toggle
        {
            self.values[field.index()].pop();
        }
    }

    /// 切换当前开关字段
    pub fn toggle_current(&mut self) -> bool {
        match self.focus {
            Some(field) if field.kind() == FieldKind::Toggle => {
                let idx = field.index();
                self.flags[idx] = !self.flags[idx];
                true
            }
            _ => false,
        }
    }

    /// 获取指定字段的验证错误
    pub fn get_error(&self, field: F) -> Option<&str> {
        self.errors.get(field.field_name()).map(String::as_str)
    }

    pub fn set_error(&mut self, field: F, error: impl Into<String>) {
        self.errors.insert(field.field_name(), error.into());
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 用一次验证结果替换字段错误
    pub fn apply_errors(&mut self, errors: &ValidationErrors) {
        self.errors.clear();
        for error in errors.iter() {
            if let Some(field) = F::ALL.iter().find(|f| f.field_name() == error.field) {
                self.errors
                    .insert(field.field_name(), error.message.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        Url,
        Secret,
        Enabled,
    }

    impl FormField for Field {
        const ALL: &'static [Self] = &[Field::Url, Field::Secret, Field::Enabled];

        fn field_name(&self) -> &'static str {
            match self {
                Field::Url => "url",
                Field::Secret => "secret",
                Field::Enabled => "enabled",
            }
        }

        fn display_title(&self) -> &'static str {
            self.field_name()
        }

        fn kind(&self) -> FieldKind {
            match self {
                Field::Url => FieldKind::Text,
                Field::Secret => FieldKind::Secret,
                Field::Enabled => FieldKind::Toggle,
            }
        }

        fn default_flag(&self) -> bool {
            matches!(self, Field::Enabled)
        }
    }

    #[test]
    fn test_field_cycle() {
        assert_eq!(Field::Url.next(), Field::Secret);
        assert_eq!(Field::Enabled.next(), Field::Url);
        assert_eq!(Field::Url.prev(), Field::Enabled);
    }

    #[test]
    fn test_input_goes_to_focused_text_field() {
        let mut form = FormState::<Field>::new();
        form.push_char('x');
        assert_eq!(form.value(Field::Url), "");

        form.next_field();
        form.push_char('a');
        form.push_char('b');
        form.pop_char();
        assert_eq!(form.value(Field::Url), "a");
        assert!(form.is_editing_text());

        form.focus_field(Field::Enabled);
        assert!(!form.is_editing_text());
        form.push_char('z');
        assert!(form.flag(Field::Enabled));
        assert!(form.toggle_current());
        assert!(!form.flag(Field::Enabled));
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut form = FormState::<Field>::new();
        form.set_value(Field::Url, "https://a.io");
        form.set_flag(Field::Enabled, false);
        form.set_error(Field::Url, "bad");
        form.focus_field(Field::Secret);

        form.clear();
        assert_eq!(form.value(Field::Url), "");
        assert!(form.flag(Field::Enabled));
        assert!(!form.has_errors());
        assert_eq!(form.focus(), None);
    }

    #[test]
    fn test_apply_errors() {
        let mut errors = ValidationErrors::new();
        errors.check("url", Err("Please enter a valid URL".into()));
        errors.check("unknown", Err("ignored".into()));

        let mut form = FormState::<Field>::new();
        form.apply_errors(&errors);
        assert_eq!(form.get_error(Field::Url), Some("Please enter a valid URL"));
        assert_eq!(form.get_error(Field::Secret), None);
    }
}
