//! 弹窗栈
//!
//! 最上层的弹窗接收输入。栈中有弹窗时背景被锁定（不能滚动列表，
//! 不能用标签快捷键）。关闭时先经过短暂的退出阶段，
//! 之后的 `tick` 才把它移除。

use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::debug;

use super::form::{FieldKind, FormField, FormState};
use super::messages::MessageManager;
use crate::models::{FileRecord, Link};
use crate::system::clipboard::Clipboard;
use crate::utils::time_parser::format_date_for_input;

pub const CLOSE_ANIMATION: Duration = Duration::from_millis(200);
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalId(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalOptions {
    pub disable_escape_close: bool,
    pub disable_backdrop_close: bool,
}

// ============ 编辑框 ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditLinkField {
    Title,
    Description,
    OriginalUrl,
    ExpiresAt,
    Analytics,
}

impl FormField for EditLinkField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::Description,
        Self::OriginalUrl,
        Self::ExpiresAt,
        Self::Analytics,
    ];

    fn field_name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::OriginalUrl => "original_url",
            Self::ExpiresAt => "expires_at",
            Self::Analytics => "analytics",
        }
    }

    fn display_title(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::OriginalUrl => "Target URL",
            Self::ExpiresAt => "Expires At (optional, UTC)",
            Self::Analytics => "Enable Analytics",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Analytics => FieldKind::Toggle,
            _ => FieldKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditFileField {
    Title,
    Description,
    ExpiresAt,
    IsPublic,
    Analytics,
}

impl FormField for EditFileField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::Description,
        Self::ExpiresAt,
        Self::IsPublic,
        Self::Analytics,
    ];

    fn field_name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::ExpiresAt => "expires_at",
            Self::IsPublic => "is_public",
            Self::Analytics => "analytics",
        }
    }

    fn display_title(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::ExpiresAt => "Expires At (optional, UTC)",
            Self::IsPublic => "Public Access",
            Self::Analytics => "Enable Analytics",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::IsPublic | Self::Analytics => FieldKind::Toggle,
            _ => FieldKind::Text,
        }
    }
}

/// 绑定到单条记录的编辑表单
#[derive(Debug, Clone)]
pub struct EditDialog<F: FormField> {
    pub record_id: String,
    pub form: FormState<F>,
    /// 最近一次保存失败的原因，显示在对话框内
    pub error: Option<String>,
    pub saving: bool,
}

impl<F: FormField> EditDialog<F> {
    fn new(record_id: &str, form: FormState<F>) -> Self {
        let mut form = form;
        form.focus_field(F::ALL[0]);
        Self {
            record_id: record_id.to_string(),
            form,
            error: None,
            saving: false,
        }
    }
}

impl EditDialog<EditLinkField> {
    pub fn for_link(link: &Link) -> Self {
        let mut form = FormState::new();
        form.set_value(EditLinkField::Title, link.title.clone().unwrap_or_default());
        form.set_value(
            EditLinkField::Description,
            link.description.clone().unwrap_or_default(),
        );
        form.set_value(EditLinkField::OriginalUrl, link.original_url.clone());
        form.set_value(EditLinkField::ExpiresAt, format_date_for_input(link.expires_at));
        form.set_flag(EditLinkField::Analytics, link.analytics);
        Self::new(&link.id, form)
    }
}

impl EditDialog<EditFileField> {
    pub fn for_file(file: &FileRecord) -> Self {
        let mut form = FormState::new();
        form.set_value(EditFileField::Title, file.title.clone().unwrap_or_default());
        form.set_value(
            EditFileField::Description,
            file.description.clone().unwrap_or_default(),
        );
        form.set_value(EditFileField::ExpiresAt, format_date_for_input(file.expires_at));
        form.set_flag(EditFileField::IsPublic, file.is_public);
        form.set_flag(EditFileField::Analytics, file.analytics);
        Self::new(&file.id, form)
    }
}

// ============ 弹窗 ============

#[derive(Debug)]
pub enum ModalKind {
    Confirm {
        message: String,
        responder: Option<oneshot::Sender<Confirmation>>,
    },
    /// 原始 API 令牌，只展示一次
    TokenReveal {
        token: String,
        api_url: String,
        copied_until: Option<Instant>,
    },
    EditLink(EditDialog<EditLinkField>),
    EditFile(EditDialog<EditFileField>),
    Info {
        lines: Vec<String>,
    },
}

#[derive(Debug)]
pub struct Modal {
    pub id: ModalId,
    pub title: String,
    pub kind: ModalKind,
    pub options: ModalOptions,
    pub closing_since: Option<Instant>,
}

impl Modal {
    pub fn is_closing(&self) -> bool {
        self.closing_since.is_some()
    }

    /// 弹窗内的文本框接收输入的字符
    pub fn is_editing_text(&self) -> bool {
        match &self.kind {
            ModalKind::EditLink(dialog) => dialog.form.is_editing_text(),
            ModalKind::EditFile(dialog) => dialog.form.is_editing_text(),
            _ => false,
        }
    }

    /// 令牌弹窗复制后的 "Copied!" 反馈
    pub fn shows_copied(&self, now: Instant) -> bool {
        matches!(
            self.kind,
            ModalKind::TokenReveal { copied_until: Some(until), .. } if now < until
        )
    }

    fn resolve(&mut self, answer: Confirmation) {
        if let ModalKind::Confirm { responder, .. } = &mut self.kind
            && let Some(tx) = responder.take()
        {
            let _ = tx.send(answer);
        }
    }
}

/// 新令牌下方显示的用法示例
pub fn token_usage_example(token: &str, api_url: &str) -> String {
    format!(
        "curl -H \"Authorization: Bearer {}\" {}/api/v1/links",
        token,
        api_url.trim_end_matches('/')
    )
}

/// 确认框的答复，未作答就被关闭视为 `Cancelled`
#[derive(Debug)]
pub struct PendingConfirmation {
    pub modal_id: ModalId,
    rx: oneshot::Receiver<Confirmation>,
}

impl PendingConfirmation {
    /// 对话框仍打开时为 `None`
    pub fn try_take(&mut self) -> Option<Confirmation> {
        match self.rx.try_recv() {
            Ok(answer) => Some(answer),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Confirmation::Cancelled),
        }
    }

    pub async fn wait(self) -> Confirmation {
        self.rx.await.unwrap_or(Confirmation::Cancelled)
    }
}

#[derive(Debug, Default)]
pub struct ModalManager {
    modals: Vec<Modal>,
    next_id: u64,
    background_locked: bool,
}

impl ModalManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, title: impl Into<String>, kind: ModalKind, options: ModalOptions) -> ModalId {
        self.next_id += 1;
        let id = ModalId(self.next_id);
        let title = title.into();
        debug!("open modal {:?}: {}", id, title);

        if self.modals.is_empty() {
            self.background_locked = true;
        }
        self.modals.push(Modal {
            id,
            title,
            kind,
            options,
            closing_since: None,
        });
        id
    }

    pub fn close(&mut self, id: ModalId) {
        self.close_at(id, Instant::now());
    }

    pub fn close_at(&mut self, id: ModalId, now: Instant) {
        if let Some(modal) = self.modals.iter_mut().find(|m| m.id == id)
            && modal.closing_since.is_none()
        {
            modal.resolve(Confirmation::Cancelled);
            modal.closing_since = Some(now);
        }
    }

    pub fn close_all(&mut self) {
        let now = Instant::now();
        let ids: Vec<ModalId> = self.modals.iter().map(|m| m.id).collect();
        for id in ids {
            self.close_at(id, now);
        }
    }

    /// 移除退出完成的弹窗，栈空后解锁背景
    pub fn tick(&mut self, now: Instant) {
        self.modals.retain(|m| match m.closing_since {
            Some(since) => now.saturating_duration_since(since) < CLOSE_ANIMATION,
            None => true,
        });
        if self.modals.is_empty() {
            self.background_locked = false;
        }
    }

    pub fn is_background_locked(&self) -> bool {
        self.background_locked
    }

    pub fn is_open(&self) -> bool {
        self.modals.iter().any(|m| !m.is_closing())
    }

    pub fn len(&self) -> usize {
        self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    /// 从下到上的全部弹窗，包括正在关闭的
    pub fn modals(&self) -> &[Modal] {
        &self.modals
    }

    pub fn get(&self, id: ModalId) -> Option<&Modal> {
        self.modals.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: ModalId) -> Option<&mut Modal> {
        self.modals.iter_mut().find(|m| m.id == id)
    }

    /// 最上层未在关闭的弹窗
    pub fn top(&self) -> Option<&Modal> {
        self.modals.iter().rev().find(|m| !m.is_closing())
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.modals.iter_mut().rev().find(|m| !m.is_closing())
    }

    /// Esc 关闭最上层弹窗，除非该弹窗禁用了此行为
    pub fn handle_escape(&mut self) -> bool {
        match self.top() {
            Some(m) if !m.options.disable_escape_close => {
                let id = m.id;
                self.close(id);
                true
            }
            _ => false,
        }
    }

    /// 点击最上层弹窗外部会关闭它，除非被禁用
    pub fn handle_backdrop_click(&mut self) -> bool {
        match self.top() {
            Some(m) if !m.options.disable_backdrop_close => {
                let id = m.id;
                self.close(id);
                true
            }
            _ => false,
        }
    }

    // ============ 构造 ============

    pub fn confirm(&mut self, title: impl Into<String>, message: impl Into<String>) -> PendingConfirmation {
        let (tx, rx) = oneshot::channel();
        let modal_id = self.show(
            format!("⚠️ {}", title.into()),
            ModalKind::Confirm {
                message: message.into(),
                responder: Some(tx),
            },
            ModalOptions::default(),
        );
        PendingConfirmation { modal_id, rx }
    }

    /// 答复确认框并关闭
    pub fn answer_confirm(&mut self, id: ModalId, answer: Confirmation) {
        if let Some(modal) = self.get_mut(id) {
            modal.resolve(answer);
        }
        self.close(id);
    }

    pub fn show_token(&mut self, token: impl Into<String>, api_url: impl Into<String>) -> ModalId {
        self.show(
            "🔑 API Token Created",
            ModalKind::TokenReveal {
                token: token.into(),
                api_url: api_url.into(),
                copied_until: None,
            },
            ModalOptions {
                disable_escape_close: true,
                disable_backdrop_close: true,
            },
        )
    }

    /// 复制展示弹窗中的令牌
    pub fn copy_token(
        &mut self,
        id: ModalId,
        clipboard: &mut dyn Clipboard,
        messages: &mut MessageManager,
        now: Instant,
    ) {
        let Some(modal) = self.get_mut(id) else {
            return;
        };
        let ModalKind::TokenReveal {
            token,
            copied_until,
            ..
        } = &mut modal.kind
        else {
            return;
        };

        match clipboard.set_text(token) {
            Ok(()) => {
                *copied_until = Some(now + COPIED_FEEDBACK);
                messages.show_copy_success();
            }
            Err(e) => {
                debug!("token copy failed: {}", e);
                messages.error("Failed to copy token");
            }
        }
    }

    pub fn show_edit_link(&mut self, link: &Link) -> ModalId {
        self.show(
            "✏️ Edit Link",
            ModalKind::EditLink(EditDialog::for_link(link)),
            ModalOptions::default(),
        )
    }

    pub fn show_edit_file(&mut self, file: &FileRecord) -> ModalId {
        self.show(
            "✏️ Edit File",
            ModalKind::EditFile(EditDialog::for_file(file)),
            ModalOptions::default(),
        )
    }

    pub fn show_info(&mut self, title: impl Into<String>, lines: Vec<String>) -> ModalId {
        self.show(title, ModalKind::Info { lines }, ModalOptions::default())
    }
}
