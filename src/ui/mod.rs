//! 功能管理器共用的展示状态：提示消息、弹窗栈、表单状态和剪贴板

pub mod form;
pub mod messages;
pub mod modal;

use std::time::Instant;

use tracing::warn;

use crate::system::clipboard::Clipboard;

pub use form::{FieldKind, FormField, FormState};
pub use messages::{MessageId, MessageManager, Severity};
pub use modal::{Confirmation, ModalId, ModalKind, ModalManager, ModalOptions, PendingConfirmation};

pub struct Ui {
    pub messages: MessageManager,
    pub modals: ModalManager,
    pub clipboard: Box<dyn Clipboard>,
}

impl Ui {
    pub fn new(message_duration_ms: u64, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            messages: MessageManager::new(message_duration_ms),
            modals: ModalManager::new(),
            clipboard,
        }
    }

    /// 复制 `text` 并用提示消息报告结果
    pub fn copy_text(&mut self, text: &str) -> bool {
        match self.clipboard.set_text(text) {
            Ok(()) => {
                self.messages.show_copy_success();
                true
            }
            Err(e) => {
                warn!("clipboard write failed: {}", e);
                self.messages.error("Failed to copy to clipboard");
                false
            }
        }
    }

    /// 复制展示弹窗 `id` 中的令牌
    pub fn copy_token(&mut self, id: ModalId, now: Instant) {
        self.modals
            .copy_token(id, self.clipboard.as_mut(), &mut self.messages, now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.messages.tick(now);
        self.modals.tick(now);
    }
}
