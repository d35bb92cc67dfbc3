//! 提示消息
//!
//! 每条消息按自己的截止时间过期，没有队列也不去重。
//! 移除前有一段短暂的退出阶段供渲染层淡出。

use std::fmt::Display;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::utils::validation::ValidationErrors;

pub const DEFAULT_MESSAGE_MS: u64 = 5000;
pub const API_ERROR_MESSAGE_MS: u64 = 7000;
pub const COPY_SUCCESS_MESSAGE_MS: u64 = 3000;
pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);
pub const UNEXPECTED_ERROR_TEXT: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✅",
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(u64);

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub severity: Severity,
    pub created_at: Instant,
    /// `None` 表示一直显示到被关闭
    pub duration: Option<Duration>,
    pub leaving_since: Option<Instant>,
    pub loading: bool,
}

impl Message {
    pub fn is_leaving(&self) -> bool {
        self.leaving_since.is_some()
    }

    fn deadline(&self) -> Option<Instant> {
        // 溢出时视为不过期
        self.duration.and_then(|d| self.created_at.checked_add(d))
    }
}

#[derive(Debug)]
pub struct MessageManager {
    messages: Vec<Message>,
    next_id: u64,
    default_duration_ms: u64,
}

impl Default for MessageManager {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_MS)
    }
}

impl MessageManager {
    pub fn new(default_duration_ms: u64) -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            default_duration_ms,
        }
    }

    /// 按显示顺序的消息，包括正在退出的
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// `duration_ms == 0` 时一直显示到被关闭
    pub fn show(&mut self, text: impl Into<String>, severity: Severity, duration_ms: u64) -> MessageId {
        self.show_at(text, severity, duration_ms, Instant::now())
    }

    pub fn show_at(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        duration_ms: u64,
        now: Instant,
    ) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;

        let text = text.into();
        debug!("message {:?} [{:?}]: {}", id, severity, text);
        self.messages.push(Message {
            id,
            text,
            severity,
            created_at: now,
            duration: (duration_ms > 0).then(|| Duration::from_millis(duration_ms)),
            leaving_since: None,
            loading: false,
        });
        id
    }

    pub fn success(&mut self, text: impl Into<String>) -> MessageId {
        self.show(text, Severity::Success, self.default_duration_ms)
    }

    pub fn error(&mut self, text: impl Into<String>) -> MessageId {
        self.show(text, Severity::Error, self.default_duration_ms)
    }

    pub fn warning(&mut self, text: impl Into<String>) -> MessageId {
        self.show(text, Severity::Warning, self.default_duration_ms)
    }

    pub fn info(&mut self, text: impl Into<String>) -> MessageId {
        self.show(text, Severity::Info, self.default_duration_ms)
    }

    /// 提前进入退出阶段（点击或关闭键）
    pub fn dismiss(&mut self, id: MessageId) {
        self.dismiss_at(id, Instant::now());
    }

    pub fn dismiss_at(&mut self, id: MessageId, now: Instant) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id)
            && message.leaving_since.is_none()
        {
            message.leaving_since = Some(now);
        }
    }

    /// 关闭仍在屏幕上的最新一条消息
    pub fn dismiss_latest(&mut self) {
        if let Some(id) = self
            .messages
            .iter()
            .rev()
            .find(|m| !m.is_leaving())
            .map(|m| m.id)
        {
            self.dismiss(id);
        }
    }

    /// 推进计时：到期的消息开始退出，退出完成的被移除
    pub fn tick(&mut self, now: Instant) {
        for message in &mut self.messages {
            if message.leaving_since.is_none()
                && let Some(deadline) = message.deadline()
                && now >= deadline
            {
                message.leaving_since = Some(now);
            }
        }
        self.messages.retain(|m| match m.leaving_since {
            Some(since) => now.saturating_duration_since(since) < EXIT_ANIMATION,
            None => true,
        });
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn show_loading(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.show(text, Severity::Info, 0);
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.loading = true;
        }
        id
    }

    /// 只影响加载中消息
    pub fn dismiss_loading(&mut self, id: MessageId) {
        if self.get(id).is_some_and(|m| m.loading) {
            self.dismiss(id);
        }
    }

    pub fn show_api_error(&mut self, error: &dyn Display) -> MessageId {
        let text = error.to_string();
        let text = if text.trim().is_empty() {
            UNEXPECTED_ERROR_TEXT.to_string()
        } else {
            text
        };
        self.show(text, Severity::Error, API_ERROR_MESSAGE_MS)
    }

    /// 每个字段一条，格式为 "field: message"
    pub fn show_validation_errors(&mut self, errors: &ValidationErrors) -> Vec<MessageId> {
        errors
            .iter()
            .map(|e| self.show(e.to_string(), Severity::Error, DEFAULT_MESSAGE_MS))
            .collect()
    }

    pub fn show_copy_success(&mut self) -> MessageId {
        self.show("📋 Copied to clipboard!", Severity::Success, COPY_SUCCESS_MESSAGE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huge_duration_never_expires() {
        let mut manager = MessageManager::new(5000);
        let start = Instant::now();
        manager.show_at("sticky", Severity::Info, u64::MAX, start);

        manager.tick(start + Duration::from_secs(3600));
        assert_eq!(manager.len(), 1);
        assert!(!manager.messages()[0].is_leaving());
    }

    #[test]
    fn test_message_expires_after_exit_animation() {
        let start = Instant::now();
        let mut manager = MessageManager::default();
        let id = manager.show_at("Saved", Severity::Success, 1000, start);

        manager.tick(start + Duration::from_millis(999));
        assert!(!manager.get(id).unwrap().is_leaving());

        manager.tick(start + Duration::from_millis(1000));
        assert!(manager.get(id).unwrap().is_leaving());

        manager.tick(start + Duration::from_millis(1299));
        assert_eq!(manager.len(), 1);
        manager.tick(start + Duration::from_millis(1300));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_zero_duration_is_indefinite() {
        let start = Instant::now();
        let mut manager = MessageManager::default();
        let id = manager.show_at("Uploading", Severity::Info, 0, start);
        manager.tick(start + Duration::from_secs(3600));
        assert!(manager.get(id).is_some());

        manager.dismiss_at(id, start + Duration::from_secs(3600));
        manager.tick(start + Duration::from_secs(3601));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_dismiss_loading_ignores_regular_messages() {
        let mut manager = MessageManager::default();
        let plain = manager.info("hello");
        manager.dismiss_loading(plain);
        assert!(!manager.get(plain).unwrap().is_leaving());

        let loading = manager.show_loading("Uploading file...");
        assert!(manager.get(loading).unwrap().loading);
        manager.dismiss_loading(loading);
        assert!(manager.get(loading).unwrap().is_leaving());
    }

    #[test]
    fn test_show_api_error_fallback() {
        let mut manager = MessageManager::default();
        let id = manager.show_api_error(&"");
        let message = manager.get(id).unwrap();
        assert_eq!(message.text, UNEXPECTED_ERROR_TEXT);
        assert_eq!(message.duration, Some(Duration::from_millis(7000)));
    }

    #[test]
    fn test_no_dedup() {
        let mut manager = MessageManager::default();
        manager.error("same");
        manager.error("same");
        assert_eq!(manager.len(), 2);
    }
}
