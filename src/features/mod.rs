//! 功能管理器
//!
//! 每个管理器持有一种记录的缓存、筛选后的视图、区域状态和创建表单。
//! 加载拆成只做网络请求的异步 `fetch` 和同步的 `apply`，后者更新状态
//! 并通过 `Ui` 反馈，因此多个 fetch 可以并发执行。

pub mod analytics;
pub mod auth;
pub mod files;
pub mod links;
pub mod tokens;

use chrono::Utc;
use tracing::debug;

use crate::models::{Record, Searchable};
use crate::ui::{Confirmation, ModalId, PendingConfirmation};
use crate::utils::helpers::{FilterType, filter_indices};

pub use analytics::AnalyticsManager;
pub use auth::{AuthManager, AuthMode, LoginField, RegisterField};
pub use files::{FileField, FilesManager};
pub use links::{LinkField, LinksManager};
pub use tokens::{TokenField, TokensManager};

/// 列表区域的状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegionState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// 缓存的记录以及经搜索和筛选得到的视图
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    visible: Vec<usize>,
    query: String,
    filter: FilterType,
    state: RegionState,
    selected: usize,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            filter: FilterType::All,
            state: RegionState::Idle,
            selected: 0,
        }
    }
}

impl<T: Searchable + Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &RegionState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    pub fn set_loading(&mut self) {
        self.state = RegionState::Loading;
    }

    /// 整体替换缓存，并按当前查询和筛选重建视图
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = RegionState::Loaded;
        self.refresh_view();
    }

    /// 标记区域失败，原缓存保留
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = RegionState::Error(message.into());
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh_view();
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        self.filter = filter;
        self.refresh_view();
    }

    pub fn apply(&mut self, query: &str, filter: FilterType) {
        self.query = query.to_string();
        self.filter = filter;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.visible = filter_indices(&self.items, &self.query, self.filter, Utc::now());
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    pub fn visible(&self) -> Vec<&T> {
        self.visible.iter().map(|&i| &self.items[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible.get(self.selected).map(|&i| &self.items[i])
    }

    pub fn select_next(&mut self) {
        if !self.visible.is_empty() {
            self.selected = (self.selected + 1) % self.visible.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.visible.is_empty() {
            self.selected = if self.selected == 0 {
                self.visible.len() - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.visible.len() {
            self.selected = index;
        }
    }

    /// 清空缓存（登出）
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 可见视图的计数文本，如 "1 link" / "3 links"
    pub fn count_text(&self, noun: &str) -> String {
        let count = self.visible.len();
        format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
    }
}

/// 等待确认框的删除
#[derive(Debug)]
pub struct PendingDelete {
    id: String,
    confirmation: PendingConfirmation,
}

impl PendingDelete {
    pub fn new(id: &str, confirmation: PendingConfirmation) -> Self {
        Self {
            id: id.to_string(),
            confirmation,
        }
    }

    pub fn modal_id(&self) -> ModalId {
        self.confirmation.modal_id
    }
}

/// 轮询待确认的删除。确认后返回记录 id，
/// 无论确认还是取消，作答后都清除待定状态
pub(crate) fn take_confirmed(pending: &mut Option<PendingDelete>) -> Option<String> {
    let answer = pending.as_mut()?.confirmation.try_take()?;
    let done = pending.take()?;
    match answer {
        Confirmation::Confirmed => Some(done.id),
        Confirmation::Cancelled => {
            debug!("delete of {} cancelled", done.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiToken;
    use crate::ui::ModalManager;
    use chrono::Duration;

    fn token(id: &str, name: &str, expired: bool) -> ApiToken {
        let now = Utc::now();
        ApiToken {
            id: id.into(),
            name: Some(name.into()),
            created_at: now - Duration::days(10),
            expires_at: expired.then(|| now - Duration::days(1)),
            last_used_at: None,
        }
    }

    #[test]
    fn test_filter_survives_replace() {
        let mut tokens = Collection::new();
        tokens.replace(vec![token("1", "deploy", false), token("2", "old deploy", true)]);
        tokens.set_filter(FilterType::Expired);
        assert_eq!(tokens.visible_len(), 1);

        tokens.replace(vec![
            token("1", "deploy", false),
            token("2", "old deploy", true),
            token("3", "stale", true),
        ]);
        assert_eq!(tokens.visible_len(), 2);
        assert_eq!(tokens.count_text("token"), "2 tokens");
    }

    #[test]
    fn test_fail_keeps_cache() {
        let mut tokens = Collection::new();
        tokens.replace(vec![token("1", "ci", false)]);
        tokens.fail("Failed to load tokens");
        assert_eq!(tokens.items().len(), 1);
        assert_eq!(
            tokens.state(),
            &RegionState::Error("Failed to load tokens".into())
        );
        assert_eq!(tokens.count_text("token"), "1 token");
    }

    #[test]
    fn test_selection_wraps_and_clamps() {
        let mut tokens = Collection::new();
        tokens.replace(vec![token("1", "a", false), token("2", "b", false)]);
        tokens.select_prev();
        assert_eq!(tokens.selected().map(|t| t.id.as_str()), Some("2"));
        tokens.select_next();
        assert_eq!(tokens.selected_index(), 0);

        tokens.select(1);
        tokens.set_query("a");
        assert_eq!(tokens.selected().map(|t| t.id.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn test_pending_delete_resolution() {
        let mut modals = ModalManager::new();
        let mut pending = Some(PendingDelete::new("l1", modals.confirm("Delete", "Sure?")));
        assert_eq!(take_confirmed(&mut pending), None);
        assert!(pending.is_some());

        let id = pending.as_ref().map(|p| p.modal_id()).unwrap();
        modals.answer_confirm(id, Confirmation::Confirmed);
        assert_eq!(take_confirmed(&mut pending), Some("l1".to_string()));
        assert!(pending.is_none());

        let mut pending = Some(PendingDelete::new("l2", modals.confirm("Delete", "Sure?")));
        assert!(modals.handle_escape());
        assert_eq!(take_confirmed(&mut pending), None);
        assert!(pending.is_none());
    }
}
