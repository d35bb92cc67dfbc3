//! 应用编排层
//!
//! 持有共享的 `ApiClient`、`Ui` 和所有功能管理器。TUI 把终端事件
//! 转换为对 `Application` 的调用，网络请求都在事件循环任务上直接 await。

mod state;

pub use state::{Focus, Screen, Shortcut, Tab, ViewState};

use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::client::{ApiClient, connect};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::features::{AnalyticsManager, AuthManager, FilesManager, LinksManager, TokensManager};
use crate::models::Record;
use crate::system::clipboard::Clipboard;
use crate::ui::messages::UNEXPECTED_ERROR_TEXT;
use crate::ui::{Confirmation, ModalKind, Ui};
use crate::utils::helpers::{Debouncer, FilterType};

pub struct Application {
    api: Arc<ApiClient>,
    pub ui: Ui,
    pub auth: AuthManager,
    pub links: LinksManager,
    pub files: FilesManager,
    pub tokens: TokensManager,
    pub analytics: AnalyticsManager,
    pub view: ViewState,
    pub screen: Screen,
    pub focus: Focus,
    search_debounce: Debouncer,
    should_quit: bool,
}

impl Application {
    pub fn new(config: &AppConfig, api: Arc<ApiClient>, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            ui: Ui::new(config.ui.message_duration_ms, clipboard),
            auth: AuthManager::new(api.clone()),
            links: LinksManager::new(api.clone(), config),
            files: FilesManager::new(api.clone(), config),
            tokens: TokensManager::new(api.clone()),
            analytics: AnalyticsManager::new(api.clone()),
            api,
            view: ViewState::default(),
            screen: Screen::SignIn,
            focus: Focus::List,
            search_debounce: Debouncer::new(Duration::from_millis(config.ui.search_debounce_ms)),
            should_quit: false,
        }
    }

    /// 恢复已保存的会话并接入真实传输层。`api_url` 会替换本次及之后使用的服务器
    pub fn from_config(
        config: &AppConfig,
        api_url: Option<&str>,
        clipboard: Box<dyn Clipboard>,
    ) -> Result<Self> {
        let api = Arc::new(connect(config, api_url)?);
        Ok(Self::new(config, api, clipboard))
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// 校验恢复的会话，有效时进入仪表盘
    pub async fn init(&mut self) {
        if self.auth.check_auth_status(&mut self.ui).await {
            self.on_auth_success().await;
        } else {
            self.screen = Screen::SignIn;
        }
    }

    pub async fn on_auth_success(&mut self) {
        if let Some(user) = self.auth.current_user() {
            info!("Dashboard opened for {}", user.username);
        }
        self.screen = Screen::Dashboard;
        self.focus = Focus::List;
        self.load_tab(self.view.active_tab).await;
    }

    pub async fn handle_login(&mut self) {
        if self.auth.handle_login(&mut self.ui).await {
            self.on_auth_success().await;
        }
    }

    pub async fn handle_register(&mut self) {
        if self.auth.handle_register(&mut self.ui).await {
            self.on_auth_success().await;
        }
    }

    /// 登出并清空所有缓存记录
    pub fn logout(&mut self) {
        self.auth.logout(&mut self.ui);
        self.links.clear();
        self.files.clear();
        self.tokens.clear();
        self.analytics.clear();
        self.ui.modals.close_all();
        self.view = ViewState::default();
        self.search_debounce.cancel();
        self.screen = Screen::SignIn;
        self.focus = Focus::List;
    }

    // ============ 标签页 ============

    /// `tab` 已是当前标签页时不做任何事
    pub async fn switch_tab(&mut self, tab: Tab) -> bool {
        if self.view.active_tab == tab {
            return false;
        }
        debug!("switch tab {} -> {}", self.view.active_tab, tab);
        self.view.active_tab = tab;
        self.focus = Focus::List;
        self.load_tab(tab).await;
        true
    }

    pub async fn load_tab(&mut self, tab: Tab) -> bool {
        match tab {
            Tab::Links => self.links.load_links(&mut self.ui).await,
            Tab::Files => self.files.load_files(&mut self.ui).await,
            Tab::Tokens => self.tokens.load_tokens(&mut self.ui).await,
            Tab::Analytics => self.analytics.load_analytics(&mut self.ui).await,
        }
    }

    /// 并发重新加载链接、文件和令牌，各结果分别应用
    pub async fn refresh_all(&mut self) -> bool {
        self.links.begin_load();
        self.files.begin_load();
        self.tokens.begin_load();

        let (links, files, tokens) =
            tokio::join!(self.links.fetch(), self.files.fetch(), self.tokens.fetch());

        let links_ok = self.links.apply(links, &mut self.ui);
        let files_ok = self.files.apply(files, &mut self.ui);
        let tokens_ok = self.tokens.apply(tokens, &mut self.ui);

        let ok = links_ok && files_ok && tokens_ok;
        if ok {
            self.ui.messages.success("Data refreshed successfully!");
        }
        ok
    }

    // ============ 搜索与筛选 ============

    /// 设置查询词并立即重算所有列表视图
    pub fn set_search(&mut self, query: &str) {
        self.view.search = query.to_string();
        self.search_debounce.cancel();
        self.apply_filters();
    }

    /// 搜索框按键：停止输入后才更新视图
    pub fn type_search(&mut self, query: &str, now: Instant) {
        self.view.search = query.to_string();
        self.search_debounce.schedule(now);
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        self.view.filter = filter;
        self.apply_filters();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.view.filter.next());
    }

    fn apply_filters(&mut self) {
        let query = self.view.search.to_lowercase();
        let filter = self.view.filter;
        self.links.filter_links(&query, filter);
        self.files.filter_files(&query, filter);
        self.tokens.filter_tokens(&query, filter);
    }

    // ============ 输入 ============

    /// 按键正被文本输入框占用
    pub fn is_typing(&self) -> bool {
        if let Some(modal) = self.ui.modals.top() {
            return modal.is_editing_text();
        }
        match self.screen {
            Screen::SignIn => true,
            Screen::Dashboard => match self.focus {
                Focus::Search => true,
                Focus::Form => self.form_is_editing_text(),
                Focus::List => false,
            },
        }
    }

    fn form_is_editing_text(&self) -> bool {
        match self.view.active_tab {
            Tab::Links => self.links.form.is_editing_text(),
            Tab::Files => self.files.form.is_editing_text(),
            Tab::Tokens => self.tokens.form.is_editing_text(),
            Tab::Analytics => false,
        }
    }

    /// 执行全局快捷键，被屏蔽时返回 false
    pub async fn handle_shortcut(&mut self, shortcut: Shortcut) -> bool {
        if self.is_typing() {
            return false;
        }
        if self.screen == Screen::SignIn && shortcut != Shortcut::Quit {
            return false;
        }
        match shortcut {
            Shortcut::Quit => self.quit(),
            _ if self.ui.modals.is_background_locked() => return false,
            Shortcut::SwitchTab(tab) => {
                self.switch_tab(tab).await;
            }
            Shortcut::Refresh => {
                self.load_tab(self.view.active_tab).await;
            }
            Shortcut::Logout => self.logout(),
        }
        true
    }

    /// 兜底错误处理：记录日志并显示通用提示
    pub fn handle_global_error(&mut self, err: &dyn Display) {
        error!("Global error: {}", err);
        self.ui.messages.error(UNEXPECTED_ERROR_TEXT);
    }

    // ============ 当前标签页操作 ============

    /// 提交当前标签页的创建表单
    pub async fn submit_form(&mut self) -> bool {
        match self.view.active_tab {
            Tab::Links => self.links.handle_create_link(&mut self.ui).await,
            Tab::Files => self.files.handle_upload_file(&mut self.ui).await,
            Tab::Tokens => self.tokens.handle_create_token(&mut self.ui).await.is_some(),
            Tab::Analytics => false,
        }
    }

    fn selected_id(&self) -> Option<String> {
        let id = match self.view.active_tab {
            Tab::Links => self.links.links().selected().map(|l| l.id()),
            Tab::Files => self.files.files().selected().map(|f| f.id()),
            Tab::Tokens => self.tokens.tokens().selected().map(|t| t.id()),
            Tab::Analytics => None,
        };
        id.map(str::to_string)
    }

    pub fn select_next(&mut self) {
        match self.view.active_tab {
            Tab::Links => self.links.links_mut().select_next(),
            Tab::Files => self.files.files_mut().select_next(),
            Tab::Tokens => self.tokens.tokens_mut().select_next(),
            Tab::Analytics => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.view.active_tab {
            Tab::Links => self.links.links_mut().select_prev(),
            Tab::Files => self.files.files_mut().select_prev(),
            Tab::Tokens => self.tokens.tokens_mut().select_prev(),
            Tab::Analytics => {}
        }
    }

    pub async fn edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.view.active_tab {
            Tab::Links => {
                self.links.edit_link(&id, &mut self.ui).await;
            }
            Tab::Files => {
                self.files.edit_file(&id, &mut self.ui).await;
            }
            Tab::Tokens | Tab::Analytics => {}
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.view.active_tab {
            Tab::Links => self.links.request_delete(&id, &mut self.ui),
            Tab::Files => self.files.request_delete(&id, &mut self.ui),
            Tab::Tokens => self.tokens.request_delete(&id, &mut self.ui),
            Tab::Analytics => {}
        }
    }

    pub fn copy_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.view.active_tab {
            Tab::Links => {
                self.links.copy_url(&id, &mut self.ui);
            }
            Tab::Files => {
                self.files.copy_url(&id, &mut self.ui);
            }
            Tab::Tokens | Tab::Analytics => {}
        }
    }

    /// 选中链接或文件的单项统计
    pub async fn details_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.view.active_tab {
            Tab::Links => {
                self.analytics.show_link_details(&id, &mut self.ui).await;
            }
            Tab::Files => {
                self.analytics.show_file_details(&id, &mut self.ui).await;
            }
            Tab::Tokens | Tab::Analytics => {}
        }
    }

    // ============ 弹窗 ============

    /// 在最上层弹窗上按 Enter
    pub async fn submit_modal(&mut self) {
        enum Submit {
            Confirm,
            EditLink,
            EditFile,
            Close,
        }

        let Some((id, submit)) = self.ui.modals.top().map(|modal| {
            let submit = match modal.kind {
                ModalKind::Confirm { .. } => Submit::Confirm,
                ModalKind::EditLink(_) => Submit::EditLink,
                ModalKind::EditFile(_) => Submit::EditFile,
                ModalKind::TokenReveal { .. } | ModalKind::Info { .. } => Submit::Close,
            };
            (modal.id, submit)
        }) else {
            return;
        };

        match submit {
            Submit::Confirm => self.ui.modals.answer_confirm(id, Confirmation::Confirmed),
            Submit::EditLink => {
                self.links.save_link_edit(id, &mut self.ui).await;
            }
            Submit::EditFile => {
                self.files.save_file_edit(id, &mut self.ui).await;
            }
            Submit::Close => self.ui.modals.close(id),
        }
    }

    /// 在确认框上明确选择“否”
    pub fn decline_modal(&mut self) {
        if let Some(modal) = self.ui.modals.top()
            && matches!(modal.kind, ModalKind::Confirm { .. })
        {
            let id = modal.id;
            self.ui.modals.answer_confirm(id, Confirmation::Cancelled);
        }
    }

    // ============ 定时器 ============

    /// 推进定时器，应用已稳定的搜索并执行已确认的删除
    pub async fn tick(&mut self, now: Instant) {
        self.ui.tick(now);

        if self.search_debounce.poll(now) {
            self.apply_filters();
        }

        if let Some(id) = self.links.take_confirmed_delete() {
            self.links.delete_link(&id, &mut self.ui).await;
        }
        if let Some(id) = self.files.take_confirmed_delete() {
            self.files.delete_file(&id, &mut self.ui).await;
        }
        if let Some(id) = self.tokens.take_confirmed_delete() {
            self.tokens.delete_token(&id, &mut self.ui).await;
        }
    }
}
