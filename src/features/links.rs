//! 链接管理
//!
//! 创建、列表、编辑、删除短链接，以及复制短地址。

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Collection, PendingDelete, RegionState, take_confirmed};
use crate::client::{ApiClient, ClientError, DEFAULT_PAGE};
use crate::config::AppConfig;
use crate::models::{CreateLinkRequest, Link, UpdateLinkRequest};
use crate::ui::modal::{EditLinkField, ModalKind};
use crate::ui::{FieldKind, FormField, FormState, ModalId, Ui};
use crate::utils::formatting::{format_short_code, short_url};
use crate::utils::helpers::{FilterType, parse_short_codes};
use crate::utils::time_parser::TimeParser;
use crate::utils::validation::{
    ValidationErrors, validate_expiration_date, validate_short_codes, validate_url,
};

pub const LOAD_LINKS_ERROR: &str = "Failed to load links";

/// 创建链接表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    OriginalUrl,
    ShortCodes,
    Title,
    Description,
    ExpiresAt,
    Analytics,
}

impl FormField for LinkField {
    const ALL: &'static [Self] = &[
        Self::OriginalUrl,
        Self::ShortCodes,
        Self::Title,
        Self::Description,
        Self::ExpiresAt,
        Self::Analytics,
    ];

    fn field_name(&self) -> &'static str {
        match self {
            Self::OriginalUrl => "original_url",
            Self::ShortCodes => "short_codes",
            Self::Title => "title",
            Self::Description => "description",
            Self::ExpiresAt => "expires_at",
            Self::Analytics => "analytics",
        }
    }

    fn display_title(&self) -> &'static str {
        match self {
            Self::OriginalUrl => "Target URL",
            Self::ShortCodes => "Short Codes (optional, comma separated)",
            Self::Title => "Title (optional)",
            Self::Description => "Description (optional)",
            Self::ExpiresAt => "Expires At (optional, UTC or +7d)",
            Self::Analytics => "Enable Analytics",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Analytics => FieldKind::Toggle,
            _ => FieldKind::Text,
        }
    }

    fn default_flag(&self) -> bool {
        matches!(self, Self::Analytics)
    }
}

pub struct LinksManager {
    api: Arc<ApiClient>,
    links: Collection<Link>,
    pub form: FormState<LinkField>,
    link_prefix: String,
    page_size: u32,
    pending_delete: Option<PendingDelete>,
}

impl LinksManager {
    pub fn new(api: Arc<ApiClient>, config: &AppConfig) -> Self {
        Self {
            api,
            links: Collection::new(),
            form: FormState::new(),
            link_prefix: config.api.link_prefix.clone(),
            page_size: config.ui.page_size,
            pending_delete: None,
        }
    }

    pub fn links(&self) -> &Collection<Link> {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut Collection<Link> {
        &mut self.links
    }

    pub fn state(&self) -> &RegionState {
        self.links.state()
    }

    // ============ 加载 ============

    pub fn begin_load(&mut self) {
        self.links.set_loading();
    }

    pub async fn fetch(&self) -> Result<Vec<Link>, ClientError> {
        self.api.list_links(DEFAULT_PAGE, self.page_size).await
    }

    /// 保存拉取结果，失败时保留原缓存
    pub fn apply(&mut self, result: Result<Vec<Link>, ClientError>, ui: &mut Ui) -> bool {
        match result {
            Ok(links) => {
                debug!("loaded {} links", links.len());
                self.links.replace(links);
                true
            }
            Err(e) => {
                warn!("{}: {}", LOAD_LINKS_ERROR, e);
                self.links.fail(LOAD_LINKS_ERROR);
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    pub async fn load_links(&mut self, ui: &mut Ui) -> bool {
        self.begin_load();
        let result = self.fetch().await;
        self.apply(result, ui)
    }

    // ============ 创建 ============

    /// 验证创建表单并构造请求
    pub fn validate_form(&self) -> Result<CreateLinkRequest, ValidationErrors> {
        let form = &self.form;
        let mut errors = ValidationErrors::new();
        errors
            .check("original_url", validate_url(form.trimmed(LinkField::OriginalUrl)))
            .check("short_codes", validate_short_codes(form.value(LinkField::ShortCodes)))
            .check("expires_at", validate_expiration_date(form.value(LinkField::ExpiresAt)));
        errors.into_result()?;

        Ok(CreateLinkRequest {
            original_url: form.trimmed(LinkField::OriginalUrl).to_string(),
            short_codes: parse_short_codes(form.value(LinkField::ShortCodes)),
            title: form.optional(LinkField::Title),
            description: form.optional(LinkField::Description),
            analytics: form.flag(LinkField::Analytics),
            expires_at: form
                .optional(LinkField::ExpiresAt)
                .and_then(|s| TimeParser::parse_expire_time(&s).ok()),
        })
    }

    /// 提交创建表单，校验失败时不发送请求
    pub async fn handle_create_link(&mut self, ui: &mut Ui) -> bool {
        let request = match self.validate_form() {
            Ok(request) => request,
            Err(errors) => {
                self.form.apply_errors(&errors);
                ui.messages.show_validation_errors(&errors);
                return false;
            }
        };
        self.form.clear_errors();

        match self.api.create_link(&request).await {
            Ok(link) => {
                info!("created link {} -> {}", link.id, link.original_url);
                ui.messages.success("Link created successfully!");
                self.form.clear();
                self.load_links(ui).await;
                true
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    // ============ 编辑 ============

    /// 拉取当前记录并打开编辑框
    pub async fn edit_link(&mut self, id: &str, ui: &mut Ui) -> Option<ModalId> {
        match self.api.get_link(id).await {
            Ok(link) => Some(ui.modals.show_edit_link(&link)),
            Err(e) => {
                ui.messages.show_api_error(&e);
                None
            }
        }
    }

    /// 提交编辑框，失败时保持打开并显示错误
    pub async fn save_link_edit(&mut self, modal_id: ModalId, ui: &mut Ui) -> bool {
        let (record_id, request) = {
            let Some(modal) = ui.modals.get_mut(modal_id) else {
                return false;
            };
            let ModalKind::EditLink(dialog) = &mut modal.kind else {
                return false;
            };
            match update_request(&dialog.form) {
                Ok(request) => {
                    dialog.form.clear_errors();
                    dialog.error = None;
                    dialog.saving = true;
                    (dialog.record_id.clone(), request)
                }
                Err(errors) => {
                    dialog.form.apply_errors(&errors);
                    dialog.error = Some(errors.to_string());
                    return false;
                }
            }
        };

        match self.api.update_link(&record_id, &request).await {
            Ok(()) => {
                ui.modals.close(modal_id);
                ui.messages.success("Link updated successfully!");
                self.load_links(ui).await;
                true
            }
            Err(e) => {
                if let Some(modal) = ui.modals.get_mut(modal_id)
                    && let ModalKind::EditLink(dialog) = &mut modal.kind
                {
                    dialog.saving = false;
                    dialog.error = Some(e.to_string());
                }
                false
            }
        }
    }

    // ============ 删除 ============

    pub fn request_delete(&mut self, id: &str, ui: &mut Ui) {
        let confirmation = ui.modals.confirm(
            "Delete Link",
            "Are you sure you want to delete this link? This action cannot be undone.",
        );
        self.pending_delete = Some(PendingDelete::new(id, confirmation));
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    /// 刚被确认的删除所对应的 id
    pub fn take_confirmed_delete(&mut self) -> Option<String> {
        take_confirmed(&mut self.pending_delete)
    }

    pub async fn delete_link(&mut self, id: &str, ui: &mut Ui) -> bool {
        match self.api.delete_link(id).await {
            Ok(()) => {
                info!("deleted link {}", id);
                ui.messages.success("Link deleted successfully");
                self.load_links(ui).await;
                true
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    // ============ 视图 ============

    pub fn filter_links(&mut self, query: &str, filter: FilterType) {
        self.links.apply(query, filter);
    }

    pub fn short_url_for(&self, link: &Link) -> String {
        short_url(
            self.api.base_url(),
            &self.link_prefix,
            format_short_code(&link.short_codes),
        )
    }

    pub fn copy_url(&self, id: &str, ui: &mut Ui) -> bool {
        match self.links.get(id) {
            Some(link) => {
                let url = self.short_url_for(link);
                ui.copy_text(&url)
            }
            None => false,
        }
    }

    pub fn count_text(&self) -> String {
        self.links.count_text("link")
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.form.clear();
        self.pending_delete = None;
    }
}

/// 编辑表单 → 整体替换请求
fn update_request(form: &FormState<EditLinkField>) -> Result<UpdateLinkRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check("original_url", validate_url(form.trimmed(EditLinkField::OriginalUrl)));

    // 已过期的记录仍可编辑，这里只检查格式
    let expires_at = match form.optional(EditLinkField::ExpiresAt) {
        Some(input) => match TimeParser::parse_expire_time(&input) {
            Ok(t) => Some(t),
            Err(e) => {
                errors.check("expires_at", Err(e));
                None
            }
        },
        None => None,
    };
    errors.into_result()?;

    Ok(UpdateLinkRequest {
        original_url: Some(form.trimmed(EditLinkField::OriginalUrl).to_string()),
        title: form.optional(EditLinkField::Title),
        description: form.optional(EditLinkField::Description),
        analytics: form.flag(EditLinkField::Analytics),
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_defaults_on() {
        let form = FormState::<LinkField>::new();
        assert!(form.flag(LinkField::Analytics));
    }

    #[test]
    fn test_update_request_allows_past_expiry() {
        let mut form = FormState::<EditLinkField>::new();
        form.set_value(EditLinkField::OriginalUrl, " https://example.com ");
        form.set_value(EditLinkField::ExpiresAt, "2020-01-01T00:00");
        let req = update_request(&form).unwrap();
        assert_eq!(req.original_url.as_deref(), Some("https://example.com"));
        assert!(req.expires_at.is_some());
        assert_eq!(req.title, None);
    }

    #[test]
    fn test_update_request_rejects_bad_fields() {
        let mut form = FormState::<EditLinkField>::new();
        form.set_value(EditLinkField::OriginalUrl, "nope");
        form.set_value(EditLinkField::ExpiresAt, "someday");
        let errors = update_request(&form).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get("original_url").is_some());
    }
}
