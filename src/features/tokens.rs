//! API 令牌管理
//!
//! 新建令牌的密钥只在展示弹窗中出现一次

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Collection, PendingDelete, RegionState, take_confirmed};
use crate::client::{ApiClient, ClientError};
use crate::models::{ApiToken, CreateTokenRequest};
use crate::ui::{FormField, FormState, ModalId, Ui};
use crate::utils::helpers::FilterType;
use crate::utils::time_parser::TimeParser;
use crate::utils::validation::{ValidationErrors, validate_expiration_date, validate_token_name};

pub const LOAD_TOKENS_ERROR: &str = "Failed to load tokens";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    Name,
    ExpiresAt,
}

impl FormField for TokenField {
    const ALL: &'static [Self] = &[Self::Name, Self::ExpiresAt];

    fn field_name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ExpiresAt => "expires_at",
        }
    }

    fn display_title(&self) -> &'static str {
        match self {
            Self::Name => "Token Name",
            Self::ExpiresAt => "Expires At (optional, UTC or +30d)",
        }
    }
}

pub struct TokensManager {
    api: Arc<ApiClient>,
    tokens: Collection<ApiToken>,
    pub form: FormState<TokenField>,
    pending_delete: Option<PendingDelete>,
}

impl TokensManager {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            tokens: Collection::new(),
            form: FormState::new(),
            pending_delete: None,
        }
    }

    pub fn tokens(&self) -> &Collection<ApiToken> {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut Collection<ApiToken> {
        &mut self.tokens
    }

    pub fn state(&self) -> &RegionState {
        self.tokens.state()
    }

    pub fn begin_load(&mut self) {
        self.tokens.set_loading();
    }

    pub async fn fetch(&self) -> Result<Vec<ApiToken>, ClientError> {
        self.api.list_tokens().await
    }

    pub fn apply(&mut self, result: Result<Vec<ApiToken>, ClientError>, ui: &mut Ui) -> bool {
        match result {
            Ok(tokens) => {
                debug!("loaded {} tokens", tokens.len());
                self.tokens.replace(tokens);
                true
            }
            Err(e) => {
                warn!("{}: {}", LOAD_TOKENS_ERROR, e);
                self.tokens.fail(LOAD_TOKENS_ERROR);
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    pub async fn load_tokens(&mut self, ui: &mut Ui) -> bool {
        self.begin_load();
        let result = self.fetch().await;
        self.apply(result, ui)
    }

    pub fn validate_form(&self) -> Result<CreateTokenRequest, ValidationErrors> {
        let form = &self.form;
        let mut errors = ValidationErrors::new();
        errors
            .check("name", validate_token_name(form.trimmed(TokenField::Name)))
            .check("expires_at", validate_expiration_date(form.value(TokenField::ExpiresAt)));
        errors.into_result()?;

        Ok(CreateTokenRequest {
            name: form.optional(TokenField::Name),
            expires_at: form
                .optional(TokenField::ExpiresAt)
                .and_then(|s| TimeParser::parse_expire_time(&s).ok()),
        })
    }

    /// 创建令牌并打开展示密钥的弹窗
    pub async fn handle_create_token(&mut self, ui: &mut Ui) -> Option<ModalId> {
        let request = match self.validate_form() {
            Ok(request) => request,
            Err(errors) => {
                self.form.apply_errors(&errors);
                ui.messages.show_validation_errors(&errors);
                return None;
            }
        };
        self.form.clear_errors();

        match self.api.create_token(&request).await {
            Ok(created) => {
                info!("created API token {}", created.api_token.id);
                let modal = ui.modals.show_token(created.token, self.api.base_url());
                self.form.clear();
                self.load_tokens(ui).await;
                Some(modal)
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                None
            }
        }
    }

    pub fn request_delete(&mut self, id: &str, ui: &mut Ui) {
        let confirmation = ui.modals.confirm(
            "Delete Token",
            "Are you sure you want to delete this token? Applications using it will stop working.",
        );
        self.pending_delete = Some(PendingDelete::new(id, confirmation));
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn take_confirmed_delete(&mut self) -> Option<String> {
        take_confirmed(&mut self.pending_delete)
    }

    pub async fn delete_token(&mut self, id: &str, ui: &mut Ui) -> bool {
        match self.api.delete_token(id).await {
            Ok(()) => {
                info!("deleted API token {}", id);
                ui.messages.success("Token deleted successfully!");
                self.load_tokens(ui).await;
                true
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    pub fn filter_tokens(&mut self, query: &str, filter: FilterType) {
        self.tokens.apply(query, filter);
    }

    pub fn count_text(&self) -> String {
        self.tokens.count_text("token")
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.form.clear();
        self.pending_delete = None;
    }
}
