//! 登录、注册与会话状态

use std::sync::Arc;

use tracing::{info, warn};

use crate::client::ApiClient;
use crate::models::{AuthResponse, User};
use crate::ui::{FieldKind, FormField, FormState, Ui};
use crate::utils::validation::{
    ValidationErrors, validate_email, validate_password, validate_username,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

impl FormField for LoginField {
    const ALL: &'static [Self] = &[Self::Username, Self::Password];

    fn field_name(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    fn display_title(&self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Password => FieldKind::Secret,
            Self::Username => FieldKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Username,
    Email,
    Password,
}

impl FormField for RegisterField {
    const ALL: &'static [Self] = &[Self::Username, Self::Email, Self::Password];

    fn field_name(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn display_title(&self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Password => FieldKind::Secret,
            _ => FieldKind::Text,
        }
    }
}

/// 登录页当前显示的表单
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

pub struct AuthManager {
    api: Arc<ApiClient>,
    user: Option<User>,
    pub mode: AuthMode,
    pub login_form: FormState<LoginField>,
    pub register_form: FormState<RegisterField>,
}

impl AuthManager {
    /// 从已恢复的会话中读取用户
    pub fn new(api: Arc<ApiClient>) -> Self {
        let user = api.stored_user();
        Self {
            api,
            user,
            mode: AuthMode::Login,
            login_form: FormState::new(),
            register_form: FormState::new(),
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// 同时持有 token 与用户信息才视为已登录
    pub fn is_authenticated(&self) -> bool {
        self.api.has_token() && self.user.is_some()
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .check("username", validate_username(username))
            .check("password", validate_password(password));
        errors.into_result()
    }

    pub fn validate_register(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .check("username", validate_username(username))
            .check("email", validate_email(email))
            .check("password", validate_password(password));
        errors.into_result()
    }

    /// 保存 token 与用户；持久化失败只记录日志，内存中的会话仍然有效
    fn establish(&mut self, response: AuthResponse) -> &User {
        if let Err(e) = self.api.set_token(Some(response.token)) {
            warn!("Failed to persist token: {}", e);
        }
        if let Err(e) = self.api.save_user(Some(response.user.clone())) {
            warn!("Failed to persist user: {}", e);
        }
        self.user.insert(response.user)
    }

    pub async fn login(&mut self, username: &str, password: &str, ui: &mut Ui) -> bool {
        if let Err(errors) = Self::validate_login(username, password) {
            ui.messages.show_validation_errors(&errors);
            return false;
        }

        match self.api.login(username, password).await {
            Ok(response) => {
                let user = self.establish(response);
                info!("Signed in as {}", user.username);
                let text = format!("Welcome back, {}!", user.username);
                ui.messages.success(text);
                true
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        ui: &mut Ui,
    ) -> bool {
        if let Err(errors) = Self::validate_register(username, email, password) {
            ui.messages.show_validation_errors(&errors);
            return false;
        }

        match self.api.register(username, email, password).await {
            Ok(response) => {
                let user = self.establish(response);
                info!("Registered {}", user.username);
                let text = format!("Welcome, {}!", user.username);
                ui.messages.success(text);
                true
            }
            Err(e) => {
                ui.messages.show_api_error(&e);
                false
            }
        }
    }

    /// 提交登录表单
    pub async fn handle_login(&mut self, ui: &mut Ui) -> bool {
        let username = self.login_form.trimmed(LoginField::Username).to_string();
        let password = self.login_form.value(LoginField::Password).to_string();
        match Self::validate_login(&username, &password) {
            Ok(()) => self.login_form.clear_errors(),
            Err(errors) => self.login_form.apply_errors(&errors),
        }

        let ok = self.login(&username, &password, ui).await;
        if ok {
            self.login_form.clear();
        }
        ok
    }

    pub async fn handle_register(&mut self, ui: &mut Ui) -> bool {
        let form = &self.register_form;
        let username = form.trimmed(RegisterField::Username).to_string();
        let email = form.trimmed(RegisterField::Email).to_string();
        let password = form.value(RegisterField::Password).to_string();
        match Self::validate_register(&username, &email, &password) {
            Ok(()) => self.register_form.clear_errors(),
            Err(errors) => self.register_form.apply_errors(&errors),
        }

        let ok = self.register(&username, &email, &password, ui).await;
        if ok {
            self.register_form.clear();
            self.mode = AuthMode::Login;
        }
        ok
    }

    /// 清除 token 与用户信息
    pub fn logout(&mut self, ui: &mut Ui) {
        self.sign_out();
        ui.messages.info("Logged out successfully");
    }

    fn sign_out(&mut self) {
        if let Err(e) = self.api.set_token(None) {
            warn!("Failed to clear stored token: {}", e);
        }
        if let Err(e) = self.api.save_user(None) {
            warn!("Failed to clear stored user: {}", e);
        }
        self.user = None;
        self.login_form.clear();
        self.register_form.clear();
    }

    /// 校验已保存的 token；任何失败都会登出
    pub async fn check_auth_status(&mut self, ui: &mut Ui) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        match self.api.profile().await {
            Ok(profile) => {
                info!("Session valid for {}", profile.username);
                true
            }
            Err(e) => {
                warn!("Stored session rejected: {}", e);
                self.logout(ui);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_register_collects_all() {
        let errors = AuthManager::validate_register("ab", "bad", "123").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get("email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_validate_login_ok() {
        assert!(AuthManager::validate_login("alice", "secret1").is_ok());
    }
}
