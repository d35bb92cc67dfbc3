use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::multipart::MultipartBody;
use super::session::{SessionState, SessionStore};
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use super::ClientError;
use crate::models::{
    ApiToken, AuthResponse, CreateLinkRequest, CreateTokenRequest, CreateTokenResponse,
    FileAnalyticsSummary, FileRecord, FileUpload, FilesResponse, Link, LinkAnalytics,
    LinksResponse, LoginRequest, ProfileResponse, RegisterRequest, TokensResponse,
    UpdateFileRequest, UpdateLinkRequest, User, UserAnalytics, UserFileAnalytics,
};

pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// 把记录 id 编码成单个路径段；`.` 与 `..` 也会被转义
fn segment(id: &str) -> String {
    match id {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => urlencoding::encode(id).into_owned(),
    }
}

/// 仪表盘所用全部 REST 接口的认证客户端
///
/// 持有 bearer token，设置后附加到每个请求并通过 `SessionStore` 持久化
pub struct ApiClient {
    base_url: String,
    session: RwLock<SessionState>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// 未加载会话的客户端
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            session: RwLock::new(SessionState::default()),
            transport,
            store,
        }
    }

    /// 从已保存的会话重建，保存的 `api_url` 优先于 `default_base_url`
    pub fn restore(
        default_base_url: &str,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        let state = store.load()?;
        let base_url = state
            .api_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(default_base_url)
            .to_string();

        debug!(
            "Restored session (token: {}, api_url: {})",
            state.token.is_some(),
            base_url
        );

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            session: RwLock::new(state),
            transport,
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.session.read().token.clone()
    }

    pub fn has_token(&self) -> bool {
        self.session.read().token.is_some()
    }

    /// 替换并持久化 bearer token，`None` 表示登出
    pub fn set_token(&self, token: Option<String>) -> Result<(), ClientError> {
        let snapshot = {
            let mut session = self.session.write();
            session.token = token.filter(|t| !t.is_empty());
            session.clone()
        };
        self.persist(&snapshot)
    }

    pub fn stored_user(&self) -> Option<User> {
        self.session.read().user.clone()
    }

    pub fn save_user(&self, user: Option<User>) -> Result<(), ClientError> {
        let snapshot = {
            let mut session = self.session.write();
            session.user = user;
            session.clone()
        };
        self.persist(&snapshot)
    }

    /// 切换服务器地址并记住，供之后运行使用
    pub fn set_api_url(&mut self, url: &str) -> Result<(), ClientError> {
        self.base_url = normalize_base_url(url);
        let snapshot = {
            let mut session = self.session.write();
            session.api_url = Some(self.base_url.clone());
            session.clone()
        };
        info!("API URL set to {}", self.base_url);
        self.persist(&snapshot)
    }

    fn persist(&self, state: &SessionState) -> Result<(), ClientError> {
        if state == &SessionState::default() {
            self.store.clear()
        } else {
            self.store.save(state)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn headers(&self, content_type: &str) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), content_type.to_string())];
        if let Some(token) = self.session.read().token.as_deref() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        headers
    }

    // ============ 通用请求 ============

    /// 发送 JSON 请求，`body` 已序列化
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError> {
        let request = HttpRequest {
            method,
            url: self.url(path),
            headers: self.headers("application/json"),
            body,
        };
        let response = self.transport.send(request).await?;
        parse_response(method, path, response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::Delete, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(body)?;
        self.request(Method::Post, path, Some(bytes)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(body)?;
        self.request(Method::Put, path, Some(bytes)).await
    }

    /// 发送 `multipart/form-data` 请求体，不设置 JSON Content-Type
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartBody,
    ) -> Result<T, ClientError> {
        let request = HttpRequest {
            method: Method::Post,
            url: self.url(path),
            headers: self.headers(&form.content_type()),
            body: Some(form.finish()),
        };
        let response = self.transport.send(request).await?;
        parse_response(Method::Post, path, response)
    }

    // ============ 认证 ============

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.post("/auth/login", &LoginRequest { username, password })
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        self.post(
            "/auth/register",
            &RegisterRequest {
                username,
                email,
                password,
            },
        )
        .await
    }

    pub async fn profile(&self) -> Result<ProfileResponse, ClientError> {
        self.get("/auth/profile").await
    }

    // ============ 链接 ============

    pub async fn list_links(&self, page: u32, limit: u32) -> Result<Vec<Link>, ClientError> {
        let response: LinksResponse = self
            .get(&format!("/links?page={}&limit={}", page, limit))
            .await?;
        Ok(response.links)
    }

    pub async fn get_link(&self, id: &str) -> Result<Link, ClientError> {
        self.get(&format!("/links/{}", segment(id))).await
    }

    pub async fn create_link(&self, req: &CreateLinkRequest) -> Result<Link, ClientError> {
        self.post("/links", req).await
    }

    pub async fn update_link(&self, id: &str, req: &UpdateLinkRequest) -> Result<(), ClientError> {
        self.put::<serde_json::Value, _>(&format!("/links/{}", segment(id)), req)
            .await
            .map(|_| ())
    }

    pub async fn delete_link(&self, id: &str) -> Result<(), ClientError> {
        self.delete::<serde_json::Value>(&format!("/links/{}", segment(id)))
            .await
            .map(|_| ())
    }

    // ============ 文件 ============

    pub async fn upload_file(&self, upload: &FileUpload) -> Result<FileRecord, ClientError> {
        let mut form = MultipartBody::new();
        form.file(
            "file",
            &upload.file_name,
            &upload.content_type,
            &upload.bytes,
        );
        if let Some(title) = upload.title.as_deref().filter(|t| !t.is_empty()) {
            form.text("title", title);
        }
        if let Some(description) = upload.description.as_deref().filter(|d| !d.is_empty()) {
            form.text("description", description);
        }
        form.text("analytics", bool_str(upload.analytics));
        form.text("is_public", bool_str(upload.is_public));
        if let Some(password) = upload.password.as_deref().filter(|p| !p.is_empty()) {
            form.text("password", password);
        }
        for code in &upload.short_codes {
            form.text("short_codes", code);
        }

        info!(
            "Uploading {} ({} bytes)",
            upload.file_name,
            upload.bytes.len()
        );
        self.upload("/files", form).await
    }

    pub async fn list_files(&self, page: u32, limit: u32) -> Result<Vec<FileRecord>, ClientError> {
        let response: FilesResponse = self
            .get(&format!("/files?page={}&limit={}", page, limit))
            .await?;
        Ok(response.files)
    }

    pub async fn get_file(&self, id: &str) -> Result<FileRecord, ClientError> {
        self.get(&format!("/files/{}", segment(id))).await
    }

    pub async fn update_file(&self, id: &str, req: &UpdateFileRequest) -> Result<(), ClientError> {
        self.put::<serde_json::Value, _>(&format!("/files/{}", segment(id)), req)
            .await
            .map(|_| ())
    }

    pub async fn delete_file(&self, id: &str) -> Result<(), ClientError> {
        self.delete::<serde_json::Value>(&format!("/files/{}", segment(id)))
            .await
            .map(|_| ())
    }

    // ============ 令牌 ============

    pub async fn create_token(
        &self,
        req: &CreateTokenRequest,
    ) -> Result<CreateTokenResponse, ClientError> {
        self.post("/tokens", req).await
    }

    pub async fn list_tokens(&self) -> Result<Vec<ApiToken>, ClientError> {
        let response: TokensResponse = self.get("/tokens").await?;
        Ok(response.tokens)
    }

    pub async fn delete_token(&self, id: &str) -> Result<(), ClientError> {
        self.delete::<serde_json::Value>(&format!("/tokens/{}", segment(id)))
            .await
            .map(|_| ())
    }

    // ============ 统计 ============

    pub async fn user_analytics(&self) -> Result<UserAnalytics, ClientError> {
        self.get("/analytics/user").await
    }

    pub async fn user_file_analytics(&self) -> Result<UserFileAnalytics, ClientError> {
        self.get("/analytics/files").await
    }

    pub async fn link_analytics(&self, id: &str) -> Result<LinkAnalytics, ClientError> {
        self.get(&format!("/analytics/links/{}", segment(id))).await
    }

    pub async fn file_analytics(&self, id: &str) -> Result<FileAnalyticsSummary, ClientError> {
        self.get(&format!("/analytics/files/{}/summary", segment(id))).await
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn parse_response<T: DeserializeOwned>(
    method: Method,
    path: &str,
    response: HttpResponse,
) -> Result<T, ClientError> {
    if !response.is_success() {
        let message = error_message(&response);
        warn!(
            "{} {} failed with {}: {}",
            method.as_str(),
            path,
            response.status,
            message
        );
        return Err(if response.status == 401 {
            ClientError::Unauthorized(message)
        } else {
            ClientError::Api {
                status: response.status,
                message,
            }
        });
    }

    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|e| ClientError::Serialization(e.to_string()))
}

/// 取响应体的 `error` 字段，否则为 `"HTTP <status>: Request failed"`
fn error_message(response: &HttpResponse) -> String {
    serde_json::from_slice::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}: Request failed", response.status))
}
