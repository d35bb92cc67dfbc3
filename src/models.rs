//! Linker REST API 的数据类型
//!
//! 记录归服务器所有，客户端只持有快照，每次成功拉取后整体替换。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 显式的 JSON `null` 与缺失字段同等对待
///
/// 后端会把空切片序列化为 `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// 部分登录响应只带 username
    #[serde(default)]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub short_code: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl ShortCode {
    pub fn new(code: impl Into<String>, is_primary: bool) -> Self {
        Self {
            id: None,
            short_code: code.into(),
            is_primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub original_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_codes: Vec<ShortCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub downloads: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_codes: Vec<ShortCode>,
}

impl FileRecord {
    /// 展示名：优先上传时的文件名，其次存储名
    pub fn display_name(&self) -> &str {
        if self.original_name.is_empty() {
            &self.filename
        } else {
            &self.original_name
        }
    }
}

/// 用户签发的长期凭据，列表中不包含密钥本身
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiToken {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

// ============ 统计 ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAnalytics {
    pub user_id: String,
    pub total_links: i64,
    pub total_clicks: i64,
    pub clicks_today: i64,
    pub clicks_this_week: i64,
    pub clicks_this_month: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub top_links: Vec<LinkAnalyticsSummary>,
    #[serde(deserialize_with = "null_as_default")]
    pub clicks_by_date: Vec<ClicksByDate>,
    #[serde(deserialize_with = "null_as_default")]
    pub top_referrers: Vec<ReferrerStats>,
    #[serde(deserialize_with = "null_as_default")]
    pub top_countries: Vec<CountryStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkAnalyticsSummary {
    pub link_id: String,
    pub original_url: String,
    pub title: String,
    pub short_code: String,
    pub total_clicks: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClicksByDate {
    pub date: String,
    pub clicks: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferrerStats {
    pub referer: String,
    pub clicks: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryStats {
    pub country: String,
    pub clicks: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnalyticsSummary {
    pub file_id: String,
    pub total_downloads: i64,
    pub downloads_today: i64,
    pub downloads_this_week: i64,
    pub downloads_this_month: i64,
    pub unique_visitors: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub top_referrers: Vec<ReferrerCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferrerCount {
    pub referer: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFileStats {
    pub file_id: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub total_downloads: i64,
    pub recent_downloads: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFileAnalytics {
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub files: Vec<UserFileStats>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Click {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkAnalytics {
    pub link_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clicks: Vec<Click>,
    pub total: i64,
}

// ============ 请求 ============

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateLinkRequest {
    pub original_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub analytics: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// 整体替换链接的可编辑字段，`expires_at: None` 清除过期时间
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub analytics: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&Link> for UpdateLinkRequest {
    fn from(link: &Link) -> Self {
        Self {
            original_url: Some(link.original_url.clone()),
            title: link.title.clone(),
            description: link.description.clone(),
            analytics: link.analytics,
            expires_at: link.expires_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateFileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub analytics: bool,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&FileRecord> for UpdateFileRequest {
    fn from(file: &FileRecord) -> Self {
        Self {
            title: file.title.clone(),
            description: file.description.clone(),
            analytics: file.analytics,
            is_public: file.is_public,
            password: None,
            expires_at: file.expires_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateTokenRequest {
    pub name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// `POST /files` 的 multipart 上传内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_codes: Vec<String>,
    pub analytics: bool,
    pub is_public: bool,
    pub password: Option<String>,
}

// ============ 响应包装 ============

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LinksResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokensResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tokens: Vec<ApiToken>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateTokenResponse {
    pub token: String,
    pub api_token: ApiToken,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ============ 搜索 ============

/// 可被搜索框和状态筛选缩小范围的记录
pub trait Searchable {
    /// 参与搜索匹配的文本片段
    fn search_fields(&self) -> Vec<&str>;

    fn expires_at(&self) -> Option<DateTime<Utc>>;

    /// 没有可见性标记的记录返回 `None`
    fn is_public(&self) -> Option<bool> {
        None
    }
}

/// 服务器分配的记录标识
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Link {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for FileRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ApiToken {
    fn id(&self) -> &str {
        &self.id
    }
}

fn push_codes<'a>(fields: &mut Vec<&'a str>, codes: &'a [ShortCode]) {
    fields.extend(codes.iter().map(|c| c.short_code.as_str()));
}

impl Searchable for Link {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(3 + self.short_codes.len());
        fields.extend(self.title.as_deref());
        fields.extend(self.description.as_deref());
        fields.push(&self.original_url);
        push_codes(&mut fields, &self.short_codes);
        fields
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl Searchable for FileRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(3 + self.short_codes.len());
        fields.extend(self.title.as_deref());
        fields.extend(self.description.as_deref());
        fields.push(self.display_name());
        push_codes(&mut fields, &self.short_codes);
        fields
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    fn is_public(&self) -> Option<bool> {
        Some(self.is_public)
    }
}

impl Searchable for ApiToken {
    fn search_fields(&self) -> Vec<&str> {
        self.name.as_deref().into_iter().collect()
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}
