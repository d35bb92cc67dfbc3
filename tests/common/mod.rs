//! 测试共享工具：可编程的 Transport 与预置 JSON

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use linker_client::client::{
    ApiClient, ClientError, HttpRequest, HttpResponse, MemorySessionStore, Method, SessionState,
    Transport,
};

pub const BASE_URL: &str = "http://api.test";

struct Route {
    method: Method,
    path: String,
    status: u16,
    body: String,
}

/// 按 (method, path 片段) 返回预置响应，并记录所有请求
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 后注册的路由优先
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes.lock().push(Route {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn count_matching(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url.contains(path))
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.requests.lock().push(request.clone());

        let routes = self.routes.lock();
        let route = routes.iter().rev().find(|r| {
            r.method == request.method && path_of(&request.url).starts_with(r.path.as_str())
        });

        match route {
            Some(route) => Ok(HttpResponse {
                status: route.status,
                body: route.body.clone().into_bytes(),
            }),
            None => Err(ClientError::Network(format!(
                "no route for {} {}",
                request.method.as_str(),
                request.url
            ))),
        }
    }
}

/// URL 中 `/api/v1` 之后的部分
fn path_of(url: &str) -> &str {
    url.split_once("/api/v1").map(|(_, p)| p).unwrap_or(url)
}

pub fn client(transport: Arc<MockTransport>) -> (Arc<ApiClient>, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let api = ApiClient::new(BASE_URL, transport, store.clone());
    (Arc::new(api), store)
}

/// 已登录的客户端
pub fn signed_in_client(
    transport: Arc<MockTransport>,
    token: &str,
) -> (Arc<ApiClient>, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::with_state(SessionState {
        token: Some(token.to_string()),
        user: Some(serde_json::from_value(user_json("alice")).unwrap_or_else(|e| panic!("{e}"))),
        api_url: None,
    }));
    let api = ApiClient::restore(BASE_URL, transport, store.clone()).unwrap();
    (Arc::new(api), store)
}

pub fn user_json(username: &str) -> Value {
    json!({ "id": format!("user-{}", username), "username": username, "email": format!("{}@example.com", username) })
}

pub fn link_json(id: &str, url: &str, title: &str, code: &str, expires_at: Option<&str>) -> Value {
    json!({
        "id": id,
        "original_url": url,
        "title": title,
        "analytics": true,
        "expires_at": expires_at,
        "clicks": 3,
        "created_at": "2024-01-01T00:00:00Z",
        "short_codes": [{ "short_code": code, "is_primary": true }]
    })
}

pub fn file_json(id: &str, name: &str, is_public: bool) -> Value {
    json!({
        "id": id,
        "filename": format!("{}.bin", id),
        "original_name": name,
        "mime_type": "application/pdf",
        "file_size": 1536,
        "is_public": is_public,
        "downloads": 0,
        "created_at": "2024-01-01T00:00:00Z",
        "short_codes": null
    })
}

pub fn token_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "created_at": "2024-01-01T00:00:00Z" })
}
