//! ApiClient 集成测试
//!
//! 覆盖认证头、错误归一化、会话持久化与 API 地址切换。

mod common;

use std::sync::Arc;

use serde_json::json;

use common::{BASE_URL, MockTransport, client, link_json, signed_in_client, user_json};
use linker_client::client::{
    ApiClient, ClientError, FileSessionStore, Method, SessionState, SessionStore,
};
use linker_client::models::{CreateLinkRequest, FileUpload};

// =============================================================================
// 认证
// =============================================================================

#[tokio::test]
async fn test_requests_without_token_have_no_authorization() {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/links", 200, json!({ "links": [] }));
    let (api, _) = client(transport.clone());

    api.list_links(1, 50).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.url, format!("{}/api/v1/links?page=1&limit=50", BASE_URL));
    assert_eq!(request.header("authorization"), None);
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_login_token_is_sent_on_later_requests() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "/auth/login",
        200,
        json!({ "token": "abc", "user": user_json("bob") }),
    );
    transport.on(Method::Get, "/links", 200, json!({ "links": null }));
    let (api, store) = client(transport.clone());

    let response = api.login("bob", "secret123").await.unwrap();
    assert_eq!(response.user.username, "bob");
    api.set_token(Some(response.token)).unwrap();

    let links = api.list_links(1, 50).await.unwrap();
    assert!(links.is_empty());
    assert_eq!(
        transport.last_request().unwrap().header("Authorization"),
        Some("Bearer abc")
    );
    assert_eq!(store.snapshot().token.as_deref(), Some("abc"));

    let body: serde_json::Value =
        serde_json::from_slice(transport.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "username": "bob", "password": "secret123" }));
}

#[tokio::test]
async fn test_login_with_username_only_user() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "/auth/login",
        200,
        json!({ "token": "abc", "user": { "username": "bob" } }),
    );
    transport.on(Method::Get, "/tokens", 200, json!({ "tokens": [] }));
    let (api, store) = client(transport.clone());

    let response = api.login("bob", "secret123").await.unwrap();
    assert_eq!(response.token, "abc");
    assert_eq!(response.user.username, "bob");
    api.set_token(Some(response.token)).unwrap();
    api.save_user(Some(response.user)).unwrap();

    api.list_tokens().await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().header("Authorization"),
        Some("Bearer abc")
    );
    let session = store.snapshot();
    assert_eq!(session.token.as_deref(), Some("abc"));
    assert_eq!(session.user.map(|u| u.username).as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_clearing_token_empties_session() {
    let transport = MockTransport::new();
    let (api, store) = signed_in_client(transport, "abc");
    assert!(api.has_token());

    api.set_token(None).unwrap();
    api.save_user(None).unwrap();

    assert!(!api.has_token());
    assert_eq!(store.snapshot(), SessionState::default());
}

// =============================================================================
// 错误归一化
// =============================================================================

#[tokio::test]
async fn test_status_codes_are_normalized() {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/auth/profile", 401, json!({ "error": "Token expired" }));
    transport.on(Method::Get, "/links/missing", 404, json!({ "error": "Link not found" }));
    transport.on(Method::Get, "/links/broken", 500, json!("<html>"));
    let (api, _) = signed_in_client(transport, "abc");

    assert!(matches!(
        api.profile().await,
        Err(ClientError::Unauthorized(_))
    ));
    assert_eq!(
        api.get_link("missing").await.unwrap_err(),
        ClientError::Api {
            status: 404,
            message: "Link not found".to_string()
        }
    );
    assert_eq!(
        api.get_link("broken").await.unwrap_err().to_string(),
        "HTTP 500: Request failed"
    );
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    let transport = MockTransport::new();
    let (api, _) = signed_in_client(transport, "abc");

    let err = api.list_tokens().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}

#[tokio::test]
async fn test_empty_delete_body_is_accepted() {
    let transport = MockTransport::new();
    transport.on(Method::Delete, "/links/l1", 204, serde_json::Value::Null);
    let (api, _) = signed_in_client(transport.clone(), "abc");

    api.delete_link("l1").await.unwrap();
    assert_eq!(transport.count_matching(Method::Delete, "/links/l1"), 1);
}

#[tokio::test]
async fn test_record_ids_are_encoded_as_one_segment() {
    let transport = MockTransport::new();
    transport.on(Method::Delete, "/links/", 204, serde_json::Value::Null);
    transport.on(Method::Get, "/files/", 404, json!({ "error": "File not found" }));
    let (api, _) = signed_in_client(transport.clone(), "abc");

    api.delete_link("a/b?c#d").await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().url,
        format!("{}/api/v1/links/a%2Fb%3Fc%23d", BASE_URL)
    );

    assert!(api.get_file("..").await.is_err());
    assert_eq!(
        transport.last_request().unwrap().url,
        format!("{}/api/v1/files/%2E%2E", BASE_URL)
    );
}

// =============================================================================
// 请求体
// =============================================================================

#[tokio::test]
async fn test_create_link_omits_empty_optionals() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "/links",
        201,
        link_json("l1", "https://example.com", "", "abc", None),
    );
    let (api, _) = signed_in_client(transport.clone(), "abc");

    let request = CreateLinkRequest {
        original_url: "https://example.com".to_string(),
        analytics: true,
        ..Default::default()
    };
    let link = api.create_link(&request).await.unwrap();
    assert_eq!(link.id, "l1");

    let sent = transport.last_request().unwrap();
    let body: serde_json::Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({ "original_url": "https://example.com", "analytics": true })
    );
}

#[tokio::test]
async fn test_upload_is_multipart() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "/files",
        201,
        common::file_json("f1", "report.pdf", true),
    );
    let (api, _) = signed_in_client(transport.clone(), "abc");

    let upload = FileUpload {
        file_name: "report.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
        title: Some("Q3".to_string()),
        analytics: true,
        is_public: true,
        ..Default::default()
    };
    let file = api.upload_file(&upload).await.unwrap();
    assert_eq!(file.display_name(), "report.pdf");

    let sent = transport.last_request().unwrap();
    let content_type = sent.header("Content-Type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert_eq!(sent.header("Authorization"), Some("Bearer abc"));

    let body = String::from_utf8_lossy(sent.body.as_deref().unwrap()).into_owned();
    assert!(body.contains("filename=\"report.pdf\""));
    assert!(body.contains("%PDF-1.4"));
    assert!(body.contains("name=\"title\""));
}

// =============================================================================
// 会话与 API 地址
// =============================================================================

#[tokio::test]
async fn test_set_api_url_is_persisted_and_used() {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/tokens", 200, json!({ "tokens": [] }));
    let (store_client, store) = signed_in_client(transport.clone(), "abc");
    drop(store_client);

    let mut api = ApiClient::restore(BASE_URL, transport.clone(), store.clone()).unwrap();
    api.set_api_url("https://links.example.org/").unwrap();

    assert_eq!(api.base_url(), "https://links.example.org");
    assert_eq!(
        store.snapshot().api_url.as_deref(),
        Some("https://links.example.org")
    );
    // 地址切换不影响 token
    assert_eq!(store.snapshot().token.as_deref(), Some("abc"));

    api.list_tokens().await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().url,
        "https://links.example.org/api/v1/tokens"
    );

    let restored = ApiClient::restore(BASE_URL, transport, store).unwrap();
    assert_eq!(restored.base_url(), "https://links.example.org");
}

#[test]
fn test_file_session_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

    assert_eq!(store.load().unwrap(), SessionState::default());

    let state = SessionState {
        token: Some("abc".to_string()),
        user: None,
        api_url: Some("http://localhost:9000".to_string()),
    };
    store.save(&state).unwrap();
    assert_eq!(store.load().unwrap(), state);

    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), SessionState::default());
}

#[tokio::test]
async fn test_restore_from_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = Arc::new(FileSessionStore::new(&path));
    store
        .save(&SessionState {
            token: Some("persisted".to_string()),
            user: None,
            api_url: None,
        })
        .unwrap();

    let transport = MockTransport::new();
    transport.on(Method::Get, "/auth/profile", 200, json!({ "id": "u1", "username": "carol" }));
    let api = ApiClient::restore(BASE_URL, transport.clone(), store).unwrap();

    let profile = api.profile().await.unwrap();
    assert_eq!(profile.username, "carol");
    assert_eq!(
        transport.last_request().unwrap().header("Authorization"),
        Some("Bearer persisted")
    );
}
