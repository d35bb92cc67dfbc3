//! 功能模块集成测试：加载、筛选、表单校验与删除确认

mod common;

use serde_json::json;

use common::{MockTransport, client, file_json, link_json, signed_in_client, token_json, user_json};
use linker_client::client::Method;
use linker_client::config::AppConfig;
use linker_client::features::links::LinkField;
use linker_client::features::{AuthManager, FilesManager, LinksManager, RegionState, TokensManager};
use linker_client::models::Record;
use linker_client::system::clipboard::MemoryClipboard;
use linker_client::ui::{Confirmation, Severity, Ui};
use linker_client::utils::helpers::FilterType;

fn ui() -> Ui {
    Ui::new(5000, Box::new(MemoryClipboard::new()))
}

fn last_text(ui: &Ui) -> String {
    ui.messages
        .messages()
        .last()
        .map(|m| m.text.clone())
        .unwrap_or_default()
}

fn visible_ids<T: Record>(items: Vec<&T>) -> Vec<String> {
    items.into_iter().map(|item| item.id().to_string()).collect()
}

// =============================================================================
// 链接
// =============================================================================

#[tokio::test]
async fn test_filter_survives_reload() {
    let transport = MockTransport::new();
    transport.on(
        Method::Get,
        "/links",
        200,
        json!({ "links": [
            link_json("1", "https://example.com/a", "Launch", "launch", None),
            link_json("2", "https://example.com/b", "Old", "old", Some("2000-01-01T00:00:00Z")),
        ] }),
    );
    let (api, _) = signed_in_client(transport.clone(), "abc");
    let mut links = LinksManager::new(api, &AppConfig::default());
    let mut ui = ui();

    assert!(links.load_links(&mut ui).await);
    assert_eq!(links.links().visible_len(), 2);

    links.filter_links("", FilterType::Expired);
    assert_eq!(visible_ids(links.links().visible()), vec!["2"]);

    // 新数据到达后仍按当前筛选条件展示
    transport.on(
        Method::Get,
        "/links",
        200,
        json!({ "links": [
            link_json("1", "https://example.com/a", "Launch", "launch", None),
            link_json("2", "https://example.com/b", "Old", "old", Some("2000-01-01T00:00:00Z")),
            link_json("3", "https://example.com/c", "Older", "older", Some("2001-01-01T00:00:00Z")),
        ] }),
    );
    assert!(links.load_links(&mut ui).await);
    assert_eq!(links.links().items().len(), 3);
    assert_eq!(visible_ids(links.links().visible()), vec!["2", "3"]);
    assert_eq!(links.count_text(), "2 links");
}

#[tokio::test]
async fn test_failed_reload_keeps_cache() {
    let transport = MockTransport::new();
    transport.on(
        Method::Get,
        "/links",
        200,
        json!({ "links": [link_json("1", "https://example.com/a", "A", "a", None)] }),
    );
    let (api, _) = signed_in_client(transport.clone(), "abc");
    let mut links = LinksManager::new(api, &AppConfig::default());
    let mut ui = ui();
    links.load_links(&mut ui).await;

    transport.on(Method::Get, "/links", 500, json!({ "error": "database down" }));
    assert!(!links.load_links(&mut ui).await);

    assert_eq!(links.links().items().len(), 1);
    assert!(matches!(links.state(), RegionState::Error(_)));
    assert_eq!(last_text(&ui), "database down");
}

#[tokio::test]
async fn test_invalid_link_form_sends_nothing() {
    let transport = MockTransport::new();
    let (api, _) = signed_in_client(transport.clone(), "abc");
    let mut links = LinksManager::new(api, &AppConfig::default());
    let mut ui = ui();

    links.form.set_value(LinkField::OriginalUrl, "not a url");
    assert!(!links.handle_create_link(&mut ui).await);

    assert_eq!(transport.request_count(), 0);
    assert!(links.form.get_error(LinkField::OriginalUrl).is_some());
    let message = ui.messages.messages().last().unwrap();
    assert_eq!(message.severity, Severity::Error);
    assert!(message.text.starts_with("original_url"));
}

#[tokio::test]
async fn test_create_link_reloads_and_clears_form() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "/links",
        201,
        link_json("9", "https://example.com/new", "New", "promo", None),
    );
    transport.on(
        Method::Get,
        "/links",
        200,
        json!({ "links": [link_json("9", "https://example.com/new", "New", "promo", None)] }),
    );
    let (api, _) = signed_in_client(transport.clone(), "abc");
    let mut links = LinksManager::new(api, &AppConfig::default());
    let mut ui = ui();

    links.form.set_value(LinkField::OriginalUrl, " https://example.com/new ");
    links.form.set_value(LinkField::ShortCodes, "promo, , spring");
    assert!(links.handle_create_link(&mut ui).await);

    let create = &transport.requests()[0];
    let body: serde_json::Value = serde_json::from_slice(create.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["original_url"], "https://example.com/new");
    assert_eq!(body["short_codes"], json!(["promo", "spring"]));

    assert_eq!(links.form.value(LinkField::OriginalUrl), "");
    assert_eq!(links.links().items().len(), 1);
    assert!(
        ui.messages
            .messages()
            .iter()
            .any(|m| m.text == "Link created successfully!")
    );
}

#[tokio::test]
async fn test_delete_waits_for_confirmation() {
    let transport = MockTransport::new();
    transport.on(Method::Delete, "/links/1", 204, serde_json::Value::Null);
    transport.on(Method::Get, "/links", 200, json!({ "links": [] }));
    let (api, _) = signed_in_client(transport.clone(), "abc");
    let mut links = LinksManager::new(api, &AppConfig::default());
    let mut ui = ui();

    links.request_delete("1", &mut ui);
    assert_eq!(ui.modals.len(), 1);
    assert!(links.take_confirmed_delete().is_none());

    let modal_id = links.pending_delete().unwrap().modal_id();
    ui.modals.answer_confirm(modal_id, Confirmation::Confirmed);

    let id = links.take_confirmed_delete().unwrap();
    assert_eq!(id, "1");
    assert!(links.pending_delete().is_none());
    assert!(links.delete_link(&id, &mut ui).await);
    assert_eq!(transport.count_matching(Method::Delete, "/links/1"), 1);
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let transport = MockTransport::new();
    let (api, _) = signed_in_client(transport.clone(), "abc");
    let mut tokens = TokensManager::new(api);
    let mut ui = ui();

    tokens.request_delete("t1", &mut ui);
    let modal_id = tokens.pending_delete().unwrap().modal_id();
    ui.modals.answer_confirm(modal_id, Confirmation::Cancelled);

    assert!(tokens.take_confirmed_delete().is_none());
    assert!(tokens.pending_delete().is_none());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_copy_link_uses_short_url() {
    let transport = MockTransport::new();
    transport.on(
        Method::Get,
        "/links",
        200,
        json!({ "links": [link_json("1", "https://example.com/a", "A", "abc", None)] }),
    );
    let (api, _) = signed_in_client(transport, "abc");
    let mut links = LinksManager::new(api, &AppConfig::default());

    let clipboard = MemoryClipboard::new();
    let copied = clipboard.handle();
    let mut ui = Ui::new(5000, Box::new(clipboard));
    links.load_links(&mut ui).await;

    assert!(links.copy_url("1", &mut ui));
    assert_eq!(*copied.lock(), vec!["http://api.test/s/abc".to_string()]);
    assert_eq!(last_text(&ui), "📋 Copied to clipboard!");
}

// =============================================================================
// 文件与令牌
// =============================================================================

#[tokio::test]
async fn test_file_visibility_filter() {
    let transport = MockTransport::new();
    transport.on(
        Method::Get,
        "/files",
        200,
        json!({ "files": [
            file_json("f1", "public.pdf", true),
            file_json("f2", "secret.pdf", false),
        ] }),
    );
    let (api, _) = signed_in_client(transport, "abc");
    let mut files = FilesManager::new(api, &AppConfig::default());
    let mut ui = ui();

    assert!(files.load_files(&mut ui).await);
    files.filter_files("", FilterType::Private);
    assert_eq!(visible_ids(files.files().visible()), vec!["f2"]);
    files.filter_files("public", FilterType::All);
    assert_eq!(visible_ids(files.files().visible()), vec!["f1"]);
    assert_eq!(files.count_text(), "1 file");
}

#[tokio::test]
async fn test_null_token_list_is_empty() {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/tokens", 200, json!({ "tokens": null }));
    let (api, _) = signed_in_client(transport.clone(), "abc");
    let mut tokens = TokensManager::new(api);
    let mut ui = ui();

    assert!(tokens.load_tokens(&mut ui).await);
    assert_eq!(tokens.count_text(), "0 tokens");

    transport.on(Method::Get, "/tokens", 200, json!({ "tokens": [token_json("t1", "ci")] }));
    assert!(tokens.load_tokens(&mut ui).await);
    assert_eq!(tokens.count_text(), "1 token");
}

// =============================================================================
// 认证
// =============================================================================

#[tokio::test]
async fn test_login_welcomes_user() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "/auth/login",
        200,
        json!({ "token": "t0k", "user": user_json("bob") }),
    );
    let (api, store) = client(transport);
    let mut auth = AuthManager::new(api);
    let mut ui = ui();

    assert!(auth.login("bob", "secret123", &mut ui).await);
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user().unwrap().username, "bob");
    assert!(last_text(&ui).contains("bob"));
    assert_eq!(store.snapshot().token.as_deref(), Some("t0k"));
}

#[tokio::test]
async fn test_login_accepts_minimal_user_payload() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "/auth/login",
        200,
        json!({ "token": "abc", "user": { "username": "bob" } }),
    );
    transport.on(Method::Get, "/links", 200, json!({ "links": [] }));
    let (api, store) = client(transport.clone());
    let mut auth = AuthManager::new(api.clone());
    let mut ui = ui();

    assert!(auth.login("bob", "secret123", &mut ui).await);
    assert_eq!(last_text(&ui), "Welcome back, bob!");
    assert_eq!(auth.current_user().unwrap().username, "bob");
    assert_eq!(store.snapshot().token.as_deref(), Some("abc"));

    // 后续请求携带新 token
    api.list_links(1, 50).await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().header("Authorization"),
        Some("Bearer abc")
    );
}

#[tokio::test]
async fn test_invalid_login_is_rejected_locally() {
    let transport = MockTransport::new();
    let (api, _) = client(transport.clone());
    let mut auth = AuthManager::new(api);
    let mut ui = ui();

    assert!(!auth.login("bo", "123", &mut ui).await);
    assert_eq!(transport.request_count(), 0);
    assert_eq!(ui.messages.len(), 2);
}

#[tokio::test]
async fn test_rejected_session_logs_out() {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/auth/profile", 401, json!({ "error": "expired" }));
    let (api, store) = signed_in_client(transport, "stale");
    let mut auth = AuthManager::new(api);
    let mut ui = ui();
    assert!(auth.is_authenticated());

    assert!(!auth.check_auth_status(&mut ui).await);
    assert!(!auth.is_authenticated());
    assert!(store.snapshot().token.is_none());
    assert_eq!(last_text(&ui), "Logged out successfully");
}
