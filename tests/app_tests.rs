//! Application 编排测试：标签页、快捷键、搜索与删除确认

mod common;

use std::time::{Duration, Instant};

use serde_json::json;

use common::{MockTransport, file_json, link_json, signed_in_client, token_json};
use linker_client::app::{Application, Focus, Screen, Shortcut, Tab};
use linker_client::client::Method;
use linker_client::config::AppConfig;
use linker_client::system::clipboard::MemoryClipboard;
use linker_client::utils::helpers::FilterType;

fn seeded_transport() -> std::sync::Arc<MockTransport> {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/auth/profile", 200, json!({ "id": "u1", "username": "alice" }));
    transport.on(
        Method::Get,
        "/links",
        200,
        json!({ "links": [
            link_json("l1", "https://example.com/report", "Report", "rep", None),
            link_json("l2", "https://example.com/other", "Other", "oth", None),
        ] }),
    );
    transport.on(
        Method::Get,
        "/files",
        200,
        json!({ "files": [file_json("f1", "report.pdf", true)] }),
    );
    transport.on(Method::Get, "/tokens", 200, json!({ "tokens": [token_json("t1", "ci")] }));
    transport
}

async fn dashboard(transport: std::sync::Arc<MockTransport>) -> Application {
    let (api, _) = signed_in_client(transport, "abc");
    let mut app = Application::new(&AppConfig::default(), api, Box::new(MemoryClipboard::new()));
    app.init().await;
    app
}

#[tokio::test]
async fn test_init_with_valid_session_opens_dashboard() {
    let transport = seeded_transport();
    let app = dashboard(transport.clone()).await;

    assert_eq!(app.screen, Screen::Dashboard);
    assert_eq!(app.view.active_tab, Tab::Links);
    assert_eq!(app.links.links().items().len(), 2);
    assert_eq!(transport.count_matching(Method::Get, "/links"), 1);
}

#[tokio::test]
async fn test_switching_to_active_tab_is_noop() {
    let transport = seeded_transport();
    let mut app = dashboard(transport.clone()).await;
    let before = transport.request_count();

    assert!(!app.switch_tab(Tab::Links).await);
    assert_eq!(transport.request_count(), before);

    assert!(app.switch_tab(Tab::Files).await);
    assert_eq!(app.view.active_tab, Tab::Files);
    assert_eq!(transport.count_matching(Method::Get, "/files"), 1);
    assert_eq!(app.files.files().items().len(), 1);
}

#[tokio::test]
async fn test_shortcuts_suppressed_while_typing() {
    let transport = seeded_transport();
    let mut app = dashboard(transport.clone()).await;
    let before = transport.request_count();

    app.focus = Focus::Search;
    assert!(app.is_typing());
    assert!(!app.handle_shortcut(Shortcut::SwitchTab(Tab::Tokens)).await);
    assert!(!app.handle_shortcut(Shortcut::Quit).await);
    assert_eq!(app.view.active_tab, Tab::Links);
    assert!(!app.should_quit());
    assert_eq!(transport.request_count(), before);

    app.focus = Focus::List;
    assert!(app.handle_shortcut(Shortcut::SwitchTab(Tab::Tokens)).await);
    assert_eq!(app.view.active_tab, Tab::Tokens);
    assert!(app.handle_shortcut(Shortcut::Quit).await);
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_search_applies_to_every_list() {
    let transport = seeded_transport();
    let mut app = dashboard(transport).await;
    app.refresh_all().await;

    app.set_search("REPORT");
    assert_eq!(app.links.links().visible_len(), 1);
    assert_eq!(app.files.files().visible_len(), 1);
    assert_eq!(app.tokens.tokens().visible_len(), 0);

    app.set_filter(FilterType::Private);
    assert_eq!(app.files.files().visible_len(), 0);

    app.set_search("");
    app.set_filter(FilterType::All);
    assert_eq!(app.links.links().visible_len(), 2);
    assert_eq!(app.tokens.tokens().visible_len(), 1);
}

#[tokio::test]
async fn test_typed_search_waits_for_pause() {
    let transport = seeded_transport();
    let mut app = dashboard(transport).await;
    let start = Instant::now();

    app.type_search("other", start);
    app.tick(start + Duration::from_millis(100)).await;
    assert_eq!(app.links.links().visible_len(), 2);

    app.tick(start + Duration::from_millis(400)).await;
    assert_eq!(app.links.links().visible_len(), 1);
    assert_eq!(app.links.links().selected().unwrap().id, "l2");
}

#[tokio::test]
async fn test_refresh_all_reports_success() {
    let transport = seeded_transport();
    let mut app = dashboard(transport.clone()).await;

    assert!(app.refresh_all().await);
    assert_eq!(
        app.ui.messages.messages().last().unwrap().text,
        "Data refreshed successfully!"
    );
    assert_eq!(transport.count_matching(Method::Get, "/tokens"), 1);
}

#[tokio::test]
async fn test_confirmed_delete_runs_on_tick() {
    let transport = seeded_transport();
    transport.on(Method::Delete, "/links/l1", 204, serde_json::Value::Null);
    let mut app = dashboard(transport.clone()).await;

    app.delete_selected();
    assert!(app.ui.modals.is_open());
    app.tick(Instant::now()).await;
    assert_eq!(transport.count_matching(Method::Delete, "/links/l1"), 0);

    app.submit_modal().await;
    app.tick(Instant::now()).await;
    assert_eq!(transport.count_matching(Method::Delete, "/links/l1"), 1);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let transport = seeded_transport();
    let mut app = dashboard(transport.clone()).await;

    app.delete_selected();
    app.decline_modal();
    app.tick(Instant::now()).await;

    assert_eq!(transport.count_matching(Method::Delete, "/links"), 0);
    assert!(app.links.pending_delete().is_none());
}

#[tokio::test]
async fn test_logout_drops_cached_data() {
    let transport = seeded_transport();
    let mut app = dashboard(transport).await;
    app.set_search("report");

    app.logout();

    assert_eq!(app.screen, Screen::SignIn);
    assert!(app.links.links().items().is_empty());
    assert!(app.view.search.is_empty());
    assert!(!app.auth.is_authenticated());
    assert!(!app.api().has_token());
}
