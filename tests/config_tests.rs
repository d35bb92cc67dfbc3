//! 配置加载测试：TOML 文件与 LINKER__ 环境变量
//!
//! 环境变量是进程级的，各测试只读写互不重叠的键。

use std::io::Write;

use linker_client::config::AppConfig;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
[api]
base_url = "https://links.example.org"
link_prefix = "go"

[ui]
page_size = 25
"#,
    );

    let config = AppConfig::try_load(Some(file.path())).unwrap();
    assert_eq!(config.api.base_url, "https://links.example.org");
    assert_eq!(config.api.link_prefix, "go");
    // 未出现的键使用默认值
    assert_eq!(config.api.file_prefix, "f");
    assert_eq!(config.ui.page_size, 25);
}

#[test]
fn test_env_overrides_file() {
    let file = write_config(
        r#"
[api]
timeout_secs = 10

[logging]
level = "warn"
"#,
    );

    // SAFETY: 本测试文件中只有这里写入这两个键
    unsafe {
        std::env::set_var("LINKER__API__TIMEOUT_SECS", "90");
        std::env::set_var("LINKER__LOGGING__LEVEL", "debug");
    }
    let loaded = AppConfig::try_load(Some(file.path()));
    unsafe {
        std::env::remove_var("LINKER__API__TIMEOUT_SECS");
        std::env::remove_var("LINKER__LOGGING__LEVEL");
    }

    let config = loaded.unwrap();
    assert_eq!(config.api.timeout_secs, 90);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(AppConfig::try_load(Some(&missing)).is_err());
    // load 回退到默认值
    assert_eq!(AppConfig::load(Some(&missing)).ui.page_size, AppConfig::default().ui.page_size);
}

#[test]
fn test_invalid_values_are_rejected() {
    let file = write_config(
        r#"
[ui]
page_size = 0
"#,
    );
    let err = AppConfig::try_load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("page_size"));

    let file = write_config(
        r#"
[api]
base_url = "localhost"
"#,
    );
    assert!(AppConfig::try_load(Some(file.path())).is_err());
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf").join("linker.toml");

    let mut config = AppConfig::default();
    config.ui.max_upload_mb = 50;
    config.session.path = Some("/tmp/linker-session.json".to_string());
    config.save_to_file(&path).unwrap();

    let loaded = AppConfig::try_load(Some(&path)).unwrap();
    assert_eq!(loaded.ui.max_upload_mb, 50);
    assert_eq!(loaded.session.path.as_deref(), Some("/tmp/linker-session.json"));
}
