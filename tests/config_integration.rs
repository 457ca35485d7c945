// Loading configuration files from disk and feeding them into a registry

mod common;

use common::harness::LiveViewHarness;
use live_view::config::{ConfigError, LiveViewConfig};
use live_view::host::View;
use live_view::live::ApplySettings;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("live_view.json");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_partial_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{"debounce_ms": 300, "default_settings": {"gutter": true}}"#,
    );

    let config = LiveViewConfig::load_from_file(&path).unwrap();

    assert_eq!(config.debounce(), Duration::from_millis(300));
    assert!(config.clear_selection);
    assert_eq!(config.default_settings["gutter"], json!(true));
    assert_eq!(config.default_settings["word_wrap"], json!(false));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = LiveViewConfig::load_from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"debounce_ms": "soon""#);
    let result = LiveViewConfig::load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_loaded_config_drives_live_views() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{"debounce_ms": 1000, "default_settings": {"font_size": 11}}"#,
    );
    let config = LiveViewConfig::load_from_file(&path).unwrap();
    let mut harness = LiveViewHarness::with_config("0123456789", config);

    harness.live_view().apply_settings(ApplySettings::default());
    assert_eq!(harness.view.setting("font_size"), Some(json!(11)));
    assert_eq!(harness.view.setting("gutter"), Some(json!(false)));

    harness.click_now(1).unwrap();
    harness.advance(Duration::from_millis(500));
    harness.click_now(2).unwrap();
    assert_eq!(harness.view_log.count("view:process"), 1);

    harness.advance(Duration::from_millis(600));
    harness.click_now(3).unwrap();
    assert_eq!(harness.view_log.count("view:process"), 2);
}

#[test]
fn test_schema_describes_every_field() {
    let schema = LiveViewConfig::schema();
    let properties = schema["properties"].as_object().unwrap();
    for field in ["debounce_ms", "clear_selection", "use_default_settings", "default_settings"] {
        assert!(properties.contains_key(field), "schema is missing {field}");
    }
}
