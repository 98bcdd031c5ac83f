//! Config loading integration tests.
//!
//! These tests write JSON5 configuration to disk and load it back through
//! the same path the CLI uses.

use herald_core::config::HeraldConfig;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_partial_config_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("herald.json5");
    std::fs::write(
        &path,
        r#"{
            // tighter limit for a busy server
            delivery: { maxMessageLength: 1500, webhookName: "Announcements" },
        }"#,
    )
    .unwrap();

    let loaded = HeraldConfig::load(&path).unwrap();
    assert_eq!(loaded.delivery.max_message_length, 1500);
    assert_eq!(loaded.delivery.webhook_name, "Announcements");
    // Untouched keys fall back to defaults
    assert_eq!(loaded.delivery.purge_limit, 100);
    assert_eq!(loaded.templates.extension, "md");
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("herald.json5");
    std::fs::write(&path, "{ delivery: { maxMessageLength: 5000 } }").unwrap();

    let err = HeraldConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("maxMessageLength"));
}

#[test]
fn test_config_load_nonexistent() {
    let result = HeraldConfig::load(Path::new("/nonexistent/herald.json5"));
    assert!(result.is_err());
}

#[test]
fn test_no_config_path_uses_defaults() {
    let config = HeraldConfig::load_or_default(None).unwrap();
    assert_eq!(config, HeraldConfig::default());
}

#[test]
fn test_config_parse_invalid() {
    let result = HeraldConfig::parse("not valid json5");
    assert!(result.is_err());
}
