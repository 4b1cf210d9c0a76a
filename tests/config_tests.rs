// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use photobooth::errors::ConfigError;
use photobooth::{CaptureMode, Config};
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(config.mirror, "Photos should be mirrored by default");
    assert_eq!(config.border_size, 30);
    assert_eq!(config.bottom_border_size, 80);
    assert_eq!(config.countdown_seconds, 3);
    assert_eq!(config.tick(), Duration::from_secs(1));
    assert_eq!(config.default_filter, "none");
    assert_eq!(config.default_mode, CaptureMode::Single);
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        default_filter: "sepia".to_string(),
        default_mode: CaptureMode::Strip,
        countdown_seconds: 5,
        output_dir: Some(dir.path().join("shots")),
        ..Config::default()
    };
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.photo_dir(), dir.path().join("shots"));
}

#[test]
fn test_config_missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = Config::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_config_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "default_mode": "strip", "mirror": false }"#).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.default_mode, CaptureMode::Strip);
    assert!(!loaded.mirror);
    assert_eq!(loaded.border_size, Config::default().border_size);
}

#[test]
fn test_config_malformed_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
}
