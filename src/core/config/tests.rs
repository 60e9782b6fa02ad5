use super::data::{Config, DEFAULT_BASE_URL};
use super::io::ConfigError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn missing_file_loads_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let config = Config::load_from_path(&dir.path().join("absent.toml")).expect("load");
    assert_eq!(config, Config::default());
}

#[test]
fn save_and_reload_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("config.toml");
    let config = Config {
        base_url: Some("http://chat.example:8080/api".into()),
        theme: Some("light".into()),
        request_timeout: Some(12),
        data_dir: Some(PathBuf::from("/var/lib/chatguard")),
    };

    config.save_to_path(&path).expect("save");
    let reloaded = Config::load_from_path(&path).expect("reload");
    assert_eq!(reloaded, config);
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "base_url = [unterminated").expect("write");

    let err = Config::load_from_path(&path).expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn base_url_precedence() {
    let config = Config {
        base_url: Some("http://from-config/api".into()),
        ..Config::default()
    };

    assert_eq!(
        config.resolve_base_url(Some("http://from-flag/api"), Some("http://from-env/api")),
        "http://from-flag/api"
    );
    assert_eq!(
        config.resolve_base_url(None, Some("http://from-env/api")),
        "http://from-env/api"
    );
    assert_eq!(
        config.resolve_base_url(None, Some("  ")),
        "http://from-config/api"
    );
    assert_eq!(
        Config::default().resolve_base_url(None, None),
        DEFAULT_BASE_URL
    );
}

#[test]
fn zero_timeout_falls_back_to_default() {
    let config = Config {
        request_timeout: Some(0),
        ..Config::default()
    };
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
}

#[test]
fn explicit_data_dir_wins() {
    let config = Config {
        data_dir: Some(PathBuf::from("/srv/chat")),
        ..Config::default()
    };
    assert_eq!(
        config.resolve_data_dir().expect("data dir"),
        PathBuf::from("/srv/chat")
    );
}
