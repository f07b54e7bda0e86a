//! Configuration tests

use super::*;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn no_env(_: &str) -> Option<String> {
    None
}

/// The generated template must parse back into the same values
#[test]
fn test_config_roundtrip_default() {
    let toml_str = Config::default().to_toml();

    let parsed: FileConfig = toml::from_str(&toml_str)
        .unwrap_or_else(|e| panic!("Default config should parse.\n{}\n{}", toml_str, e));
    let config = Config::resolve(parsed, no_env);

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.theme, DEFAULT_THEME);
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
    assert_eq!(config.logging.file_prefix, "playto");
}

#[test]
fn test_non_default_values_survive_serialization() {
    let mut config = Config::default();
    config.api_url = "https://community.example/api".to_string();
    config.request_timeout_secs = 3;
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Never;

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    let back = Config::resolve(parsed, no_env);

    assert_eq!(back.api_url, "https://community.example/api");
    assert_eq!(back.request_timeout_secs, 3);
    assert!(back.logging.file_enabled);
    assert_eq!(back.logging.file_rotation, LogRotation::Never);
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
api_url = "http://file/api"
theme = "light"
request_timeout_secs = 30
"#,
    )
    .unwrap();

    let config = Config::resolve(
        file,
        env_from(&[
            ("PLAYTO_API_URL", "http://env/api"),
            ("PLAYTO_TIMEOUT_SECS", "5"),
            ("PLAYTO_NO_TUI", "1"),
        ]),
    );

    assert_eq!(config.api_url, "http://env/api");
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.theme, "light");
    assert!(!config.enable_tui);
}

#[test]
fn test_bad_timeout_env_falls_back() {
    let file: FileConfig = toml::from_str("request_timeout_secs = 0").unwrap();
    let config = Config::resolve(file, env_from(&[("PLAYTO_TIMEOUT_SECS", "soon")]));
    assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
}

#[test]
fn test_zero_timeout_env_keeps_file_value() {
    let file: FileConfig = toml::from_str("request_timeout_secs = 30").unwrap();
    let config = Config::resolve(file, env_from(&[("PLAYTO_TIMEOUT_SECS", "0")]));
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
fn test_partial_logging_section() {
    let file: FileConfig = toml::from_str(
        r#"
[logging]
level = "DEBUG"
file_rotation = "weekly"
"#,
    )
    .unwrap();
    let config = Config::resolve(file, no_env);

    assert_eq!(config.logging.directive(), "playto=debug");
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
    assert!(!config.logging.file_enabled);
}

#[test]
fn test_log_rotation_parse() {
    assert_eq!(LogRotation::parse("Hourly"), LogRotation::Hourly);
    assert_eq!(LogRotation::parse("never"), LogRotation::Never);
    assert_eq!(LogRotation::parse(""), LogRotation::Daily);
}

#[test]
fn test_missing_file_is_empty_config() {
    let path = std::env::temp_dir().join("playto-does-not-exist").join("config.toml");
    let file = Config::read_file_config(&path).unwrap();
    assert!(file.api_url.is_none());
}

#[test]
fn test_invalid_file_names_path() {
    let dir = std::env::temp_dir().join(format!("playto-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(&path, "api_url = [unterminated").unwrap();

    let err = Config::read_file_config(&path).unwrap_err();
    assert!(format!("{}", err).contains("config.toml"));

    std::fs::remove_dir_all(&dir).unwrap();
}
