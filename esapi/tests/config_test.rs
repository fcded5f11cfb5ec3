//! Tests for config module

use esapi::config::{expand_tilde, ClientConfig};
use esapi::{Client, Error};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = ClientConfig::default();

    assert_eq!(config.url, "http://localhost:9200");
    assert_eq!(config.connect_timeout_ms, 5000);
    assert_eq!(config.request_timeout_ms, 30000);
    assert!(config.headers.is_empty());
    assert!(!config.skip_parameter_validation);
    assert!(config.actions_file.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_file_gives_defaults() {
    let temp = tempdir().unwrap();
    let config = ClientConfig::load_from(&temp.path().join("config.toml")).unwrap();
    assert_eq!(config.url, "http://localhost:9200");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
url = "https://search.internal:9243"
skip_parameter_validation = true

[headers]
X-Opaque-Id = "nightly-job"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = ClientConfig::load_from(&path).unwrap();
    assert_eq!(config.url, "https://search.internal:9243");
    assert!(config.skip_parameter_validation);
    assert_eq!(config.headers["X-Opaque-Id"], "nightly-job");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.request_timeout_ms, 30000);
}

#[test]
fn test_save_and_load() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("nested").join("config.toml");

    let mut config = ClientConfig::default();
    config.url = "http://10.0.0.5:9200".to_string();
    config.request_timeout_ms = 1000;
    config.headers.insert("Authorization".to_string(), "ApiKey abc".to_string());
    config.save(&path).unwrap();

    let loaded = ClientConfig::load_from(&path).unwrap();
    assert_eq!(loaded.url, "http://10.0.0.5:9200");
    assert_eq!(loaded.request_timeout(), std::time::Duration::from_secs(1));
    assert_eq!(loaded.headers["Authorization"], "ApiKey abc");
}

#[test]
fn test_rejects_bad_url() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.toml");

    std::fs::write(&path, "url = \"not a url\"\n").unwrap();
    assert!(matches!(ClientConfig::load_from(&path), Err(Error::Config(_))));

    std::fs::write(&path, "url = \"ftp://example.com\"\n").unwrap();
    assert!(matches!(ClientConfig::load_from(&path), Err(Error::Config(_))));
}

#[test]
fn test_rejects_malformed_toml() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "url = [").unwrap();
    assert!(matches!(ClientConfig::load_from(&path), Err(Error::Toml(_))));
}

#[test]
fn test_expand_tilde() {
    let home = dirs::home_dir().unwrap();

    assert_eq!(expand_tilde(&PathBuf::from("~/actions.yaml")).unwrap(), home.join("actions.yaml"));
    assert_eq!(expand_tilde(&PathBuf::from("~")).unwrap(), home);
    assert_eq!(
        expand_tilde(&PathBuf::from("/etc/esapi/actions.yaml")).unwrap(),
        PathBuf::from("/etc/esapi/actions.yaml")
    );
}

#[test]
fn test_client_from_config_with_custom_actions() {
    let temp = tempdir().unwrap();
    let actions = temp.path().join("actions.yaml");
    std::fs::write(
        &actions,
        r#"
snapshot.status:
  method: GET
  paths:
    - path: _snapshot/_status
    - path: "_snapshot/{repository}/_status"
  parts:
    repository: string
  params: [master_timeout]
"#,
    )
    .unwrap();

    let config = ClientConfig {
        actions_file: Some(actions),
        ..ClientConfig::default()
    };
    let client = Client::from_config(&config).unwrap();

    assert_eq!(client.registry().len(), 1);
    let request = client
        .build_request(
            "snapshot.status",
            &esapi::Arguments::new().with("repository", "backups").with("master_timeout", "10s"),
        )
        .unwrap();
    assert_eq!(request.path, "_snapshot/backups/_status");
    assert_eq!(request.params["master_timeout"], "10s");
}

#[test]
fn test_client_from_config_missing_actions_file() {
    let config = ClientConfig {
        actions_file: Some(PathBuf::from("/definitely/not/here.yaml")),
        ..ClientConfig::default()
    };
    assert!(matches!(Client::from_config(&config), Err(Error::Registry(_))));
}
