use super::*;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.max_entries, 1000);
    assert_eq!(config.poll_interval_ms, 500);
    assert_eq!(config.log_level, "info");
    assert!(config.storage_path.ends_with(".clipman/history"));
    assert!(!config.storage_path.starts_with("~"), "tilde should be expanded");
}

#[test]
fn test_poll_interval_duration() {
    let config = Config {
        poll_interval_ms: 250,
        ..Config::default()
    };
    assert_eq!(config.poll_interval(), std::time::Duration::from_millis(250));
}

#[test]
fn test_config_json_uses_camel_case() {
    let config = Config {
        storage_path: PathBuf::from("/var/lib/clipman"),
        max_entries: 42,
        poll_interval_ms: 100,
        log_level: "debug".to_string(),
    };

    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["storagePath"], "/var/lib/clipman");
    assert_eq!(value["maxEntries"], 42);
    assert_eq!(value["pollIntervalMs"], 100);
    assert_eq!(value["logLevel"], "debug");

    let deserialized: Config = serde_json::from_value(value).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_partial_config_fills_defaults() {
    let config: Config = serde_json::from_str(r#"{"maxEntries": 5}"#).unwrap();
    assert_eq!(config.max_entries, 5);
    assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_validate_creates_storage_dir() {
    let dir = tempdir().unwrap();
    let storage = dir.path().join("a").join("b");
    let mut config = Config {
        storage_path: storage.clone(),
        ..Config::default()
    };

    config.validate().unwrap();
    assert!(storage.is_dir());
}

#[test]
fn test_validate_substitutes_default_capacity() {
    let dir = tempdir().unwrap();
    for bad in [0, -1, i64::MIN] {
        let mut config = Config {
            storage_path: dir.path().to_path_buf(),
            max_entries: bad,
            ..Config::default()
        };
        config.validate().unwrap();
        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES as i64);
    }
}

#[test]
fn test_validate_clamps_poll_interval() {
    let dir = tempdir().unwrap();
    let mut config = Config {
        storage_path: dir.path().to_path_buf(),
        poll_interval_ms: 0,
        ..Config::default()
    };
    config.validate().unwrap();
    assert_eq!(config.poll_interval_ms, MIN_POLL_INTERVAL_MS);
}

#[test]
fn test_validate_reports_storage_dir_failure() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "").unwrap();

    let mut config = Config {
        storage_path: blocker.join("history"),
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::StorageDir { .. }));
}

#[test]
fn test_load_config_missing_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = load_config(&dir.path().join("config.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_config_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"storagePath": "/tmp/clipman-test", "maxEntries": 20, "logLevel": "debug"}"#,
    )
    .unwrap();

    let config = load_config(&path);
    assert_eq!(config.storage_path, PathBuf::from("/tmp/clipman-test"));
    assert_eq!(config.max_entries, 20);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
}

#[test]
fn test_load_config_expands_tilde() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"storagePath": "~/clips"}"#).unwrap();

    let config = load_config(&path);
    assert!(!config.storage_path.starts_with("~"));
    assert!(config.storage_path.ends_with("clips"));
}

#[test]
fn test_load_config_malformed_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "maxEntries = 5").unwrap();

    assert_eq!(load_config(&path), Config::default());
}

#[test]
fn test_default_config_path() {
    assert!(default_config_path().ends_with(".clipman/config.json"));
}
