//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and the
//! environment.

use std::io::Write;

use agentprobe_infra::config;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "iam": { "token_url": "https://iam.test/identity/token" },
        "orchestrate": { "instance_id": "inst-json", "api_host": "wxo.test" },
        "db2": { "hostname": "db.test", "schema": "S1", "row_limit": 200 },
        "polling": { "max_attempts": 5, "interval_ms": 500 }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_ok(), "Failed to load config from JSON file");

    let config = result.unwrap();

    assert_eq!(config.iam.token_url, "https://iam.test/identity/token");
    assert_eq!(config.iam.api_key, None);
    assert_eq!(config.orchestrate.instance_id.as_deref(), Some("inst-json"));
    assert_eq!(config.orchestrate.api_host, "wxo.test");
    assert_eq!(config.log_table_name(), "\"S1\".\"WXO_LOG\"");
    assert_eq!(config.db2.row_limit, 200);
    assert_eq!(config.polling.max_attempts, 5);
    assert_eq!(config.batch.concurrency, 1);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_environment_overrides_config_file() {
    let toml_content = r#"
[orchestrate]
instance_id = "inst-file"
agent_id = "agent-file"

[batch]
concurrency = 2
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    // Only test in this binary that touches the process environment.
    std::env::set_var(config::CONFIG_PATH_VAR, &path);
    std::env::set_var("WXO_AGENT_ID", "agent-env");
    std::env::set_var("AGENTPROBE_POLL_ATTEMPTS", "7");

    let result = config::load();

    std::env::remove_var(config::CONFIG_PATH_VAR);
    std::env::remove_var("WXO_AGENT_ID");
    std::env::remove_var("AGENTPROBE_POLL_ATTEMPTS");
    std::fs::remove_file(&path).ok();

    let config = result.expect("config loads");
    assert_eq!(config.orchestrate.instance_id.as_deref(), Some("inst-file"));
    assert_eq!(config.orchestrate.agent_id.as_deref(), Some("agent-env"));
    assert_eq!(config.batch.concurrency, 2);
    assert_eq!(config.polling.max_attempts, 7);
}

#[test]
fn test_invalid_toml_is_rejected() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"[polling\nmax_attempts = ").expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_err(), "Should fail with invalid TOML");

    std::fs::remove_file(path).ok();
}
