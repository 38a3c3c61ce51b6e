use loadshed_common::observability::LogFormat;
use loadshed_config::LoadshedConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_with_env_expansion() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
client:
  base_url: "http://${LOADSHED_TEST_HOST}/LoadShedding"
  timeout_secs: 15
logging:
  format: json
  stderr: true
  filter: "loadshed_client=debug"
"#;
    let p = write_yaml(&tmp, "loadshed.yaml", file_yaml);

    temp_env::with_var("LOADSHED_TEST_HOST", Some("localhost:8080"), || {
        let config = LoadshedConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(
            config.client.base_url.as_deref(),
            Some("http://localhost:8080/LoadShedding")
        );
        assert_eq!(config.client.timeout_secs, Some(15));
        assert!(config.client.user_agent.is_none());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.stderr);
        assert_eq!(config.logging.filter, "loadshed_client=debug");
    });
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "loadshed.yaml",
        "client:\n  timeout_secs: 15\nlogging:\n  stderr: false\n",
    );

    temp_env::with_vars(
        [
            ("LOADSHED__CLIENT__TIMEOUT_SECS", Some("45")),
            ("LOADSHED__LOGGING__STDERR", Some("true")),
        ],
        || {
            let config = LoadshedConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");
            assert_eq!(config.client.timeout_secs, Some(45));
            assert!(config.logging.stderr);
        },
    );
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    assert!(LoadshedConfigLoader::new().with_file(missing).load().is_err());
}

#[test]
#[serial]
fn missing_optional_file_yields_defaults() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    let config = LoadshedConfigLoader::new()
        .with_optional_file(missing)
        .load()
        .expect("defaults");
    assert!(config.client.base_url.is_none());
    assert!(config.client.timeout().is_none());
    assert_eq!(config.logging.format, LogFormat::Text);
    assert_eq!(config.logging.filter, "info");
    assert!(!config.logging.stderr);
}

#[test]
#[serial]
fn inline_yaml_merges_over_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "loadshed.yaml",
        "client:\n  timeout_secs: 15\n  user_agent: from-file\n",
    );
    let config = LoadshedConfigLoader::new()
        .with_file(&p)
        .with_yaml_str("client:\n  timeout_secs: 5\n")
        .load()
        .expect("load config");
    assert_eq!(config.client.timeout_secs, Some(5));
    assert_eq!(config.client.user_agent.as_deref(), Some("from-file"));
}

#[test]
#[serial]
fn unknown_log_format_is_rejected() {
    let err = LoadshedConfigLoader::new()
        .with_yaml_str("logging:\n  format: xml\n")
        .load();
    assert!(err.is_err());
}
