use loadshed_client::Client;
use loadshed_common::{LoadshedError, Result};
use loadshed_config::{
    CONFIG_FILE_NAME, ClientSettings, LoadshedConfig, LoadshedConfigLoader, default_config_path,
};
use std::path::Path;

/// An explicit `--config` file must exist. Without one, the user config file and
/// `./loadshed.yaml` are merged when present.
pub fn load_config(path: Option<&Path>) -> Result<LoadshedConfig> {
    let loader = match path {
        Some(path) => LoadshedConfigLoader::new().with_file(path),
        None => {
            let mut loader = LoadshedConfigLoader::new();
            if let Some(user) = default_config_path() {
                loader = loader.with_optional_file(user);
            }
            loader.with_optional_file(CONFIG_FILE_NAME)
        }
    };
    loader
        .load()
        .map_err(|e| LoadshedError::Config(e.to_string()))
}

pub fn build_client(settings: &ClientSettings) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(url) = &settings.base_url {
        builder = builder.base_url(url);
    }
    if let Some(timeout) = settings.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(agent) = &settings.user_agent {
        builder = builder.user_agent(agent);
    }
    builder
        .build()
        .map_err(|e| LoadshedError::Client(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn client_defaults_without_settings() {
        let client = build_client(&ClientSettings::default()).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn client_uses_configured_timeout() {
        let settings = ClientSettings {
            base_url: Some("http://localhost:9999/LoadShedding".into()),
            timeout_secs: Some(3),
            user_agent: Some("loadshed-cli".into()),
        };
        let client = build_client(&settings).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn bad_base_url_is_a_client_error() {
        let settings = ClientSettings {
            base_url: Some("::nope".into()),
            ..Default::default()
        };
        let err = build_client(&settings).err().unwrap();
        assert!(matches!(err, LoadshedError::Client(_)), "got {err:?}");
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("custom.yaml");
        std::fs::write(&path, "client:\n  timeout_secs: 7\n").unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.client.timeout_secs, Some(7));
    }

    #[test]
    fn missing_explicit_config_is_a_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("missing.yaml")))
            .err()
            .unwrap();
        assert!(matches!(err, LoadshedError::Config(_)), "got {err:?}");
    }
}
