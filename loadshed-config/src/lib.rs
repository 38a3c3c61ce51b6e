//! Loader for `loadshed.yaml` with environment overlays.
//!
//! Sources are merged in order: files and inline YAML as added, then
//! `LOADSHED__`-prefixed environment variables (`LOADSHED__CLIENT__TIMEOUT_SECS=10`).
//! String values then have `${VAR}` placeholders expanded before the result is
//! deserialized. Every field is optional; an empty configuration is valid.
use config::{Config, ConfigError, Environment, File};
use loadshed_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
pub const CONFIG_FILE_NAME: &str = "loadshed.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoadshedConfig {
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

/// API client overrides; unset fields keep the client's defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl ClientSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: LogFormat,
    pub stderr: bool,
    pub filter: String,
    pub dir: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            stderr: false,
            filter: "info".to_string(),
            dir: None,
        }
    }
}

impl LoggingSettings {
    /// Log directory with a leading `~` expanded.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.dir
            .as_deref()
            .map(|d| PathBuf::from(shellexpand::tilde(d).into_owned()))
    }

    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.log_dir(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

/// `~/.config/loadshed/loadshed.yaml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("loadshed").join(CONFIG_FILE_NAME))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate wiring (YAML + env overrides).
pub struct LoadshedConfigLoader {
    files: Vec<(PathBuf, bool)>,
    inline: Vec<String>,
}

impl Default for LoadshedConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadshedConfigLoader {
    /// Empty loader; `load` on it yields defaults plus any `LOADSHED__` variables.
    ///
    /// ```
    /// use loadshed_config::LoadshedConfigLoader;
    ///
    /// let config = LoadshedConfigLoader::new()
    ///     .with_yaml_str("client:\n  timeout_secs: 40")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.client.timeout_secs, Some(40));
    /// assert!(config.client.base_url.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            inline: Vec::new(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push((path.as_ref().to_path_buf(), true));
        self
    }

    /// Attach a file that is skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push((path.as_ref().to_path_buf(), false));
        self
    }

    /// Merge an inline YAML snippet after any files.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.inline.push(yaml.to_string());
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and deserialize.
    ///
    /// ```
    /// use loadshed_config::LoadshedConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_AGENT", "doc-agent/1.0"); }
    ///
    /// let config = LoadshedConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// client:
    ///   user_agent: "${DOC_AGENT}"
    /// logging:
    ///   format: json
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.client.user_agent.as_deref(), Some("doc-agent/1.0"));
    /// assert_eq!(config.logging.filter, "info");
    ///
    /// unsafe { std::env::remove_var("DOC_AGENT"); }
    /// ```
    pub fn load(self) -> Result<LoadshedConfig, ConfigError> {
        let mut builder = Config::builder();
        for (path, required) in &self.files {
            builder = builder.add_source(File::from(path.as_path()).required(*required));
        }
        for yaml in &self.inline {
            builder = builder.add_source(File::from_str(yaml, config::FileFormat::Yaml));
        }
        let cfg = builder
            .add_source(
                Environment::with_prefix("LOADSHED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
