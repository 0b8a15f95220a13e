//! Configuration loading
//!
//! Builds the caller options handed to [`crate::LoggerPlugin::new`] from a
//! config file and environment overrides.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::plugin::DEFAULT_LISTENER_KEY;

/// Environment override for `defaultListener`.
pub const ENV_DEFAULT_LISTENER: &str = "HOSTLOG_DEFAULT_LISTENER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("{path} must contain a mapping at the top level")]
    NotAMapping { path: String },
}

/// Parses a JSON or YAML (by extension) options file into a mapping.
pub fn read_options_file(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: display.clone(),
            source,
        })?
    } else {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: display.clone(),
            source,
        })?
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ConfigError::NotAMapping { path: display }),
    }
}

/// Load plugin options: file values, then environment overrides.
///
/// A missing file is skipped with a warning.
pub fn load_plugin_options(config_file: Option<&Path>) -> Result<Value, ConfigError> {
    let mut values = Map::new();

    if let Some(path) = config_file {
        if path.exists() {
            let file_values = read_options_file(path)?;
            debug!(path = %path.display(), keys = file_values.len(), "loaded options file");
            for (key, value) in file_values {
                values.insert(key, value);
            }
        } else {
            warn!(path = %path.display(), "options file not found, using defaults");
        }
    }

    if let Ok(raw) = std::env::var(ENV_DEFAULT_LISTENER) {
        match raw.trim().parse::<bool>() {
            Ok(flag) => {
                values.insert(DEFAULT_LISTENER_KEY.to_string(), Value::Bool(flag));
            }
            Err(_) => warn!(value = %raw, "ignoring invalid {}", ENV_DEFAULT_LISTENER),
        }
    }

    Ok(Value::Object(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::io::Write;

    fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn json_file_values_are_loaded() {
        std::env::remove_var(ENV_DEFAULT_LISTENER);
        let file = write_file(".json", r#"{"defaultListener": false, "name": "app"}"#);

        let options = load_plugin_options(Some(file.path())).unwrap();
        assert_eq!(options, json!({"defaultListener": false, "name": "app"}));
    }

    #[test]
    #[serial]
    fn yaml_file_values_are_loaded() {
        std::env::remove_var(ENV_DEFAULT_LISTENER);
        let file = write_file(".yaml", "defaultListener: false\nlevel: debug\n");

        let options = load_plugin_options(Some(file.path())).unwrap();
        assert_eq!(options, json!({"defaultListener": false, "level": "debug"}));
    }

    #[test]
    #[serial]
    fn environment_overrides_file() {
        let file = write_file(".json", r#"{"defaultListener": false}"#);
        std::env::set_var(ENV_DEFAULT_LISTENER, "true");

        let options = load_plugin_options(Some(file.path())).unwrap();
        std::env::remove_var(ENV_DEFAULT_LISTENER);

        assert_eq!(options, json!({"defaultListener": true}));
    }

    #[test]
    #[serial]
    fn invalid_environment_value_is_ignored() {
        std::env::set_var(ENV_DEFAULT_LISTENER, "sometimes");
        let options = load_plugin_options(None).unwrap();
        std::env::remove_var(ENV_DEFAULT_LISTENER);

        assert_eq!(options, json!({}));
    }

    #[test]
    #[serial]
    fn missing_file_falls_back_to_defaults() {
        std::env::remove_var(ENV_DEFAULT_LISTENER);
        let options = load_plugin_options(Some(Path::new("/nonexistent/hostlog.json"))).unwrap();
        assert_eq!(options, json!({}));
    }

    #[test]
    fn top_level_list_is_rejected() {
        let file = write_file(".json", "[1, 2]");
        let err = read_options_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { .. }));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let file = write_file(".yml", "defaultListener: [unclosed");
        let err = read_options_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
