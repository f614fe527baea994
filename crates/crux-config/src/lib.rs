//! Crux configuration system.
//!
//! TOML-based configuration with full validation. All sections use
//! sensible defaults so partial configs work out of the box. Secrets are
//! never stored in the file; the config names the environment variables
//! that hold them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crux_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{CruxConfig, CONFIG_SCHEMA_VERSION};

use crux_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default file is created from the commented template if missing.
/// The result is validated; an explicit path that fails validation is an error.
pub fn load_config(path: Option<&Path>) -> Result<CruxConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Read the secret named by `env_name` from the environment.
pub fn resolve_api_key(env_name: &str) -> Result<String, ConfigError> {
    match std::env::var(env_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(env_name.to_string())),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CruxConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = CruxConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"chat\""));
        assert!(json.contains("\"completion\""));
        assert!(json.contains("\"stream\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"INFO\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = CruxConfig::default();
        let json = config_to_json(&config);
        let parsed: CruxConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.chat.api_key_env, "CRUX_API_KEY");
        assert_eq!(parsed.stream.connect_timeout_secs, 10);
    }

    #[test]
    fn log_level_maps_to_directive() {
        let config: CruxConfig = toml::from_str("[logging]\nlevel = \"WARNING\"\n").unwrap();
        assert_eq!(config.logging.level.directive(), "crux=warn");
    }

    #[test]
    fn load_config_rejects_invalid_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[stream]\nmax_buffer_bytes = 1\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn resolve_api_key_reports_missing_variable() {
        let err = resolve_api_key("CRUX_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(name) if name == "CRUX_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
