//! Full configuration validation.
//!
//! Every rule pushes onto one error list so the user sees all problems at
//! once, joined into a single `ConfigError`.

mod helpers;


use crate::schema::CruxConfig;
use crux_common::ConfigError;

use helpers::{validate_endpoint, validate_env_name, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CruxConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_endpoint(&mut errors, "chat.endpoint", &config.chat.endpoint);
    validate_env_name(&mut errors, "chat.api_key_env", &config.chat.api_key_env);

    validate_endpoint(&mut errors, "completion.endpoint", &config.completion.endpoint);
    validate_env_name(
        &mut errors,
        "completion.api_key_env",
        &config.completion.api_key_env,
    );
    if config.completion.model.trim().is_empty() {
        errors.push("completion.model must not be empty".into());
    }
    validate_range_f64(
        &mut errors,
        "completion.temperature",
        config.completion.temperature,
        0.0,
        2.0,
    );

    // 0 turns the idle timeout off.
    if config.stream.idle_timeout_secs != 0 {
        validate_range(
            &mut errors,
            "stream.idle_timeout_secs",
            config.stream.idle_timeout_secs,
            1,
            3600,
        );
    }
    validate_range(
        &mut errors,
        "stream.connect_timeout_secs",
        config.stream.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        &mut errors,
        "stream.max_buffer_bytes",
        config.stream.max_buffer_bytes,
        1024,
        64 * 1024 * 1024,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
