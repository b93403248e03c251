// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes and duration bounds.

use crate::diagnostic::ConfigError;
use crate::model::BoxbuddyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest accepted duration for any `*_secs` key (one day).
pub const MAX_DURATION_SECS: u64 = 86_400;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BoxbuddyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.service.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("service.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    // (key, value, zero allowed)
    let durations = [
        ("service.timeout_secs", config.service.timeout_secs, false),
        ("scan.cooldown_secs", config.scan.cooldown_secs, false),
        ("scan.cooldown_grace_secs", config.scan.cooldown_grace_secs, true),
        ("capture.max_recording_secs", config.capture.max_recording_secs, false),
        ("capture.retry_delay_secs", config.capture.retry_delay_secs, false),
    ];
    for (key, value, zero_ok) in durations {
        if value == 0 && !zero_ok {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than zero"),
            });
        } else if value > MAX_DURATION_SECS {
            errors.push(ConfigError::Validation {
                message: format!("{key} = {value} exceeds the limit of {MAX_DURATION_SECS}"),
            });
        }
    }

    let host = config.scan.short_link_host.trim();
    if host.is_empty() || host.contains('/') || host.contains(char::is_whitespace) {
        errors.push(ConfigError::Validation {
            message: format!("scan.short_link_host `{host}` must be a bare host name"),
        });
    }

    if config.capture.audio_mime.split('/').count() != 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "capture.audio_mime `{}` is not a MIME type",
                config.capture.audio_mime
            ),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` must be one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
