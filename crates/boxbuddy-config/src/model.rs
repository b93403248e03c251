// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the BoxBuddy pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level BoxBuddy configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BoxbuddyConfig {
    /// Remote inventory service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Scanner dispatch settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Power Mode capture and upload queue settings.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Remote inventory service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Root URL of the inventory API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. A timed-out request counts as a transient failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Scanner dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// How long an accepted payload is suppressed from re-dispatch.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Extra time an expired cooldown entry is kept before it is purged.
    #[serde(default = "default_cooldown_grace_secs")]
    pub cooldown_grace_secs: u64,

    /// Host of the printed short links (`<host>/<id>`).
    #[serde(default = "default_short_link_host")]
    pub short_link_host: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            cooldown_grace_secs: default_cooldown_grace_secs(),
            short_link_host: default_short_link_host(),
        }
    }
}

impl ScanConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn cooldown_grace(&self) -> Duration {
        Duration::from_secs(self.cooldown_grace_secs)
    }
}

fn default_cooldown_secs() -> u64 {
    5
}

fn default_cooldown_grace_secs() -> u64 {
    5
}

fn default_short_link_host() -> String {
    "c0h.de".to_string()
}

/// Power Mode capture configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureConfig {
    /// Recording ceiling. Reaching it warns but does not stop the recording.
    #[serde(default = "default_max_recording_secs")]
    pub max_recording_secs: u64,

    /// Flat delay before a transiently failed upload is retried.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// MIME type sent with the audio part of a capture upload.
    #[serde(default = "default_audio_mime")]
    pub audio_mime: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_recording_secs: default_max_recording_secs(),
            retry_delay_secs: default_retry_delay_secs(),
            audio_mime: default_audio_mime(),
        }
    }
}

impl CaptureConfig {
    pub fn max_recording(&self) -> Duration {
        Duration::from_secs(self.max_recording_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

fn default_max_recording_secs() -> u64 {
    300
}

fn default_retry_delay_secs() -> u64 {
    20
}

fn default_audio_mime() -> String {
    "audio/webm".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
