// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./boxbuddy.toml` > `~/.config/boxbuddy/boxbuddy.toml` > `/etc/boxbuddy/boxbuddy.toml`
//! with environment variable overrides via `BOXBUDDY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BoxbuddyConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/boxbuddy/boxbuddy.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "boxbuddy.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/boxbuddy/boxbuddy.toml` (system-wide)
/// 3. `~/.config/boxbuddy/boxbuddy.toml` (user XDG config)
/// 4. `./boxbuddy.toml` (local directory)
/// 5. `BOXBUDDY_*` environment variables
pub fn load_config() -> Result<BoxbuddyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<BoxbuddyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BoxbuddyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BoxbuddyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BoxbuddyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BoxbuddyConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("boxbuddy").join(LOCAL_CONFIG_FILE))
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `BOXBUDDY_SERVICE_BASE_URL`
/// must map to `service.base_url`, not `service.base.url`.
fn env_provider() -> Env {
    Env::prefixed("BOXBUDDY_").map(|key| {
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("service_", "service.", 1)
            .replacen("scan_", "scan.", 1)
            .replacen("capture_", "capture.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
