// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./karte.toml` > `~/.config/karte/karte.toml` > `/etc/karte/karte.toml`
//! with environment variable overrides via `KARTE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KarteConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/karte/karte.toml` (system-wide)
/// 3. `~/.config/karte/karte.toml` (user XDG config)
/// 4. `./karte.toml` (local directory)
/// 5. `KARTE_*` environment variables
pub fn load_config() -> Result<KarteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KarteConfig::default()))
        .merge(Toml::file("/etc/karte/karte.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("karte/karte.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("karte.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<KarteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KarteConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KarteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KarteConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `KARTE_BACKEND_GENERATE_TIMEOUT_SECS`
/// must map to `backend.generate_timeout_secs`, not `backend.generate.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("KARTE_").map(|key| {
        // The closure receives the variable name with the prefix stripped
        // but in its original case. Lowercase first, then split off the
        // section. Example: KARTE_BACKEND_BASE_URL -> "backend.base_url"
        key.as_str()
            .to_ascii_lowercase()
            .replacen("backend_", "backend.", 1)
            .replacen("console_", "console.", 1)
            .into()
    })
}
