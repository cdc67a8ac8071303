// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the karte console.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level karte configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to values
/// that work against a local backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KarteConfig {
    /// Backend API connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Console behavior settings.
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Backend API connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds for ordinary CRUD calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout in seconds for the streaming generation call. Model inference
    /// latency is unbounded, so this is substantially longer than the CRUD
    /// timeout.
    #[serde(default = "default_generate_timeout_secs")]
    pub generate_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            generate_timeout_secs: default_generate_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_generate_timeout_secs() -> u64 {
    120
}

/// Console behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Number of history entries per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Operator name stamped as `created_by` on saved summaries.
    /// `None` lets the backend apply its own default.
    #[serde(default)]
    pub operator: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prompt template id to request for generation. `None` uses the
    /// backend's active default template.
    #[serde(default)]
    pub prompt_template_id: Option<i64>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            operator: None,
            log_level: default_log_level(),
            prompt_template_id: None,
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_backend() {
        let config = KarteConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.backend.generate_timeout_secs, 120);
        assert_eq!(config.console.page_size, 10);
        assert!(config.console.operator.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[backend]
base_url = "http://example.com"
retries = 3
"#;
        let result = toml::from_str::<KarteConfig>(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let toml_str = r#"
[console]
operator = "tanaka"
"#;
        let config: KarteConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.console.operator.as_deref(), Some("tanaka"));
        assert_eq!(config.console.page_size, 10);
        assert_eq!(config.backend.timeout_secs, 30);
    }
}
