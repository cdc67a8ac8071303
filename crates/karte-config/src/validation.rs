// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as URL well-formedness and timeout ordering.

use url::Url;

use crate::diagnostic::ConfigError;
use crate::model::KarteConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KarteConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate base_url is not empty
    if config.backend.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "backend.base_url must not be empty".to_string(),
        });
    } else {
        let raw = config.backend.base_url.trim();
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "backend.base_url must use http or https, got `{}`",
                        url.scheme()
                    ),
                });
            }
            Err(e) => {
                errors.push(ConfigError::Validation {
                    message: format!("backend.base_url `{raw}` is not a valid URL: {e}"),
                });
            }
        }
    }

    if config.backend.timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: "backend.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.backend.generate_timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: "backend.generate_timeout_secs must be at least 1".to_string(),
        });
    }

    // Generation streams outlive any CRUD call; a shorter generation timeout
    // is almost certainly a swapped pair of values.
    if config.backend.generate_timeout_secs < config.backend.timeout_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "backend.generate_timeout_secs ({}) must not be less than backend.timeout_secs ({})",
                config.backend.generate_timeout_secs, config.backend.timeout_secs
            ),
        });
    }

    if config.console.page_size < 1 {
        errors.push(ConfigError::Validation {
            message: "console.page_size must be at least 1".to_string(),
        });
    }

    if let Some(operator) = &config.console.operator
        && operator.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "console.operator must not be blank when set".to_string(),
        });
    }

    const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if !LOG_LEVELS.contains(&config.console.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "console.log_level `{}` is not one of trace, debug, info, warn, error",
                config.console.log_level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
