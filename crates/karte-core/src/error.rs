// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the karte console.

use thiserror::Error;

/// The primary error type used across the karte workspace.
#[derive(Debug, Error)]
pub enum KarteError {
    /// Configuration errors (invalid TOML, bad URLs, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local validation errors caught before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Backend CRUD call failures (connection, non-2xx status, bad body).
    #[error("backend error: {message}")]
    Api {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generation stream failures: transport loss, malformed framing, or a
    /// server-signalled error frame. A session that hits one of these keeps
    /// no partial result.
    #[error("stream error: {message}")]
    Stream { message: String },

    /// The backend reported that the requested record does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KarteError {
    /// True for errors raised locally, without the backend being contacted.
    pub fn is_local(&self) -> bool {
        matches!(self, KarteError::Validation(_) | KarteError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn karte_error_has_all_variants() {
        let _config = KarteError::Config("test".into());
        let _validation = KarteError::Validation("test".into());
        let _api = KarteError::Api {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _stream = KarteError::Stream {
            message: "test".into(),
        };
        let _not_found = KarteError::NotFound {
            resource: "summary",
            id: 7,
        };
        let _timeout = KarteError::Timeout {
            duration: std::time::Duration::from_secs(120),
        };
        let _internal = KarteError::Internal("test".into());
    }

    #[test]
    fn validation_and_config_are_local() {
        assert!(KarteError::Validation("x".into()).is_local());
        assert!(KarteError::Config("x".into()).is_local());
        assert!(
            !KarteError::Stream {
                message: "x".into()
            }
            .is_local()
        );
    }

    #[test]
    fn not_found_renders_resource_and_id() {
        let err = KarteError::NotFound {
            resource: "summary",
            id: 42,
        };
        assert_eq!(err.to_string(), "summary 42 not found");
    }
}
