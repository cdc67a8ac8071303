// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the karte backend API.
//!
//! Provides [`BackendClient`] which handles request construction, the
//! streaming generation call, and summary CRUD. No call retries on failure:
//! recovery is always operator-initiated resubmission.

use std::time::Duration;

use karte_config::BackendConfig;
use karte_core::{
    ConsultationSummary, DirectSaveRequest, GenerationRequest, GenerationStream, KarteError,
    SummaryQuery, SummaryUpdate,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::stream::parse_generation_stream;

/// Error body shape used by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
}

/// Payload of the backend health endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// HTTP client for backend API communication.
///
/// Holds two connection pools with different timeouts: ordinary CRUD calls
/// fail fast, while the streaming generation call waits out model inference
/// latency.
#[derive(Debug, Clone)]
pub struct BackendClient {
    crud: reqwest::Client,
    generate: reqwest::Client,
    base_url: String,
    crud_timeout: Duration,
    generate_timeout: Duration,
}

impl BackendClient {
    /// Creates a client from backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, KarteError> {
        let crud_timeout = Duration::from_secs(config.timeout_secs);
        let generate_timeout = Duration::from_secs(config.generate_timeout_secs);

        let crud = reqwest::Client::builder()
            .timeout(crud_timeout)
            .build()
            .map_err(|e| KarteError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let generate = reqwest::Client::builder()
            .timeout(generate_timeout)
            .build()
            .map_err(|e| KarteError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            crud,
            generate,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            crud_timeout,
            generate_timeout,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Opens the streaming generation call.
    pub async fn start_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, KarteError> {
        let url = format!("{}/api/summaries/generate", self.base_url);
        let response = self
            .generate
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.generate_timeout))?;

        let status = response.status();
        debug!(status = %status, "generation response received");

        if !status.is_success() {
            return Err(self.error_from_response(response, None).await);
        }

        Ok(parse_generation_stream(response))
    }

    /// Persists a summary via the direct save endpoint.
    pub async fn save_direct(
        &self,
        request: &DirectSaveRequest,
    ) -> Result<ConsultationSummary, KarteError> {
        let url = format!("{}/api/summaries/direct", self.base_url);
        let response = self
            .crud
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.crud_timeout))?;
        self.json_or_error(response, None).await
    }

    /// Fetches the summary list.
    pub async fn list_summaries(
        &self,
        query: &SummaryQuery,
    ) -> Result<Vec<ConsultationSummary>, KarteError> {
        let url = format!("{}/api/summaries/", self.base_url);
        let response = self
            .crud
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.crud_timeout))?;
        self.json_or_error(response, None).await
    }

    /// Fetches a single summary by id.
    pub async fn get_summary(&self, id: i64) -> Result<ConsultationSummary, KarteError> {
        let url = format!("{}/api/summaries/{id}", self.base_url);
        let response = self
            .crud
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.crud_timeout))?;
        self.json_or_error(response, Some(id)).await
    }

    /// Updates a summary, returning the new record.
    pub async fn update_summary(
        &self,
        id: i64,
        update: &SummaryUpdate,
    ) -> Result<ConsultationSummary, KarteError> {
        let url = format!("{}/api/summaries/{id}", self.base_url);
        let response = self
            .crud
            .put(&url)
            .json(update)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.crud_timeout))?;
        self.json_or_error(response, Some(id)).await
    }

    /// Deletes a summary by id.
    pub async fn delete_summary(&self, id: i64) -> Result<(), KarteError> {
        let url = format!("{}/api/summaries/{id}", self.base_url);
        let response = self
            .crud
            .delete(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.crud_timeout))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.error_from_response(response, Some(id)).await)
    }

    /// Probes the backend health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, KarteError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .crud
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.crud_timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KarteError::Api {
                message: format!("health check returned {status}"),
                source: None,
            });
        }
        response.json().await.map_err(|e| KarteError::Api {
            message: format!("failed to parse health response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Deserializes a success body, or builds the error for a non-2xx status.
    async fn json_or_error<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        id: Option<i64>,
    ) -> Result<T, KarteError> {
        let status = response.status();
        debug!(status = %status, "backend response received");

        if !status.is_success() {
            return Err(self.error_from_response(response, id).await);
        }

        let body = response.text().await.map_err(|e| KarteError::Api {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| KarteError::Api {
            message: format!("failed to parse backend response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Maps a non-2xx response into a `KarteError`, extracting the backend's
    /// `detail` message when the body carries one.
    async fn error_from_response(
        &self,
        response: reqwest::Response,
        id: Option<i64>,
    ) -> KarteError {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return KarteError::NotFound {
                resource: "summary",
                id,
            };
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "backend returned error");
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(api_err) => api_err.detail,
            Err(_) => format!("backend returned {status}: {body}"),
        };
        KarteError::Api {
            message,
            source: None,
        }
    }

    /// Maps a reqwest send failure into a `KarteError`.
    fn map_send_error(&self, e: reqwest::Error, timeout: Duration) -> KarteError {
        if e.is_timeout() {
            KarteError::Timeout { duration: timeout }
        } else {
            KarteError::Api {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}
