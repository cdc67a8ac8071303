// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapter for the karte backend API.
//!
//! [`BackendClient`] implements [`SummaryBackend`] over the backend's REST
//! endpoints, including the SSE generation stream.

pub mod client;
pub mod stream;

pub use client::{BackendClient, HealthStatus};
pub use stream::parse_generation_stream;

use async_trait::async_trait;
use karte_core::{
    ConsultationSummary, DirectSaveRequest, GenerationRequest, GenerationStream, KarteError,
    SummaryBackend, SummaryQuery, SummaryUpdate,
};

#[async_trait]
impl SummaryBackend for BackendClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, KarteError> {
        self.start_generation(request).await
    }

    async fn save_direct(
        &self,
        request: &DirectSaveRequest,
    ) -> Result<ConsultationSummary, KarteError> {
        BackendClient::save_direct(self, request).await
    }

    async fn list_summaries(
        &self,
        query: &SummaryQuery,
    ) -> Result<Vec<ConsultationSummary>, KarteError> {
        BackendClient::list_summaries(self, query).await
    }

    async fn get_summary(&self, id: i64) -> Result<ConsultationSummary, KarteError> {
        BackendClient::get_summary(self, id).await
    }

    async fn update_summary(
        &self,
        id: i64,
        update: &SummaryUpdate,
    ) -> Result<ConsultationSummary, KarteError> {
        BackendClient::update_summary(self, id, update).await
    }

    async fn delete_summary(&self, id: i64) -> Result<(), KarteError> {
        BackendClient::delete_summary(self, id).await
    }
}
