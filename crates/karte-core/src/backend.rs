// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`SummaryBackend`] trait: the seam between console logic and HTTP.
//!
//! `karte-api` implements this trait over the backend REST API; test code
//! substitutes a scripted mock. The session and store crates only ever see
//! the trait.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::KarteError;
use crate::types::{
    ConsultationSummary, DirectSaveRequest, GenerationEvent, GenerationRequest, SummaryQuery,
    SummaryUpdate,
};

/// A pinned, boxed stream of generation events.
pub type GenerationStream =
    Pin<Box<dyn Stream<Item = Result<GenerationEvent, KarteError>> + Send>>;

/// Backend operations the console depends on.
///
/// No method retries on failure; recovery is always operator-initiated
/// resubmission. CRUD calls are independent and may run concurrently;
/// generation is long-lived and cancelable by dropping the stream.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Opens a streaming generation call for the given request.
    ///
    /// The returned stream yields 0..N [`GenerationEvent::Content`] items in
    /// strict arrival order, then exactly one terminal item: either
    /// [`GenerationEvent::Done`] or an `Err`, never both.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, KarteError>;

    /// Persists an approved or edited summary without re-running generation.
    async fn save_direct(
        &self,
        request: &DirectSaveRequest,
    ) -> Result<ConsultationSummary, KarteError>;

    /// Lists persisted summaries, newest consultation first.
    async fn list_summaries(
        &self,
        query: &SummaryQuery,
    ) -> Result<Vec<ConsultationSummary>, KarteError>;

    /// Fetches a single summary by id.
    async fn get_summary(&self, id: i64) -> Result<ConsultationSummary, KarteError>;

    /// Replaces a summary's text (and optionally its procedure annotations),
    /// returning the updated record.
    async fn update_summary(
        &self,
        id: i64,
        update: &SummaryUpdate,
    ) -> Result<ConsultationSummary, KarteError>;

    /// Deletes a summary by id.
    async fn delete_summary(&self, id: i64) -> Result<(), KarteError>;
}
