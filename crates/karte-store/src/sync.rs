// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend-first mutations: every write goes to the backend, and the local
//! cache changes only after the backend confirms. A failed call leaves the
//! store exactly as it was.

use karte_core::{
    ConsultationSummary, DirectSaveRequest, KarteError, SummaryBackend, SummaryQuery,
    SummaryUpdate,
};
use tracing::info;

use crate::store::SummaryStore;

/// Refetches the listing and replaces the cache.
pub async fn refresh(
    store: &mut SummaryStore,
    backend: &dyn SummaryBackend,
    query: &SummaryQuery,
) -> Result<(), KarteError> {
    let records = backend.list_summaries(query).await?;
    info!(count = records.len(), "summary listing refreshed");
    store.replace_all(records);
    Ok(())
}

/// Persists a generated or edited summary and caches the saved record.
///
/// The newly saved record becomes the selection.
pub async fn save_generated(
    store: &mut SummaryStore,
    backend: &dyn SummaryBackend,
    request: &DirectSaveRequest,
) -> Result<ConsultationSummary, KarteError> {
    let saved = backend.save_direct(request).await?;
    info!(id = saved.id, "summary saved");
    store.upsert(saved.clone());
    store.select(saved.id);
    Ok(saved)
}

/// Updates a summary's text and mirrors the backend's returned record.
pub async fn update_summary(
    store: &mut SummaryStore,
    backend: &dyn SummaryBackend,
    id: i64,
    update: &SummaryUpdate,
) -> Result<ConsultationSummary, KarteError> {
    let updated = backend.update_summary(id, update).await?;
    info!(id, "summary updated");
    store.upsert(updated.clone());
    Ok(updated)
}

/// Deletes a summary and drops it from the cache.
pub async fn delete_summary(
    store: &mut SummaryStore,
    backend: &dyn SummaryBackend,
    id: i64,
) -> Result<(), KarteError> {
    backend.delete_summary(id).await?;
    info!(id, "summary deleted");
    store.remove(id);
    Ok(())
}
