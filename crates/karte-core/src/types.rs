// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the karte workspace.
//!
//! Wire shapes mirror the backend API: summaries are persisted server-side
//! and identified by integer ids; dates travel as ISO `YYYY-MM-DD` strings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum transcript length accepted for generation, in characters.
pub const MAX_ORIGINAL_TEXT_CHARS: usize = 10_000;

/// Request body for the streaming generation endpoint.
///
/// Immutable once submitted. `consultation_date` defaults server-side to the
/// current date when unset; the console fills it in at submission anyway so
/// the value shown to the operator matches what gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template_id: Option<i64>,
}

/// Caller-supplied consultation metadata.
///
/// The backend has no knowledge of these fields; they are collected from the
/// operator before submission and merged into the [`GenerationResult`] when
/// the stream completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationDetails {
    pub consultant_name: String,
    pub customer_name: String,
    pub consultation_title: String,
}

/// One item of a generation stream.
///
/// A well-formed stream yields zero or more `Content` items in strict arrival
/// order followed by exactly one terminal item: either `Done` or an
/// `Err(KarteError::Stream)` from the surrounding `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// An incremental text fragment plus the server's running concatenation.
    /// The accumulated buffer grows monotonically, never truncated mid-stream.
    Content { content: String, accumulated: String },
    /// Terminal success payload, yielded at most once.
    Done {
        summary: String,
        template_used: String,
        consultation_date: NaiveDate,
    },
}

/// Final product of a successful generation session.
///
/// Constructed exactly once per session, at stream completion, by merging the
/// backend's `Done` payload with the caller's [`ConsultationDetails`]. A
/// failed stream produces no result, regardless of how much text was
/// accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub summary: String,
    pub original_text: String,
    pub template_used: String,
    pub consultation_date: NaiveDate,
    pub consultant_name: String,
    pub customer_name: String,
    pub consultation_title: String,
}

/// A persisted consultation summary, owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationSummary {
    pub id: i64,
    pub consultation_date: NaiveDate,
    pub original_text: String,
    pub summary_text: String,
    #[serde(default)]
    pub prompt_template_id: Option<i64>,
    #[serde(default)]
    pub procedures_discussed: Option<Vec<i64>>,
    #[serde(default)]
    pub consultant_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub consultation_title: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of the direct save call: persists an approved or edited summary
/// without re-running generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectSaveRequest {
    pub consultation_date: NaiveDate,
    pub original_text: String,
    pub summary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedures_discussed: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_title: Option<String>,
    /// Operator stamp. `None` lets the backend apply its own default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl DirectSaveRequest {
    /// Builds a save request from a generation result, carrying the operator's
    /// edits in `summary_text` (pass `result.summary` unchanged to save as
    /// generated).
    pub fn from_result(
        result: &GenerationResult,
        summary_text: String,
        procedures_discussed: Option<Vec<i64>>,
    ) -> Self {
        Self {
            consultation_date: result.consultation_date,
            original_text: result.original_text.clone(),
            summary_text,
            prompt_template_id: None,
            procedures_discussed,
            consultant_name: Some(result.consultant_name.clone()),
            customer_name: Some(result.customer_name.clone()),
            consultation_title: Some(result.consultation_title.clone()),
            created_by: None,
        }
    }
}

/// Body of the update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryUpdate {
    pub summary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedures_discussed: Option<Vec<i64>>,
}

/// Query parameters for the summary list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for SummaryQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            start_date: None,
            end_date: None,
        }
    }
}
