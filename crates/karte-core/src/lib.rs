// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the karte consultation-summary console.
//!
//! This crate provides the shared domain types, the error enum, and the
//! [`SummaryBackend`] trait the rest of the workspace is built against.

pub mod backend;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use backend::{GenerationStream, SummaryBackend};
pub use error::KarteError;
pub use types::{
    ConsultationDetails, ConsultationSummary, DirectSaveRequest, GenerationEvent,
    GenerationRequest, GenerationResult, SummaryQuery, SummaryUpdate,
    MAX_ORIGINAL_TEXT_CHARS,
};
