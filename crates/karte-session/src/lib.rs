// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation session state machine.
//!
//! A [`GenerationSession`] validates a [`SummaryDraft`], opens the backend
//! stream, and publishes [`SessionSnapshot`]s over a watch channel while the
//! summary grows.

pub mod draft;
pub mod session;

pub use draft::SummaryDraft;
pub use session::{GenerationSession, SessionPhase, SessionSnapshot};
