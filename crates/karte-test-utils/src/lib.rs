// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the karte workspace.
//!
//! Provides a scripted [`MockBackend`] and record fixtures so session and
//! store tests run without a live backend.

pub mod fixtures;
pub mod mock_backend;

pub use fixtures::sample_summary;
pub use mock_backend::{GenerationScript, MockBackend};
