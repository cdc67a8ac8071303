// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side summary store for the karte console.
//!
//! [`SummaryStore`] caches the backend's records and tracks the selection;
//! [`view`] holds the pure search, ordering, and paging functions; [`sync`]
//! holds the backend-first mutations.

pub mod store;
pub mod sync;
pub mod view;

pub use store::SummaryStore;
pub use view::{filter_and_sort, paginate, reconcile_selection, HistoryView, Page};
