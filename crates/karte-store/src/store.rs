// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side cache of persisted summaries plus the current selection.
//!
//! The store never talks to the network itself; the sync functions in
//! [`crate::sync`] persist through the backend first and mutate the store
//! only after the backend confirms.

use karte_core::ConsultationSummary;

use crate::view::reconcile_selection;

/// In-memory mirror of the backend's summary table.
#[derive(Debug, Default)]
pub struct SummaryStore {
    records: Vec<ConsultationSummary>,
    selected: Option<i64>,
}

impl SummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cached records, in cache order.
    pub fn records(&self) -> &[ConsultationSummary] {
        &self.records
    }

    /// Id of the currently selected record, if any.
    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    /// The currently selected record, if it is still cached.
    pub fn selected(&self) -> Option<&ConsultationSummary> {
        self.selected
            .and_then(|id| self.records.iter().find(|r| r.id == id))
    }

    /// Replaces the whole cache with a fresh listing and reconciles the
    /// selection against it.
    pub fn replace_all(&mut self, records: Vec<ConsultationSummary>) {
        self.records = records;
        let ids: Vec<i64> = self.records.iter().map(|r| r.id).collect();
        self.selected = reconcile_selection(self.selected, &ids);
    }

    /// Inserts or replaces one record.
    ///
    /// An existing record is replaced in place, keeping every position in
    /// the cache stable; a new record is appended. Display order comes from
    /// the view functions, not from cache position.
    pub fn upsert(&mut self, record: ConsultationSummary) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Removes a record. A selection pointing at the removed record is
    /// cleared, not transferred.
    pub fn remove(&mut self, id: i64) {
        self.records.retain(|r| r.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Selects a record by id. Returns false if the id is not cached, in
    /// which case the previous selection stands.
    pub fn select(&mut self, id: i64) -> bool {
        if self.records.iter().any(|r| r.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// Drops the selection without touching the records.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karte_test_utils::sample_summary;

    #[test]
    fn upsert_keeps_position_of_existing_record() {
        let mut store = SummaryStore::new();
        store.replace_all(vec![sample_summary(3), sample_summary(2), sample_summary(1)]);

        let mut edited = sample_summary(2);
        edited.summary_text = "edited".into();
        store.upsert(edited);

        let ids: Vec<i64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(store.records()[1].summary_text, "edited");
    }

    #[test]
    fn upsert_appends_new_records() {
        let mut store = SummaryStore::new();
        store.replace_all(vec![sample_summary(2), sample_summary(1)]);
        store.upsert(sample_summary(5));

        let ids: Vec<i64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 5]);
    }

    #[test]
    fn remove_clears_matching_selection() {
        let mut store = SummaryStore::new();
        store.replace_all(vec![sample_summary(3), sample_summary(2), sample_summary(1)]);
        assert!(store.select(2));

        store.remove(2);

        let ids: Vec<i64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn remove_keeps_unrelated_selection() {
        let mut store = SummaryStore::new();
        store.replace_all(vec![sample_summary(3), sample_summary(2)]);
        assert!(store.select(3));

        store.remove(2);
        assert_eq!(store.selected_id(), Some(3));
    }

    #[test]
    fn select_unknown_id_is_rejected() {
        let mut store = SummaryStore::new();
        store.replace_all(vec![sample_summary(1)]);
        assert!(store.select(1));
        assert!(!store.select(99));
        assert_eq!(store.selected_id(), Some(1));
    }

    #[test]
    fn replace_all_reconciles_selection() {
        let mut store = SummaryStore::new();
        store.replace_all(vec![sample_summary(2), sample_summary(1)]);
        assert!(store.select(1));

        // Selection survives when still present.
        store.replace_all(vec![sample_summary(1)]);
        assert_eq!(store.selected_id(), Some(1));

        // Selection falls back to the first record when it vanished.
        store.replace_all(vec![sample_summary(7), sample_summary(6)]);
        assert_eq!(store.selected_id(), Some(7));

        // An empty listing leaves nothing to select.
        store.replace_all(vec![]);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn selected_returns_record() {
        let mut store = SummaryStore::new();
        store.replace_all(vec![sample_summary(4)]);
        store.select(4);
        assert_eq!(store.selected().map(|r| r.id), Some(4));
    }
}
