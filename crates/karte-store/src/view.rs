// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure view functions over the summary cache: search, ordering, paging,
//! and selection reconciliation.
//!
//! Everything here takes slices and returns new values; the functions never
//! mutate the store and never touch the network, so the same inputs always
//! produce the same page.

use karte_core::ConsultationSummary;

/// Filters by case-insensitive substring match and sorts newest first.
///
/// The query is matched against six fields: summary text, original text,
/// consultant name, customer name, consultation title, and author. An empty
/// query matches everything. Ties on `created_at` break toward the higher
/// id, so records created in the same instant still order deterministically.
pub fn filter_and_sort<'a>(
    records: &'a [ConsultationSummary],
    query: &str,
) -> Vec<&'a ConsultationSummary> {
    let needle = query.trim().to_lowercase();
    let mut matching: Vec<&ConsultationSummary> = records
        .iter()
        .filter(|r| needle.is_empty() || matches_query(r, &needle))
        .collect();
    matching.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    matching
}

fn matches_query(record: &ConsultationSummary, needle: &str) -> bool {
    let haystacks = [
        Some(record.summary_text.as_str()),
        Some(record.original_text.as_str()),
        record.consultant_name.as_deref(),
        record.customer_name.as_deref(),
        record.consultation_title.as_deref(),
        record.created_by.as_deref(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(needle))
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Cuts a listing into pages of `page_size`, clamping `page` into range.
///
/// An empty listing still reports one (empty) page, so display code never
/// divides by zero or renders "page 1 of 0".
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

/// Carries a selection across a change in the visible listing.
///
/// The previous selection survives if its id is still visible; otherwise
/// selection falls to the first visible record; an empty listing clears it.
pub fn reconcile_selection(current: Option<i64>, visible_ids: &[i64]) -> Option<i64> {
    match current {
        Some(id) if visible_ids.contains(&id) => Some(id),
        _ => visible_ids.first().copied(),
    }
}

/// Query and paging state for the history listing.
///
/// Changing the query resets to the first page: the old page number is
/// meaningless against a different result set.
#[derive(Debug, Clone)]
pub struct HistoryView {
    query: String,
    page: usize,
    page_size: usize,
}

impl HistoryView {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Sets the search query. A changed query resets to page 1.
    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Applies query, ordering, and paging to the cached records.
    pub fn visible(&self, records: &[ConsultationSummary]) -> Page<ConsultationSummary> {
        let filtered = filter_and_sort(records, &self.query);
        let owned: Vec<ConsultationSummary> = filtered.into_iter().cloned().collect();
        paginate(&owned, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use karte_test_utils::sample_summary;

    #[test]
    fn empty_query_matches_everything_newest_first() {
        let records = vec![sample_summary(1), sample_summary(3), sample_summary(2)];
        let visible = filter_and_sort(&records, "");
        let ids: Vec<i64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn query_is_case_insensitive_across_fields() {
        let mut by_title = sample_summary(1);
        by_title.consultation_title = Some("Volume Consultation".into());
        let mut by_customer = sample_summary(2);
        by_customer.customer_name = Some("Park".into());
        let unrelated = sample_summary(3);

        let records = vec![by_title.clone(), by_customer, unrelated];

        let hits = filter_and_sort(&records, "volume");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let hits = filter_and_sort(&records, "PARK");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn query_matches_cjk_text() {
        let records = vec![sample_summary(1), sample_summary(2)];
        // sample fixtures carry "相談内容 {id}" as original text.
        let hits = filter_and_sort(&records, "相談内容 2");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn equal_created_at_breaks_toward_higher_id() {
        let instant = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        let mut a = sample_summary(10);
        a.created_at = instant;
        let mut b = sample_summary(11);
        b.created_at = instant;

        let records = vec![a, b];
        let visible = filter_and_sort(&records, "");
        let ids: Vec<i64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![11, 10]);
    }

    #[test]
    fn paginate_splits_and_clamps() {
        let items: Vec<i64> = (1..=25).collect();
        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);

        // Out-of-range page clamps to the last page.
        let page = paginate(&items, 99, 10);
        assert_eq!(page.page, 3);

        // Page zero clamps to the first page.
        let page = paginate(&items, 0, 10);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn paginate_empty_listing_is_one_empty_page() {
        let items: Vec<i64> = vec![];
        let page = paginate(&items, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn reconcile_keeps_visible_selection() {
        assert_eq!(reconcile_selection(Some(2), &[3, 2, 1]), Some(2));
        assert_eq!(reconcile_selection(Some(9), &[3, 2, 1]), Some(3));
        assert_eq!(reconcile_selection(None, &[3, 2, 1]), Some(3));
        assert_eq!(reconcile_selection(Some(2), &[]), None);
    }

    #[test]
    fn changed_query_resets_page() {
        let mut view = HistoryView::new(10);
        view.set_page(4);
        view.set_query("tanaka");
        assert_eq!(view.page(), 1);

        // Re-setting the identical query keeps the page.
        view.set_page(2);
        view.set_query("tanaka");
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn visible_applies_filter_then_paging() {
        let records: Vec<_> = (1..=12).map(sample_summary).collect();
        let mut view = HistoryView::new(5);
        view.set_page(2);

        let page = view.visible(&records);
        let ids: Vec<i64> = page.items.iter().map(|r| r.id).collect();
        // Newest first: page 2 of [12..1] in fives.
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
        assert_eq!(page.total_pages, 3);
    }
}
