// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared record fixtures for store and session tests.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use karte_core::ConsultationSummary;

/// A deterministic summary record.
///
/// `created_at` advances with `id`, so higher ids sort newer under the
/// default created-at-descending ordering.
pub fn sample_summary(id: i64) -> ConsultationSummary {
    let base = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).single();
    let created_at = base
        .map(|t| t + Duration::minutes(id))
        .unwrap_or_else(Utc::now);
    ConsultationSummary {
        id,
        consultation_date: NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap_or_default(),
        original_text: format!("相談内容 {id}"),
        summary_text: format!("要約 {id}"),
        prompt_template_id: None,
        procedures_discussed: None,
        consultant_name: Some("Tanaka".to_string()),
        customer_name: Some("Kim".to_string()),
        consultation_title: Some(format!("Consultation {id}")),
        created_by: Some("tanaka".to_string()),
        created_at,
    }
}
