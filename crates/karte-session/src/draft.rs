// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator input for a generation session, validated before submission.

use chrono::NaiveDate;
use karte_core::{
    ConsultationDetails, GenerationRequest, KarteError, MAX_ORIGINAL_TEXT_CHARS,
};

/// Everything the operator fills in before starting a generation.
///
/// The four text fields are required; validation runs locally and a failing
/// draft never reaches the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryDraft {
    pub original_text: String,
    pub consultant_name: String,
    pub customer_name: String,
    pub consultation_title: String,
    pub consultation_date: Option<NaiveDate>,
    pub prompt_template_id: Option<i64>,
}

impl SummaryDraft {
    /// Checks the draft, collecting every problem into one message.
    ///
    /// The transcript length limit counts characters, not bytes, so CJK
    /// transcripts are not penalized by their UTF-8 encoding.
    pub fn validate(&self) -> Result<(), KarteError> {
        let mut problems = Vec::new();

        if self.original_text.trim().is_empty() {
            problems.push("consultation content is required".to_string());
        } else {
            let chars = self.original_text.chars().count();
            if chars > MAX_ORIGINAL_TEXT_CHARS {
                problems.push(format!(
                    "consultation content is {chars} characters, the limit is {MAX_ORIGINAL_TEXT_CHARS}"
                ));
            }
        }
        if self.consultant_name.trim().is_empty() {
            problems.push("consultant name is required".to_string());
        }
        if self.customer_name.trim().is_empty() {
            problems.push("customer name is required".to_string());
        }
        if self.consultation_title.trim().is_empty() {
            problems.push("consultation title is required".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(KarteError::Validation(problems.join("; ")))
        }
    }

    /// The wire request for a validated draft.
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            original_text: self.original_text.clone(),
            consultation_date: self.consultation_date,
            prompt_template_id: self.prompt_template_id,
        }
    }

    /// The metadata merged into the result when the stream completes.
    pub fn details(&self) -> ConsultationDetails {
        ConsultationDetails {
            consultant_name: self.consultant_name.clone(),
            customer_name: self.customer_name.clone(),
            consultation_title: self.consultation_title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> SummaryDraft {
        SummaryDraft {
            original_text: "お客様は髪のボリュームについて相談された。".into(),
            consultant_name: "Tanaka".into(),
            customer_name: "Kim".into(),
            consultation_title: "First visit".into(),
            consultation_date: NaiveDate::from_ymd_opt(2024, 7, 1),
            prompt_template_id: None,
        }
    }

    #[test]
    fn complete_draft_validates() {
        assert!(complete_draft().validate().is_ok());
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let mut draft = complete_draft();
        draft.consultant_name = "   ".into();
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, KarteError::Validation(ref m) if m.contains("consultant name")));
    }

    #[test]
    fn all_problems_reported_together() {
        let draft = SummaryDraft::default();
        let err = draft.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("consultation content"));
        assert!(message.contains("consultant name"));
        assert!(message.contains("customer name"));
        assert!(message.contains("consultation title"));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let mut draft = complete_draft();
        // 10,000 three-byte characters: within the limit despite 30,000 bytes.
        draft.original_text = "あ".repeat(MAX_ORIGINAL_TEXT_CHARS);
        assert!(draft.validate().is_ok());

        draft.original_text.push('あ');
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, KarteError::Validation(ref m) if m.contains("limit")));
    }

    #[test]
    fn to_request_carries_template_and_date() {
        let mut draft = complete_draft();
        draft.prompt_template_id = Some(5);
        let request = draft.to_request();
        assert_eq!(request.prompt_template_id, Some(5));
        assert_eq!(request.consultation_date, NaiveDate::from_ymd_opt(2024, 7, 1));
    }
}
