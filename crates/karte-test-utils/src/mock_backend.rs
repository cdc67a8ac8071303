// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend for deterministic testing.
//!
//! `MockBackend` implements `SummaryBackend` with scripted generation streams
//! and an in-memory record table, enabling fast, CI-runnable tests without a
//! running backend.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::stream;
use tokio::sync::Mutex;

use karte_core::{
    ConsultationSummary, DirectSaveRequest, GenerationEvent, GenerationRequest, GenerationStream,
    KarteError, SummaryBackend, SummaryQuery, SummaryUpdate,
};

/// One scripted generation: content fragments followed by a terminal outcome.
#[derive(Debug, Clone)]
pub struct GenerationScript {
    chunks: Vec<String>,
    outcome: ScriptOutcome,
}

#[derive(Debug, Clone)]
enum ScriptOutcome {
    Done {
        summary: String,
        template_used: String,
        consultation_date: NaiveDate,
    },
    Error(String),
}

impl GenerationScript {
    /// A stream that yields the given fragments then completes successfully.
    /// The done summary is the concatenation of the fragments.
    pub fn succeeding(chunks: Vec<&str>, consultation_date: NaiveDate) -> Self {
        let chunks: Vec<String> = chunks.into_iter().map(String::from).collect();
        let summary = chunks.concat();
        Self {
            chunks,
            outcome: ScriptOutcome::Done {
                summary,
                template_used: "default".to_string(),
                consultation_date,
            },
        }
    }

    /// A stream that yields the given fragments then fails.
    pub fn failing(chunks: Vec<&str>, message: &str) -> Self {
        Self {
            chunks: chunks.into_iter().map(String::from).collect(),
            outcome: ScriptOutcome::Error(message.to_string()),
        }
    }

    fn into_stream(self) -> GenerationStream {
        let mut items: Vec<Result<GenerationEvent, KarteError>> = Vec::new();
        let mut accumulated = String::new();
        for chunk in self.chunks {
            accumulated.push_str(&chunk);
            items.push(Ok(GenerationEvent::Content {
                content: chunk,
                accumulated: accumulated.clone(),
            }));
        }
        match self.outcome {
            ScriptOutcome::Done {
                summary,
                template_used,
                consultation_date,
            } => items.push(Ok(GenerationEvent::Done {
                summary,
                template_used,
                consultation_date,
            })),
            ScriptOutcome::Error(message) => {
                items.push(Err(KarteError::Stream { message }));
            }
        }
        Box::pin(stream::iter(items))
    }
}

/// A mock backend with scripted generations and an in-memory record table.
///
/// Generation scripts are popped from a FIFO queue. When the queue is empty,
/// a trivial one-chunk success script is used. Call counters expose how many
/// times each endpoint was hit, so tests can assert that local validation
/// failures never reach the network layer.
pub struct MockBackend {
    scripts: Arc<Mutex<VecDeque<GenerationScript>>>,
    records: Arc<Mutex<Vec<ConsultationSummary>>>,
    next_id: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend with no scripts and no records.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(VecDeque::new())),
            records: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(1),
            generate_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock backend pre-loaded with generation scripts.
    pub fn with_scripts(scripts: Vec<GenerationScript>) -> Self {
        let backend = Self::new();
        {
            let queue = backend.scripts.clone();
            // Constructor context, no contention.
            if let Ok(mut guard) = queue.try_lock() {
                guard.extend(scripts);
            }
        }
        backend
    }

    /// Queue another generation script.
    pub async fn push_script(&self, script: GenerationScript) {
        self.scripts.lock().await.push_back(script);
    }

    /// Seed the record table, overwriting whatever is there.
    pub async fn seed_records(&self, records: Vec<ConsultationSummary>) {
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        self.next_id.store(max_id as usize + 1, Ordering::SeqCst);
        *self.records.lock().await = records;
    }

    /// Snapshot of the current record table.
    pub async fn records(&self) -> Vec<ConsultationSummary> {
        self.records.lock().await.clone()
    }

    /// How many times `generate` was called.
    pub fn generate_call_count(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryBackend for MockBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, KarteError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.lock().await.pop_front().unwrap_or_else(|| {
            GenerationScript::succeeding(
                vec!["mock summary"],
                request
                    .consultation_date
                    .unwrap_or_else(|| Utc::now().date_naive()),
            )
        });
        Ok(script.into_stream())
    }

    async fn save_direct(
        &self,
        request: &DirectSaveRequest,
    ) -> Result<ConsultationSummary, KarteError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let record = ConsultationSummary {
            id,
            consultation_date: request.consultation_date,
            original_text: request.original_text.clone(),
            summary_text: request.summary_text.clone(),
            prompt_template_id: request.prompt_template_id,
            procedures_discussed: request.procedures_discussed.clone(),
            consultant_name: request.consultant_name.clone(),
            customer_name: request.customer_name.clone(),
            consultation_title: request.consultation_title.clone(),
            created_by: request.created_by.clone(),
            created_at: Utc::now(),
        };
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_summaries(
        &self,
        query: &SummaryQuery,
    ) -> Result<Vec<ConsultationSummary>, KarteError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().await;
        let mut matching: Vec<ConsultationSummary> = records
            .iter()
            .filter(|r| {
                query
                    .start_date
                    .is_none_or(|start| r.consultation_date >= start)
                    && query.end_date.is_none_or(|end| r.consultation_date <= end)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn get_summary(&self, id: i64) -> Result<ConsultationSummary, KarteError> {
        self.records
            .lock()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(KarteError::NotFound {
                resource: "summary",
                id,
            })
    }

    async fn update_summary(
        &self,
        id: i64,
        update: &SummaryUpdate,
    ) -> Result<ConsultationSummary, KarteError> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(KarteError::NotFound {
                resource: "summary",
                id,
            })?;
        record.summary_text = update.summary_text.clone();
        if let Some(procedures) = &update.procedures_discussed {
            record.procedures_discussed = Some(procedures.clone());
        }
        Ok(record.clone())
    }

    async fn delete_summary(&self, id: i64) -> Result<(), KarteError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(KarteError::NotFound {
                resource: "summary",
                id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn scripted_stream_yields_chunks_then_done() {
        let backend = MockBackend::with_scripts(vec![GenerationScript::succeeding(
            vec!["요약", " 내용"],
            date(),
        )]);
        let request = GenerationRequest {
            original_text: "transcript".into(),
            consultation_date: Some(date()),
            prompt_template_id: None,
        };
        let mut stream = backend.generate(&request).await.unwrap();

        let mut contents = Vec::new();
        let mut done = None;
        while let Some(item) = stream.next().await {
            match item.unwrap() {
                GenerationEvent::Content { content, .. } => contents.push(content),
                GenerationEvent::Done { summary, .. } => done = Some(summary),
            }
        }
        assert_eq!(contents, vec!["요약", " 내용"]);
        assert_eq!(done.as_deref(), Some("요약 내용"));
        assert_eq!(backend.generate_call_count(), 1);
    }

    #[tokio::test]
    async fn failing_script_ends_with_stream_error() {
        let backend =
            MockBackend::with_scripts(vec![GenerationScript::failing(vec!["partial"], "boom")]);
        let request = GenerationRequest {
            original_text: "t".into(),
            consultation_date: None,
            prompt_template_id: None,
        };
        let mut stream = backend.generate(&request).await.unwrap();

        assert!(stream.next().await.unwrap().is_ok());
        let last = stream.next().await.unwrap();
        assert!(matches!(last, Err(KarteError::Stream { message }) if message == "boom"));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let backend = MockBackend::new();
        let request = DirectSaveRequest {
            consultation_date: date(),
            original_text: "o".into(),
            summary_text: "s".into(),
            prompt_template_id: None,
            procedures_discussed: None,
            consultant_name: None,
            customer_name: None,
            consultation_title: None,
            created_by: None,
        };
        let a = backend.save_direct(&request).await.unwrap();
        let b = backend.save_direct(&request).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(backend.records().await.len(), 2);
    }

    #[tokio::test]
    async fn update_missing_record_is_not_found() {
        let backend = MockBackend::new();
        let update = SummaryUpdate {
            summary_text: "x".into(),
            procedures_discussed: None,
        };
        let err = backend.update_summary(99, &update).await.unwrap_err();
        assert!(matches!(err, KarteError::NotFound { id: 99, .. }));
    }
}
