// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-generation FSM driving one streaming summary request.
//!
//! Each session goes through phases: Idle -> Validating -> Streaming ->
//! Complete | Error. Observers subscribe to a watch channel and receive a
//! snapshot after every phase change and every content fragment, which is
//! what lets a display layer render the summary as it grows.

use futures::StreamExt;
use karte_core::{GenerationEvent, GenerationResult, KarteError, SummaryBackend};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::draft::SummaryDraft;

/// Phases of the generation FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No generation submitted yet.
    Idle,
    /// Checking the draft locally, before any network call.
    Validating,
    /// The stream is open and fragments are arriving.
    Streaming,
    /// The stream finished with a result.
    Complete,
    /// Validation, transport, or the backend failed. No partial result
    /// survives this phase.
    Error,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Validating => write!(f, "validating"),
            SessionPhase::Streaming => write!(f, "streaming"),
            SessionPhase::Complete => write!(f, "complete"),
            SessionPhase::Error => write!(f, "error"),
        }
    }
}

/// Observable state of a session at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// Concatenation of every fragment received so far. Cleared when the
    /// session errors, populated with the final summary on completion.
    pub accumulated: String,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
}

impl SessionSnapshot {
    fn idle() -> Self {
        Self {
            phase: SessionPhase::Idle,
            accumulated: String::new(),
            result: None,
            error: None,
        }
    }
}

/// Drives one generation at a time and publishes progress snapshots.
///
/// `generate` takes `&mut self`, so a session can never have two streams in
/// flight. Resubmitting after a completed or failed run resets the snapshot
/// before the new stream opens.
pub struct GenerationSession {
    tx: watch::Sender<SessionSnapshot>,
}

impl GenerationSession {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::idle());
        Self { tx }
    }

    /// Subscribes to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Current phase, for callers that do not need the full snapshot.
    pub fn phase(&self) -> SessionPhase {
        self.tx.borrow().phase
    }

    /// Validates the draft, opens the stream, and drives it to its terminal
    /// item.
    ///
    /// The accumulated text is derived here by concatenating fragments in
    /// arrival order; the server's own running concatenation is advisory and
    /// never trusted. On any failure the buffer is discarded: an errored
    /// session exposes no partial summary.
    pub async fn generate(
        &mut self,
        backend: &dyn SummaryBackend,
        draft: &SummaryDraft,
    ) -> Result<GenerationResult, KarteError> {
        self.publish(SessionSnapshot {
            phase: SessionPhase::Validating,
            accumulated: String::new(),
            result: None,
            error: None,
        });

        if let Err(e) = draft.validate() {
            warn!(error = %e, "draft rejected before submission");
            self.fail(&e);
            return Err(e);
        }

        let request = draft.to_request();
        let details = draft.details();

        let mut stream = match backend.generate(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "generation request failed to open");
                self.fail(&e);
                return Err(e);
            }
        };

        info!("generation stream opened");
        let mut accumulated = String::new();
        self.publish(SessionSnapshot {
            phase: SessionPhase::Streaming,
            accumulated: String::new(),
            result: None,
            error: None,
        });

        while let Some(item) = stream.next().await {
            match item {
                Ok(GenerationEvent::Content { content, .. }) => {
                    accumulated.push_str(&content);
                    debug!(len = accumulated.len(), "fragment received");
                    self.publish(SessionSnapshot {
                        phase: SessionPhase::Streaming,
                        accumulated: accumulated.clone(),
                        result: None,
                        error: None,
                    });
                }
                Ok(GenerationEvent::Done {
                    summary,
                    template_used,
                    consultation_date,
                }) => {
                    let result = GenerationResult {
                        summary,
                        original_text: request.original_text.clone(),
                        template_used,
                        consultation_date,
                        consultant_name: details.consultant_name,
                        customer_name: details.customer_name,
                        consultation_title: details.consultation_title,
                    };
                    info!(date = %result.consultation_date, "generation complete");
                    self.publish(SessionSnapshot {
                        phase: SessionPhase::Complete,
                        accumulated: result.summary.clone(),
                        result: Some(result.clone()),
                        error: None,
                    });
                    return Ok(result);
                }
                Err(e) => {
                    warn!(error = %e, "generation stream failed");
                    self.fail(&e);
                    return Err(e);
                }
            }
        }

        // The stream ended without a terminal item: connection dropped
        // mid-generation.
        let e = KarteError::Stream {
            message: "generation stream ended before completion".to_string(),
        };
        warn!("generation stream ended without a terminal item");
        self.fail(&e);
        Err(e)
    }

    fn publish(&self, snapshot: SessionSnapshot) {
        // send_replace updates the channel value even with no receiver
        // alive, so snapshot() and phase() stay current for callers that
        // never subscribe.
        self.tx.send_replace(snapshot);
    }

    fn fail(&self, error: &KarteError) {
        // Server-reported generation failures carry a message meant for the
        // operator; surface it without the error type's prefix.
        let message = match error {
            KarteError::Stream { message } => message.clone(),
            other => other.to_string(),
        };
        self.publish(SessionSnapshot {
            phase: SessionPhase::Error,
            accumulated: String::new(),
            result: None,
            error: Some(message),
        });
    }
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}
