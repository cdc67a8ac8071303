// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for generation responses.
//!
//! Converts a reqwest response byte stream into typed [`GenerationEvent`]s
//! using the `eventsource-stream` crate for SSE protocol compliance. The
//! backend sends unnamed `data:` frames carrying JSON tagged by a `type`
//! field: `content`, `done`, or `error`.

use chrono::NaiveDate;
use eventsource_stream::Eventsource;
use futures::future;
use futures::stream::StreamExt;
use karte_core::{GenerationEvent, GenerationStream, KarteError};
use serde::Deserialize;

/// Wire shape of one SSE data frame.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamFrame {
    Content { content: String, accumulated: String },
    Done {
        summary: String,
        template_used: String,
        consultation_date: NaiveDate,
    },
    Error { error: String },
}

/// Parses a reqwest streaming response into a [`GenerationStream`].
///
/// Guarantees at most one terminal item: after a `done` frame, an `error`
/// frame, a malformed frame, or a transport failure, the stream ends even if
/// more bytes arrive on the wire. Content frames pass through in arrival
/// order.
pub fn parse_generation_stream(response: reqwest::Response) -> GenerationStream {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream
        .scan(false, |terminated, result| {
            if *terminated {
                return future::ready(None);
            }
            let item = match result {
                Ok(event) => parse_frame(&event.data),
                Err(e) => Some(Err(KarteError::Stream {
                    message: format!("SSE transport error: {e}"),
                })),
            };
            if matches!(
                item,
                Some(Err(_)) | Some(Ok(GenerationEvent::Done { .. }))
            ) {
                *terminated = true;
            }
            future::ready(Some(item))
        })
        .filter_map(future::ready);

    Box::pin(mapped)
}

/// Parses one SSE data payload into a generation event.
///
/// Returns `None` for empty keep-alive frames. A malformed payload or an
/// unknown `type` tag is a stream error; the caller treats it as terminal.
fn parse_frame(data: &str) -> Option<Result<GenerationEvent, KarteError>> {
    if data.trim().is_empty() {
        return None;
    }

    let frame = match serde_json::from_str::<StreamFrame>(data) {
        Ok(frame) => frame,
        Err(e) => {
            return Some(Err(KarteError::Stream {
                message: format!("malformed stream frame: {e}"),
            }));
        }
    };

    Some(match frame {
        StreamFrame::Content { content, accumulated } => {
            Ok(GenerationEvent::Content { content, accumulated })
        }
        StreamFrame::Done {
            summary,
            template_used,
            consultation_date,
        } => Ok(GenerationEvent::Done {
            summary,
            template_used,
            consultation_date,
        }),
        StreamFrame::Error { error } => Err(KarteError::Stream { message: error }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    /// Serves raw SSE text through wiremock to get a real reqwest::Response.
    async fn mock_sse_response(sse_text: &str) -> reqwest::Response {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_text.to_string()),
            )
            .mount(&server)
            .await;

        reqwest::get(&server.uri()).await.unwrap()
    }

    #[tokio::test]
    async fn parses_content_then_done() {
        let sse = concat!(
            "data: {\"type\":\"content\",\"content\":\"요약\",\"accumulated\":\"요약\"}\n\n",
            "data: {\"type\":\"content\",\"content\":\" 내용\",\"accumulated\":\"요약 내용\"}\n\n",
            "data: {\"type\":\"done\",\"summary\":\"요약 내용\",\"template_used\":\"default\",\"consultation_date\":\"2024-07-01\"}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let mut stream = parse_generation_stream(response);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(
            first,
            GenerationEvent::Content {
                content: "요약".into(),
                accumulated: "요약".into()
            }
        );

        let second = stream.next().await.unwrap().unwrap();
        assert!(matches!(second, GenerationEvent::Content { ref content, .. } if content == " 내용"));

        let third = stream.next().await.unwrap().unwrap();
        match third {
            GenerationEvent::Done {
                summary,
                template_used,
                consultation_date,
            } => {
                assert_eq!(summary, "요약 내용");
                assert_eq!(template_used, "default");
                assert_eq!(
                    consultation_date,
                    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
                );
            }
            other => panic!("expected Done, got {other:?}"),
        }

        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn error_frame_is_terminal() {
        let sse = concat!(
            "data: {\"type\":\"content\",\"content\":\"partial\",\"accumulated\":\"partial\"}\n\n",
            "data: {\"type\":\"error\",\"error\":\"model unavailable\"}\n\n",
            "data: {\"type\":\"content\",\"content\":\"after\",\"accumulated\":\"after\"}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let mut stream = parse_generation_stream(response);

        let first = stream.next().await.unwrap();
        assert!(first.is_ok());

        let second = stream.next().await.unwrap();
        match second {
            Err(KarteError::Stream { message }) => assert_eq!(message, "model unavailable"),
            other => panic!("expected Stream error, got {other:?}"),
        }

        // Frames after the terminal error are never surfaced.
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn nothing_after_done_is_surfaced() {
        let sse = concat!(
            "data: {\"type\":\"done\",\"summary\":\"s\",\"template_used\":\"t\",\"consultation_date\":\"2024-01-15\"}\n\n",
            "data: {\"type\":\"content\",\"content\":\"late\",\"accumulated\":\"late\"}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let mut stream = parse_generation_stream(response);

        let first = stream.next().await.unwrap().unwrap();
        assert!(matches!(first, GenerationEvent::Done { .. }));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn malformed_json_yields_single_stream_error() {
        let sse = "data: {not json}\n\ndata: {\"type\":\"content\",\"content\":\"x\",\"accumulated\":\"x\"}\n\n";
        let response = mock_sse_response(sse).await;
        let mut stream = parse_generation_stream(response);

        let first = stream.next().await.unwrap();
        assert!(matches!(first, Err(KarteError::Stream { .. })));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn unknown_frame_type_is_a_stream_error() {
        let sse = "data: {\"type\":\"heartbeat\"}\n\n";
        let response = mock_sse_response(sse).await;
        let mut stream = parse_generation_stream(response);

        let first = stream.next().await.unwrap();
        match first {
            Err(KarteError::Stream { message }) => {
                assert!(message.contains("malformed"), "got: {message}");
            }
            other => panic!("expected Stream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_frames_are_skipped() {
        let sse = concat!(
            "data: \n\n",
            "data: {\"type\":\"done\",\"summary\":\"s\",\"template_used\":\"t\",\"consultation_date\":\"2024-01-15\"}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let mut stream = parse_generation_stream(response);

        let first = stream.next().await.unwrap().unwrap();
        assert!(matches!(first, GenerationEvent::Done { .. }));
    }

    #[tokio::test]
    async fn empty_body_ends_without_items() {
        let response = mock_sse_response("").await;
        let mut stream = parse_generation_stream(response);
        assert!(stream.next().await.is_none());
    }
}
