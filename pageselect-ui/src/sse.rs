//! Server-Sent Events stream of session changes.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

use crate::state::{AppState, ChangeEvent};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct SsePayload {
    #[serde(rename = "type")]
    event_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
}

impl SsePayload {
    fn new(event_type: &'static str) -> Self {
        Self {
            event_type,
            page: None,
            added: None,
            selected: None,
            count: None,
        }
    }
}

impl From<&ChangeEvent> for SsePayload {
    fn from(event: &ChangeEvent) -> Self {
        match event {
            ChangeEvent::PageRequested { page } => SsePayload {
                page: Some(*page),
                ..SsePayload::new("page_requested")
            },
            ChangeEvent::PageLoaded { page, added } => SsePayload {
                page: Some(*page),
                added: Some(*added),
                ..SsePayload::new("page_loaded")
            },
            ChangeEvent::FetchFailed { page } => SsePayload {
                page: Some(*page),
                ..SsePayload::new("fetch_failed")
            },
            ChangeEvent::SelectionChanged { selected } => SsePayload {
                selected: Some(*selected),
                ..SsePayload::new("selection_changed")
            },
            ChangeEvent::BulkTargetChanged { count } => SsePayload {
                count: *count,
                ..SsePayload::new("bulk_target_changed")
            },
        }
    }
}

/// SSE endpoint handler.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.event_tx.subscribe();

    let stream = async_stream::stream! {
        // Send initial connected event
        yield Ok(Event::default().event("connected").data("{}"));

        loop {
            match rx.recv().await {
                Ok(change_event) => {
                    let payload = SsePayload::from(&change_event);
                    if let Ok(json) = serde_json::to_string(&payload) {
                        yield Ok(Event::default().event("change").data(json));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
