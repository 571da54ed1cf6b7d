//! Shared application state for the UI server.

use std::sync::Arc;

use pageselect::core::pager::FetchTicket;
use pageselect::io::fetch::HttpPageSource;
use pageselect::load::run_fetch;
use pageselect::session::{FetchOutcome, SelectionSession};
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

/// Events broadcast to SSE clients when the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    PageRequested { page: u32 },
    PageLoaded { page: u32, added: usize },
    FetchFailed { page: u32 },
    SelectionChanged { selected: usize },
    BulkTargetChanged { count: Option<u64> },
}

/// Shared state accessible from all request handlers.
///
/// Handlers hold the session lock for the whole event they process, so events
/// apply one at a time. Fetches run outside the lock.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<SelectionSession>>,
    pub source: Arc<HttpPageSource>,
    /// Broadcast sender for session change events.
    pub event_tx: Arc<broadcast::Sender<ChangeEvent>>,
}

impl AppState {
    pub fn new(session: SelectionSession, source: HttpPageSource) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            session: Arc::new(Mutex::new(session)),
            source: Arc::new(source),
            event_tx: Arc::new(event_tx),
        }
    }

    pub fn publish(&self, event: ChangeEvent) {
        debug!(?event, "broadcasting change");
        let _ = self.event_tx.send(event);
    }

    /// Fetch the ticket's page in a background task and publish the outcome.
    pub fn spawn_fetch(&self, ticket: FetchTicket) {
        let state = self.clone();
        tokio::spawn(async move {
            let outcome = run_fetch(&state.session, &*state.source, ticket).await;
            state.publish_outcome(ticket, outcome);
        });
    }

    fn publish_outcome(&self, ticket: FetchTicket, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Applied { page_index, added } => self.publish(ChangeEvent::PageLoaded {
                page: page_index,
                added: added.len(),
            }),
            FetchOutcome::Failed => self.publish(ChangeEvent::FetchFailed {
                page: ticket.page_index,
            }),
            FetchOutcome::Stale => {}
        }
    }
}
