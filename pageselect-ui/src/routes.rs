//! HTTP route handlers for the selection API.

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use pageselect::core::bulk_input::bulk_count_from_json;
use pageselect::core::types::RecordId;
use pageselect::session::SessionSnapshot;
use serde::Deserialize;
use serde_json::Value;

use crate::state::{AppState, ChangeEvent};

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/page", post(change_page))
        .route("/refresh", post(refresh_page))
        .route("/selection", post(change_selection))
        .route("/bulk", post(submit_bulk).delete(clear_bulk))
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/state - current session snapshot.
async fn get_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.lock().await.snapshot())
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: u32,
}

/// POST /api/page - navigate to a zero-based page, clamped to the known range.
async fn change_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> Json<SessionSnapshot> {
    let (ticket, snapshot) = {
        let mut session = state.session.lock().await;
        let index = session.pager().clamp_request(request.page);
        let ticket = session.request_page(index);
        (ticket, session.snapshot())
    };
    if let Some(ticket) = ticket {
        state.publish(ChangeEvent::PageRequested {
            page: ticket.page_index,
        });
        state.spawn_fetch(ticket);
    }
    Json(snapshot)
}

/// POST /api/refresh - re-fetch the current page.
async fn refresh_page(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let (ticket, snapshot) = {
        let mut session = state.session.lock().await;
        let ticket = session.refresh();
        (ticket, session.snapshot())
    };
    state.publish(ChangeEvent::PageRequested {
        page: ticket.page_index,
    });
    state.spawn_fetch(ticket);
    Json(snapshot)
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub ids: Vec<RecordId>,
}

/// POST /api/selection - replace the selection with exactly `ids`.
async fn change_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Json<SessionSnapshot> {
    let snapshot = {
        let mut session = state.session.lock().await;
        session.manual_selection_change(request.ids);
        session.snapshot()
    };
    state.publish(ChangeEvent::SelectionChanged {
        selected: snapshot.selected.len(),
    });
    Json(snapshot)
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    /// Any JSON value; non-numeric or negative input clears the target.
    #[serde(default)]
    pub count: Value,
}

/// POST /api/bulk - submit a "select first N" target.
async fn submit_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkRequest>,
) -> Json<SessionSnapshot> {
    let (added, snapshot) = {
        let mut session = state.session.lock().await;
        let summary = session.set_bulk_target(bulk_count_from_json(&request.count));
        (summary.added.len(), session.snapshot())
    };
    state.publish(ChangeEvent::BulkTargetChanged {
        count: snapshot.bulk_target.count(),
    });
    if added > 0 {
        state.publish(ChangeEvent::SelectionChanged {
            selected: snapshot.selected.len(),
        });
    }
    Json(snapshot)
}

/// DELETE /api/bulk - drop the target; the selection is kept.
async fn clear_bulk(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let snapshot = {
        let mut session = state.session.lock().await;
        session.clear_bulk_target();
        session.snapshot()
    };
    state.publish(ChangeEvent::BulkTargetChanged { count: None });
    Json(snapshot)
}
