//! End-to-end selection scenarios over a scripted catalog.
//!
//! Drives a session through page loads, bulk submissions and manual edits the
//! way the UI server does, and checks the resulting selection.

use std::sync::Arc;

use pageselect::core::types::RecordId;
use pageselect::load::{page_through, run_fetch};
use pageselect::session::{FetchOutcome, SelectionSession};
use pageselect::test_support::{ScriptedSource, catalog_id};
use tokio::sync::Mutex;

fn catalog_ids(positions: std::ops::Range<u64>) -> Vec<RecordId> {
    positions.map(catalog_id).collect()
}

async fn load(session: &Mutex<SelectionSession>, source: &ScriptedSource, index: u32) {
    let ticket = {
        let mut guard = session.lock().await;
        match guard.request_page(index) {
            Some(ticket) => ticket,
            None => guard.refresh(),
        }
    };
    let outcome = run_fetch(session, source, ticket).await;
    assert!(matches!(outcome, FetchOutcome::Applied { .. }), "{outcome:?}");
}

fn selected(session: &SelectionSession) -> Vec<RecordId> {
    session.reconciler().selected().iter().collect()
}

#[tokio::test]
async fn bulk_target_completes_lazily_across_pages() {
    let source = ScriptedSource::catalog(100, 12);
    let session = Mutex::new(SelectionSession::new(12));
    session.lock().await.set_bulk_target(20);

    load(&session, &source, 0).await;
    assert_eq!(selected(&*session.lock().await), catalog_ids(0..12));

    load(&session, &source, 1).await;
    let guard = session.lock().await;
    assert_eq!(selected(&guard), catalog_ids(0..20));
    assert!(!guard.reconciler().selected().contains(catalog_id(20)));
}

#[tokio::test]
async fn submitting_target_reconciles_loaded_page_immediately() {
    let source = ScriptedSource::catalog(100, 12);
    let session = Mutex::new(SelectionSession::new(12));
    load(&session, &source, 1).await;

    let summary = session.lock().await.set_bulk_target(20);

    assert_eq!(summary.added, catalog_ids(12..20));
    assert_eq!(selected(&*session.lock().await), catalog_ids(12..20));
}

/// A manual deselect survives until the record's page is reconciled again.
#[tokio::test]
async fn manual_deselect_is_undone_by_reloading_its_page() {
    let source = ScriptedSource::catalog(100, 12);
    let session = Mutex::new(SelectionSession::new(12));
    session.lock().await.set_bulk_target(20);
    page_through(&session, &source, 1).await.expect("page through");

    let remaining: Vec<RecordId> = catalog_ids(0..20)
        .into_iter()
        .filter(|id| *id != catalog_id(5))
        .collect();
    session
        .lock()
        .await
        .manual_selection_change(remaining.clone());
    assert_eq!(selected(&*session.lock().await), remaining);

    // Loading a page that does not hold position 5 leaves it deselected.
    load(&session, &source, 1).await;
    assert!(!session.lock().await.reconciler().selected().contains(catalog_id(5)));

    load(&session, &source, 0).await;
    assert_eq!(selected(&*session.lock().await), catalog_ids(0..20));
}

#[tokio::test]
async fn manual_change_replaces_selection_exactly() {
    let source = ScriptedSource::catalog(100, 12);
    let session = Mutex::new(SelectionSession::new(12));
    session.lock().await.set_bulk_target(12);
    load(&session, &source, 0).await;

    let chosen = vec![catalog_id(50), catalog_id(3)];
    session.lock().await.manual_selection_change(chosen);

    let guard = session.lock().await;
    assert_eq!(selected(&guard), vec![catalog_id(3), catalog_id(50)]);
    assert_eq!(guard.reconciler().bulk_target().count(), Some(12));
}

#[tokio::test]
async fn empty_catalog_selects_nothing() {
    let source = ScriptedSource::catalog(0, 12);
    let session = Mutex::new(SelectionSession::new(12));
    session.lock().await.set_bulk_target(50);

    page_through(&session, &source, 3).await.expect("page through");

    let guard = session.lock().await;
    assert!(guard.reconciler().selected().is_empty());
    assert_eq!(guard.pager().total_pages(), 0);
}

#[tokio::test]
async fn target_beyond_total_selects_everything_loaded() {
    let source = ScriptedSource::catalog(30, 12);
    let session = Mutex::new(SelectionSession::new(12));
    session.lock().await.set_bulk_target(1_000);

    page_through(&session, &source, 5).await.expect("page through");

    assert_eq!(selected(&*session.lock().await), catalog_ids(0..30));
}

#[tokio::test]
async fn selection_never_shrinks_without_manual_edits() {
    let source = ScriptedSource::catalog(60, 12);
    let session = Mutex::new(SelectionSession::new(12));
    let mut sizes = Vec::new();

    for (index, count) in [(0, 5), (1, 30), (2, 10), (0, 0), (3, 48)] {
        session.lock().await.set_bulk_target(count);
        sizes.push(session.lock().await.reconciler().selected().len());
        load(&session, &source, index).await;
        sizes.push(session.lock().await.reconciler().selected().len());
    }

    assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]), "{sizes:?}");
}

#[tokio::test]
async fn stale_fetch_does_not_overwrite_newer_page() {
    let mut source = ScriptedSource::catalog(100, 12);
    let gate = source.gate(3);
    let source = Arc::new(source);
    let session = Arc::new(Mutex::new(SelectionSession::new(12)));
    session.lock().await.set_bulk_target(100);

    let older = session.lock().await.request_page(2).expect("ticket");
    let older_fetch = {
        let (session, source) = (session.clone(), source.clone());
        tokio::spawn(async move { run_fetch(&session, &*source, older).await })
    };

    let newer = session.lock().await.request_page(3).expect("ticket");
    let newer_outcome = run_fetch(&session, &*source, newer).await;
    assert!(matches!(newer_outcome, FetchOutcome::Applied { page_index: 3, .. }));

    gate.notify_one();
    let older_outcome = older_fetch.await.expect("join");
    assert_eq!(older_outcome, FetchOutcome::Stale);

    let guard = session.lock().await;
    let loaded = guard.reconciler().loaded_page().expect("loaded page");
    assert_eq!(loaded.index, 3);
    assert_eq!(selected(&guard), catalog_ids(36..48));
    assert!(!guard.is_loading());
}
