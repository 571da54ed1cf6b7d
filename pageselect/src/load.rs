//! Drive page fetches against a shared session.
//!
//! The session lock is held only to issue the request and to apply the result,
//! never across the fetch itself, so newer page requests can supersede an
//! in-flight one.

use anyhow::{Result, bail};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::core::pager::FetchTicket;
use crate::io::fetch::PageSource;
use crate::session::{FetchOutcome, SelectionSession};

/// Fetch the page named by `ticket` and apply the result.
#[instrument(skip_all, fields(page = ticket.page_index, generation = ticket.generation))]
pub async fn run_fetch<S: PageSource>(
    session: &Mutex<SelectionSession>,
    source: &S,
    ticket: FetchTicket,
) -> FetchOutcome {
    let request = session.lock().await.fetch_request(ticket);
    let result = source.fetch_page(request).await;
    session.lock().await.complete_fetch(ticket, result)
}

/// Load pages `0..=last_page` in order, reconciling each as it arrives.
///
/// Stops at the first page past the known total. Fails if any fetch fails.
pub async fn page_through<S: PageSource>(
    session: &Mutex<SelectionSession>,
    source: &S,
    last_page: u32,
) -> Result<()> {
    for index in 0..=last_page {
        let ticket = {
            let mut guard = session.lock().await;
            if index > 0 && u64::from(index) >= guard.pager().total_pages() {
                info!(page = index, "no more pages");
                break;
            }
            match guard.request_page(index) {
                Some(ticket) => ticket,
                None => guard.refresh(),
            }
        };
        match run_fetch(session, source, ticket).await {
            FetchOutcome::Applied { .. } => {}
            FetchOutcome::Failed => bail!("fetch failed for page {}", index),
            FetchOutcome::Stale => bail!("fetch for page {} was superseded", index),
        }
    }
    Ok(())
}
