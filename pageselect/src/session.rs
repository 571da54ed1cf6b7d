//! Selection session: the pager and the reconciler driven as one event loop.
//!
//! Each method handles one event to completion. Fetching is the only
//! suspending step; it happens outside the session, and its result re-enters
//! through [`SelectionSession::complete_fetch`] together with the ticket it was
//! issued for, so a superseded result can be recognized and dropped.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::bulk_input::parse_bulk_count;
use crate::core::pager::{FetchTicket, Pager};
use crate::core::reconcile::ReconcileSummary;
use crate::core::reconciler::SelectionReconciler;
use crate::core::types::{BulkTarget, Page, Record, RecordId};
use crate::io::fetch::{FetchRequest, PageResponse};

/// What happened to a fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page replaced the loaded page and was reconciled.
    Applied { page_index: u32, added: Vec<RecordId> },
    /// A newer request superseded this ticket; the result was discarded.
    Stale,
    /// The current request failed; the loaded page is unchanged.
    Failed,
}

#[derive(Debug, Clone)]
pub struct SelectionSession {
    pager: Pager,
    reconciler: SelectionReconciler,
    loading: bool,
}

impl SelectionSession {
    pub fn new(page_size: u32) -> Self {
        Self {
            pager: Pager::new(page_size),
            reconciler: SelectionReconciler::new(),
            loading: false,
        }
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn reconciler(&self) -> &SelectionReconciler {
        &self.reconciler
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Ticket for the initial load of the current page.
    pub fn start(&mut self) -> FetchTicket {
        self.refresh()
    }

    /// Navigate to `index`; `None` if the index is unchanged.
    pub fn request_page(&mut self, index: u32) -> Option<FetchTicket> {
        let ticket = self.pager.request_page(index)?;
        self.loading = true;
        debug!(page = index, generation = ticket.generation, "page requested");
        Some(ticket)
    }

    /// Re-fetch the current page, superseding any in-flight request.
    pub fn refresh(&mut self) -> FetchTicket {
        let ticket = self.pager.refresh();
        self.loading = true;
        debug!(
            page = ticket.page_index,
            generation = ticket.generation,
            "page refresh requested"
        );
        ticket
    }

    pub fn fetch_request(&self, ticket: FetchTicket) -> FetchRequest {
        FetchRequest::for_ticket(ticket, self.pager.page_size())
    }

    /// Apply a fetch result if `ticket` is still the current request.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<PageResponse>,
    ) -> FetchOutcome {
        if !self.pager.is_current(ticket) {
            debug!(
                page = ticket.page_index,
                generation = ticket.generation,
                "discarding stale fetch result"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    page = ticket.page_index,
                    error = %format!("{err:#}"),
                    "page fetch failed"
                );
                return FetchOutcome::Failed;
            }
        };

        if let Some(total) = response.total_count {
            self.pager.set_total_records(total);
        }
        let page = Page::new(ticket.page_index, self.pager.page_size(), response.records);
        let summary = self.reconciler.on_page_loaded(page);
        info!(
            page = ticket.page_index,
            added = summary.added.len(),
            selected = self.reconciler.selected().len(),
            "page loaded"
        );
        FetchOutcome::Applied {
            page_index: ticket.page_index,
            added: summary.added,
        }
    }

    pub fn set_bulk_target(&mut self, count: u64) -> ReconcileSummary {
        self.reconciler.set_bulk_target(count)
    }

    /// Submit raw bulk input; anything but a non-negative integer clears the intent.
    pub fn submit_bulk_input(&mut self, raw: &str) -> ReconcileSummary {
        self.set_bulk_target(parse_bulk_count(raw))
    }

    pub fn clear_bulk_target(&mut self) {
        self.reconciler.clear_bulk_target();
    }

    pub fn manual_selection_change<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RecordId>,
    {
        self.reconciler.on_manual_selection_change(ids);
    }

    /// Read-only view for the render collaborator.
    pub fn snapshot(&self) -> SessionSnapshot {
        let records = self
            .reconciler
            .loaded_page()
            .map(|page| page.records.clone())
            .unwrap_or_default();
        let selected: Vec<RecordId> = self.reconciler.selected().iter().collect();
        SessionSnapshot {
            page_index: self.pager.page_index(),
            effective_page: self.pager.effective_page(),
            page_size: self.pager.page_size(),
            total_records: self.pager.total_records(),
            total_pages: self.pager.total_pages(),
            loading: self.loading,
            bulk_target: self.reconciler.bulk_target(),
            summary: selection_summary(selected.len()),
            page_report: self.pager.page_report(records.len()),
            selected,
            records,
        }
    }
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub page_index: u32,
    pub effective_page: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u64,
    pub loading: bool,
    pub bulk_target: BulkTarget,
    /// Selected ids in ascending order.
    pub selected: Vec<RecordId>,
    pub summary: Option<String>,
    pub page_report: String,
    pub records: Vec<Record>,
}

/// "N artworks selected", or `None` when nothing is selected.
pub fn selection_summary(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 artwork selected".to_string()),
        n => Some(format!("{n} artworks selected")),
    }
}
