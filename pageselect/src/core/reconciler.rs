//! Stateful selection reconciler.
//!
//! Holds the selected identities, the pending bulk target, and the most
//! recently loaded page. Reconciliation runs only at the two explicit trigger
//! points (a page load and a target submission), never in response to its own
//! writes.

use tracing::debug;

use crate::core::reconcile::{ReconcileSummary, reconcile};
use crate::core::types::{BulkTarget, Page, RecordId, SelectionSet};

#[derive(Debug, Clone, Default)]
pub struct SelectionReconciler {
    selected: SelectionSet,
    bulk_target: BulkTarget,
    loaded_page: Option<Page>,
}

impl SelectionReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &SelectionSet {
        &self.selected
    }

    pub fn bulk_target(&self) -> BulkTarget {
        self.bulk_target
    }

    pub fn loaded_page(&self) -> Option<&Page> {
        self.loaded_page.as_ref()
    }

    /// Record a new target and reconcile the loaded page against it.
    ///
    /// Pages not currently loaded stay unresolved until they load.
    pub fn set_bulk_target(&mut self, count: u64) -> ReconcileSummary {
        self.bulk_target = BulkTarget::from_count(count);
        debug!(bulk_target = ?self.bulk_target, "bulk target set");
        self.reconcile_loaded()
    }

    /// Drop the bulk intent. Records already added stay selected.
    pub fn clear_bulk_target(&mut self) {
        debug!("bulk target cleared");
        self.bulk_target = BulkTarget::Absent;
    }

    /// Replace the loaded page and reconcile it against the current target.
    pub fn on_page_loaded(&mut self, page: Page) -> ReconcileSummary {
        self.loaded_page = Some(page);
        self.reconcile_loaded()
    }

    /// Replace the selection with exactly `ids`. The bulk target is untouched.
    pub fn on_manual_selection_change<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RecordId>,
    {
        self.selected = ids.into_iter().collect();
        debug!(selected = self.selected.len(), "manual selection applied");
    }

    fn reconcile_loaded(&mut self) -> ReconcileSummary {
        let Some(page) = &self.loaded_page else {
            return ReconcileSummary::default();
        };
        let summary = reconcile(page, self.bulk_target, &mut self.selected);
        if !summary.is_noop() {
            debug!(
                page = page.index,
                added = summary.added.len(),
                selected = self.selected.len(),
                "reconciled loaded page"
            );
        }
        summary
    }
}
