//! The reconciliation pass: merge in-range visible records into a selection.
//!
//! The pass is a pure function of `(page, target, selected)`. It only ever adds
//! identities, so running it repeatedly converges after the first run and it can
//! never feed back into itself.

use crate::core::types::{BulkTarget, Page, RecordId, SelectionSet};

/// Identities that a pass added, in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub added: Vec<RecordId>,
}

impl ReconcileSummary {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }
}

/// Identities on `page` whose global position lies inside `target`.
pub fn in_range(page: &Page, target: BulkTarget) -> SelectionSet {
    page.positioned()
        .filter(|(position, _)| target.covers(*position))
        .map(|(_, record)| record.id)
        .collect()
}

/// Add every in-range record on `page` that is absent from `selected`.
///
/// Records at or beyond the target are never added and nothing is removed.
pub fn reconcile(
    page: &Page,
    target: BulkTarget,
    selected: &mut SelectionSet,
) -> ReconcileSummary {
    if target == BulkTarget::Absent {
        return ReconcileSummary::default();
    }
    let added = selected.union_with(&in_range(page, target));
    ReconcileSummary { added }
}
