//! Shared deterministic types for selection logic.
//!
//! These types define the contracts between the pager, the reconciler, and the
//! collaborators that fetch and render pages. Only record identity matters to
//! selection; display attributes ride along for the render collaborator.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique identity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record in the paginated list.
///
/// Every display attribute is optional because the upstream API omits or
/// nulls them freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub artist_display: Option<String>,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i64>,
    #[serde(default)]
    pub date_end: Option<i64>,
}

impl Record {
    /// Record with only an identity.
    pub fn bare(id: u64) -> Self {
        Self {
            id: RecordId(id),
            title: None,
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        }
    }

    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or("Untitled")
    }

    pub fn display_origin(&self) -> &str {
        non_empty(self.place_of_origin.as_deref()).unwrap_or("N/A")
    }

    pub fn display_artist(&self) -> &str {
        non_empty(self.artist_display.as_deref()).unwrap_or("Unknown")
    }

    pub fn display_inscriptions(&self) -> &str {
        non_empty(self.inscriptions.as_deref()).unwrap_or("None")
    }

    /// Start/end dates, `N/A` when absent or zero.
    pub fn display_dates(&self) -> (String, String) {
        let fmt_date = |value: Option<i64>| match value {
            Some(year) if year != 0 => year.to_string(),
            _ => "N/A".to_string(),
        };
        (fmt_date(self.date_start), fmt_date(self.date_end))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// An ordered page of records as delivered by one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Zero-based page index.
    pub index: u32,
    pub page_size: u32,
    pub records: Vec<Record>,
}

impl Page {
    pub fn new(index: u32, page_size: u32, records: Vec<Record>) -> Self {
        Self {
            index,
            page_size,
            records,
        }
    }

    /// Global position of the record at `local_index` on this page.
    pub fn global_position(&self, local_index: usize) -> u64 {
        u64::from(self.index) * u64::from(self.page_size) + local_index as u64
    }

    /// Records paired with their global positions, in page order.
    pub fn positioned(&self) -> impl Iterator<Item = (u64, &Record)> {
        self.records
            .iter()
            .enumerate()
            .map(|(local, record)| (self.global_position(local), record))
    }
}

/// Set of selected record identities.
///
/// Backed by an ordered set so snapshots serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeSet<RecordId>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.0.contains(&id)
    }

    /// Insert `id`, returning true if it was not already present.
    pub fn insert(&mut self, id: RecordId) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.0.iter().copied()
    }

    /// Union with `other`, returning the identities newly added.
    pub fn union_with(&mut self, other: &SelectionSet) -> Vec<RecordId> {
        other.iter().filter(|id| self.insert(*id)).collect()
    }
}

impl FromIterator<RecordId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Pending "select the first N records" intent.
///
/// `Set(0)` is never constructed: a zero count collapses to `Absent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "count")]
pub enum BulkTarget {
    #[default]
    Absent,
    Set(u64),
}

impl BulkTarget {
    pub fn from_count(count: u64) -> Self {
        if count == 0 {
            Self::Absent
        } else {
            Self::Set(count)
        }
    }

    /// Active target count, if any.
    pub fn count(self) -> Option<u64> {
        match self {
            Self::Absent => None,
            Self::Set(count) => Some(count),
        }
    }

    /// True if a record at `position` falls inside the target range.
    pub fn covers(self, position: u64) -> bool {
        self.count().is_some_and(|count| position < count)
    }
}
