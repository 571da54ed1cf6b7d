//! Test-only helpers for constructing pages and scripted page sources.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use tokio::sync::Notify;

use crate::core::types::{Page, Record, RecordId};
use crate::io::fetch::{FetchRequest, PageResponse, PageSource};

/// Offset between a catalog record's global position and its id.
pub const CATALOG_ID_OFFSET: u64 = 1000;

/// Identities for a range of raw ids.
pub fn ids(range: Range<u64>) -> Vec<RecordId> {
    range.map(RecordId).collect()
}

/// A page whose records carry the ids in `range`.
pub fn page_of(index: u32, page_size: u32, range: Range<u64>) -> Page {
    Page::new(index, page_size, range.map(Record::bare).collect())
}

/// A fetch response whose records carry the ids in `range`.
pub fn response_of(range: Range<u64>, total: u64) -> PageResponse {
    PageResponse {
        records: range.map(Record::bare).collect(),
        total_count: Some(total),
    }
}

/// Id of the catalog record at `position`.
pub fn catalog_id(position: u64) -> RecordId {
    RecordId(position + CATALOG_ID_OFFSET)
}

/// Page source serving a fixed catalog, with optional failures and gates.
#[derive(Default)]
pub struct ScriptedSource {
    /// Responses keyed by one-based page number.
    responses: HashMap<u32, PageResponse>,
    failing: HashSet<u32>,
    gates: HashMap<u32, Arc<Notify>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedSource {
    /// Catalog of `total` records where the record at position `p` has id
    /// `p + CATALOG_ID_OFFSET`.
    pub fn catalog(total: u64, page_size: u32) -> Self {
        let size = u64::from(page_size);
        let pages = total.div_ceil(size);
        let responses = (0..pages)
            .map(|index| {
                let start = index * size;
                let end = (start + size).min(total);
                let records = (start..end)
                    .map(|position| Record::bare(catalog_id(position).0))
                    .collect();
                let page = u32::try_from(index + 1).expect("page number fits u32");
                (
                    page,
                    PageResponse {
                        records,
                        total_count: Some(total),
                    },
                )
            })
            .collect();
        Self {
            responses,
            ..Self::default()
        }
    }

    /// Make the one-based `page` fail.
    pub fn failing(mut self, page: u32) -> Self {
        self.failing.insert(page);
        self
    }

    /// Hold fetches of the one-based `page` until the returned handle is notified.
    pub fn gate(&mut self, page: u32) -> Arc<Notify> {
        self.gates
            .entry(page)
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl PageSource for ScriptedSource {
    async fn fetch_page(&self, request: FetchRequest) -> Result<PageResponse> {
        self.requests.lock().expect("requests lock").push(request);
        if let Some(gate) = self.gates.get(&request.page) {
            gate.notified().await;
        }
        if self.failing.contains(&request.page) {
            bail!("scripted failure for page {}", request.page);
        }
        let total = self
            .responses
            .values()
            .find_map(|response| response.total_count)
            .unwrap_or(0);
        Ok(self
            .responses
            .get(&request.page)
            .cloned()
            .unwrap_or(PageResponse {
                records: Vec::new(),
                total_count: Some(total),
            }))
    }
}
