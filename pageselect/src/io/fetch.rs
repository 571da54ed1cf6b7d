//! Page source abstraction for fetching records.
//!
//! The [`PageSource`] trait decouples the session from the HTTP backend. Tests
//! use scripted sources that return predetermined pages without a network.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::pager::FetchTicket;
use crate::core::types::{Record, RecordId};
use crate::io::config::ApiConfig;

/// Parameters for one page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// One-based page number, as the API counts pages.
    pub page: u32,
    pub limit: u32,
}

impl FetchRequest {
    pub fn for_ticket(ticket: FetchTicket, page_size: u32) -> Self {
        Self {
            page: ticket.page_index + 1,
            limit: page_size,
        }
    }
}

/// Records of one page plus the total count, when the payload carried one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    pub records: Vec<Record>,
    pub total_count: Option<u64>,
}

/// Abstraction over page fetching backends.
pub trait PageSource {
    fn fetch_page(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<PageResponse>> + Send;
}

/// Page source backed by the paginated JSON collection API.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    base_url: String,
    fields: String,
}

impl HttpPageSource {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: api.base_url.clone(),
            fields: api.fields.join(","),
        })
    }
}

impl PageSource for HttpPageSource {
    #[instrument(skip_all, fields(page = request.page, limit = request.limit))]
    async fn fetch_page(&self, request: FetchRequest) -> Result<PageResponse> {
        let mut query = vec![
            ("page", request.page.to_string()),
            ("limit", request.limit.to_string()),
        ];
        if !self.fields.is_empty() {
            query.push(("fields", self.fields.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("request page {}", request.page))?;

        let status = response.status();
        if !status.is_success() {
            bail!("page {} request failed with status {}", request.page, status);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("read page {} body", request.page))?;
        let parsed = parse_page_response(&body)?;
        debug!(
            records = parsed.records.len(),
            total = ?parsed.total_count,
            "page fetched"
        );
        Ok(parsed)
    }
}

/// Parse a page payload leniently.
///
/// Invalid JSON is an error. A missing `data` array yields zero records,
/// entries without a numeric `id` are dropped, and a missing
/// `pagination.total` yields `None`.
pub fn parse_page_response(body: &str) -> Result<PageResponse> {
    let value: Value = serde_json::from_str(body).context("parse page response json")?;

    let items = value.get("data").and_then(Value::as_array);
    let records: Vec<Record> = items
        .map(|items| items.iter().filter_map(record_from_value).collect())
        .unwrap_or_default();
    if let Some(items) = items
        && items.len() != records.len()
    {
        debug!(
            dropped = items.len() - records.len(),
            "dropped records without id"
        );
    }

    let total_count = value
        .get("pagination")
        .and_then(|pagination| pagination.get("total"))
        .and_then(Value::as_u64);

    Ok(PageResponse {
        records,
        total_count,
    })
}

fn record_from_value(item: &Value) -> Option<Record> {
    let id = item.get("id").and_then(Value::as_u64)?;
    let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);
    let year = |key: &str| item.get(key).and_then(Value::as_i64);
    Some(Record {
        id: RecordId(id),
        title: text("title"),
        place_of_origin: text("place_of_origin"),
        artist_display: text("artist_display"),
        inscriptions: text("inscriptions"),
        date_start: year("date_start"),
        date_end: year("date_end"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_converts_to_one_based_page() {
        let ticket = FetchTicket {
            page_index: 0,
            generation: 4,
        };
        let request = FetchRequest::for_ticket(ticket, 12);
        assert_eq!(request, FetchRequest { page: 1, limit: 12 });
    }

    #[test]
    fn parses_records_and_total() {
        let body = r#"{
            "pagination": {"total": 129000, "limit": 12, "offset": 0, "total_pages": 10750, "current_page": 1},
            "data": [
                {"id": 4, "title": "Priest and Boy", "place_of_origin": "Unknown", "artist_display": "Lawrence Carmichael Earle", "inscriptions": null, "date_start": 1880, "date_end": 1880},
                {"id": 16568, "title": "Water Lilies"}
            ]
        }"#;
        let parsed = parse_page_response(body).expect("parse");
        assert_eq!(parsed.total_count, Some(129000));
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].id, RecordId(4));
        assert_eq!(parsed.records[0].date_start, Some(1880));
        assert_eq!(parsed.records[0].inscriptions, None);
        assert_eq!(parsed.records[1].display_artist(), "Unknown");
    }

    #[test]
    fn missing_fields_yield_empty_page() {
        let parsed = parse_page_response(r#"{"detail": "oops"}"#).expect("parse");
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.total_count, None);
    }

    #[test]
    fn entries_without_id_are_dropped() {
        let body = r#"{"data": [{"title": "no id"}, {"id": "7"}, {"id": 8}]}"#;
        let parsed = parse_page_response(body).expect("parse");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].id, RecordId(8));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_page_response("<html>").unwrap_err();
        assert!(err.to_string().contains("parse page response json"));
    }
}
