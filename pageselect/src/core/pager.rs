//! Page index bookkeeping and the stale-fetch guard.
//!
//! Every page request issues a [`FetchTicket`] stamped with a monotonically
//! increasing generation. Only the ticket from the latest request is current;
//! results for any older ticket are stale and must be discarded.

/// Identifies one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub page_index: u32,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct Pager {
    page_index: u32,
    page_size: u32,
    total_records: u64,
    generation: u64,
}

impl Pager {
    /// `page_size` must be non-zero; config validation enforces this.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size,
            total_records: 0,
            generation: 0,
        }
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Total record count reported by the latest fetch. May grow or shrink.
    pub fn set_total_records(&mut self, total: u64) {
        self.total_records = total;
    }

    pub fn total_pages(&self) -> u64 {
        self.total_records.div_ceil(u64::from(self.page_size.max(1)))
    }

    /// Move to `index` and issue a ticket, or `None` if the index is unchanged.
    ///
    /// Callers clamp out-of-range indices with [`Pager::clamp_request`] first.
    pub fn request_page(&mut self, index: u32) -> Option<FetchTicket> {
        if index == self.page_index {
            return None;
        }
        self.page_index = index;
        Some(self.issue())
    }

    /// Issue a fresh ticket for the current page (initial load or retry).
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.page_index == self.page_index
    }

    /// Clamp a requested index into the known page range.
    ///
    /// Before the first total arrives there is no range to clamp against.
    pub fn clamp_request(&self, index: u32) -> u32 {
        match self.total_pages() {
            0 => index,
            pages => index.min(u32::try_from(pages - 1).unwrap_or(u32::MAX)),
        }
    }

    /// Page to show: the current index clamped into `[0, total_pages)`.
    ///
    /// Does not navigate; the stored index is left as requested.
    pub fn effective_page(&self) -> u32 {
        match self.total_pages() {
            0 => 0,
            pages => self
                .page_index
                .min(u32::try_from(pages - 1).unwrap_or(u32::MAX)),
        }
    }

    /// "Showing {first} to {last} of {total} entries" for the effective page.
    pub fn page_report(&self, record_count: usize) -> String {
        let first_position = u64::from(self.effective_page()) * u64::from(self.page_size);
        let (first, last) = if record_count == 0 || self.total_records == 0 {
            (0, 0)
        } else {
            let last = (first_position + record_count as u64).min(self.total_records);
            (first_position + 1, last)
        };
        format!(
            "Showing {} to {} of {} entries",
            first, last, self.total_records
        )
    }

    fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            page_index: self.page_index,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let mut pager = Pager::new(12);
        assert_eq!(pager.total_pages(), 0);
        pager.set_total_records(25);
        assert_eq!(pager.total_pages(), 3);
        pager.set_total_records(24);
        assert_eq!(pager.total_pages(), 2);
    }

    #[test]
    fn unchanged_index_is_ignored() {
        let mut pager = Pager::new(12);
        assert!(pager.request_page(0).is_none());
        let ticket = pager.request_page(1).expect("ticket");
        assert_eq!(ticket.page_index, 1);
        assert!(pager.request_page(1).is_none());
    }

    #[test]
    fn newer_request_supersedes_older_ticket() {
        let mut pager = Pager::new(12);
        let older = pager.request_page(2).expect("ticket");
        let newer = pager.request_page(3).expect("ticket");
        assert!(!pager.is_current(older));
        assert!(pager.is_current(newer));
    }

    #[test]
    fn refresh_supersedes_same_page_ticket() {
        let mut pager = Pager::new(12);
        let first = pager.refresh();
        let retry = pager.refresh();
        assert_eq!(first.page_index, retry.page_index);
        assert!(!pager.is_current(first));
        assert!(pager.is_current(retry));
    }

    #[test]
    fn shrinking_total_clamps_effective_page_only() {
        let mut pager = Pager::new(10);
        pager.set_total_records(100);
        pager.request_page(8);
        pager.set_total_records(35);
        assert_eq!(pager.page_index(), 8);
        assert_eq!(pager.effective_page(), 3);
        assert_eq!(pager.clamp_request(9), 3);
    }

    #[test]
    fn page_report_matches_footer() {
        let mut pager = Pager::new(12);
        pager.set_total_records(30);
        pager.request_page(2);
        assert_eq!(pager.page_report(6), "Showing 25 to 30 of 30 entries");
        assert_eq!(Pager::new(12).page_report(0), "Showing 0 to 0 of 0 entries");
    }
}
