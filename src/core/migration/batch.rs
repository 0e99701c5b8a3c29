//! Page window arithmetic
//!
//! Tracks where the next page starts and how large it may be so that a run
//! never reads past its `limit`.

/// Position of a run within the source table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page_size: usize,
    offset: u64,
    limit: Option<u64>,
    fetched: u64,
}

impl PageWindow {
    /// Create a window starting at `offset`
    ///
    /// `page_size` is clamped to at least one row.
    pub fn new(page_size: usize, offset: u64, limit: Option<u64>) -> Self {
        Self {
            page_size: page_size.max(1),
            offset,
            limit,
            fetched: 0,
        }
    }

    /// Size and offset of the next page to request, or `None` once the limit
    /// has been reached
    pub fn next_page(&self) -> Option<(usize, u64)> {
        let size = match self.remaining() {
            Some(0) => return None,
            Some(remaining) => remaining.min(self.page_size as u64) as usize,
            None => self.page_size,
        };
        Some((size, self.offset + self.fetched))
    }

    /// Record that `rows` rows were returned by the last page
    pub fn advance(&mut self, rows: usize) {
        self.fetched += rows as u64;
    }

    /// Rows read so far
    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    /// Rows still allowed by the limit
    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.fetched))
    }
}
