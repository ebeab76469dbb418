// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pagination
//!
//! Bing caps each request at 50 records, so collecting more means chaining
//! requests with adjusted offset/count parameters. The loop here repeats
//! the full build, send, validate, unpack cycle per page and accumulates
//! the results. There is no mid-loop recovery: any failure aborts the
//! whole call with nothing returned.

use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::MAX_PAGE_SIZE;
use crate::error::SearchError;
use crate::session::BingSession;
use crate::types::{SearchRecord, Unpacked};

/// How many records to collect: a count from the start, or an inclusive
/// offset range. A descending range is silently reversed.
#[derive(Debug, Clone, Copy)]
pub enum PageSelection {
    /// Fetch this many records from the current offset.
    Count(u32),
    /// Fetch the records between these two offsets.
    Range(u32, u32),
}

/// Shape of the accumulated results. Selection changes only the mapping
/// applied to each page, never the fetch/retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Decoded plaintext URLs.
    PlainUrls,
    /// URLs as returned, still in Bing's encoded wrapper.
    EncodedUrls,
    /// Typed result records.
    Records,
    /// One raw JSON body per page.
    RawJson,
    /// One validated transport response per page, body unread.
    RawResponse,
}

/// Accumulated pagination results, one variant per [`PageKind`].
#[derive(Debug)]
pub enum PageOutput {
    PlainUrls(Vec<String>),
    EncodedUrls(Vec<String>),
    Records(Vec<SearchRecord>),
    RawJson(Vec<Value>),
    RawResponses(Vec<reqwest::Response>),
}

impl PageOutput {
    fn empty(kind: PageKind) -> Self {
        match kind {
            PageKind::PlainUrls => PageOutput::PlainUrls(Vec::new()),
            PageKind::EncodedUrls => PageOutput::EncodedUrls(Vec::new()),
            PageKind::Records => PageOutput::Records(Vec::new()),
            PageKind::RawJson => PageOutput::RawJson(Vec::new()),
            PageKind::RawResponse => PageOutput::RawResponses(Vec::new()),
        }
    }

    /// Number of accumulated entries.
    pub fn len(&self) -> usize {
        match self {
            PageOutput::PlainUrls(urls) => urls.len(),
            PageOutput::EncodedUrls(urls) => urls.len(),
            PageOutput::Records(records) => records.len(),
            PageOutput::RawJson(bodies) => bodies.len(),
            PageOutput::RawResponses(responses) => responses.len(),
        }
    }

    /// Whether nothing was accumulated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pages needed for the desired record count at 50 records per page.
pub(crate) fn attempts_for(desired: u32) -> u32 {
    desired.div_ceil(MAX_PAGE_SIZE)
}

/// Normalize a selection into a desired record count and, for ranges, the
/// starting offset.
pub(crate) fn resolve_selection(
    selection: Option<PageSelection>,
) -> Result<(u32, Option<u32>), SearchError> {
    match selection {
        None => Ok((MAX_PAGE_SIZE, None)),
        Some(PageSelection::Count(count)) => {
            if count == 0 {
                return Err(SearchError::Validation {
                    reason: "must provide a positive count".to_string(),
                });
            }
            Ok((count, None))
        }
        Some(PageSelection::Range(first, second)) => {
            let (start, stop) = if first > second {
                debug!(first, second, "range given in descending order, reversing");
                (second, first)
            } else {
                (first, second)
            };
            if start == stop {
                return Err(SearchError::Validation {
                    reason: "must specify a range larger than 1".to_string(),
                });
            }
            Ok((stop - start, Some(start)))
        }
    }
}

impl BingSession {
    /// Collect results across as many pages as the selection requires,
    /// using the session's configured page ceiling.
    pub async fn page(
        &mut self,
        selection: Option<PageSelection>,
        kind: PageKind,
    ) -> Result<PageOutput, SearchError> {
        let ceiling = self.page_ceiling;
        self.page_with_ceiling(selection, kind, ceiling).await
    }

    /// Collect results across pages with an explicit page ceiling. A
    /// request needing more pages than the ceiling is clamped with a
    /// warning and does less work than asked, rather than failing.
    pub async fn page_with_ceiling(
        &mut self,
        selection: Option<PageSelection>,
        kind: PageKind,
        ceiling: u32,
    ) -> Result<PageOutput, SearchError> {
        let (desired, range_start) = resolve_selection(selection)?;
        let mut attempts = attempts_for(desired);
        if attempts > ceiling {
            warn!(
                ceiling,
                requested = attempts,
                "page ceiling is lower than the requested page count, clamping"
            );
            attempts = ceiling;
        }

        let mut output = PageOutput::empty(kind);
        let mut fetched: u32 = 0;
        let mut offset = range_start.unwrap_or_else(|| self.current_offset());
        for _ in 0..attempts {
            let remaining = desired.saturating_sub(fetched);
            if remaining == 0 {
                break;
            }
            // The last page shrinks the count to avoid over-fetching.
            let request_count = remaining.min(MAX_PAGE_SIZE);
            if request_count < MAX_PAGE_SIZE {
                self.set_param("count", request_count.to_string());
            }
            self.set_param("offset", offset.to_string());
            let appended = self.fetch_page(&mut output).await?;
            fetched += appended;
            offset += request_count;
        }
        debug!(fetched, desired, "pagination complete");
        Ok(output)
    }

    fn current_offset(&self) -> u32 {
        self.built
            .params
            .get("offset")
            .and_then(|offset| offset.parse().ok())
            .unwrap_or(0)
    }

    async fn fetch_page(&mut self, output: &mut PageOutput) -> Result<u32, SearchError> {
        let appended = match output {
            PageOutput::PlainUrls(accumulator) => {
                let urls = self
                    .fetch_records()
                    .await?
                    .map(|unpacked| unpacked.decoded_urls())
                    .unwrap_or_default();
                let appended = urls.len();
                accumulator.extend(urls);
                appended
            }
            PageOutput::EncodedUrls(accumulator) => {
                let urls = self
                    .fetch_records()
                    .await?
                    .map(|unpacked| unpacked.urls())
                    .unwrap_or_default();
                let appended = urls.len();
                accumulator.extend(urls);
                appended
            }
            PageOutput::Records(accumulator) => {
                let records = self
                    .fetch_records()
                    .await?
                    .map(Unpacked::into_records)
                    .unwrap_or_default();
                let appended = records.len();
                accumulator.extend(records);
                appended
            }
            PageOutput::RawJson(accumulator) => {
                accumulator.push(self.fetch_json().await?);
                1
            }
            PageOutput::RawResponses(accumulator) => {
                accumulator.push(self.fetch_validated().await?);
                1
            }
        };
        Ok(appended as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_arithmetic() {
        assert_eq!(attempts_for(1), 1);
        assert_eq!(attempts_for(50), 1);
        assert_eq!(attempts_for(51), 2);
        assert_eq!(attempts_for(100), 2);
        assert_eq!(attempts_for(120), 3);
        assert_eq!(attempts_for(5001), 101);
    }

    #[test]
    fn test_default_selection_is_one_page() {
        let (desired, start) = resolve_selection(None).unwrap();
        assert_eq!(desired, 50);
        assert!(start.is_none());
    }

    #[test]
    fn test_count_selection() {
        let (desired, start) = resolve_selection(Some(PageSelection::Count(120))).unwrap();
        assert_eq!(desired, 120);
        assert!(start.is_none());
        assert_eq!(attempts_for(desired), 3);
    }

    #[test]
    fn test_zero_count_rejected() {
        let result = resolve_selection(Some(PageSelection::Count(0)));
        assert!(matches!(result, Err(SearchError::Validation { .. })));
    }

    #[test]
    fn test_range_selection_sets_start() {
        let (desired, start) = resolve_selection(Some(PageSelection::Range(100, 175))).unwrap();
        assert_eq!(desired, 75);
        assert_eq!(start, Some(100));
    }

    #[test]
    fn test_descending_range_silently_reversed() {
        let (desired, start) = resolve_selection(Some(PageSelection::Range(175, 100))).unwrap();
        assert_eq!(desired, 75);
        assert_eq!(start, Some(100));
    }

    #[test]
    fn test_zero_width_range_rejected() {
        let result = resolve_selection(Some(PageSelection::Range(30, 30)));
        assert!(matches!(result, Err(SearchError::Validation { .. })));
    }

    #[test]
    fn test_page_output_len() {
        let output = PageOutput::empty(PageKind::Records);
        assert!(output.is_empty());
        let output = PageOutput::PlainUrls(vec!["https://example.com".to_string()]);
        assert_eq!(output.len(), 1);
    }
}
