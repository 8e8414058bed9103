// src/search/paginate.rs
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;

use crate::errors::HubFinderError;
use crate::models::{BoundingBox, Hub};
use crate::search::query::build_query;
use crate::search::{BoundedFetcher, SearchPage, SearchRequest, SearchService};
use crate::utils::cancel::CancellationSignal;
use crate::utils::constants::MAX_SEARCH_PAGE_SIZE;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Drives a page-level `SearchService` through its bookmark chain until every
/// matching record has been read. Pages are requested one at a time.
pub struct PaginatedFetcher<S> {
    service: S,
    page_size: u32,
    max_retries: u32,
    retry_delay: Duration,
}

impl<S: SearchService> PaginatedFetcher<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            page_size: MAX_SEARCH_PAGE_SIZE,
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Page size is clamped to `1..=MAX_SEARCH_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_SEARCH_PAGE_SIZE);
        self
    }

    /// Retry a failed page up to `max_retries` times when the failure is
    /// transient, waiting `delay * attempt` between attempts.
    pub fn with_retries(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn fetch_page(
        &self,
        request: &SearchRequest,
        cancel: &CancellationSignal,
    ) -> Result<SearchPage, HubFinderError> {
        let mut attempt = 0u32;
        loop {
            cancel.check()?;
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(HubFinderError::Cancelled),
                outcome = self.service.search(request) => outcome,
            };
            match outcome {
                Ok(page) => return Ok(page),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_delay * attempt;
                    warn!(
                        "Search attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(HubFinderError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => return Err(HubFinderError::fetch_failed(e)),
            }
        }
    }
}

#[async_trait]
impl<S: SearchService> BoundedFetcher for PaginatedFetcher<S> {
    async fn fetch_by_bounds(
        &self,
        bounds: &BoundingBox,
        cancel: &CancellationSignal,
    ) -> Result<Vec<Hub>, HubFinderError> {
        let query = build_query(bounds).to_string();
        debug!("Search query: {}", query);

        let mut hubs = Vec::new();
        let mut bookmark: Option<String> = None;
        let mut pages = 0usize;
        let mut skipped_rows = 0usize;

        loop {
            let request = SearchRequest {
                query: query.clone(),
                limit: self.page_size,
                bookmark: bookmark.clone(),
            };
            let page = self.fetch_page(&request, cancel).await?;
            pages += 1;

            let row_count = page.rows.len();
            for row in &page.rows {
                match row.to_hub() {
                    Some(hub) => hubs.push(hub),
                    None => {
                        skipped_rows += 1;
                        debug!("Skipping malformed search row: id={:?}", row.id);
                    }
                }
            }
            debug!(
                "Page {}: {} rows ({} hubs so far, total_rows={:?})",
                pages,
                row_count,
                hubs.len(),
                page.total_rows
            );

            let next = page.bookmark.filter(|b| !b.is_empty());
            match next {
                None => break,
                Some(_) if row_count == 0 => break,
                Some(ref next_bookmark) if bookmark.as_ref() == Some(next_bookmark) => {
                    debug!("Bookmark repeated after page {}, stopping", pages);
                    break;
                }
                Some(_) => bookmark = next,
            }
        }

        if skipped_rows > 0 {
            warn!("Skipped {} malformed search rows", skipped_rows);
        }
        info!("Fetched {} hubs in {} page(s) for {}", hubs.len(), pages, bounds);

        Ok(hubs)
    }
}
