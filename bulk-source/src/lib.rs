// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Cursor-paginated bulk fetches against the J-Quants REST API.

mod error;
mod jquants;

pub use error::FetchError;
pub use jquants::JQuantsEndpoint;

use chrono::NaiveDate;
use core_types::{Dataset, RemoteRecord};
use log::{debug, warn};

/// Filters for one bulk request. All fields are optional; the endpoint decides which it accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkQuery {
    pub date: Option<NaiveDate>,
    pub code: Option<String>,
    pub from: Option<NaiveDate>,
}

impl BulkQuery {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Single-entity history starting at `from`.
    pub fn for_entity(code: impl Into<String>, from: NaiveDate) -> Self {
        Self {
            code: Some(code.into()),
            from: Some(from),
            ..Self::default()
        }
    }
}

/// One page of results plus the cursor for the next page, if any.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<RemoteRecord>,
    pub next_cursor: Option<String>,
}

/// Remote source able to serve a single page of a bulk dataset.
#[async_trait::async_trait]
pub trait BulkEndpoint: Send + Sync {
    async fn fetch_page(
        &self,
        dataset: Dataset,
        query: &BulkQuery,
        cursor: Option<&str>,
    ) -> Result<Page, FetchError>;
}

/// Walks every page of a dataset until the endpoint stops handing out cursors.
pub struct PaginatedBulkFetcher<E> {
    endpoint: E,
    dataset: Dataset,
}

impl<E: BulkEndpoint> PaginatedBulkFetcher<E> {
    pub fn new(endpoint: E, dataset: Dataset) -> Self {
        Self { endpoint, dataset }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Every record the endpoint holds for `date`, across all entities.
    pub async fn fetch_all(&self, date: NaiveDate) -> Result<Vec<RemoteRecord>, FetchError> {
        self.fetch_query(&BulkQuery::for_date(date)).await
    }

    /// Accumulates pages until the next cursor is absent or repeats the one just used.
    /// Any failed page aborts the whole fetch; nothing partial is returned.
    pub async fn fetch_query(&self, query: &BulkQuery) -> Result<Vec<RemoteRecord>, FetchError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = self
                .endpoint
                .fetch_page(self.dataset, query, cursor.as_deref())
                .await?;
            pages += 1;
            records.extend(page.records);
            match page.next_cursor.filter(|next| !next.is_empty()) {
                None => break,
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    warn!(
                        "{:?} pagination cursor repeated after {} pages; stopping",
                        self.dataset, pages
                    );
                    break;
                }
                Some(next) => cursor = Some(next),
            }
        }
        debug!(
            "{:?} fetch complete: {} records over {} pages",
            self.dataset,
            records.len(),
            pages
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::BarRecord;
    use std::sync::Mutex;

    struct ScriptedEndpoint {
        pages: Vec<Result<Page, u16>>,
        seen: Mutex<Vec<(BulkQuery, Option<String>)>>,
    }

    impl ScriptedEndpoint {
        fn new(pages: Vec<Result<Page, u16>>) -> Self {
            Self {
                pages,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requested_cursors(&self) -> Vec<Option<String>> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|(_, cursor)| cursor.clone())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl BulkEndpoint for ScriptedEndpoint {
        async fn fetch_page(
            &self,
            _dataset: Dataset,
            query: &BulkQuery,
            cursor: Option<&str>,
        ) -> Result<Page, FetchError> {
            let mut seen = self.seen.lock().unwrap();
            let idx = seen.len();
            seen.push((query.clone(), cursor.map(str::to_string)));
            match self.pages.get(idx) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(status)) => Err(FetchError::Transport {
                    status: *status,
                    body: Some("rate limited".to_string()),
                }),
                None => panic!("fetched past the last scripted page"),
            }
        }
    }

    fn page(codes: &[&str], next: Option<&str>) -> Page {
        Page {
            records: codes
                .iter()
                .map(|code| {
                    RemoteRecord::Bar(BarRecord {
                        code: code.to_string(),
                        date: "2024-07-22".to_string(),
                        ..BarRecord::default()
                    })
                })
                .collect(),
            next_cursor: next.map(str::to_string),
        }
    }

    fn codes(records: &[RemoteRecord]) -> Vec<&str> {
        records.iter().map(|r| r.entity_code()).collect()
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 22).unwrap()
    }

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let endpoint = ScriptedEndpoint::new(vec![
            Ok(page(&["13010", "13050"], Some("a"))),
            Ok(page(&["72030"], Some("b"))),
            Ok(page(&["95010"], None)),
        ]);
        let fetcher = PaginatedBulkFetcher::new(endpoint, Dataset::DailyBars);
        let records = fetcher.fetch_all(as_of()).await.unwrap();
        assert_eq!(codes(&records), vec!["13010", "13050", "72030", "95010"]);
        assert_eq!(
            fetcher.endpoint().requested_cursors(),
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
        let seen = fetcher.endpoint().seen.lock().unwrap();
        assert!(seen.iter().all(|(query, _)| query.date == Some(as_of())));
    }

    #[tokio::test]
    async fn repeated_cursor_stops_before_the_next_page() {
        let endpoint = ScriptedEndpoint::new(vec![
            Ok(page(&["13010"], Some("b"))),
            Ok(page(&["72030"], Some("b"))),
            Ok(page(&["95010"], None)),
        ]);
        let fetcher = PaginatedBulkFetcher::new(endpoint, Dataset::DailyBars);
        let records = fetcher.fetch_all(as_of()).await.unwrap();
        assert_eq!(codes(&records), vec!["13010", "72030"]);
        assert_eq!(fetcher.endpoint().requested_cursors().len(), 2);
    }

    #[tokio::test]
    async fn empty_cursor_counts_as_last_page() {
        let endpoint = ScriptedEndpoint::new(vec![Ok(page(&["13010"], Some("")))]);
        let fetcher = PaginatedBulkFetcher::new(endpoint, Dataset::DailyBars);
        let records = fetcher.fetch_all(as_of()).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn failed_page_aborts_the_fetch() {
        let endpoint = ScriptedEndpoint::new(vec![Ok(page(&["13010"], Some("a"))), Err(429)]);
        let fetcher = PaginatedBulkFetcher::new(endpoint, Dataset::DailyBars);
        let err = fetcher.fetch_all(as_of()).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn entity_query_is_forwarded_on_every_page() {
        let endpoint = ScriptedEndpoint::new(vec![
            Ok(page(&["72030"], Some("k1"))),
            Ok(page(&["72030"], None)),
        ]);
        let fetcher = PaginatedBulkFetcher::new(endpoint, Dataset::DailyBars);
        let from = NaiveDate::from_ymd_opt(2021, 1, 20).unwrap();
        let query = BulkQuery::for_entity("7203", from);
        let records = fetcher.fetch_query(&query).await.unwrap();
        assert_eq!(records.len(), 2);
        let seen = fetcher.endpoint().seen.lock().unwrap();
        assert!(seen.iter().all(|(q, _)| q == &query));
    }
}
