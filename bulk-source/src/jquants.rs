// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::time::Duration;

use core_types::{BarRecord, Dataset, FinancialRecord, RemoteRecord};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{BulkEndpoint, BulkQuery, FetchError, Page};

const API_KEY_HEADER: &str = "x-api-key";
const BODY_PREVIEW_CHARS: usize = 300;

/// J-Quants v2 REST endpoint authenticated with an API key header.
#[derive(Clone)]
pub struct JQuantsEndpoint {
    client: Client,
    base_url: String,
    api_key: String,
}

impl JQuantsEndpoint {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn page_url(
        &self,
        dataset: Dataset,
        query: &BulkQuery,
        cursor: Option<&str>,
    ) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            dataset_path(dataset)
        ))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(code) = &query.code {
                pairs.append_pair("code", code);
            }
            if let Some(date) = query.date {
                pairs.append_pair("date", &date.to_string());
            }
            if let Some(from) = query.from {
                pairs.append_pair("from", &from.to_string());
            }
            if let Some(cursor) = cursor {
                pairs.append_pair("pagination_key", cursor);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl BulkEndpoint for JQuantsEndpoint {
    async fn fetch_page(
        &self,
        dataset: Dataset,
        query: &BulkQuery,
        cursor: Option<&str>,
    ) -> Result<Page, FetchError> {
        let url = self.page_url(dataset, query, cursor)?;
        let resp = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .ok()
                .map(|text| preview(&text))
                .filter(|text| !text.is_empty());
            return Err(FetchError::Transport {
                status: status.as_u16(),
                body,
            });
        }
        let page = match dataset {
            Dataset::DailyBars => {
                let parsed: PageBody<BarRecord> = resp.json().await?;
                parsed.into_page(RemoteRecord::Bar)
            }
            Dataset::FinancialSummary => {
                let parsed: PageBody<FinancialRecord> = resp.json().await?;
                parsed.into_page(RemoteRecord::Financial)
            }
        };
        Ok(page)
    }
}

fn dataset_path(dataset: Dataset) -> &'static str {
    match dataset {
        Dataset::DailyBars => "/equities/bars/daily",
        Dataset::FinancialSummary => "/fins/summary",
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[derive(Debug, Deserialize)]
struct PageBody<T> {
    data: Option<Vec<T>>,
    pagination_key: Option<String>,
}

impl<T> PageBody<T> {
    fn into_page(self, wrap: impl Fn(T) -> RemoteRecord) -> Page {
        Page {
            records: self
                .data
                .unwrap_or_default()
                .into_iter()
                .map(wrap)
                .collect(),
            next_cursor: self.pagination_key,
        }
    }
}
