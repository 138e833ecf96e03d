// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{fs, path::PathBuf, time::Duration};

use bulk_source::{BulkEndpoint, BulkQuery, PaginatedBulkFetcher};
use chrono::NaiveDate;
use core_types::{BarRecord, Dataset, EntityFailure, LogKind, RemoteRecord};
use entity_log::{encode_backfill, normalize_code, write_log, TrackedLog};
use log::{error, info, warn};

use crate::error::BackfillError;

#[derive(Clone, Debug)]
pub struct BackfillConfig {
    pub label: String,
    pub data_dir: PathBuf,
    pub from: NaiveDate,
    pub codes: Vec<String>,
    pub throttle: Duration,
}

impl BackfillConfig {
    pub fn new(label: impl Into<String>, data_dir: impl Into<PathBuf>, from: NaiveDate) -> Self {
        Self {
            label: label.into(),
            data_dir: data_dir.into(),
            from,
            codes: Vec::new(),
            throttle: Duration::from_millis(1000),
        }
    }

    pub fn with_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub written: usize,
    pub empty: usize,
    pub failures: Vec<EntityFailure>,
}

/// Rewrites each configured entity's bar log with its full history since `from`.
pub struct HistoricalBackfill<E> {
    config: BackfillConfig,
    fetcher: PaginatedBulkFetcher<E>,
}

impl<E: BulkEndpoint> HistoricalBackfill<E> {
    pub fn new(config: BackfillConfig, endpoint: E) -> Self {
        Self {
            config,
            fetcher: PaginatedBulkFetcher::new(endpoint, Dataset::DailyBars),
        }
    }

    pub async fn run(&self) -> Result<BackfillReport, BackfillError> {
        fs::create_dir_all(&self.config.data_dir).map_err(|source| BackfillError::Prepare {
            path: self.config.data_dir.clone(),
            source,
        })?;

        let mut report = BackfillReport::default();
        for (idx, code) in self.config.codes.iter().enumerate() {
            if idx > 0 && !self.config.throttle.is_zero() {
                tokio::time::sleep(self.config.throttle).await;
            }
            match self.backfill_one(code).await {
                Ok(0) => {
                    warn!("[{}] {}: no history since {}", self.config.label, code, self.config.from);
                    report.empty += 1;
                }
                Ok(rows) => {
                    info!("[{}] {}: wrote {} rows", self.config.label, code, rows);
                    report.written += 1;
                }
                Err(err) => {
                    error!("[{}] {}: {}", self.config.label, code, err);
                    report.failures.push(EntityFailure {
                        key: code.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }
        info!(
            "[{}] backfill done: {} written, {} empty, {} failed",
            self.config.label,
            report.written,
            report.empty,
            report.failures.len()
        );
        Ok(report)
    }

    async fn backfill_one(&self, code: &str) -> Result<usize, BackfillError> {
        let records = self
            .fetcher
            .fetch_query(&BulkQuery::for_entity(code, self.config.from))
            .await
            .map_err(|source| BackfillError::Fetch {
                code: code.to_string(),
                source,
            })?;
        let bars: Vec<&BarRecord> = records
            .iter()
            .filter_map(|record| match record {
                RemoteRecord::Bar(bar) => Some(bar),
                RemoteRecord::Financial(_) => None,
            })
            .collect();
        if bars.is_empty() {
            return Ok(0);
        }

        let log = TrackedLog::new(&self.config.data_dir, normalize_code(code));
        write_log(
            &log.path,
            LogKind::DailyBar.header(),
            bars.iter().map(|bar| encode_backfill(bar)),
        )
        .map_err(|source| BackfillError::Write {
            path: log.path.clone(),
            source,
        })?;
        Ok(bars.len())
    }
}
