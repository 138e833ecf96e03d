// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::path::PathBuf;

use bulk_source::{BulkEndpoint, PaginatedBulkFetcher};
use chrono::NaiveDate;
use core_types::{LogKind, SyncReport};
use entity_log::{has_price, list_logs, EntityCodeMap, LastRowUpsertEngine, TrackedLog};
use log::{error, info, warn};

use crate::error::SyncError;

const DEFAULT_ORDER_GUARD_DEPTH: usize = 8;

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub label: String,
    pub data_dir: PathBuf,
    pub kind: LogKind,
    pub order_guard_depth: usize,
}

impl SyncConfig {
    pub fn new(label: impl Into<String>, data_dir: impl Into<PathBuf>, kind: LogKind) -> Self {
        Self {
            label: label.into(),
            data_dir: data_dir.into(),
            kind,
            order_guard_depth: DEFAULT_ORDER_GUARD_DEPTH,
        }
    }

    pub fn with_order_guard_depth(mut self, depth: usize) -> Self {
        self.order_guard_depth = depth;
        self
    }
}

/// Applies one as-of date's bulk dataset to every tracked log in a directory.
pub struct SyncOrchestrator<E> {
    config: SyncConfig,
    fetcher: PaginatedBulkFetcher<E>,
    engine: LastRowUpsertEngine,
}

impl<E: BulkEndpoint> SyncOrchestrator<E> {
    pub fn new(config: SyncConfig, endpoint: E) -> Self {
        let fetcher = PaginatedBulkFetcher::new(endpoint, config.kind.dataset());
        let engine = LastRowUpsertEngine::with_order_guard(config.order_guard_depth);
        Self {
            config,
            fetcher,
            engine,
        }
    }

    /// Fetch failures and an unreadable directory fail the run; anything that goes
    /// wrong with a single log is tallied under `errors` and the run moves on.
    pub async fn run(&self, date: NaiveDate) -> Result<SyncReport, SyncError> {
        let logs = list_logs(&self.config.data_dir).map_err(|source| SyncError::ListLogs {
            path: self.config.data_dir.clone(),
            source,
        })?;
        info!(
            "[{}] syncing {} {} logs for {}",
            self.config.label,
            logs.len(),
            self.config.kind.label(),
            date
        );

        let records = self.fetcher.fetch_all(date).await?;
        info!(
            "[{}] fetched {} records for {}",
            self.config.label,
            records.len(),
            date
        );

        let map = EntityCodeMap::build(&records);
        if map.is_empty() {
            warn!("[{}] no coded records for {}; every log will be skipped", self.config.label, date);
        }
        let mut report = SyncReport::new(records.len());
        self.apply(&logs, &map, &mut report);
        info!("[{}] {} done: {}", self.config.label, date, report);
        Ok(report)
    }

    fn apply(&self, logs: &[TrackedLog], map: &EntityCodeMap<'_>, report: &mut SyncReport) {
        for log in logs {
            let Some(record) = map.get(&log.key) else {
                report.skipped_no_data += 1;
                continue;
            };
            if !has_price(record) {
                report.skipped_no_price += 1;
                continue;
            }
            match self.engine.upsert(&log.path, record, self.config.kind) {
                Ok(outcome) => report.record(outcome),
                Err(err) => {
                    error!("[{}] {}: {}", self.config.label, log.key, err);
                    report.record_failure(&log.key, err.to_string());
                }
            }
        }
    }
}
