// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{collections::BTreeMap, fs, path::PathBuf};

use bulk_source::{BulkEndpoint, BulkQuery, PaginatedBulkFetcher};
use core_types::{Dataset, LogKind, RemoteRecord};
use entity_log::{encode, normalize_code, write_log, TrackedLog};
use log::{debug, info};

use crate::error::SyncError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub fetched: usize,
    pub written: usize,
}

/// Regenerates every entity's financial log from the complete summary dataset.
pub struct FinancialRebuild<E> {
    label: String,
    data_dir: PathBuf,
    fetcher: PaginatedBulkFetcher<E>,
}

impl<E: BulkEndpoint> FinancialRebuild<E> {
    pub fn new(label: impl Into<String>, data_dir: impl Into<PathBuf>, endpoint: E) -> Self {
        Self {
            label: label.into(),
            data_dir: data_dir.into(),
            fetcher: PaginatedBulkFetcher::new(endpoint, Dataset::FinancialSummary),
        }
    }

    pub async fn run(&self) -> Result<RebuildReport, SyncError> {
        let records = self.fetcher.fetch_query(&BulkQuery::default()).await?;
        info!("[{}] fetched {} disclosures", self.label, records.len());

        // Disclosures without a code or date have nowhere to go.
        let mut groups: BTreeMap<&str, Vec<&RemoteRecord>> = BTreeMap::new();
        for record in &records {
            if record.entity_code().is_empty() || record.date().is_empty() {
                continue;
            }
            groups
                .entry(normalize_code(record.entity_code()))
                .or_default()
                .push(record);
        }

        fs::create_dir_all(&self.data_dir).map_err(|source| SyncError::Write {
            path: self.data_dir.clone(),
            source,
        })?;
        let mut report = RebuildReport {
            fetched: records.len(),
            written: 0,
        };
        for (code, mut group) in groups {
            group.sort_by(|a, b| a.date().cmp(b.date()));
            let rows = group
                .into_iter()
                .filter_map(|record| encode(record, LogKind::Financial).ok())
                .collect::<Vec<_>>();
            let log = TrackedLog::new(&self.data_dir, code);
            write_log(&log.path, LogKind::Financial.header(), &rows).map_err(|source| {
                SyncError::Write {
                    path: log.path.clone(),
                    source,
                }
            })?;
            debug!("[{}] {}: {} disclosures", self.label, code, rows.len());
            report.written += 1;
        }
        info!(
            "[{}] rebuilt {} financial logs from {} disclosures",
            self.label, report.written, report.fetched
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulk_source::{FetchError, Page};
    use core_types::{FinancialRecord, Scalar};

    struct Disclosures(Vec<RemoteRecord>);

    #[async_trait::async_trait]
    impl BulkEndpoint for Disclosures {
        async fn fetch_page(
            &self,
            dataset: Dataset,
            query: &BulkQuery,
            _cursor: Option<&str>,
        ) -> Result<Page, FetchError> {
            assert_eq!(dataset, Dataset::FinancialSummary);
            assert_eq!(query, &BulkQuery::default());
            Ok(Page {
                records: self.0.clone(),
                next_cursor: None,
            })
        }
    }

    fn disclosure(code: &str, date: &str, eps: &str) -> RemoteRecord {
        RemoteRecord::Financial(FinancialRecord {
            disc_date: date.to_string(),
            disc_time: Some(Scalar::from("15:00:00")),
            code: code.to_string(),
            eps: Some(Scalar::from(eps)),
            ..FinancialRecord::default()
        })
    }

    #[tokio::test]
    async fn groups_by_normalized_code_and_sorts_by_disclosure_date() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("9501.csv"), "stale\n").unwrap();
        let endpoint = Disclosures(vec![
            disclosure("95010", "2024-05-10", "b"),
            disclosure("72030", "2024-02-06", "x"),
            disclosure("9501", "2024-02-01", "a"),
            disclosure("95010", "2024-05-10", "c"),
            disclosure("", "2024-05-10", "orphan"),
            disclosure("13010", "", "undated"),
        ]);

        let report = FinancialRebuild::new("fins", dir.path(), endpoint)
            .run()
            .await
            .unwrap();

        assert_eq!(report, RebuildReport { fetched: 6, written: 2 });
        assert_eq!(
            fs::read_to_string(dir.path().join("9501.csv")).unwrap(),
            "DiscDate,DiscTime,Code,NP,EPS,BPS,FDivAnn\n\
             2024-02-01,15:00:00,9501,,a,,\n\
             2024-05-10,15:00:00,9501,,b,,\n\
             2024-05-10,15:00:00,9501,,c,,\n"
        );
        assert!(dir.path().join("7203.csv").exists());
        assert!(!dir.path().join("1301.csv").exists());
    }
}
