// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::raw::{BarRecord, FinancialRecord};

/// Remote dataset served by the bulk endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    DailyBars,
    FinancialSummary,
}

/// One entity's data point as fetched for a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteRecord {
    Bar(BarRecord),
    Financial(FinancialRecord),
}

impl RemoteRecord {
    /// Entity code in remote form (typically 5 digits).
    pub fn entity_code(&self) -> &str {
        match self {
            RemoteRecord::Bar(bar) => &bar.code,
            RemoteRecord::Financial(fin) => &fin.code,
        }
    }

    /// Leading date key the record occupies in a local log.
    pub fn date(&self) -> &str {
        match self {
            RemoteRecord::Bar(bar) => &bar.date,
            RemoteRecord::Financial(fin) => &fin.disc_date,
        }
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            RemoteRecord::Bar(_) => Dataset::DailyBars,
            RemoteRecord::Financial(_) => Dataset::FinancialSummary,
        }
    }
}

impl From<BarRecord> for RemoteRecord {
    fn from(value: BarRecord) -> Self {
        RemoteRecord::Bar(value)
    }
}

impl From<FinancialRecord> for RemoteRecord {
    fn from(value: FinancialRecord) -> Self {
        RemoteRecord::Financial(value)
    }
}

/// Column layout of a local entity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    #[serde(rename = "daily")]
    DailyBar,
    #[serde(rename = "extended")]
    ExtendedBar,
    #[serde(rename = "financial")]
    Financial,
}

impl LogKind {
    pub fn header(self) -> &'static str {
        match self {
            LogKind::DailyBar => "Date,Open,High,Low,Close,Volume",
            LogKind::ExtendedBar => "Date,Open,High,Low,Close,Volume,Value,UpperLimit,LowerLimit",
            LogKind::Financial => "DiscDate,DiscTime,Code,NP,EPS,BPS,FDivAnn",
        }
    }

    pub fn dataset(self) -> Dataset {
        match self {
            LogKind::DailyBar | LogKind::ExtendedBar => Dataset::DailyBars,
            LogKind::Financial => Dataset::FinancialSummary,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogKind::DailyBar => "daily",
            LogKind::ExtendedBar => "extended",
            LogKind::Financial => "financial",
        }
    }
}

/// Result of a single last-row upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Appended,
    Updated,
}

/// Entity that could not be processed during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFailure {
    pub key: String,
    pub message: String,
}

/// Outcome tallies for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched: usize,
    pub appended: usize,
    pub updated: usize,
    pub skipped_no_data: usize,
    pub skipped_no_price: usize,
    pub errors: usize,
    pub failures: Vec<EntityFailure>,
}

impl SyncReport {
    pub fn new(fetched: usize) -> Self {
        Self {
            fetched,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Appended => self.appended += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    pub fn record_failure(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors += 1;
        self.failures.push(EntityFailure {
            key: key.into(),
            message: message.into(),
        });
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetched {} records: appended {}, updated {}, no data {}, no price {}, errors {}",
            self.fetched,
            self.appended,
            self.updated,
            self.skipped_no_data,
            self.skipped_no_price,
            self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_tallies_outcomes_and_failures() {
        let mut report = SyncReport::new(12);
        report.record(UpsertOutcome::Appended);
        report.record(UpsertOutcome::Appended);
        report.record(UpsertOutcome::Updated);
        report.record_failure("7203", "log 7203.csv has 1 lines");
        assert_eq!((report.appended, report.updated), (2, 1));
        assert_eq!(report.errors, 1);
        assert_eq!(report.failures[0].key, "7203");
        assert_eq!(
            report.to_string(),
            "fetched 12 records: appended 2, updated 1, no data 0, no price 0, errors 1"
        );
    }

    #[test]
    fn kinds_map_to_datasets() {
        assert_eq!(LogKind::ExtendedBar.dataset(), Dataset::DailyBars);
        assert_eq!(LogKind::Financial.dataset(), Dataset::FinancialSummary);
        assert_eq!(LogKind::DailyBar.header().split(',').count(), 6);
        assert_eq!(LogKind::ExtendedBar.header().split(',').count(), 9);
    }
}
