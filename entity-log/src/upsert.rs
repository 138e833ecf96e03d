// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{fs, path::Path};

use core_types::{LogKind, RemoteRecord, UpsertOutcome};
use log::debug;

use crate::{
    codec::{date_key, encode},
    error::UpsertError,
    writer::write_lines,
};

/// Update-last-row-or-append writer for one entity log.
///
/// Only the final line is consulted: a record whose date equals the last row's date
/// replaces that row, anything else is appended. Callers must deliver dates in
/// ascending order; if the target date already exists it has to be the last row.
///
/// With an order guard of depth `n > 0` the engine refuses to append a record dated
/// before the last row, or one whose date appears within the `n` rows above it, and
/// leaves the file untouched. Depth `0` appends blindly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastRowUpsertEngine {
    guard_depth: usize,
}

impl LastRowUpsertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order_guard(depth: usize) -> Self {
        Self { guard_depth: depth }
    }

    pub fn upsert(
        &self,
        path: &Path,
        record: &RemoteRecord,
        kind: LogKind,
    ) -> Result<UpsertOutcome, UpsertError> {
        let content = fs::read_to_string(path)?;
        let trimmed = content.trim_end();
        let line_count = if trimmed.is_empty() {
            0
        } else {
            trimmed.split('\n').count()
        };
        if line_count < 2 {
            return Err(UpsertError::Malformed {
                path: path.to_path_buf(),
                lines: line_count,
            });
        }

        let candidate = encode(record, kind)?;
        let mut lines: Vec<&str> = trimmed.split('\n').collect();
        let last_idx = lines.len() - 1;
        let outcome = if date_key(lines[last_idx]) == record.date() {
            lines[last_idx] = &candidate;
            UpsertOutcome::Updated
        } else {
            self.check_order(path, &lines, record.date())?;
            lines.push(&candidate);
            UpsertOutcome::Appended
        };
        write_lines(path, &lines)?;
        debug!("{} {:?} for {}", path.display(), outcome, record.date());
        Ok(outcome)
    }

    fn check_order(&self, path: &Path, lines: &[&str], date: &str) -> Result<(), UpsertError> {
        if self.guard_depth == 0 {
            return Ok(());
        }
        let last_idx = lines.len() - 1;
        let last_date = date_key(lines[last_idx]);
        let out_of_order = |found_at| UpsertError::OutOfOrder {
            path: path.to_path_buf(),
            date: date.to_string(),
            last_date: last_date.to_string(),
            found_at,
        };
        if date < last_date {
            return Err(out_of_order(None));
        }
        let floor = last_idx.saturating_sub(self.guard_depth).max(1);
        for idx in (floor..last_idx).rev() {
            if date_key(lines[idx]) == date {
                return Err(out_of_order(Some(idx + 1)));
            }
        }
        Ok(())
    }
}
