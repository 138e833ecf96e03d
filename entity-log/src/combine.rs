// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Long-form export of a directory of six-column bar logs.

use std::{fs, path::Path};

use chrono::{Datelike, NaiveDate};
use log::info;

use crate::{catalog::list_logs, error::CombineError, writer::write_lines};

/// Export header, led by a UTF-8 BOM.
pub const LONG_FORM_HEADER: &str = "\u{feff}日付,曜日,商品名,数値";

const SERIES: [&str; 5] = ["始値", "高値", "安値", "終値", "出来高"];

const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineSummary {
    pub entities: usize,
    pub rows: usize,
}

/// Writes five rows per bar to `output`: `date,weekday,<key><series>,value`.
/// Columns missing from a short line are written empty.
pub fn combine_long_form(input_dir: &Path, output: &Path) -> Result<CombineSummary, CombineError> {
    let mut summary = CombineSummary::default();
    let mut rows = vec![LONG_FORM_HEADER.to_string()];
    for log in list_logs(input_dir)? {
        let key = &log.key;
        let content = fs::read_to_string(&log.path).map_err(|source| CombineError::Read {
            path: log.path.clone(),
            source,
        })?;
        for line in content.trim().lines().skip(1) {
            let mut columns = line.split(',');
            let date = columns.next().unwrap_or_default();
            if date.is_empty() {
                continue;
            }
            let weekday = weekday_label(date);
            for series in SERIES {
                let value = columns.next().unwrap_or_default();
                rows.push(format!("{date},{weekday},{key}{series},{value}"));
                summary.rows += 1;
            }
        }
        summary.entities += 1;
    }
    write_lines(output, &rows)?;
    info!(
        "combined {} logs into {} ({} rows)",
        summary.entities,
        output.display(),
        summary.rows
    );
    Ok(summary)
}

fn weekday_label(date: &str) -> &'static str {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| WEEKDAYS[d.weekday().num_days_from_sunday() as usize])
        .unwrap_or_default()
}
