// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Text encoding of remote records into per-entity log lines.

use core_types::{BarRecord, FinancialRecord, LogKind, RemoteRecord, Scalar};

use crate::{code_map::normalize_code, error::CodecError};

const DEFAULT_TURNOVER: &str = "0";
const DEFAULT_LIMIT_FLAG: &str = "0";
const BACKFILL_PLACEHOLDER: &str = "0";

/// True when open/high/low/close are all present (adjusted or raw).
/// Financial records carry no prices and always pass.
pub fn has_price(record: &RemoteRecord) -> bool {
    match record {
        RemoteRecord::Bar(bar) => bar_has_price(bar),
        RemoteRecord::Financial(_) => true,
    }
}

fn bar_has_price(bar: &BarRecord) -> bool {
    bar.open_price().is_some()
        && bar.high_price().is_some()
        && bar.low_price().is_some()
        && bar.close_price().is_some()
}

/// Exact text of one data line for `kind`, without the trailing newline.
pub fn encode(record: &RemoteRecord, kind: LogKind) -> Result<String, CodecError> {
    if record.date().is_empty() {
        return Err(CodecError::MissingDate {
            code: record.entity_code().to_string(),
        });
    }
    match (record, kind) {
        (RemoteRecord::Bar(bar), LogKind::DailyBar) => Ok(encode_daily(bar, "")),
        (RemoteRecord::Bar(bar), LogKind::ExtendedBar) => Ok(encode_extended(bar)),
        (RemoteRecord::Financial(fin), LogKind::Financial) => Ok(encode_financial(fin)),
        (record, kind) => Err(CodecError::KindMismatch {
            kind,
            dataset: record.dataset(),
        }),
    }
}

/// Six-column line for a freshly backfilled history; every absent field becomes `0`.
pub fn encode_backfill(bar: &BarRecord) -> String {
    encode_daily(bar, BACKFILL_PLACEHOLDER)
}

/// Leading date key of a log line: everything before the first comma.
pub fn date_key(line: &str) -> &str {
    line.split_once(',').map_or(line, |(date, _)| date)
}

fn encode_daily(bar: &BarRecord, missing: &str) -> String {
    format!(
        "{},{},{},{},{},{}",
        bar.date,
        field(bar.open_price(), missing),
        field(bar.high_price(), missing),
        field(bar.low_price(), missing),
        field(bar.close_price(), missing),
        field(bar.traded_volume(), missing),
    )
}

fn encode_extended(bar: &BarRecord) -> String {
    format!(
        "{},{},{},{}",
        encode_daily(bar, ""),
        field(bar.turnover_value.as_ref(), DEFAULT_TURNOVER),
        field(bar.upper_limit.as_ref(), DEFAULT_LIMIT_FLAG),
        field(bar.lower_limit.as_ref(), DEFAULT_LIMIT_FLAG),
    )
}

fn encode_financial(fin: &FinancialRecord) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        fin.disc_date,
        field(fin.disc_time.as_ref(), ""),
        normalize_code(&fin.code),
        field(fin.net_profit.as_ref(), ""),
        field(fin.eps.as_ref(), ""),
        field(fin.bps.as_ref(), ""),
        field(fin.forecast_dividend_annual.as_ref(), ""),
    )
}

fn field(value: Option<&Scalar>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), Scalar::to_string)
}
