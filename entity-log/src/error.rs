// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::path::PathBuf;

use core_types::{Dataset, LogKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{dataset:?} record cannot be written to a {} log", .kind.label())]
    KindMismatch { kind: LogKind, dataset: Dataset },
    #[error("record for entity '{code}' has no date")]
    MissingDate { code: String },
}

#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("malformed log {}: {lines} line(s), expected a header and at least one row", .path.display())]
    Malformed { path: PathBuf, lines: usize },
    #[error(
        "out-of-order record for {date} in {}: last row is {last_date}{}",
        .path.display(),
        buried_suffix(.found_at)
    )]
    OutOfOrder {
        path: PathBuf,
        date: String,
        last_date: String,
        found_at: Option<usize>,
    },
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn buried_suffix(found_at: &Option<usize>) -> String {
    found_at
        .map(|line| format!(", date already present at line {line}"))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum CombineError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
