// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{io, path::PathBuf};

use bulk_source::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to list logs in {}: {source}", .path.display())]
    ListLogs {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("bulk fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum BackfillError {
    #[error("failed to prepare {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history fetch for {code} failed: {source}")]
    Fetch {
        code: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
