// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// A local entity log and the canonical key taken from its file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrackedLog {
    pub key: String,
    pub path: PathBuf,
}

impl TrackedLog {
    pub fn new(dir: &Path, key: impl Into<String>) -> Self {
        let key = key.into();
        let path = dir.join(format!("{key}.csv"));
        Self { key, path }
    }
}

/// Every `*.csv` file in `dir`, sorted by key. The file set defines which entities are tracked.
pub fn list_logs(dir: &Path) -> io::Result<Vec<TrackedLog>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let key = key.to_string();
        logs.push(TrackedLog { key, path });
    }
    logs.sort();
    Ok(logs)
}
