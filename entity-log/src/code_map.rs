// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::collections::HashMap;

use core_types::RemoteRecord;

/// Collapses a 5-digit ordinary-share code with a trailing zero to its 4-digit root.
pub fn normalize_code(code: &str) -> &str {
    match short_form(code) {
        Some(short) => short,
        None => code,
    }
}

fn short_form(code: &str) -> Option<&str> {
    if code.len() == 5 && code.ends_with('0') && code.is_char_boundary(4) {
        Some(&code[..4])
    } else {
        None
    }
}

/// Lookup from remote entity codes to the run's records, keyed by both code widths.
#[derive(Debug, Default)]
pub struct EntityCodeMap<'a> {
    entries: HashMap<&'a str, &'a RemoteRecord>,
}

impl<'a> EntityCodeMap<'a> {
    /// Registers every non-empty code as-is plus, for `NNNN0`, the 4-digit `NNNN`.
    /// A later record with the same key replaces an earlier one.
    pub fn build(records: &'a [RemoteRecord]) -> Self {
        let mut entries = HashMap::with_capacity(records.len() * 2);
        for record in records {
            let code = record.entity_code();
            if code.is_empty() {
                continue;
            }
            entries.insert(code, record);
            if let Some(short) = short_form(code) {
                entries.insert(short, record);
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&'a RemoteRecord> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
