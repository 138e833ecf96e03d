// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Per-entity CSV logs: line codec, remote code resolution, last-row upserts and rewrites.

pub mod catalog;
pub mod code_map;
pub mod codec;
pub mod combine;
mod error;
mod upsert;
pub mod writer;

pub use catalog::{list_logs, TrackedLog};
pub use code_map::{normalize_code, EntityCodeMap};
pub use codec::{date_key, encode, encode_backfill, has_price};
pub use combine::{combine_long_form, CombineSummary};
pub use error::{CodecError, CombineError, UpsertError};
pub use upsert::LastRowUpsertEngine;
pub use writer::{write_lines, write_log};
