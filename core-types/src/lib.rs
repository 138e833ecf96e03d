// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Shared record model, log layouts, run reports and configuration for the bulk sync crates.

pub mod config;
pub mod raw;
pub mod types;

pub use raw::{BarRecord, FinancialRecord, Scalar};
pub use types::{Dataset, EntityFailure, LogKind, RemoteRecord, SyncReport, UpsertOutcome};
