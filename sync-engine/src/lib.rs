// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Run-level operations over directories of entity logs: the daily bulk sync,
//! per-entity history backfill, and the financial-log rebuild.

mod backfill;
mod error;
mod finance;
mod orchestrator;

pub use backfill::{BackfillConfig, BackfillReport, HistoricalBackfill};
pub use error::{BackfillError, SyncError};
pub use finance::{FinancialRebuild, RebuildReport};
pub use orchestrator::{SyncConfig, SyncOrchestrator};
