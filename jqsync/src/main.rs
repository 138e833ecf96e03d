// Copyright (c) James Kassemi, SC, US. All rights reserved.

mod command;

use std::{env, io, process};

use bulk_source::{FetchError, JQuantsEndpoint};
use chrono::NaiveDate;
use command::{Command, CommandError};
use core_types::{
    config::{AppConfig, ConfigError},
    LogKind,
};
use entity_log::{combine_long_form, CombineError};
use log::info;
use sync_engine::{
    BackfillConfig, BackfillError, FinancialRebuild, HistoricalBackfill, SyncConfig, SyncError,
    SyncOrchestrator,
};
use thiserror::Error;
use tokio::runtime::Runtime;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("jqsync failed: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let command = Command::parse(env::args().skip(1))?;
    let config = AppConfig::load()?;

    match command {
        Command::Sync { date } => {
            let as_of = as_of(date, &config)?;
            let sync = SyncConfig::new("bars", &config.sync.bars_dir, config.sync.bar_kind)
                .with_order_guard_depth(config.sync.order_guard_depth);
            let (runtime, endpoint) = connect(&config)?;
            let report = runtime.block_on(SyncOrchestrator::new(sync, endpoint).run(as_of))?;
            println!("{as_of}: {report}");
        }
        Command::SyncFinance { date } => {
            let as_of = as_of(date, &config)?;
            let sync = SyncConfig::new("fins", &config.sync.finance_dir, LogKind::Financial)
                .with_order_guard_depth(config.sync.order_guard_depth);
            let (runtime, endpoint) = connect(&config)?;
            let report = runtime.block_on(SyncOrchestrator::new(sync, endpoint).run(as_of))?;
            println!("{as_of}: {report}");
        }
        Command::RebuildFinance => {
            let (runtime, endpoint) = connect(&config)?;
            let rebuild = FinancialRebuild::new("fins", &config.sync.finance_dir, endpoint);
            let report = runtime.block_on(rebuild.run())?;
            println!(
                "rebuilt {} financial logs from {} disclosures",
                report.written, report.fetched
            );
        }
        Command::Backfill => {
            let backfill = BackfillConfig::new(
                "backfill",
                &config.backfill.data_dir,
                config.backfill.from_date()?,
            )
            .with_codes(config.backfill.codes.iter().cloned())
            .with_throttle(config.backfill.throttle());
            let (runtime, endpoint) = connect(&config)?;
            let report = runtime.block_on(HistoricalBackfill::new(backfill, endpoint).run())?;
            println!(
                "backfilled {} entities ({} without history, {} failed)",
                report.written,
                report.empty,
                report.failures.len()
            );
        }
        Command::Combine => {
            let summary = combine_long_form(&config.combine.input_dir, &config.combine.output)?;
            println!(
                "combined {} logs into {} ({} rows)",
                summary.entities,
                config.combine.output.display(),
                summary.rows
            );
        }
    }
    Ok(())
}

/// Single-threaded runtime plus an authenticated endpoint; only remote commands call this.
fn connect(config: &AppConfig) -> Result<(Runtime, JQuantsEndpoint), AppError> {
    let endpoint = JQuantsEndpoint::new(
        config.rest.base_url.clone(),
        config.api_key()?,
        config.rest.timeout(),
    )?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    info!("using endpoint {}", config.rest.base_url);
    Ok((runtime, endpoint))
}

fn as_of(date: Option<NaiveDate>, config: &AppConfig) -> Result<NaiveDate, ConfigError> {
    match date {
        Some(date) => Ok(date),
        None => config.sync.as_of(),
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Backfill(#[from] BackfillError),
    #[error(transparent)]
    Combine(#[from] CombineError),
    #[error("failed to start runtime: {0}")]
    Runtime(io::Error),
}
