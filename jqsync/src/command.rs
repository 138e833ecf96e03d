// Copyright (c) James Kassemi, SC, US. All rights reserved.

use chrono::NaiveDate;
use core_types::config::{parse_date, ConfigError};
use thiserror::Error;

pub const USAGE: &str =
    "usage: jqsync <sync [YYYY-MM-DD] | sync-finance [YYYY-MM-DD] | rebuild-finance | backfill | combine>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upsert the day's bars into every tracked bar log.
    Sync { date: Option<NaiveDate> },
    /// Upsert the day's disclosures into every tracked financial log.
    SyncFinance { date: Option<NaiveDate> },
    RebuildFinance,
    Backfill,
    Combine,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{}", USAGE)]
    Usage,
    #[error(transparent)]
    Date(#[from] ConfigError),
}

impl Command {
    /// Parses the arguments after the program name.
    pub fn parse<I>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args.next().ok_or(CommandError::Usage)?;
        let date = args
            .next()
            .map(|value| parse_date("date argument", &value))
            .transpose()?;
        if args.next().is_some() {
            return Err(CommandError::Usage);
        }
        match (name.as_str(), date) {
            ("sync", date) => Ok(Command::Sync { date }),
            ("sync-finance", date) => Ok(Command::SyncFinance { date }),
            ("rebuild-finance", None) => Ok(Command::RebuildFinance),
            ("backfill", None) => Ok(Command::Backfill),
            ("combine", None) => Ok(Command::Combine),
            _ => Err(CommandError::Usage),
        }
    }
}
