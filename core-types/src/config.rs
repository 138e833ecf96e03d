// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{path::PathBuf, time::Duration};

use chrono::{FixedOffset, NaiveDate, Utc};
use config::Config;
use serde::Deserialize;
use thiserror::Error;

use crate::types::LogKind;

const JST_OFFSET_SECS: i32 = 9 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("missing required setting {key}")]
    Missing { key: &'static str },
    #[error("invalid date '{value}' for {field} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
}

/// Runtime settings: `config.toml`, then `APP_*` variables (`APP_SYNC__BARS_DIR`), then the
/// bare environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub jquants_api_key: String,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub backfill: BackfillSettings,
    #[serde(default)]
    pub combine: CombineSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(app_environment())
            .add_source(config::Environment::default().try_parsing(false))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The API key; only operations that talk to the remote API need it.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.jquants_api_key.trim() {
            "" => Err(ConfigError::Missing {
                key: "JQUANTS_API_KEY",
            }),
            key => Ok(key),
        }
    }
}

fn app_environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.jquants.com/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_bars_dir")]
    pub bars_dir: PathBuf,
    #[serde(default = "default_finance_dir")]
    pub finance_dir: PathBuf,
    #[serde(default = "default_bar_kind")]
    pub bar_kind: LogKind,
    /// Fixed as-of date; today in JST when unset.
    #[serde(default)]
    pub as_of_date: Option<String>,
    #[serde(default = "default_order_guard_depth")]
    pub order_guard_depth: usize,
}

impl SyncSettings {
    pub fn as_of(&self) -> Result<NaiveDate, ConfigError> {
        match self.as_of_date.as_deref() {
            Some(value) => parse_date("sync.as_of_date", value),
            None => Ok(today_jst()),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            bars_dir: default_bars_dir(),
            finance_dir: default_finance_dir(),
            bar_kind: default_bar_kind(),
            as_of_date: None,
            order_guard_depth: default_order_guard_depth(),
        }
    }
}

fn default_bars_dir() -> PathBuf {
    PathBuf::from("aadata")
}

fn default_finance_dir() -> PathBuf {
    PathBuf::from("financedata")
}

fn default_bar_kind() -> LogKind {
    LogKind::ExtendedBar
}

fn default_order_guard_depth() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackfillSettings {
    #[serde(default = "default_backfill_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_backfill_from")]
    pub from: String,
    #[serde(default)]
    pub codes: Vec<String>,
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl BackfillSettings {
    pub fn from_date(&self) -> Result<NaiveDate, ConfigError> {
        parse_date("backfill.from", &self.from)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl Default for BackfillSettings {
    fn default() -> Self {
        Self {
            data_dir: default_backfill_dir(),
            from: default_backfill_from(),
            codes: Vec::new(),
            throttle_ms: default_throttle_ms(),
        }
    }
}

fn default_backfill_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_backfill_from() -> String {
    "2021-01-20".to_string()
}

fn default_throttle_ms() -> u64 {
    1_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombineSettings {
    #[serde(default = "default_backfill_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_combine_output")]
    pub output: PathBuf,
}

impl Default for CombineSettings {
    fn default() -> Self {
        Self {
            input_dir: default_backfill_dir(),
            output: default_combine_output(),
        }
    }
}

fn default_combine_output() -> PathBuf {
    PathBuf::from("combined_long.csv")
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Calendar date in Tokyo, where the exchange publishes its daily data.
pub fn today_jst() -> NaiveDate {
    let now = Utc::now();
    FixedOffset::east_opt(JST_OFFSET_SECS)
        .map(|offset| now.with_timezone(&offset).date_naive())
        .unwrap_or_else(|| now.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_data_dirs() {
        let sync = SyncSettings::default();
        assert_eq!(sync.bars_dir, PathBuf::from("aadata"));
        assert_eq!(sync.bar_kind, LogKind::ExtendedBar);
        assert_eq!(sync.order_guard_depth, 8);
        let backfill = BackfillSettings::default();
        assert_eq!(backfill.throttle(), Duration::from_millis(1_000));
        assert_eq!(
            backfill.from_date().unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 20).unwrap()
        );
        assert_eq!(RestConfig::default().base_url, "https://api.jquants.com/v2");
    }

    #[test]
    fn fixed_as_of_date_overrides_today() {
        let sync = SyncSettings {
            as_of_date: Some("2026-01-23".to_string()),
            ..SyncSettings::default()
        };
        assert_eq!(
            sync.as_of().unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 23).unwrap()
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let err = parse_date("sync.as_of_date", "2026/01/23").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDate { field: "sync.as_of_date", .. }));
    }

    #[test]
    fn prefixed_variables_use_single_underscore_after_prefix() {
        let vars = [
            ("APP_SYNC__BARS_DIR", "bars"),
            ("APP_SYNC__ORDER_GUARD_DEPTH", "3"),
            ("APP_REST__TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let config: AppConfig = Config::builder()
            .add_source(app_environment().try_parsing(true).source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.sync.bars_dir, PathBuf::from("bars"));
        assert_eq!(config.sync.order_guard_depth, 3);
        assert_eq!(config.rest.timeout(), Duration::from_secs(5));
        assert_eq!(config.sync.finance_dir, PathBuf::from("financedata"));
    }

    #[test]
    fn missing_api_key_is_reported_on_use() {
        let config = AppConfig {
            jquants_api_key: String::new(),
            rest: RestConfig::default(),
            sync: SyncSettings::default(),
            backfill: BackfillSettings::default(),
            combine: CombineSettings::default(),
        };
        assert!(matches!(
            config.api_key(),
            Err(ConfigError::Missing { key: "JQUANTS_API_KEY" })
        ));
        let config = AppConfig {
            jquants_api_key: " secret ".to_string(),
            ..config
        };
        assert_eq!(config.api_key().unwrap(), "secret");
    }
}
