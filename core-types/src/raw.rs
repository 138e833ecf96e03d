// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Field value as delivered by the bulk API: the same column may arrive as a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 Display already prints integral values without a fractional part.
            Scalar::Number(value) => write!(f, "{value}"),
            Scalar::Text(value) => f.write_str(value),
            Scalar::Flag(value) => write!(f, "{value}"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// Daily bar for one entity as returned by `/equities/bars/daily`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BarRecord {
    #[serde(rename = "Date", default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(rename = "Code", default, deserialize_with = "null_as_empty")]
    pub code: String,
    #[serde(rename = "O", default)]
    pub open: Option<Scalar>,
    #[serde(rename = "H", default)]
    pub high: Option<Scalar>,
    #[serde(rename = "L", default)]
    pub low: Option<Scalar>,
    #[serde(rename = "C", default)]
    pub close: Option<Scalar>,
    #[serde(rename = "Vo", default)]
    pub volume: Option<Scalar>,
    #[serde(rename = "Va", default)]
    pub turnover_value: Option<Scalar>,
    #[serde(rename = "UL", default)]
    pub upper_limit: Option<Scalar>,
    #[serde(rename = "LL", default)]
    pub lower_limit: Option<Scalar>,
    #[serde(rename = "AdjO", default)]
    pub adj_open: Option<Scalar>,
    #[serde(rename = "AdjH", default)]
    pub adj_high: Option<Scalar>,
    #[serde(rename = "AdjL", default)]
    pub adj_low: Option<Scalar>,
    #[serde(rename = "AdjC", default)]
    pub adj_close: Option<Scalar>,
    #[serde(rename = "AdjVo", default)]
    pub adj_volume: Option<Scalar>,
}

impl BarRecord {
    pub fn open_price(&self) -> Option<&Scalar> {
        prefer_adjusted(&self.adj_open, &self.open)
    }

    pub fn high_price(&self) -> Option<&Scalar> {
        prefer_adjusted(&self.adj_high, &self.high)
    }

    pub fn low_price(&self) -> Option<&Scalar> {
        prefer_adjusted(&self.adj_low, &self.low)
    }

    pub fn close_price(&self) -> Option<&Scalar> {
        prefer_adjusted(&self.adj_close, &self.close)
    }

    pub fn traded_volume(&self) -> Option<&Scalar> {
        prefer_adjusted(&self.adj_volume, &self.volume)
    }
}

fn prefer_adjusted<'a>(adjusted: &'a Option<Scalar>, raw: &'a Option<Scalar>) -> Option<&'a Scalar> {
    adjusted.as_ref().or(raw.as_ref())
}

/// Key fields arrive as `null` on some records; those decode to empty and are skipped downstream.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Financial disclosure summary as returned by `/fins/summary`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinancialRecord {
    #[serde(rename = "DiscDate", default, deserialize_with = "null_as_empty")]
    pub disc_date: String,
    #[serde(rename = "DiscTime", default)]
    pub disc_time: Option<Scalar>,
    #[serde(rename = "Code", default, deserialize_with = "null_as_empty")]
    pub code: String,
    #[serde(rename = "NP", default)]
    pub net_profit: Option<Scalar>,
    #[serde(rename = "EPS", default)]
    pub eps: Option<Scalar>,
    #[serde(rename = "BPS", default)]
    pub bps: Option<Scalar>,
    #[serde(rename = "FDivAnn", default)]
    pub forecast_dividend_annual: Option<Scalar>,
}
