//! Data Model
//!
//! Wire types exchanged with the recharge API.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque, server-assigned recharge identifier.
///
/// The server may send it as a JSON number or string; either way it is kept
/// verbatim and only ever echoed back in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RechargeId(String);

impl RechargeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RechargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RechargeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => RechargeId(n.to_string()),
            RawId::Text(s) => RechargeId(s),
        })
    }
}

/// Date of a listed recharge.
///
/// Records imported in bulk may carry whatever text the import had, so a
/// value that is not `YYYY-MM-DD` is kept as sent instead of failing the
/// whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDate {
    Iso(NaiveDate),
    Raw(String),
}

impl RecordDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RecordDate::Iso(date) => Some(*date),
            RecordDate::Raw(_) => None,
        }
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        RecordDate::Iso(date)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Iso(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            RecordDate::Raw(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for RecordDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => RecordDate::Iso(date),
            Err(_) => RecordDate::Raw(raw),
        })
    }
}

/// A recharge as returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeRecord {
    pub id: RechargeId,
    pub data: RecordDate,
    pub kwh: f64,
    pub custo: f64,
    #[serde(default)]
    pub isento: bool,
    pub odometro: f64,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// Full replacement of the editable fields of a recharge.
///
/// Every field is always sent; the id travels in the URL only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeUpdate {
    pub data: NaiveDate,
    pub kwh: f64,
    pub custo: f64,
    pub odometro: f64,
    pub isento: bool,
    pub local: String,
    pub observacoes: String,
}

/// One page of the recharge list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargePage {
    #[serde(default)]
    pub items: Vec<RechargeRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub has_next: bool,
}

/// A monthly series; `None` marks a month the server left as `null`
pub type Series = Vec<Option<f64>>;

/// Cost totals per month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSeries {
    #[serde(default)]
    pub total: Series,
    #[serde(default)]
    pub pagas: Series,
    #[serde(default)]
    pub percentual: Series,
}

/// Savings totals per month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsSeries {
    #[serde(default)]
    pub total: Series,
    #[serde(default)]
    pub pagas: Series,
}

/// Monthly aggregation payload, one entry per month in chronological order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Month keys in `YYYY-MM` form
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub custos: CostSeries,
    /// kWh consumed per month
    #[serde(default)]
    pub consumo: Series,
    #[serde(default)]
    pub consumo_por_100km: Series,
    /// Distance driven per month
    #[serde(default)]
    pub km: Series,
    #[serde(default)]
    pub economia: SavingsSeries,
}

impl MonthlyAggregate {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Error body the server attaches to rejected requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
