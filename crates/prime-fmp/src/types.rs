//! Data types for FMP API responses.
//!
//! Numeric fields are parsed leniently: FMP occasionally returns numbers as
//! strings, or placeholders such as `"None"`, and those become `None` rather
//! than failing the whole response.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reporting period for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Annual reports (10-K filings).
    #[default]
    Annual,
    /// Quarterly reports (10-Q filings).
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// Best-effort numeric parsing: numbers and numeric strings, anything else is `None`.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    });
    Ok(parsed.filter(|v| v.is_finite()))
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// One earnings report from the `earnings` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    /// Report date.
    pub date: String,
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: String,
    /// Reported earnings per share; absent for upcoming reports.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub eps_actual: Option<f64>,
    /// Consensus EPS estimate.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub eps_estimated: Option<f64>,
    /// Reported revenue for the quarter.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue_actual: Option<f64>,
}

impl EarningsReport {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Income statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Fiscal period end date.
    pub date: String,
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: String,
    /// Reporting period (FY, Q1, ...).
    #[serde(default)]
    pub period: String,
    /// Total revenue.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue: Option<f64>,
    /// Net income.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub net_income: Option<f64>,
    /// Earnings per share (basic).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub eps: Option<f64>,
}

impl IncomeStatement {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Historical end-of-day price from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Open price.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    /// High price.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    /// Low price.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    /// Close price.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    /// Volume.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

impl HistoricalPrice {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}
