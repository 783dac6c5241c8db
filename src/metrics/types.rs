//! Core data types for the engagement dashboard
//!
//! This module defines the values the dashboard renders:
//! - `DateRange`: A validated reporting interval
//! - `WeekLabel`: Identifier of one reporting week
//! - `MetricRow`: One table row, one formatted cell per week
//! - `Series` and `ChartPoint`: Chart-ready numeric values per week

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::error::{ValidationError, ValidationResult};

/// Date format used by the UI and the engagement API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated, inclusive date interval (`start <= end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> ValidationResult<Self> {
        if start > end {
            return Err(ValidationError::StartAfterEnd);
        }
        Ok(Self { start, end })
    }

    /// Parse a range from the raw date strings held by the store
    ///
    /// Empty strings are reported before format errors, and format errors
    /// before ordering errors.
    pub fn parse(start: &str, end: &str) -> ValidationResult<Self> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Single-day range for today
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self {
            start: today,
            end: today,
        }
    }

    /// Range covering the last `days` days up to and including today
    ///
    /// `None` when the start would fall outside the representable dates.
    pub fn last_days(days: i64) -> Option<Self> {
        let end = Self::today().end;
        let start = end.checked_sub_signed(Duration::try_days(days.max(0))?)?;
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start date formatted for the `start_date` query parameter
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date formatted for the `end_date` query parameter
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Number of days between start and end
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

fn parse_date(value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Opaque identifier of one reporting week (e.g. "2024-01-01")
///
/// Used both as a table column key and as a chart x-axis category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekLabel(String);

impl WeekLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WeekLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WeekLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// One table row: a metric and its formatted value for every known week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    /// Internal metric key as used by the API (e.g. "Stickiness(%)")
    pub key: String,
    /// Label shown in the table (e.g. "Stickiness percentage")
    pub display_name: String,
    /// Formatted cell per week label
    pub cells: HashMap<WeekLabel, String>,
}

impl MetricRow {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            cells: HashMap::new(),
        }
    }

    /// Builder method: set the cell for a week
    pub fn cell_value(mut self, week: WeekLabel, value: impl Into<String>) -> Self {
        self.cells.insert(week, value.into());
        self
    }

    /// Formatted cell for a week, if the row has one
    pub fn cell(&self, week: &WeekLabel) -> Option<&str> {
        self.cells.get(week).map(String::as_str)
    }

    /// Cells ordered by the given week labels; absent cells render as ""
    pub fn cells_in_order<'a>(&'a self, weeks: &'a [WeekLabel]) -> Vec<&'a str> {
        weeks
            .iter()
            .map(|week| self.cell(week).unwrap_or_default())
            .collect()
    }
}

/// Chart series plotted by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    #[serde(rename = "DAU")]
    Dau,
    #[serde(rename = "WAU")]
    Wau,
    #[serde(rename = "MAU")]
    Mau,
    Stickiness,
    SessionCount,
    UsageDuration,
    NewsItemsP50,
    NewsItemsP95,
}

impl Series {
    /// All series, in chart legend order
    pub const ALL: [Series; 8] = [
        Series::Dau,
        Series::Wau,
        Series::Mau,
        Series::Stickiness,
        Series::SessionCount,
        Series::UsageDuration,
        Series::NewsItemsP50,
        Series::NewsItemsP95,
    ];

    /// Field name of the series in chart data
    pub fn key(&self) -> &'static str {
        match self {
            Series::Dau => "DAU",
            Series::Wau => "WAU",
            Series::Mau => "MAU",
            Series::Stickiness => "Stickiness",
            Series::SessionCount => "SessionCount",
            Series::UsageDuration => "UsageDuration",
            Series::NewsItemsP50 => "NewsItemsP50",
            Series::NewsItemsP95 => "NewsItemsP95",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Chart values for one week; every series is always present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub week_label: WeekLabel,
    #[serde(rename = "DAU")]
    pub dau: f64,
    #[serde(rename = "WAU")]
    pub wau: f64,
    #[serde(rename = "MAU")]
    pub mau: f64,
    #[serde(rename = "Stickiness")]
    pub stickiness: f64,
    #[serde(rename = "SessionCount")]
    pub session_count: f64,
    #[serde(rename = "UsageDuration")]
    pub usage_duration: f64,
    #[serde(rename = "NewsItemsP50")]
    pub news_items_p50: f64,
    #[serde(rename = "NewsItemsP95")]
    pub news_items_p95: f64,
}

impl ChartPoint {
    /// A point with every series at zero
    pub fn new(week_label: WeekLabel) -> Self {
        Self {
            week_label,
            dau: 0.0,
            wau: 0.0,
            mau: 0.0,
            stickiness: 0.0,
            session_count: 0.0,
            usage_duration: 0.0,
            news_items_p50: 0.0,
            news_items_p95: 0.0,
        }
    }

    pub fn get(&self, series: Series) -> f64 {
        match series {
            Series::Dau => self.dau,
            Series::Wau => self.wau,
            Series::Mau => self.mau,
            Series::Stickiness => self.stickiness,
            Series::SessionCount => self.session_count,
            Series::UsageDuration => self.usage_duration,
            Series::NewsItemsP50 => self.news_items_p50,
            Series::NewsItemsP95 => self.news_items_p95,
        }
    }

    pub fn set(&mut self, series: Series, value: f64) {
        let slot = match series {
            Series::Dau => &mut self.dau,
            Series::Wau => &mut self.wau,
            Series::Mau => &mut self.mau,
            Series::Stickiness => &mut self.stickiness,
            Series::SessionCount => &mut self.session_count,
            Series::UsageDuration => &mut self.usage_duration,
            Series::NewsItemsP50 => &mut self.news_items_p50,
            Series::NewsItemsP95 => &mut self.news_items_p95,
        };
        *slot = value;
    }
}
