//! Weekly table construction
//!
//! Turns a decoded engagement report (one object per week) into the
//! row-oriented table the dashboard renders: one row per catalog metric,
//! one cell per week.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

use super::catalog::METRICS;
use super::format::format_cell;
use super::types::{MetricRow, WeekLabel};

/// Engagement report as returned by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngagementReport {
    #[serde(default)]
    pub weeks: Vec<WeekRecord>,
}

/// One week of the report: its label plus raw metric values keyed by API key
#[derive(Debug, Clone, Deserialize)]
pub struct WeekRecord {
    pub week_label: WeekLabel,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl WeekRecord {
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// Errors that make a report unusable as a table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate week label: {0}")]
    DuplicateWeek(WeekLabel),
}

/// Table rows plus the week labels they are keyed by
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyTable {
    pub week_labels: Vec<WeekLabel>,
    pub rows: Vec<MetricRow>,
}

impl WeeklyTable {
    /// Build the table from a report
    ///
    /// Week labels keep the report's order. Rows follow the catalog order,
    /// not the order keys appear in the report.
    pub fn from_report(report: &EngagementReport) -> Result<Self, TableError> {
        let mut seen = HashSet::with_capacity(report.weeks.len());
        let mut week_labels = Vec::with_capacity(report.weeks.len());
        for week in &report.weeks {
            if !seen.insert(&week.week_label) {
                return Err(TableError::DuplicateWeek(week.week_label.clone()));
            }
            week_labels.push(week.week_label.clone());
        }

        let rows = METRICS
            .iter()
            .map(|metric| {
                report.weeks.iter().fold(
                    MetricRow::new(metric.key, metric.display_name),
                    |row, week| {
                        let cell = format_cell(metric.key, week.value(metric.key));
                        row.cell_value(week.week_label.clone(), cell)
                    },
                )
            })
            .collect();

        Ok(Self { week_labels, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.week_labels.is_empty()
    }
}
