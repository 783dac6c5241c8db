//! Metrics Store
//!
//! Owns the date selection, the loading/error flags and the weekly table,
//! and derives chart series from the table on demand.

use serde::Serialize;

use crate::metrics::catalog::{self, SERIES_BINDINGS};
use crate::metrics::{
    parse_cell, ChartPoint, DateRange, MetricRow, ValidationError, ValidationResult, WeekLabel,
    WeeklyTable, DATE_FORMAT,
};

/// Default lookback for the initial date selection
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Dashboard state
///
/// Rows and week labels are only ever replaced together, so a reader never
/// sees rows keyed by a different set of weeks than `week_labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsStore {
    start_date: String,
    end_date: String,
    rows: Vec<MetricRow>,
    week_labels: Vec<WeekLabel>,
    is_loading: bool,
    error_message: String,
    version: u64,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::with_default_range(DEFAULT_RANGE_DAYS)
    }
}

impl MetricsStore {
    /// Create a store with the given (unvalidated) date strings
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            rows: Vec::new(),
            week_labels: Vec::new(),
            is_loading: false,
            error_message: String::new(),
            version: 0,
        }
    }

    /// Create a store selecting the last `days` days up to today
    ///
    /// Falls back to `DEFAULT_RANGE_DAYS` when `days` reaches past the
    /// earliest representable date.
    pub fn with_default_range(days: i64) -> Self {
        let range = DateRange::last_days(days).unwrap_or_else(|| {
            tracing::warn!(
                days,
                fallback = DEFAULT_RANGE_DAYS,
                "Default range out of bounds, using fallback"
            );
            DateRange::last_days(DEFAULT_RANGE_DAYS).unwrap_or_else(DateRange::today)
        });
        Self::new(
            range.start().format(DATE_FORMAT).to_string(),
            range.end().format(DATE_FORMAT).to_string(),
        )
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn week_labels(&self) -> &[WeekLabel] {
        &self.week_labels
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Bumped every time rows or week labels change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Internal metric keys in table order
    pub fn ordered_metric_keys(&self) -> Vec<&'static str> {
        catalog::ordered_metric_keys()
    }

    /// Set the start date. Validation happens at fetch time.
    pub fn set_start_date(&mut self, date: impl Into<String>) {
        self.start_date = date.into();
    }

    /// Set the end date. Validation happens at fetch time.
    pub fn set_end_date(&mut self, date: impl Into<String>) {
        self.end_date = date.into();
    }

    /// Validate the current selection
    pub fn date_range(&self) -> ValidationResult<DateRange> {
        DateRange::parse(&self.start_date, &self.end_date)
    }

    /// Record a rejected selection; data and loading flag stay untouched
    pub fn reject(&mut self, error: &ValidationError) {
        self.error_message = error.to_string();
    }

    /// Enter the loading state, clearing the error and the previous data
    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error_message.clear();
        self.replace_data(Vec::new(), Vec::new());
    }

    /// Replace rows and week labels with a freshly built table
    pub fn commit(&mut self, table: WeeklyTable) {
        self.replace_data(table.week_labels, table.rows);
    }

    /// Record a failed fetch
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
    }

    /// Leave the loading state
    pub fn finish_fetch(&mut self) {
        self.is_loading = false;
    }

    fn replace_data(&mut self, week_labels: Vec<WeekLabel>, rows: Vec<MetricRow>) {
        self.week_labels = week_labels;
        self.rows = rows;
        self.version += 1;
    }

    /// Build one chart point per week label
    ///
    /// Each bound series reads its row's cell for the week. A missing row or
    /// cell yields 0; an unparsable cell is logged and also yields 0.
    pub fn derive_chart_points(&self) -> Vec<ChartPoint> {
        let mut points: Vec<ChartPoint> = self
            .week_labels
            .iter()
            .cloned()
            .map(ChartPoint::new)
            .collect();

        for (display_name, series) in SERIES_BINDINGS {
            let Some(row) = self.rows.iter().find(|r| r.display_name == display_name) else {
                continue;
            };

            for point in points.iter_mut() {
                let value = match row.cell(&point.week_label) {
                    None => 0.0,
                    Some(cell) => parse_cell(cell).unwrap_or_else(|e| {
                        tracing::warn!(
                            series = %series,
                            week = %point.week_label,
                            cell = %cell,
                            error = %e,
                            "Unparsable chart value, using 0"
                        );
                        0.0
                    }),
                };
                point.set(series, value);
            }
        }

        points
    }

    /// Read-only view of every observable, for rendering
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
            week_labels: self.week_labels.clone(),
            rows: self.rows.clone(),
            chart_points: self.derive_chart_points(),
            version: self.version,
        }
    }
}

/// Point-in-time copy of the dashboard state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub start_date: String,
    pub end_date: String,
    pub is_loading: bool,
    pub error_message: String,
    pub week_labels: Vec<WeekLabel>,
    pub rows: Vec<MetricRow>,
    pub chart_points: Vec<ChartPoint>,
    pub version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{EngagementReport, Series};
    use serde_json::json;

    fn loaded_store(report: serde_json::Value) -> MetricsStore {
        let report: EngagementReport = serde_json::from_value(report).unwrap();
        let mut store = MetricsStore::new("2024-01-01", "2024-01-31");
        store.begin_fetch();
        store.commit(WeeklyTable::from_report(&report).unwrap());
        store.finish_fetch();
        store
    }

    #[test]
    fn test_default_range() {
        let store = MetricsStore::default();
        let range = store.date_range().unwrap();
        assert_eq!(range.duration_days(), DEFAULT_RANGE_DAYS);
        assert!(!store.is_loading());
        assert!(store.error_message().is_empty());
    }

    #[test]
    fn test_oversized_default_range_falls_back() {
        let store = MetricsStore::with_default_range(200_000_000);
        let range = store.date_range().unwrap();
        assert_eq!(range.duration_days(), DEFAULT_RANGE_DAYS);

        let store = MetricsStore::with_default_range(i64::MAX);
        assert_eq!(store.date_range().unwrap().duration_days(), DEFAULT_RANGE_DAYS);
    }

    #[test]
    fn test_setters_do_not_validate() {
        let mut store = MetricsStore::new("2024-01-01", "2024-01-31");
        store.set_start_date("2024-02-10");
        store.set_end_date("not a date");

        assert_eq!(store.start_date(), "2024-02-10");
        assert_eq!(store.end_date(), "not a date");
        assert!(store.error_message().is_empty());
        assert!(store.date_range().is_err());
    }

    #[test]
    fn test_begin_fetch_resets_state() {
        let mut store = loaded_store(json!({"weeks": [{"week_label": "2024-01-01", "WAU": 5}]}));
        store.fail("Failed to fetch data: 500");
        let version = store.version();

        store.begin_fetch();

        assert!(store.is_loading());
        assert!(store.error_message().is_empty());
        assert!(store.rows().is_empty());
        assert!(store.week_labels().is_empty());
        assert!(store.version() > version);
    }

    #[test]
    fn test_reject_keeps_previous_data() {
        let mut store = loaded_store(json!({"weeks": [{"week_label": "2024-01-01", "WAU": 5}]}));

        store.reject(&ValidationError::StartAfterEnd);

        assert_eq!(store.error_message(), "Start date cannot be after end date.");
        assert_eq!(store.rows().len(), 9);
        assert_eq!(store.week_labels().len(), 1);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_chart_points_from_rows() {
        let store = loaded_store(json!({
            "weeks": [
                {
                    "week_label": "2024-01-01",
                    "DAU(avg)": 310.456,
                    "WAU": 1200,
                    "MAU": 4000,
                    "Stickiness(%)": 12.345,
                    "Avg. session count per DAU/day": 2.5,
                    "Avg. Usage Duration (p50) in mins/day": 7.25,
                    "No. of news items viewed/day (p50)": 4,
                    "No. of news items viewed/day (p95)": 18,
                    "time_to_value_in_s_p50": 42
                },
                {
                    "week_label": "2024-01-08",
                    "WAU": 1300
                }
            ]
        }));

        let points = store.derive_chart_points();
        assert_eq!(points.len(), 2);

        let first = &points[0];
        assert_eq!(first.week_label, WeekLabel::from("2024-01-01"));
        assert_eq!(first.dau, 310.46);
        assert_eq!(first.wau, 1200.0);
        assert_eq!(first.mau, 4000.0);
        assert_eq!(first.stickiness, 12.35);
        assert_eq!(first.session_count, 2.5);
        assert_eq!(first.usage_duration, 7.25);
        assert_eq!(first.news_items_p50, 4.0);
        assert_eq!(first.news_items_p95, 18.0);

        // "-" cells are unparsable and fall back to 0
        let second = &points[1];
        assert_eq!(second.wau, 1300.0);
        assert_eq!(second.dau, 0.0);
        assert_eq!(second.stickiness, 0.0);
    }

    #[test]
    fn test_chart_points_without_rows() {
        let mut store = MetricsStore::new("2024-01-01", "2024-01-31");
        store.commit(WeeklyTable {
            week_labels: vec![WeekLabel::from("2024-01-01"), WeekLabel::from("2024-01-08")],
            rows: Vec::new(),
        });

        let points = store.derive_chart_points();
        assert_eq!(points.len(), 2);
        for point in &points {
            for series in Series::ALL {
                assert_eq!(point.get(series), 0.0);
            }
        }
    }

    #[test]
    fn test_chart_points_missing_cell_defaults_to_zero() {
        let mut store = MetricsStore::new("2024-01-01", "2024-01-31");
        let week = WeekLabel::from("2024-01-01");
        store.commit(WeeklyTable {
            week_labels: vec![week.clone(), WeekLabel::from("2024-01-08")],
            rows: vec![MetricRow::new("WAU", "WAU").cell_value(week, "12.00")],
        });

        let points = store.derive_chart_points();
        assert_eq!(points[0].wau, 12.0);
        assert_eq!(points[1].wau, 0.0);
    }

    #[test]
    fn test_chart_points_empty_store() {
        let store = MetricsStore::new("2024-01-01", "2024-01-31");
        assert!(store.derive_chart_points().is_empty());
    }

    #[test]
    fn test_chart_points_idempotent() {
        let store = loaded_store(json!({
            "weeks": [
                {"week_label": "2024-01-01", "MAU": 10, "Stickiness(%)": "broken"},
                {"week_label": "2024-01-08", "MAU": 11}
            ]
        }));

        assert_eq!(store.derive_chart_points(), store.derive_chart_points());
    }

    #[test]
    fn test_snapshot() {
        let store = loaded_store(json!({"weeks": [{"week_label": "2024-01-01", "MAU": 10}]}));
        let snapshot = store.snapshot();

        assert_eq!(snapshot.start_date, "2024-01-01");
        assert_eq!(snapshot.end_date, "2024-01-31");
        assert_eq!(snapshot.rows.len(), 9);
        assert_eq!(snapshot.chart_points.len(), 1);
        assert_eq!(snapshot.chart_points[0].mau, 10.0);
        assert_eq!(snapshot.version, store.version());
    }
}
