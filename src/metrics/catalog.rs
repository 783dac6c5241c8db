//! Metric catalog
//!
//! The fixed set of engagement metrics the dashboard shows, in table order,
//! and the bindings from table rows to chart series.

use super::types::Series;

/// Definition of one engagement metric reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDefinition {
    /// Field name in each week of the API response
    pub key: &'static str,
    /// Row label shown in the table
    pub display_name: &'static str,
}

/// API key of the Stickiness metric; its cells carry a `%` suffix
pub const STICKINESS_KEY: &str = "Stickiness(%)";

/// API key of the time-to-value metric; a missing value renders as ""
pub const TIME_TO_VALUE_KEY: &str = "time_to_value_in_s_p50";

/// All metrics in table row order
pub const METRICS: [MetricDefinition; 9] = [
    MetricDefinition {
        key: "DAU(avg)",
        display_name: "DAU(avg)",
    },
    MetricDefinition {
        key: "WAU",
        display_name: "WAU",
    },
    MetricDefinition {
        key: "MAU",
        display_name: "MAU",
    },
    MetricDefinition {
        key: STICKINESS_KEY,
        display_name: "Stickiness percentage",
    },
    MetricDefinition {
        key: "Avg. session count per DAU/day",
        display_name: "Avg. session count per DAU/day",
    },
    MetricDefinition {
        key: "Avg. Usage Duration (p50) in mins/day",
        display_name: "Avg. Usage Duration (p50) in mins/day",
    },
    MetricDefinition {
        key: TIME_TO_VALUE_KEY,
        display_name: "Time to Value in s (p50)",
    },
    MetricDefinition {
        key: "No. of news items viewed/day (p50)",
        display_name: "No. of news items viewed/day (p50)",
    },
    MetricDefinition {
        key: "No. of news items viewed/day (p95)",
        display_name: "No. of news items viewed/day (p95)",
    },
];

/// Row display name to chart series. Matching is exact.
pub const SERIES_BINDINGS: [(&str, Series); 8] = [
    ("DAU(avg)", Series::Dau),
    ("WAU", Series::Wau),
    ("MAU", Series::Mau),
    ("Stickiness percentage", Series::Stickiness),
    ("Avg. session count per DAU/day", Series::SessionCount),
    ("Avg. Usage Duration (p50) in mins/day", Series::UsageDuration),
    ("No. of news items viewed/day (p50)", Series::NewsItemsP50),
    ("No. of news items viewed/day (p95)", Series::NewsItemsP95),
];

/// Internal metric keys in display order
pub fn ordered_metric_keys() -> Vec<&'static str> {
    METRICS.iter().map(|m| m.key).collect()
}

/// Look up a metric by its API key
pub fn find(key: &str) -> Option<&'static MetricDefinition> {
    METRICS.iter().find(|m| m.key == key)
}

/// Display name for an API key, if the key is part of the catalog
pub fn display_name(key: &str) -> Option<&'static str> {
    find(key).map(|m| m.display_name)
}
