//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::fetch::FetchOutcome;
use crate::metrics::WeekLabel;
use crate::store::{DashboardSnapshot, MetricsStore};

// ============================================
// TABLE DTOs
// ============================================

/// Table view: rows in catalog order, cells in week order
#[derive(Debug, Serialize, Deserialize)]
pub struct TableResponse {
    /// Column keys
    pub week_labels: Vec<WeekLabel>,
    /// One entry per metric
    pub rows: Vec<TableRowDto>,
}

/// Single table row
#[derive(Debug, Serialize, Deserialize)]
pub struct TableRowDto {
    /// Internal metric key
    pub key: String,
    /// Display label
    pub metric: String,
    /// Formatted cells, aligned with `week_labels`
    pub cells: Vec<String>,
}

impl TableResponse {
    pub fn from_store(store: &MetricsStore) -> Self {
        let week_labels = store.week_labels().to_vec();
        let rows = store
            .rows()
            .iter()
            .map(|row| TableRowDto {
                key: row.key.clone(),
                metric: row.display_name.clone(),
                cells: row
                    .cells_in_order(&week_labels)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        Self { week_labels, rows }
    }
}

// ============================================
// RANGE DTOs
// ============================================

/// Date selection update; omitted fields keep their value
#[derive(Debug, Deserialize)]
pub struct RangeRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

// ============================================
// REFRESH DTOs
// ============================================

/// Refresh query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
    /// Return immediately and fetch on a background task
    #[serde(default)]
    pub background: bool,
}

/// Outcome of a fetch attempt
#[derive(Debug, Serialize, Deserialize)]
pub struct OutcomeDto {
    /// loaded, rejected, skipped, http_error, failed
    pub status: String,
    /// Weeks loaded (loaded only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<usize>,
    /// Upstream status code (http_error only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Validation message (rejected only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&FetchOutcome> for OutcomeDto {
    fn from(outcome: &FetchOutcome) -> Self {
        let mut dto = OutcomeDto {
            status: outcome.as_str().to_string(),
            weeks: None,
            http_status: None,
            message: None,
        };
        match outcome {
            FetchOutcome::Loaded { weeks } => dto.weeks = Some(*weeks),
            FetchOutcome::HttpError { status } => dto.http_status = Some(*status),
            FetchOutcome::Rejected(err) => dto.message = Some(err.to_string()),
            FetchOutcome::Skipped | FetchOutcome::Failed => {}
        }
        dto
    }
}

/// Refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Absent when the fetch runs in the background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeDto>,
    /// Dashboard state after the attempt (or at acceptance time)
    pub dashboard: DashboardSnapshot,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Engagement API base URL
    pub upstream: String,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Last error shown on the dashboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricRow, ValidationError, WeeklyTable};

    #[test]
    fn test_table_cells_follow_week_order() {
        let (w1, w2) = (WeekLabel::from("2024-01-01"), WeekLabel::from("2024-01-08"));
        let mut store = MetricsStore::new("2024-01-01", "2024-01-14");
        store.commit(WeeklyTable {
            week_labels: vec![w1.clone(), w2.clone()],
            rows: vec![MetricRow::new("WAU", "WAU")
                .cell_value(w2, "2.00")
                .cell_value(w1, "1.00")],
        });

        let table = TableResponse::from_store(&store);
        assert_eq!(table.rows[0].metric, "WAU");
        assert_eq!(table.rows[0].cells, vec!["1.00", "2.00"]);
    }

    #[test]
    fn test_outcome_dto() {
        let dto = OutcomeDto::from(&FetchOutcome::HttpError { status: 503 });
        assert_eq!(dto.status, "http_error");
        assert_eq!(dto.http_status, Some(503));

        let dto = OutcomeDto::from(&FetchOutcome::Rejected(ValidationError::StartAfterEnd));
        assert_eq!(dto.message.as_deref(), Some("Start date cannot be after end date."));

        let json = serde_json::to_value(OutcomeDto::from(&FetchOutcome::Failed)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed"}));
    }
}
