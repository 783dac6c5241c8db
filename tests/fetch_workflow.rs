//! Integration tests for the fetch workflow against a mock engagement API
//!
//! These tests verify that:
//! 1. Successful responses become 9 rows with one cell per week
//! 2. The request carries start_date/end_date query parameters
//! 3. HTTP error statuses (redirects included) surface the status code in the error message
//! 4. Malformed bodies, timeouts and connection failures surface a generic message
//! 5. Invalid date selections never reach the network

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use weekpulse::fetch::{
    EngagementClient, EngagementClientConfig, FetchOutcome, FetchWorkflow, ENDPOINT_PATH,
    UNEXPECTED_ERROR_MESSAGE,
};
use weekpulse::metrics::{ValidationError, WeekLabel};
use weekpulse::store::{MetricsStore, StoreHandle};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn workflow_for(base_url: &str, timeout_secs: u64, start: &str, end: &str) -> FetchWorkflow {
    let client = EngagementClient::new(EngagementClientConfig {
        base_url: base_url.to_string(),
        timeout_secs,
    })
    .unwrap();
    FetchWorkflow::new(
        Arc::new(client),
        StoreHandle::new(MetricsStore::new(start, end)),
    )
}

fn three_weeks() -> serde_json::Value {
    json!({
        "start_date": "2024-01-01",
        "end_date": "2024-01-21",
        "weeks": [
            {
                "week_label": "2024-W01",
                "DAU(avg)": 310.456,
                "WAU": 1520,
                "MAU": 4100,
                "Stickiness(%)": 12.345,
                "Avg. session count per DAU/day": 2.4,
                "Avg. Usage Duration (p50) in mins/day": 6.75,
                "No. of news items viewed/day (p50)": 5,
                "No. of news items viewed/day (p95)": 21,
                "time_to_value_in_s_p50": 48.2
            },
            {
                "week_label": "2024-W02",
                "DAU(avg)": 298.1,
                "MAU": 4150,
                "Stickiness(%)": 11.9,
                "time_to_value_in_s_p50": null
            },
            {
                "week_label": "2024-W03",
                "DAU(avg)": 305,
                "WAU": 1490,
                "MAU": 4200
            }
        ]
    })
}

#[tokio::test]
async fn test_successful_fetch_builds_table_and_chart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-01-21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_weeks()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 30, "2024-01-01", "2024-01-21");
    let outcome = workflow.fetch_metrics().await;

    assert_eq!(outcome, FetchOutcome::Loaded { weeks: 3 });

    let snapshot = workflow.store().snapshot();
    assert!(!snapshot.is_loading);
    assert!(snapshot.error_message.is_empty());
    assert_eq!(
        snapshot.week_labels,
        vec![
            WeekLabel::from("2024-W01"),
            WeekLabel::from("2024-W02"),
            WeekLabel::from("2024-W03"),
        ]
    );
    assert_eq!(snapshot.rows.len(), 9);
    for row in &snapshot.rows {
        assert_eq!(row.cells.len(), 3, "row {}", row.display_name);
    }

    let cell = |name: &str, week: &str| {
        snapshot
            .rows
            .iter()
            .find(|r| r.display_name == name)
            .and_then(|r| r.cell(&WeekLabel::from(week)))
            .unwrap()
            .to_string()
    };
    assert_eq!(cell("Stickiness percentage", "2024-W01"), "12.35%");
    assert_eq!(cell("DAU(avg)", "2024-W01"), "310.46");
    assert_eq!(cell("WAU", "2024-W02"), "-");
    assert_eq!(cell("Time to Value in s (p50)", "2024-W01"), "48.20");
    assert_eq!(cell("Time to Value in s (p50)", "2024-W02"), "");
    assert_eq!(cell("Time to Value in s (p50)", "2024-W03"), "");

    assert_eq!(snapshot.chart_points.len(), 3);
    assert_eq!(snapshot.chart_points[0].stickiness, 12.35);
    assert_eq!(snapshot.chart_points[0].news_items_p95, 21.0);
    assert_eq!(snapshot.chart_points[1].wau, 0.0);
    assert_eq!(snapshot.chart_points[2].mau, 4200.0);
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 30, "2024-01-01", "2024-01-21");
    let outcome = workflow.fetch_metrics().await;

    assert_eq!(outcome, FetchOutcome::HttpError { status: 503 });

    let snapshot = workflow.store().snapshot();
    assert!(snapshot.error_message.contains("503"));
    assert!(!snapshot.is_loading);
    assert!(snapshot.rows.is_empty());
    assert!(snapshot.week_labels.is_empty());
    assert!(snapshot.chart_points.is_empty());
}

#[tokio::test]
async fn test_redirect_is_reported_as_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_weeks()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 30, "2024-01-01", "2024-01-21");
    let outcome = workflow.fetch_metrics().await;

    assert_eq!(outcome, FetchOutcome::HttpError { status: 302 });
    let snapshot = workflow.store().snapshot();
    assert_eq!(snapshot.error_message, "Failed to fetch data: 302");
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn test_error_after_success_clears_previous_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_weeks()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 30, "2024-01-01", "2024-01-21");
    assert!(workflow.fetch_metrics().await.is_loaded());
    assert_eq!(
        workflow.fetch_metrics().await,
        FetchOutcome::HttpError { status: 500 }
    );

    let snapshot = workflow.store().snapshot();
    assert_eq!(snapshot.error_message, "Failed to fetch data: 500");
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 30, "2024-01-01", "2024-01-21");
    let outcome = workflow.fetch_metrics().await;

    assert_eq!(outcome, FetchOutcome::Failed);
    let snapshot = workflow.store().snapshot();
    assert_eq!(snapshot.error_message, UNEXPECTED_ERROR_MESSAGE);
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_empty_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 30, "2024-01-01", "2024-01-21");

    assert_eq!(
        workflow.fetch_metrics().await,
        FetchOutcome::Loaded { weeks: 0 }
    );
    let snapshot = workflow.store().snapshot();
    assert_eq!(snapshot.rows.len(), 9);
    assert!(snapshot.week_labels.is_empty());
    assert!(snapshot.chart_points.is_empty());
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(three_weeks())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 1, "2024-01-01", "2024-01-21");
    let outcome = workflow.fetch_metrics().await;

    assert_eq!(outcome, FetchOutcome::Failed);
    let snapshot = workflow.store().snapshot();
    assert_eq!(snapshot.error_message, UNEXPECTED_ERROR_MESSAGE);
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_connection_refused() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let workflow = workflow_for(&uri, 5, "2024-01-01", "2024-01-21");
    let outcome = workflow.fetch_metrics().await;

    assert_eq!(outcome, FetchOutcome::Failed);
    assert_eq!(
        workflow.store().snapshot().error_message,
        UNEXPECTED_ERROR_MESSAGE
    );
}

#[tokio::test]
async fn test_invalid_range_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_weeks()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let workflow = workflow_for(&mock_server.uri(), 30, "2024-01-10", "2024-01-01");
    let outcome = workflow.fetch_metrics().await;

    assert_eq!(outcome, FetchOutcome::Rejected(ValidationError::StartAfterEnd));
    let snapshot = workflow.store().snapshot();
    assert_eq!(snapshot.error_message, "Start date cannot be after end date.");
    assert!(!snapshot.is_loading);
    assert!(snapshot.rows.is_empty());
}
