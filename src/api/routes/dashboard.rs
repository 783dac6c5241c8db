//! Dashboard Routes
//!
//! Read-only views of the dashboard state plus the operator actions.
//!
//! - GET /api/v1/dashboard - Full snapshot
//! - GET /api/v1/dashboard/table - Table rows in week order
//! - GET /api/v1/dashboard/chart - Chart points
//! - PUT /api/v1/dashboard/range - Set start/end dates
//! - POST /api/v1/dashboard/refresh - Run a fetch

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{OutcomeDto, RangeRequest, RefreshParams, RefreshResponse, TableResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::metrics::ChartPoint;
use crate::store::{DashboardSnapshot, MetricsStore};

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.store.snapshot())
}

/// GET /api/v1/dashboard/table
pub async fn get_table(State(state): State<Arc<AppState>>) -> Json<TableResponse> {
    Json(state.store.read(TableResponse::from_store))
}

/// GET /api/v1/dashboard/chart
pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<Vec<ChartPoint>> {
    Json(state.store.read(MetricsStore::derive_chart_points))
}

/// PUT /api/v1/dashboard/range
///
/// Dates are stored as given; they are validated when a fetch runs.
pub async fn set_range(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RangeRequest>,
) -> ApiResult<Json<DashboardSnapshot>> {
    if request.start_date.is_none() && request.end_date.is_none() {
        return Err(ApiError::Validation(
            "Provide start_date and/or end_date".to_string(),
        ));
    }

    let snapshot = state.store.update(|store| {
        if let Some(start) = request.start_date {
            store.set_start_date(start);
        }
        if let Some(end) = request.end_date {
            store.set_end_date(end);
        }
        store.snapshot()
    });

    tracing::debug!(
        start_date = %snapshot.start_date,
        end_date = %snapshot.end_date,
        "Date selection updated"
    );

    Ok(Json(snapshot))
}

/// POST /api/v1/dashboard/refresh
///
/// Runs a fetch for the current selection and returns the resulting state.
/// With `?background=true` the fetch is spawned and `202 Accepted` is
/// returned right away; poll `GET /api/v1/dashboard` for the result.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RefreshParams>,
) -> (StatusCode, Json<RefreshResponse>) {
    if params.background {
        state.workflow.spawn_fetch();
        return (
            StatusCode::ACCEPTED,
            Json(RefreshResponse {
                outcome: None,
                dashboard: state.store.snapshot(),
            }),
        );
    }

    let outcome = state.workflow.fetch_metrics().await;
    tracing::info!(outcome = outcome.as_str(), "Manual refresh completed");

    (
        StatusCode::OK,
        Json(RefreshResponse {
            outcome: Some(OutcomeDto::from(&outcome)),
            dashboard: state.store.snapshot(),
        }),
    )
}
