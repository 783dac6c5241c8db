//! # Weekpulse
//!
//! Weekly user-engagement dashboard core: fetches engagement metrics for a
//! date range from the analytics API and shapes them into table rows and
//! chart series for a UI to render.
//!
//! ## Features
//!
//! - **Fixed metric table**: nine engagement metrics in a stable order, one
//!   formatted cell per reporting week
//! - **Chart series**: eight numeric series per week, derived on demand
//! - **Fetch workflow**: validation, loading/error state transitions and a
//!   single network call per attempt
//! - **HTTP API**: the dashboard state and actions over Axum
//!
//! ## Modules
//!
//! - [`metrics`]: Data types, metric catalog, formatting, table building
//! - [`store`]: Dashboard state and chart derivation
//! - [`fetch`]: Engagement API client and fetch workflow
//! - [`api`]: REST API server with Axum
//! - [`config`]: File and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weekpulse::fetch::{EngagementClient, EngagementClientConfig, FetchWorkflow};
//! use weekpulse::store::{MetricsStore, StoreHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EngagementClient::new(EngagementClientConfig::default())?;
//!     let store = StoreHandle::new(MetricsStore::new("2024-01-01", "2024-01-31"));
//!     let workflow = FetchWorkflow::new(Arc::new(client), store.clone());
//!
//!     let outcome = workflow.fetch_metrics().await;
//!     println!("{:?}", outcome);
//!
//!     for point in store.read(|s| s.derive_chart_points()) {
//!         println!("{}: DAU {:.2}", point.week_label, point.dau);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod store;

// Re-export top-level types for convenience
pub use metrics::{
    ChartPoint, DateRange, EngagementReport, MetricRow, Series, ValidationError, WeekLabel,
    WeeklyTable,
};

pub use store::{DashboardSnapshot, MetricsStore, StoreHandle};

pub use fetch::{
    EngagementClient, EngagementClientConfig, EngagementSource, FetchError, FetchOutcome,
    FetchResult, FetchWorkflow,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, DashboardConfig, EngagementApiConfig, LoggingConfig, ServerConfig};
