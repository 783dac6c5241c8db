//! Engagement Metrics Fetching
//!
//! ## Architecture
//!
//! - **Client**: reqwest client for the engagement metrics endpoint
//! - **FetchWorkflow**: Validates the selection, drives the request and
//!   writes rows or an error message into the store
//!
//! ## Data Flow
//!
//! 1. The operator sets start/end dates on the store
//! 2. `FetchWorkflow::fetch_metrics` validates them and resets the store
//! 3. `EngagementSource::fetch_report` performs the single network call
//! 4. The report becomes a `WeeklyTable` and replaces the store's data

mod client;
mod error;
mod workflow;

pub use client::{EngagementClient, EngagementClientConfig, EngagementSource, ENDPOINT_PATH};
pub use error::{FetchError, FetchResult, UNEXPECTED_ERROR_MESSAGE};
pub use workflow::{FetchOutcome, FetchWorkflow};
