//! Fetch Workflow
//!
//! Orchestrates one fetch attempt against the engagement API and writes the
//! result into the shared store.
//!
//! ```text
//! Idle → Validating → Rejected
//!                   → Loading → Success | HttpError | OtherError
//!                   → Idle (loading flag always cleared)
//! ```
//!
//! The store is touched in two synchronous segments: one before the network
//! call (validate + reset) and one after it (commit or record the error).
//! A trigger that arrives while another attempt is loading is ignored.

use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::client::EngagementSource;
use super::error::{FetchError, UNEXPECTED_ERROR_MESSAGE};
use crate::metrics::{DateRange, ValidationError, WeeklyTable};
use crate::store::{MetricsStore, StoreHandle};

/// How a fetch attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Date selection was invalid; no request was made
    Rejected(ValidationError),
    /// Another attempt was already loading; nothing changed
    Skipped,
    /// Rows and week labels were replaced
    Loaded { weeks: usize },
    /// API answered with a non-2xx status
    HttpError { status: u16 },
    /// Network, timeout or decoding failure
    Failed,
}

impl FetchOutcome {
    /// Short machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOutcome::Rejected(_) => "rejected",
            FetchOutcome::Skipped => "skipped",
            FetchOutcome::Loaded { .. } => "loaded",
            FetchOutcome::HttpError { .. } => "http_error",
            FetchOutcome::Failed => "failed",
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded { .. })
    }
}

/// Drives fetch attempts for one store
#[derive(Clone)]
pub struct FetchWorkflow {
    source: Arc<dyn EngagementSource>,
    store: StoreHandle,
}

enum Start {
    InFlight,
    Rejected(ValidationError),
    Loading(DateRange),
}

/// Clears the loading flag when the attempt ends, however it ends
///
/// An attempt dropped before it recorded a result (panic, cancellation)
/// is reported with the generic error message.
struct LoadingGuard {
    store: StoreHandle,
    settled: bool,
}

impl LoadingGuard {
    fn new(store: StoreHandle) -> Self {
        Self {
            store,
            settled: false,
        }
    }

    /// Apply the attempt's result and mark the attempt settled
    fn settle(&mut self, f: impl FnOnce(&mut MetricsStore)) {
        self.store.update(f);
        self.settled = true;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let settled = self.settled;
        if !settled {
            tracing::warn!("Fetch attempt ended without a result");
        }
        self.store.update(|store| {
            if !settled {
                store.fail(UNEXPECTED_ERROR_MESSAGE);
            }
            store.finish_fetch();
        });
    }
}

impl FetchWorkflow {
    pub fn new(source: Arc<dyn EngagementSource>, store: StoreHandle) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Fetch metrics for the store's current date selection
    pub async fn fetch_metrics(&self) -> FetchOutcome {
        let attempt = Uuid::new_v4();
        self.run()
            .instrument(tracing::info_span!("fetch_metrics", attempt = %attempt))
            .await
    }

    /// Select a date range and fetch it
    pub async fn fetch_range(
        &self,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> FetchOutcome {
        let (start_date, end_date) = (start_date.into(), end_date.into());
        self.store.update(|store| {
            store.set_start_date(start_date);
            store.set_end_date(end_date);
        });
        self.fetch_metrics().await
    }

    /// Run `fetch_metrics` on a background task
    pub fn spawn_fetch(&self) -> JoinHandle<FetchOutcome> {
        let workflow = self.clone();
        tokio::spawn(async move { workflow.fetch_metrics().await })
    }

    async fn run(&self) -> FetchOutcome {
        let start = self.store.update(|store| {
            if store.is_loading() {
                return Start::InFlight;
            }
            match store.date_range() {
                Ok(range) => {
                    store.begin_fetch();
                    Start::Loading(range)
                }
                Err(err) => {
                    store.reject(&err);
                    Start::Rejected(err)
                }
            }
        });

        let range = match start {
            Start::InFlight => {
                tracing::debug!("Fetch already in flight, ignoring trigger");
                return FetchOutcome::Skipped;
            }
            Start::Rejected(err) => {
                tracing::info!(reason = %err, "Date selection rejected");
                return FetchOutcome::Rejected(err);
            }
            Start::Loading(range) => range,
        };

        let mut loading = LoadingGuard::new(self.store.clone());
        let started = Instant::now();

        tracing::info!(
            start_date = %range.start_param(),
            end_date = %range.end_param(),
            "Fetching engagement metrics"
        );

        let result = self
            .source
            .fetch_report(&range)
            .await
            .and_then(|report| WeeklyTable::from_report(&report).map_err(FetchError::from));

        match result {
            Ok(table) => {
                let weeks = table.week_labels.len();
                loading.settle(|store| store.commit(table));
                tracing::info!(
                    weeks,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Engagement metrics loaded"
                );
                FetchOutcome::Loaded { weeks }
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Error fetching engagement metrics"
                );
                let message = err.user_message();
                loading.settle(|store| store.fail(message));
                match err.status() {
                    Some(status) => FetchOutcome::HttpError { status },
                    None => FetchOutcome::Failed,
                }
            }
        }
    }
}
