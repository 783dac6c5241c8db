//! Dashboard State
//!
//! - **dashboard**: `MetricsStore`, the single owner of dashboard state,
//!   and its derived chart series
//! - **handle**: `StoreHandle`, the shared handle with explicit update boundaries

mod dashboard;
mod handle;

pub use dashboard::{DashboardSnapshot, MetricsStore, DEFAULT_RANGE_DAYS};
pub use handle::StoreHandle;
