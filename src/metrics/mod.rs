//! Engagement Metrics
//!
//! Pure data and transformation logic for the weekly engagement dashboard:
//!
//! - **types**: Core values (DateRange, WeekLabel, MetricRow, ChartPoint)
//! - **catalog**: The fixed metric order and chart series bindings
//! - **format**: Cell formatting and parsing
//! - **table**: Report → weekly table transformation
//! - **error**: Date validation errors
//!
//! # Data Flow
//!
//! ```text
//!   EngagementReport → WeeklyTable { week_labels, rows } → Vec<ChartPoint>
//! ```
//!
//! # Example
//!
//! ```rust
//! use weekpulse::metrics::{EngagementReport, WeeklyTable, WeekLabel};
//!
//! let report: EngagementReport = serde_json::from_str(
//!     r#"{"weeks": [{"week_label": "2024-01-01", "Stickiness(%)": 12.345}]}"#,
//! ).unwrap();
//!
//! let table = WeeklyTable::from_report(&report).unwrap();
//! let stickiness = &table.rows[3];
//! assert_eq!(stickiness.cell(&WeekLabel::from("2024-01-01")), Some("12.35%"));
//! ```

pub mod catalog;
pub mod error;
pub mod format;
pub mod table;
pub mod types;

pub use catalog::{MetricDefinition, METRICS, SERIES_BINDINGS};
pub use error::{ValidationError, ValidationResult};
pub use format::{format_cell, parse_cell};
pub use table::{EngagementReport, TableError, WeekRecord, WeeklyTable};
pub use types::{ChartPoint, DateRange, MetricRow, Series, WeekLabel, DATE_FORMAT};
