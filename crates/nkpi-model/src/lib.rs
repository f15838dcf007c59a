//! Data model shared by the nKPI dashboard crates.
//!
//! - **table**: raw rows as they arrive from a query or a spreadsheet range
//! - **month**: canonical calendar-month identity used on every chart axis
//! - **series**: long-form records and chart-ready metric series
//! - **chart**: presentation metadata handed to the charting collaborator
//! - **schema**: expected-column descriptors checked once per transform
//! - **diagnostics**: reasons a row or cell was dropped

pub mod chart;
pub mod diagnostics;
pub mod error;
pub mod month;
pub mod schema;
pub mod series;
pub mod table;

pub use chart::{ChartKind, ChartPoint, ChartRequest, Stacking, ValueFormat};
pub use diagnostics::{DropReason, Dropped};
pub use error::{ModelError, Result};
pub use month::MonthKey;
pub use schema::{ColumnKind, ColumnSpec, SchemaCheck, SchemaDescriptor};
pub use series::{LongRecord, MetricSeries};
pub use table::{RawTable, RawValue, Row};

/// Canonical column holding the month label.
pub const MONTH_YEAR: &str = "Month-Year";
/// Canonical column holding a numeric value in long-form sources.
pub const VALUE: &str = "Value";
/// Canonical column holding the series name in long-form sources.
pub const TYPE: &str = "Type";
