//! Metric transform pipeline.
//!
//! Turns a [`RawTable`](nkpi_model::RawTable) into chart-ready series:
//!
//! - **normalization**: column renaming, numeric coercion, month parsing
//! - **frame**: month-indexed rows with coerced values, sorted chronologically
//! - **reshape**: wide-to-long melt, long-source intake, pivot, series grouping
//! - **filter**: the positive-value policy applied before charting
//! - **metrics**: session durations and new/existing/total entity counts
//! - **spec**: declarative transform specifications (TOML)
//! - **pipeline**: the end-to-end driver with drop reporting
//!
//! No stage fails on bad data. Rows and cells that cannot be used are dropped
//! and reported; the worst outcome is an empty chart.

pub mod error;
pub mod filter;
pub mod frame;
pub mod metrics;
pub mod normalization;
pub mod pipeline;
pub mod report;
pub mod reshape;
pub mod spec;

pub use error::{Result, TransformError};
pub use filter::filter_positive;
pub use frame::{MonthlyFrame, MonthlyRow, build_monthly_frame};
pub use pipeline::{TransformOutput, chart_from_frame, run};
pub use report::{StageOutput, StageSummary, TransformReport};
pub use reshape::{WideTable, group_series, melt, pivot, read_long};
pub use spec::{ChartSpec, Layout, MonthSource, TransformSpec};
