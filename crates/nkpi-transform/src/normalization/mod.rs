//! Normalization stages applied before any reshaping.
//!
//! - **columns**: source column names onto canonical names
//! - **numeric**: string-encoded numbers onto `f64`
//! - **datetime**: month labels, dates and timestamps onto [`MonthKey`](nkpi_model::MonthKey)

pub mod columns;
pub mod datetime;
pub mod numeric;

pub use columns::rename_columns;
pub use datetime::{
    compose_month_key, month_key_for_value, parse_month_key, parse_timestamp,
    timestamp_for_value,
};
pub use numeric::{coerce_numeric, coerce_value};
