//! Producers of [`RawTable`](nkpi_model::RawTable) values.
//!
//! - **csv_table**: CSV exports read into a cell grid
//! - **range**: A1-style spreadsheet ranges sliced out of a grid
//! - **frame**: polars result frames converted cell by cell

pub mod csv_table;
pub mod error;
pub mod frame;
pub mod range;

pub use csv_table::{grid_to_table, read_csv_grid, read_csv_table};
pub use error::{IngestError, Result};
pub use frame::{any_to_raw, table_from_dataframe};
pub use range::{A1Range, CellRef, range_to_table};
