//! Drop diagnostics.
//!
//! No pipeline stage fails on a single bad row. Instead each stage reports
//! what it dropped and why, so callers can log or summarize the losses.

use std::fmt;

/// Why a row or cell did not make it into the output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// An expected column is absent from the whole table.
    MissingColumn,
    /// The column exists but this row has no cell for it.
    RaggedRow,
    /// The cell is null or blank.
    MissingValue,
    /// The cell could not be read as a number.
    NonNumeric,
    /// The value is zero or negative.
    NonPositive,
    /// The month label could not be read as a calendar month.
    UnparsableDate,
    /// A timestamp cell could not be read.
    UnparsableTimestamp,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingColumn => "missing column",
            Self::RaggedRow => "ragged row",
            Self::MissingValue => "missing value",
            Self::NonNumeric => "non-numeric",
            Self::NonPositive => "non-positive",
            Self::UnparsableDate => "unparsable date",
            Self::UnparsableTimestamp => "unparsable timestamp",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dropped row or cell.
///
/// `row` is the index into the source table; it is `None` for table-level
/// drops such as a missing column.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dropped {
    pub row: Option<usize>,
    pub column: Option<String>,
    pub reason: DropReason,
}

impl Dropped {
    pub fn cell(row: usize, column: impl Into<String>, reason: DropReason) -> Self {
        Self {
            row: Some(row),
            column: Some(column.into()),
            reason,
        }
    }

    pub fn column(column: impl Into<String>) -> Self {
        Self {
            row: None,
            column: Some(column.into()),
            reason: DropReason::MissingColumn,
        }
    }
}
