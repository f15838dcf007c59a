//! A1-style spreadsheet ranges.
//!
//! Accepts `A1:Z99`, `Sheet1!A1:Z99`, `'My Sheet'!$A$1:$C$10` and single
//! cells such as `B2`. Rows and columns are stored zero-based.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use nkpi_model::RawTable;

use crate::csv_table::grid_to_table;
use crate::{IngestError, Result};

/// A zero-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    fn parse(reference: &str, cell: &str) -> Result<Self> {
        let cell = cell.replace('$', "");
        let split = cell
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| IngestError::invalid_range(reference, "cell has no row number"))?;
        let (letters, digits) = cell.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(IngestError::invalid_range(
                reference,
                "cell has no column letters",
            ));
        }
        let row: usize = digits
            .parse()
            .map_err(|_| IngestError::invalid_range(reference, "row is not a number"))?;
        if row == 0 {
            return Err(IngestError::invalid_range(reference, "rows start at 1"));
        }
        let mut column = 0usize;
        for ch in letters.chars() {
            let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            column = column
                .checked_mul(26)
                .and_then(|c| c.checked_add(digit))
                .ok_or_else(|| IngestError::invalid_range(reference, "column out of range"))?;
        }
        Ok(Self {
            row: row - 1,
            column: column - 1,
        })
    }

    fn column_letters(self) -> String {
        let mut n = self.column + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row + 1)
    }
}

/// A rectangular range, corners inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: Option<String>,
    pub start: CellRef,
    pub end: CellRef,
}

impl A1Range {
    pub fn parse(reference: &str) -> Result<Self> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(IngestError::invalid_range(reference, "empty reference"));
        }
        let (sheet, cells) = match trimmed.rsplit_once('!') {
            Some((sheet, cells)) => {
                let sheet = sheet.trim().trim_matches('\'');
                if sheet.is_empty() {
                    return Err(IngestError::invalid_range(reference, "empty sheet name"));
                }
                (Some(sheet.to_string()), cells)
            }
            None => (None, trimmed),
        };
        let (first, second) = match cells.split_once(':') {
            Some((first, second)) => (first, second),
            None => (cells, cells),
        };
        let a = CellRef::parse(reference, first.trim())?;
        let b = CellRef::parse(reference, second.trim())?;
        Ok(Self {
            sheet,
            start: CellRef {
                row: a.row.min(b.row),
                column: a.column.min(b.column),
            },
            end: CellRef {
                row: a.row.max(b.row),
                column: a.column.max(b.column),
            },
        })
    }

    pub fn rows(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn columns(&self) -> usize {
        self.end.column - self.start.column + 1
    }

    /// Cut this range out of a grid. Parts of the range beyond the grid are
    /// clipped; cells missing from short rows stay missing.
    pub fn slice(&self, grid: &[Vec<String>]) -> Result<Vec<Vec<String>>> {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        if self.start.row >= grid.len() || self.start.column >= width {
            return Err(IngestError::RangeOutOfBounds {
                range: self.to_string(),
                rows: grid.len(),
                columns: width,
            });
        }
        let row_end = (self.end.row + 1).min(grid.len());
        let sliced = grid[self.start.row..row_end]
            .iter()
            .map(|row| {
                let col_end = (self.end.column + 1).min(row.len());
                if self.start.column >= col_end {
                    Vec::new()
                } else {
                    row[self.start.column..col_end].to_vec()
                }
            })
            .collect();
        Ok(sliced)
    }
}

impl FromStr for A1Range {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write!(f, "{sheet}!")?;
        }
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Slice `range` out of `grid` and read it as a table with row 0 as header.
pub fn range_to_table(grid: &[Vec<String>], range: &A1Range) -> Result<RawTable> {
    let sliced = range.slice(grid)?;
    debug!(range = %range, rows = sliced.len(), "sliced spreadsheet range");
    Ok(grid_to_table(&sliced))
}
