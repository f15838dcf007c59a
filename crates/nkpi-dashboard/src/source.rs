//! Where panel data comes from.
//!
//! A [`SourceRequest`] is either a fixed SQL query or a spreadsheet range.
//! Its text is the cache key: requests with different text never share a
//! cached table.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use nkpi_ingest::{A1Range, range_to_table};
use nkpi_model::RawTable;

use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRequest {
    /// A parameter-free query against the relational store.
    Query { sql: String },
    /// An A1-style range such as `Funding!A1:F40`.
    Range { range: String },
}

impl SourceRequest {
    pub fn query(sql: impl Into<String>) -> Self {
        Self::Query { sql: sql.into() }
    }

    pub fn range(range: impl Into<String>) -> Self {
        Self::Range {
            range: range.into(),
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            Self::Query { sql } => format!("query:{sql}"),
            Self::Range { range } => format!("range:{range}"),
        }
    }
}

impl fmt::Display for SourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

/// Anything that can turn a request into a table.
pub trait TableSource {
    fn fetch(&self, request: &SourceRequest) -> Result<RawTable>;
}

/// Tables registered up front, keyed by request.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: BTreeMap<String, RawTable>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, request: &SourceRequest, table: RawTable) {
        self.tables.insert(request.cache_key(), table);
    }

    pub fn with(mut self, request: &SourceRequest, table: RawTable) -> Self {
        self.insert(request, table);
        self
    }
}

impl TableSource for InMemorySource {
    fn fetch(&self, request: &SourceRequest) -> Result<RawTable> {
        let key = request.cache_key();
        self.tables
            .get(&key)
            .cloned()
            .ok_or_else(|| DashboardError::missing(key))
    }
}

/// Spreadsheet grids by sheet name, serving range requests.
///
/// A range without a sheet prefix reads the default sheet. Queries are not
/// supported.
#[derive(Debug, Clone, Default)]
pub struct SheetSource {
    default_sheet: Option<String>,
    sheets: BTreeMap<String, Vec<Vec<String>>>,
}

impl SheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet. The first sheet added becomes the default.
    pub fn add_sheet(&mut self, name: impl Into<String>, grid: Vec<Vec<String>>) {
        let name = name.into();
        if self.default_sheet.is_none() {
            self.default_sheet = Some(name.clone());
        }
        self.sheets.insert(name, grid);
    }
}

impl TableSource for SheetSource {
    fn fetch(&self, request: &SourceRequest) -> Result<RawTable> {
        let SourceRequest::Range { range } = request else {
            return Err(DashboardError::unsupported(request.cache_key()));
        };
        let range = A1Range::parse(range)?;
        let grid = self.grid(range.sheet.as_deref())?;
        let table = range_to_table(grid, &range)?;
        debug!(range = %range, rows = table.len(), "fetched sheet range");
        Ok(table)
    }
}
