//! Declarative transform specifications.
//!
//! A dashboard panel is described by data, not code: which columns to
//! rename, where the month comes from, which columns hold values, and how
//! the chart is presented. Specs are usually loaded from TOML:
//!
//! ```toml
//! [rename]
//! "Month Year" = "Month-Year"
//!
//! [layout]
//! kind = "wide"
//! value_columns = ["new_entries", "existing_entries"]
//!
//! [display_names]
//! new_entries = "New Entries"
//!
//! [chart]
//! title = "Member Growth"
//! stacking = "stacked"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use nkpi_model::{
    ChartKind, ChartRequest, ColumnKind, MONTH_YEAR, MetricSeries, RawTable, SchemaDescriptor,
    Stacking, TYPE, VALUE, ValueFormat,
};

use crate::{Result, TransformError};

/// Where each row's month comes from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthSource {
    /// A single label column ("Jan 2024", ISO dates, timestamps).
    Label {
        #[serde(default = "default_month_column")]
        column: String,
    },
    /// Separate numeric year and month columns.
    Split {
        year_column: String,
        month_column: String,
    },
}

impl Default for MonthSource {
    fn default() -> Self {
        Self::Label {
            column: default_month_column(),
        }
    }
}

impl MonthSource {
    /// Columns consumed by the month; these are never numerically coerced.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Label { column } => vec![column.as_str()],
            Self::Split {
                year_column,
                month_column,
            } => vec![year_column.as_str(), month_column.as_str()],
        }
    }
}

fn default_month_column() -> String {
    MONTH_YEAR.to_string()
}

fn default_type_column() -> String {
    TYPE.to_string()
}

fn default_value_column() -> String {
    VALUE.to_string()
}

/// Shape of the source rows.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// One row per month, one column per series. An empty list means every
    /// column except the month columns.
    Wide {
        #[serde(default)]
        value_columns: Vec<String>,
    },
    /// Already long: one row per (month, series, value).
    Long {
        #[serde(default = "default_type_column")]
        type_column: String,
        #[serde(default = "default_value_column")]
        value_column: String,
    },
}

impl Default for Layout {
    fn default() -> Self {
        Self::Wide {
            value_columns: Vec::new(),
        }
    }
}

/// Chart presentation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub stacking: Stacking,
    pub format: ValueFormat,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: MONTH_YEAR.to_string(),
            y_label: VALUE.to_string(),
            kind: ChartKind::default(),
            stacking: Stacking::default(),
            format: ValueFormat::default(),
        }
    }
}

impl ChartSpec {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn build(&self, series: Vec<MetricSeries>) -> ChartRequest {
        ChartRequest {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            kind: self.kind,
            stacking: self.stacking,
            format: self.format,
            series,
        }
    }
}

/// Full description of one panel's transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformSpec {
    /// Source column name to canonical name.
    pub rename: BTreeMap<String, String>,
    pub month: MonthSource,
    pub layout: Layout,
    /// Value column (or long-form type) to series display name.
    pub display_names: BTreeMap<String, String>,
    pub chart: ChartSpec,
}

impl TransformSpec {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let spec: Self = toml::from_str(source)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| TransformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        match &self.month {
            MonthSource::Label { column } if column.trim().is_empty() => {
                return Err(TransformError::invalid("month column name is empty"));
            }
            MonthSource::Split {
                year_column,
                month_column,
            } if year_column == month_column => {
                return Err(TransformError::invalid(format!(
                    "year and month columns are both {year_column:?}"
                )));
            }
            _ => {}
        }
        match &self.layout {
            Layout::Long {
                type_column,
                value_column,
            } if type_column == value_column => Err(TransformError::invalid(format!(
                "type and value columns are both {type_column:?}"
            ))),
            Layout::Wide { value_columns } => {
                let months = self.month.columns();
                match value_columns.iter().find(|c| months.contains(&c.as_str())) {
                    Some(column) => Err(TransformError::invalid(format!(
                        "month column {column:?} cannot also be a value column"
                    ))),
                    None => Ok(()),
                }
            }
            Layout::Long { .. } => Ok(()),
        }
    }

    /// Value columns for a wide table, after renaming.
    pub fn value_columns(&self, table: &RawTable) -> Vec<String> {
        let months = self.month.columns();
        match &self.layout {
            Layout::Wide { value_columns } if !value_columns.is_empty() => value_columns.clone(),
            Layout::Wide { .. } => table
                .columns
                .iter()
                .filter(|c| !months.contains(&c.as_str()))
                .cloned()
                .collect(),
            Layout::Long { value_column, .. } => vec![value_column.clone()],
        }
    }

    /// Columns this spec depends on, checked once before transforming.
    pub fn schema(&self, table: &RawTable) -> SchemaDescriptor {
        let mut schema = SchemaDescriptor::new();
        for column in self.month.columns() {
            schema = schema.require(column, ColumnKind::Label);
        }
        match &self.layout {
            Layout::Wide { .. } => {
                for column in self.value_columns(table) {
                    schema = schema.optional(column, ColumnKind::Numeric);
                }
            }
            Layout::Long {
                type_column,
                value_column,
            } => {
                schema = schema
                    .require(type_column.as_str(), ColumnKind::Category)
                    .require(value_column.as_str(), ColumnKind::Numeric);
            }
        }
        schema
    }
}
