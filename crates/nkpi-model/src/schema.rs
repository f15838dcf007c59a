//! Expected-column descriptors.
//!
//! Each transform declares the columns it depends on up front and checks the
//! table once, instead of probing cells for column presence as it goes.

use crate::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Month label; never numerically coerced.
    Label,
    /// Series name in long-form sources.
    Category,
    Numeric,
    Timestamp,
    Identifier,
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    /// Required columns make the whole transform empty when absent.
    pub required: bool,
}

/// Ordered list of expected columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchemaDescriptor {
    pub columns: Vec<ColumnSpec>,
}

impl SchemaDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required column.
    #[must_use]
    pub fn require(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Add an optional column.
    #[must_use]
    pub fn optional(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    pub fn names_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| c.name.as_str())
    }

    pub fn check(&self, table: &RawTable) -> SchemaCheck {
        let missing = self
            .columns
            .iter()
            .filter(|spec| !table.has_column(&spec.name))
            .cloned()
            .collect();
        SchemaCheck { missing }
    }
}

/// Result of checking a table against a [`SchemaDescriptor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCheck {
    pub missing: Vec<ColumnSpec>,
}

impl SchemaCheck {
    /// True when every required column is present.
    pub fn is_satisfied(&self) -> bool {
        !self.missing.iter().any(|spec| spec.required)
    }

    pub fn is_missing(&self, name: &str) -> bool {
        self.missing.iter().any(|spec| spec.name == name)
    }

    pub fn missing_names(&self) -> Vec<&str> {
        self.missing.iter().map(|spec| spec.name.as_str()).collect()
    }
}
