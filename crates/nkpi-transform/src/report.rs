//! Stage outputs and the per-transform drop report.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use nkpi_model::{DropReason, Dropped};

/// A stage result plus whatever the stage dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput<T> {
    pub value: T,
    pub dropped: Vec<Dropped>,
}

impl<T> StageOutput<T> {
    pub fn new(value: T, dropped: Vec<Dropped>) -> Self {
        Self { value, dropped }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StageSummary {
    pub stage: &'static str,
    pub output: usize,
    pub dropped: usize,
}

/// Everything a transform dropped, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TransformReport {
    pub input_rows: usize,
    pub stages: Vec<StageSummary>,
    pub dropped: Vec<Dropped>,
}

impl TransformReport {
    pub fn new(input_rows: usize) -> Self {
        Self {
            input_rows,
            ..Self::default()
        }
    }

    /// Record a stage and hand back its value.
    pub fn record<T>(
        &mut self,
        stage: &'static str,
        output: StageOutput<T>,
        len: impl Fn(&T) -> usize,
    ) -> T {
        let StageOutput { value, dropped } = output;
        let output_len = len(&value);
        debug!(stage, output = output_len, dropped = dropped.len(), "stage complete");
        for drop in &dropped {
            trace!(
                stage,
                row = ?drop.row,
                column = drop.column.as_deref().unwrap_or("-"),
                reason = %drop.reason,
                "dropped"
            );
        }
        self.stages.push(StageSummary {
            stage,
            output: output_len,
            dropped: dropped.len(),
        });
        self.dropped.extend(dropped);
        value
    }

    /// Record a table-level drop outside any stage.
    pub fn push(&mut self, dropped: Dropped) {
        trace!(
            column = dropped.column.as_deref().unwrap_or("-"),
            reason = %dropped.reason,
            "dropped"
        );
        self.dropped.push(dropped);
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    pub fn counts_by_reason(&self) -> BTreeMap<DropReason, usize> {
        let mut counts = BTreeMap::new();
        for drop in &self.dropped {
            *counts.entry(drop.reason).or_insert(0) += 1;
        }
        counts
    }

    pub fn missing_columns(&self) -> Vec<&str> {
        self.dropped
            .iter()
            .filter(|d| d.reason == DropReason::MissingColumn)
            .filter_map(|d| d.column.as_deref())
            .collect()
    }
}
