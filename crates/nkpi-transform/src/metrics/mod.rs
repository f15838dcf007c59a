//! Derived monthly metrics.
//!
//! - **sessions**: average session duration per month
//! - **entities**: new / existing / total entity counts per month
//!
//! Both read their inputs from a [`RawTable`](nkpi_model::RawTable) with the
//! same drop-and-report policy as the rest of the pipeline, and both convert
//! their results into a [`MonthlyFrame`](crate::MonthlyFrame) for charting.

mod entities;
mod sessions;

use nkpi_model::{DropReason, RawValue};

pub use entities::{
    ENTITY_DISPLAY_NAMES, EntityRecord, MonthlyEntityCounts, entity_counts, entity_counts_frame,
    entity_display_names, entity_rows_from_table,
};
pub use sessions::{
    MonthlySessionDuration, SESSION_DISPLAY_NAMES, SessionEvent, average_session_duration,
    session_display_names, session_events_from_table, sessions_frame,
};

/// Present cell or the reason it cannot be used.
fn present(value: Option<&RawValue>) -> Result<&RawValue, DropReason> {
    match value {
        None => Err(DropReason::RaggedRow),
        Some(RawValue::Null) => Err(DropReason::MissingValue),
        Some(value) => Ok(value),
    }
}

fn display_map(pairs: &[(&str, &str)]) -> std::collections::BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
