//! Positive-value policy.
//!
//! Only strictly positive values are charted. Zero, negative and unusable
//! values are removed here and reported, never shown as gaps or zeros.

use nkpi_model::{DropReason, Dropped, LongRecord};

use crate::report::StageOutput;

/// Keep records whose value is a number greater than zero.
///
/// Records that failed coercion upstream are reported with their original
/// reason. Applying the filter twice gives the same records as once.
pub fn filter_positive(records: Vec<LongRecord>) -> StageOutput<Vec<LongRecord>> {
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();
    for record in records {
        match record.value {
            Ok(value) if value > 0.0 => kept.push(record),
            Ok(_) => dropped.push(Dropped::cell(
                record.row,
                record.series,
                DropReason::NonPositive,
            )),
            Err(reason) => dropped.push(Dropped::cell(record.row, record.series, reason)),
        }
    }
    StageOutput::new(kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nkpi_model::MonthKey;

    #[test]
    fn drops_zero_negative_and_failed_values() {
        let jan = MonthKey::new(2024, 1).unwrap();
        let records = vec![
            LongRecord::new(0, jan, "A", Ok(3.0)),
            LongRecord::new(1, jan, "A", Ok(0.0)),
            LongRecord::new(2, jan, "A", Ok(-1.5)),
            LongRecord::new(3, jan, "A", Err(DropReason::MissingValue)),
            LongRecord::new(4, jan, "A", Ok(0.01)),
        ];
        let out = filter_positive(records);
        let rows: Vec<usize> = out.value.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0, 4]);
        let reasons: Vec<DropReason> = out.dropped.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![
                DropReason::NonPositive,
                DropReason::NonPositive,
                DropReason::MissingValue
            ]
        );
    }
}
