//! Chart presentation metadata.
//!
//! A [`ChartRequest`] is built fresh for every render and handed to the
//! charting collaborator. It never outlives the render.

use crate::{MetricSeries, MonthKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stacking {
    #[default]
    Stacked,
    Grouped,
}

/// How values are labelled on bars and points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    #[default]
    Integer,
    Currency,
    Percentage,
}

impl ValueFormat {
    /// Text label for a value.
    ///
    /// ```
    /// use nkpi_model::ValueFormat;
    ///
    /// assert_eq!(ValueFormat::Integer.label(1234.4), "1,234");
    /// assert_eq!(ValueFormat::Currency.label(1234.5), "$1,234.50");
    /// assert_eq!(ValueFormat::Percentage.label(0.45), "45.0%");
    /// ```
    pub fn label(self, value: f64) -> String {
        match self {
            Self::Integer => group_thousands(&format!("{:.0}", value)),
            Self::Currency => {
                let formatted = group_thousands(&format!("{:.2}", value.abs()));
                if value < 0.0 {
                    format!("-${formatted}")
                } else {
                    format!("${formatted}")
                }
            }
            Self::Percentage => format!("{:.1}%", value * 100.0),
        }
    }
}

/// Insert `,` separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// One labelled point, in display form.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartPoint {
    pub month: MonthKey,
    pub label: String,
    pub series: String,
    pub value: f64,
    pub value_label: String,
}

/// Series plus presentation metadata for one chart.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartRequest {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub stacking: Stacking,
    pub format: ValueFormat,
    pub series: Vec<MetricSeries>,
}

impl ChartRequest {
    pub fn new(title: impl Into<String>, series: Vec<MetricSeries>) -> Self {
        Self {
            title: title.into(),
            x_label: crate::MONTH_YEAR.to_string(),
            y_label: crate::VALUE.to_string(),
            kind: ChartKind::default(),
            stacking: Stacking::default(),
            format: ValueFormat::default(),
            series,
        }
    }

    /// True when there is nothing to draw; callers show "no data available".
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(MetricSeries::is_empty)
    }

    /// Distinct months across all series, chronologically.
    pub fn months(&self) -> Vec<MonthKey> {
        let mut months: Vec<MonthKey> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(m, _)| *m))
            .collect();
        months.sort();
        months.dedup();
        months
    }

    /// All points in month order, then series order.
    ///
    /// This is the only place a month is turned into its display label.
    pub fn points(&self) -> Vec<ChartPoint> {
        let mut indexed: Vec<(MonthKey, usize, &str, f64)> = self
            .series
            .iter()
            .enumerate()
            .flat_map(|(idx, s)| s.points.iter().map(move |(m, v)| (*m, idx, s.name.as_str(), *v)))
            .collect();
        indexed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        indexed
            .into_iter()
            .map(|(month, _, series, value)| ChartPoint {
                month,
                label: month.label(),
                series: series.to_string(),
                value,
                value_label: self.format.label(value),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(m: u32) -> MonthKey {
        MonthKey::new(2024, m).unwrap()
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567.89"), "1,234,567.89");
        assert_eq!(group_thousands("-12345"), "-12,345");
    }

    #[test]
    fn currency_keeps_sign_outside_symbol() {
        assert_eq!(ValueFormat::Currency.label(-5.0), "-$5.00");
    }

    #[test]
    fn points_are_sorted_by_month_then_series() {
        let mut new = MetricSeries::new("New");
        new.push(month(2), 3.0);
        new.push(month(1), 2.0);
        let mut existing = MetricSeries::new("Existing");
        existing.push(month(1), 4.0);
        let chart = ChartRequest::new("Growth", vec![new, existing]);

        let rows: Vec<(String, String)> = chart
            .points()
            .into_iter()
            .map(|p| (p.label, p.series))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Jan 2024".to_string(), "New".to_string()),
                ("Jan 2024".to_string(), "Existing".to_string()),
                ("Feb 2024".to_string(), "New".to_string()),
            ]
        );
        assert_eq!(chart.months(), vec![month(1), month(2)]);
    }

    #[test]
    fn empty_when_no_points() {
        let chart = ChartRequest::new("Empty", vec![MetricSeries::new("A")]);
        assert!(chart.is_empty());
        assert!(ChartRequest::new("None", Vec::new()).is_empty());
    }
}
