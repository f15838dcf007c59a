//! Numeric coercion.
//!
//! Rules, in order: trim, strip one leading `$`, strip thousands commas,
//! blank means missing, a trailing `%` divides by 100. Anything else that
//! does not parse is missing; nothing here panics or errors.

use nkpi_model::{DropReason, RawValue};

/// Parse a string-encoded number.
///
/// ```
/// use nkpi_transform::normalization::coerce_numeric;
///
/// assert_eq!(coerce_numeric("$1,234"), Some(1234.0));
/// assert_eq!(coerce_numeric("45%"), Some(0.45));
/// assert_eq!(coerce_numeric(""), None);
/// assert_eq!(coerce_numeric("abc"), None);
/// ```
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unprefixed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = unprefixed.chars().filter(|ch| *ch != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    let (digits, divisor) = match cleaned.strip_suffix('%') {
        Some(rest) => (rest.trim_end(), 100.0),
        None => (cleaned, 1.0),
    };
    let parsed = digits.parse::<f64>().ok()?;
    parsed.is_finite().then(|| parsed / divisor)
}

/// Coerce one cell, reporting why it is unusable.
pub fn coerce_value(value: &RawValue) -> Result<f64, DropReason> {
    match value {
        RawValue::Null => Err(DropReason::MissingValue),
        RawValue::Number(n) if n.is_finite() => Ok(*n),
        RawValue::Number(_) => Err(DropReason::NonNumeric),
        RawValue::Text(s) if s.trim().is_empty() => Err(DropReason::MissingValue),
        RawValue::Text(s) => coerce_numeric(s).ok_or(DropReason::NonNumeric),
    }
}
