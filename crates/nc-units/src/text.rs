//! Text helpers for display units and value/unit strings.

use crate::error::{UnitError, UnitResult};

/// Per-year suffixes used on display units (English and French).
const PER_YEAR_SUFFIXES: [&str; 2] = ["/yr", "/an"];

/// Drop a trailing per-year suffix: `"kWh/yr"` -> `"kWh"`.
///
/// Conversion works on timeless quantities; annual rates convert the same way.
pub fn strip_per_year(units: &str) -> &str {
    let trimmed = units.trim();
    PER_YEAR_SUFFIXES
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .map(str::trim_end)
        .unwrap_or(trimmed)
}

/// Remove every occurrence of `strip` from `units`.
pub fn strip_units(units: &str, strip: &str) -> String {
    if strip.is_empty() {
        return units.to_string();
    }
    units.replace(strip, "")
}

/// Split a value+unit string into (numeric_value, unit_string).
///
/// Examples:
/// - "12 GJ/yr" -> (12.0, "GJ/yr")
/// - "1.5e3kWh" -> (1500.0, "kWh")
/// - "300" -> (300.0, "")
pub fn split_value_and_unit(input: &str) -> UnitResult<(f64, String)> {
    let trimmed = input.trim();

    let mut split_idx = trimmed.len();
    for (idx, c) in trimmed.char_indices() {
        let numeric = c.is_ascii_digit() || matches!(c, '.' | '-' | '+');
        // an exponent marker only counts when a digit or sign follows it
        let exponent = matches!(c, 'e' | 'E')
            && idx > 0
            && trimmed[idx + 1..]
                .chars()
                .next()
                .is_some_and(|n| n.is_ascii_digit() || n == '-' || n == '+');
        if !numeric && !exponent {
            split_idx = idx;
            break;
        }
    }

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let value: f64 = num_part.trim().parse().map_err(|_| {
        UnitError::Parse(format!("Could not parse numeric value from '{}'", input))
    })?;

    Ok((value, unit_part.trim().to_string()))
}
