//! Years and the emissions-factor year span.

use std::ops::RangeInclusive;

use crate::{CoreError, CoreResult};

/// Calendar year. Always an integer; text input goes through [`parse_year`].
pub type Year = i32;

/// Earliest year a scenario or lookup may name.
pub const MIN_YEAR: Year = 1900;
/// Latest year a scenario or lookup may name.
pub const MAX_YEAR: Year = 2200;

/// `year` if it lies within [`MIN_YEAR`]..=[`MAX_YEAR`].
pub fn ensure_year(year: Year) -> CoreResult<Year> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(CoreError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}

/// Inclusive span of years covered by year-indexed emissions factors.
///
/// Index 0 of every factor sequence corresponds to `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearSpan {
    pub start: Year,
    pub end: Year,
}

impl YearSpan {
    pub fn new(start: Year, end: Year) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidYearSpan { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: Year) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Index into a sequence of `len` yearly values for `year`.
    ///
    /// Clamped to `[0, len - 1]`: years before `start` read the first value,
    /// years past the sequence plateau at the last one. `None` for `len == 0`.
    pub fn index_for(&self, year: Year, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let offset = i64::from(year) - i64::from(self.start);
        let last = (len - 1) as i64;
        Some(offset.clamp(0, last) as usize)
    }

    /// Years from `from` through `end`, never empty: a year past `end`
    /// yields just itself.
    pub fn years_from(&self, from: Year) -> RangeInclusive<Year> {
        from..=self.end.max(from)
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}

/// Parse a year from text, truncating fractional input (`"2030.6"` -> 2030).
/// The result must pass [`ensure_year`].
pub fn parse_year(text: &str) -> CoreResult<Year> {
    let trimmed = text.trim();
    if let Ok(y) = trimmed.parse::<Year>() {
        return ensure_year(y);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() < f64::from(Year::MAX) => ensure_year(v.trunc() as Year),
        _ => Err(CoreError::InvalidYear {
            text: trimmed.to_string(),
        }),
    }
}
