//! Fuel units: volumes or masses of a specific fuel, anchored to joules.

use crate::text::strip_per_year;

/// A fuel-specific unit such as litres of gasoline.
///
/// `symbol` is unique across the registry (`Lgasoline`); `bare` is what a
/// user types next to the value (`L`).
#[derive(Debug, Clone, PartialEq)]
pub struct FuelUnit {
    pub source_id: String,
    pub bare: String,
    pub symbol: String,
    pub joules_per_unit: f64,
}

impl FuelUnit {
    /// `abs_unit` is the source's display unit (`"L/yr"`); its per-year
    /// suffix is dropped to get the bare unit.
    pub fn new(
        source_id: impl Into<String>,
        abs_unit: &str,
        symbol: impl Into<String>,
        joules_per_unit: f64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            bare: strip_per_year(abs_unit).to_string(),
            symbol: symbol.into(),
            joules_per_unit,
        }
    }
}

/// Fuel economy in miles per (US) gallon to litres per 100 km.
pub fn mpg_to_l_per_100km(mpg: f64) -> f64 {
    235.22 / mpg
}
