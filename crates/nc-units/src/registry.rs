//! Unit registry and conversion.
//!
//! Every unit is a symbol plus a factor to its dimension's anchor
//! (J for energy, m for length, m² for area). Conversion between two units
//! of the same dimension is `value * from.to_anchor / to.to_anchor`.

use std::collections::HashMap;
use std::fmt;

use nc_core::units::{self, Area, Energy, Length};
use uom::si::{area, energy, length};

use crate::error::{UnitError, UnitResult};
use crate::fuel::FuelUnit;
use crate::text::strip_per_year;

/// Physical dimension a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Anchor: joule
    Energy,
    /// Anchor: metre
    Length,
    /// Anchor: square metre
    Area,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Energy => write!(f, "Energy"),
            Self::Length => write!(f, "Length"),
            Self::Area => write!(f, "Area"),
        }
    }
}

/// A registered unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub symbol: String,
    pub dimension: Dimension,
    /// Amount of the anchor unit in one of this unit.
    pub to_anchor: f64,
}

impl UnitDef {
    pub fn energy(symbol: &str, one: Energy) -> Self {
        Self {
            symbol: symbol.to_string(),
            dimension: Dimension::Energy,
            to_anchor: units::in_joules(one),
        }
    }

    pub fn length(symbol: &str, one: Length) -> Self {
        Self {
            symbol: symbol.to_string(),
            dimension: Dimension::Length,
            to_anchor: units::in_meters(one),
        }
    }

    pub fn area(symbol: &str, one: Area) -> Self {
        Self {
            symbol: symbol.to_string(),
            dimension: Dimension::Area,
            to_anchor: units::in_square_meters(one),
        }
    }
}

fn builtin_units() -> Vec<UnitDef> {
    vec![
        UnitDef::energy("J", Energy::new::<energy::joule>(1.0)),
        UnitDef::energy("kJ", Energy::new::<energy::kilojoule>(1.0)),
        UnitDef::energy("MJ", Energy::new::<energy::megajoule>(1.0)),
        UnitDef::energy("GJ", Energy::new::<energy::gigajoule>(1.0)),
        UnitDef::energy("TJ", Energy::new::<energy::terajoule>(1.0)),
        UnitDef::energy("Wh", Energy::new::<energy::watt_hour>(1.0)),
        UnitDef::energy("kWh", Energy::new::<energy::kilowatt_hour>(1.0)),
        UnitDef::energy("MWh", Energy::new::<energy::megawatt_hour>(1.0)),
        UnitDef::energy("GWh", Energy::new::<energy::gigawatt_hour>(1.0)),
        UnitDef::length("mm", Length::new::<length::millimeter>(1.0)),
        UnitDef::length("cm", Length::new::<length::centimeter>(1.0)),
        UnitDef::length("m", Length::new::<length::meter>(1.0)),
        UnitDef::length("km", Length::new::<length::kilometer>(1.0)),
        UnitDef::length("in", Length::new::<length::inch>(1.0)),
        UnitDef::length("ft", Length::new::<length::foot>(1.0)),
        UnitDef::length("yd", Length::new::<length::yard>(1.0)),
        UnitDef::length("mi", Length::new::<length::mile>(1.0)),
        UnitDef::area("mm2", Area::new::<area::square_millimeter>(1.0)),
        UnitDef::area("cm2", Area::new::<area::square_centimeter>(1.0)),
        UnitDef::area("m2", Area::new::<area::square_meter>(1.0)),
        UnitDef::area("ha", Area::new::<area::hectare>(1.0)),
        UnitDef::area("km2", Area::new::<area::square_kilometer>(1.0)),
        UnitDef::area("in2", Area::new::<area::square_inch>(1.0)),
        UnitDef::area("ft2", Area::new::<area::square_foot>(1.0)),
        UnitDef::area("yd2", Area::new::<area::square_yard>(1.0)),
        UnitDef::area("mi2", Area::new::<area::square_mile>(1.0)),
        UnitDef::area("ac", Area::new::<area::acre>(1.0)),
    ]
}

/// Registered units, plus the bare units each energy source accepts.
///
/// Built once per calculation session and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: HashMap<String, UnitDef>,
    /// (source id, bare unit) -> registered symbol
    source_units: HashMap<(String, String), String>,
}

impl UnitRegistry {
    /// Empty registry. Most callers want [`UnitRegistry::with_builtins`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the energy, length and area units.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in builtin_units() {
            registry.units.insert(def.symbol.clone(), def);
        }
        registry
    }

    /// Register a unit. Re-registering an identical definition is a no-op;
    /// a conflicting one is [`UnitError::Ambiguous`].
    pub fn register(&mut self, def: UnitDef) -> UnitResult<()> {
        if !def.to_anchor.is_finite() || def.to_anchor <= 0.0 {
            return Err(UnitError::InvalidAnchor {
                unit: def.symbol,
                value: def.to_anchor,
            });
        }
        if let Some(existing) = self.units.get(&def.symbol) {
            if existing.dimension == def.dimension && existing.to_anchor == def.to_anchor {
                return Ok(());
            }
            return Err(UnitError::Ambiguous {
                reason: format!(
                    "already registered as {} with factor {}",
                    existing.dimension, existing.to_anchor
                ),
                unit: def.symbol,
            });
        }
        self.units.insert(def.symbol.clone(), def);
        Ok(())
    }

    /// Register a source's fuel unit under its own symbol and under the
    /// (source id, bare unit) pair used when entering absolute quantities.
    pub fn register_fuel(&mut self, fuel: &FuelUnit) -> UnitResult<()> {
        if fuel.bare != fuel.symbol {
            if let Some(existing) = self.units.get(&fuel.bare) {
                return Err(UnitError::Ambiguous {
                    unit: fuel.bare.clone(),
                    reason: format!(
                        "source '{}' uses it for fuel unit '{}', but it already names a {} unit",
                        fuel.source_id, fuel.symbol, existing.dimension
                    ),
                });
            }
        }

        self.register(UnitDef {
            symbol: fuel.symbol.clone(),
            dimension: Dimension::Energy,
            to_anchor: fuel.joules_per_unit,
        })?;
        self.source_units.insert(
            (fuel.source_id.clone(), fuel.bare.clone()),
            fuel.symbol.clone(),
        );
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&UnitDef> {
        self.units.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.units.contains_key(symbol)
    }

    /// All registered symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.units.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    fn lookup(&self, symbol: &str) -> UnitResult<&UnitDef> {
        self.units.get(symbol).ok_or_else(|| UnitError::UnknownUnit {
            unit: symbol.to_string(),
        })
    }

    /// Convert `value` from `from` to `to`. Both must be registered symbols
    /// of the same dimension.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> UnitResult<f64> {
        if !value.is_finite() {
            return Err(UnitError::NonFinite {
                unit: from.to_string(),
                value,
            });
        }
        let from_def = self.lookup(from)?;
        let to_def = self.lookup(to)?;
        if from_def.dimension != to_def.dimension {
            return Err(UnitError::IncompatibleDimensions {
                from: from.to_string(),
                to: to.to_string(),
                from_dim: from_def.dimension,
                to_dim: to_def.dimension,
            });
        }
        if from_def.to_anchor == to_def.to_anchor {
            return Ok(value);
        }
        Ok(value * from_def.to_anchor / to_def.to_anchor)
    }

    /// Registered symbol for a unit entered against `source_id`.
    ///
    /// A trailing per-year suffix is ignored. A symbol known on its own wins;
    /// otherwise the source's own registration for that bare unit is used.
    pub fn resolve_for_source(&self, source_id: &str, unit: &str) -> UnitResult<&str> {
        let bare = strip_per_year(unit);
        if let Some(def) = self.units.get(bare) {
            return Ok(def.symbol.as_str());
        }
        self.source_units
            .get(&(source_id.to_string(), bare.to_string()))
            .map(String::as_str)
            .ok_or_else(|| UnitError::UnknownSourceUnit {
                source_id: source_id.to_string(),
                unit: bare.to_string(),
            })
    }

    /// Convert a quantity entered against `source_id` into `to`.
    pub fn convert_for_source(
        &self,
        source_id: &str,
        value: f64,
        unit: &str,
        to: &str,
    ) -> UnitResult<f64> {
        let from = self.resolve_for_source(source_id, unit)?;
        self.convert(value, from, strip_per_year(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn builtin_energy_conversions() {
        let reg = UnitRegistry::with_builtins();
        assert!(close(reg.convert(1.0, "kWh", "MJ").unwrap(), 3.6));
        assert!(close(reg.convert(2.5, "GJ", "MJ").unwrap(), 2500.0));
        assert!(close(reg.convert(1.0, "MWh", "GJ").unwrap(), 3.6));
    }

    #[test]
    fn builtin_length_and_area_conversions() {
        let reg = UnitRegistry::with_builtins();
        assert!(close(reg.convert(1.0, "km", "m").unwrap(), 1000.0));
        assert!(close(reg.convert(1.0, "mi", "km").unwrap(), 1.609_344));
        assert!(close(reg.convert(1.0, "ha", "m2").unwrap(), 10_000.0));
    }

    #[test]
    fn unknown_unit_is_error() {
        let reg = UnitRegistry::with_builtins();
        assert!(matches!(
            reg.convert(1.0, "L", "MJ"),
            Err(UnitError::UnknownUnit { unit }) if unit == "L"
        ));
    }

    #[test]
    fn cross_dimension_is_error() {
        let reg = UnitRegistry::with_builtins();
        assert!(matches!(
            reg.convert(1.0, "m2", "MJ"),
            Err(UnitError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn non_finite_quantity_is_error() {
        let reg = UnitRegistry::with_builtins();
        assert!(matches!(
            reg.convert(f64::INFINITY, "MJ", "GJ"),
            Err(UnitError::NonFinite { .. })
        ));
    }

    #[test]
    fn fuel_unit_resolves_for_its_source_only() {
        let mut reg = UnitRegistry::with_builtins();
        reg.register_fuel(&FuelUnit::new("diesel", "L/yr", "Ldiesel", 38.3e6))
            .unwrap();
        reg.register_fuel(&FuelUnit::new("gasoline", "L/yr", "Lgasoline", 35e6))
            .unwrap();

        assert_eq!(reg.resolve_for_source("diesel", "L/yr").unwrap(), "Ldiesel");
        assert_eq!(reg.resolve_for_source("gasoline", "L").unwrap(), "Lgasoline");
        assert!(matches!(
            reg.resolve_for_source("propane", "L"),
            Err(UnitError::UnknownSourceUnit { .. })
        ));

        let mj = reg.convert_for_source("diesel", 100.0, "L/yr", "MJ/yr").unwrap();
        assert!(close(mj, 3830.0));
    }

    #[test]
    fn builtin_symbol_wins_over_source_registration() {
        let reg = UnitRegistry::with_builtins();
        assert_eq!(reg.resolve_for_source("natGas", "GJ/yr").unwrap(), "GJ");
    }

    #[test]
    fn conflicting_registration_is_ambiguous() {
        let mut reg = UnitRegistry::with_builtins();
        reg.register_fuel(&FuelUnit::new("diesel", "L/yr", "Ldiesel", 38.3e6))
            .unwrap();
        // identical re-registration is fine
        reg.register_fuel(&FuelUnit::new("diesel", "L/yr", "Ldiesel", 38.3e6))
            .unwrap();

        let err = reg
            .register_fuel(&FuelUnit::new("biodiesel", "L/yr", "Ldiesel", 35.24e6))
            .unwrap_err();
        assert!(matches!(err, UnitError::Ambiguous { unit, .. } if unit == "Ldiesel"));

        // a bare unit that already means something else cannot be a fuel unit
        let err = reg
            .register_fuel(&FuelUnit::new("woodChips", "m/yr", "mwoodChips", 1e6))
            .unwrap_err();
        assert!(matches!(err, UnitError::Ambiguous { unit, .. } if unit == "m"));
    }

    #[test]
    fn invalid_anchor_rejected() {
        let mut reg = UnitRegistry::new();
        let err = reg
            .register(UnitDef {
                symbol: "Lx".into(),
                dimension: Dimension::Energy,
                to_anchor: 0.0,
            })
            .unwrap_err();
        assert!(matches!(err, UnitError::InvalidAnchor { .. }));
    }

    #[test]
    fn symbols_are_sorted() {
        let reg = UnitRegistry::with_builtins();
        let symbols = reg.symbols();
        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        assert_eq!(symbols, sorted);
        assert!(symbols.contains(&"kWh"));
    }
}
