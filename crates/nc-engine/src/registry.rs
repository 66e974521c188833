//! Emissions factor lookup by source, gas and year.

use std::collections::{BTreeMap, HashMap};

use nc_config::{FactorDef, ReferenceConfig};
use nc_core::{Gas, Year, YearSpan};
use nc_units::{UnitRegistry, UnitResult};

use crate::error::ConfigError;

const FACTOR_BASE_UNIT: &str = "MJ";

/// One gas's factor for one source, in g per MJ.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorSeries {
    Constant(f64),
    /// Index 0 is the first year of the registry span.
    Yearly(Vec<f64>),
}

impl FactorSeries {
    fn from_def(def: &FactorDef, divisor: f64) -> Self {
        match def {
            FactorDef::Constant(v) => FactorSeries::Constant(v / divisor),
            FactorDef::Yearly(vs) => FactorSeries::Yearly(vs.iter().map(|v| v / divisor).collect()),
        }
    }

    /// Value for `year`, with the year index clamped to the sequence.
    /// `None` only for an empty sequence.
    pub fn at(&self, span: &YearSpan, year: Year) -> Option<f64> {
        match self {
            FactorSeries::Constant(v) => Some(*v),
            FactorSeries::Yearly(vs) => span
                .index_for(year, vs.len())
                .and_then(|i| vs.get(i).copied()),
        }
    }

    pub fn is_yearly(&self) -> bool {
        matches!(self, FactorSeries::Yearly(_))
    }
}

#[derive(Debug, Clone)]
struct SourceFactors {
    factors: BTreeMap<Gas, FactorSeries>,
}

/// Emissions factors for every energy source of a session, normalised to
/// g/MJ at construction.
#[derive(Debug, Clone)]
pub struct FactorRegistry {
    span: YearSpan,
    gwp: BTreeMap<Gas, f64>,
    sources: HashMap<String, SourceFactors>,
}

impl FactorRegistry {
    /// Build from a validated reference configuration. `units` must already
    /// know every `ef_unit` the sources use.
    pub fn new(config: &ReferenceConfig, units: &UnitRegistry) -> UnitResult<Self> {
        let span = YearSpan {
            start: config.ef_start_year,
            end: config.ef_end_year,
        };

        let mut sources = HashMap::with_capacity(config.energy_sources.len());
        for (id, source) in &config.energy_sources {
            let divisor = match source.ef_unit.as_deref() {
                None | Some(FACTOR_BASE_UNIT) => 1.0,
                Some(unit) => units.convert(1.0, unit, FACTOR_BASE_UNIT)?,
            };
            let factors = source
                .emissions_factors
                .iter()
                .map(|(gas, def)| (*gas, FactorSeries::from_def(def, divisor)))
                .collect();
            sources.insert(id.clone(), SourceFactors { factors });
        }

        Ok(Self {
            span,
            gwp: config.gwp.values.clone(),
            sources,
        })
    }

    fn source(&self, source_id: &str) -> Result<&SourceFactors, ConfigError> {
        self.sources
            .get(source_id)
            .ok_or_else(|| ConfigError::UnknownSource {
                source_id: source_id.to_string(),
            })
    }

    /// Factor in g/MJ for `gas` from `source_id` in `year`.
    pub fn factor(&self, source_id: &str, gas: Gas, year: Year) -> Result<f64, ConfigError> {
        let series = self
            .source(source_id)?
            .factors
            .get(&gas)
            .ok_or_else(|| ConfigError::UndeclaredGas {
                source_id: source_id.to_string(),
                gas,
            })?;
        series
            .at(&self.span, year)
            .ok_or_else(|| ConfigError::EmptyFactorSequence {
                source_id: source_id.to_string(),
                gas,
            })
    }

    /// Global warming potential; CO2 is always 1.
    pub fn gwp(&self, gas: Gas) -> Result<f64, ConfigError> {
        if gas.is_reference() {
            return Ok(1.0);
        }
        self.gwp
            .get(&gas)
            .copied()
            .ok_or(ConfigError::MissingGwp { gas })
    }

    /// Whether the source's CO2 factor changes from year to year.
    pub fn is_time_varying(&self, source_id: &str) -> Result<bool, ConfigError> {
        Ok(self
            .source(source_id)?
            .factors
            .get(&Gas::CO2)
            .is_some_and(FactorSeries::is_yearly))
    }

    /// Gases the source declares a factor for, in reporting order.
    pub fn gases(&self, source_id: &str) -> Result<Vec<Gas>, ConfigError> {
        Ok(self.source(source_id)?.factors.keys().copied().collect())
    }

    pub fn span(&self) -> YearSpan {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FactorRegistry {
        let config = ReferenceConfig::builtin().unwrap();
        FactorRegistry::new(&config, &UnitRegistry::with_builtins()).unwrap()
    }

    #[test]
    fn constant_factor_is_used_directly() {
        let reg = registry();
        assert_eq!(reg.factor("natGas", Gas::CO2, 2023).unwrap(), 50.0);
        assert_eq!(reg.factor("natGas", Gas::CO2, 1990).unwrap(), 50.0);
        assert_eq!(reg.factor("natGas", Gas::CO2, 2100).unwrap(), 50.0);
    }

    #[test]
    fn kwh_factors_are_normalised_to_mj() {
        let reg = registry();
        let f = reg.factor("grid", Gas::CO2, 2023).unwrap();
        assert!((f - 29.2 / 3.6).abs() < 1e-12);
    }

    #[test]
    fn yearly_factor_clamps_at_both_ends() {
        let reg = registry();
        let first = reg.factor("grid", Gas::CO2, 2023).unwrap();
        let last = reg.factor("grid", Gas::CO2, 2051).unwrap();
        assert_eq!(reg.factor("grid", Gas::CO2, 2000).unwrap(), first);
        assert_eq!(reg.factor("grid", Gas::CO2, 2050).unwrap(), last);
        assert_eq!(reg.factor("grid", Gas::CO2, 2075).unwrap(), last);
        assert!((last - 37.4 / 3.6).abs() < 1e-12);
    }

    #[test]
    fn short_sequence_plateaus_at_last_value() {
        let mut config = ReferenceConfig::builtin().unwrap();
        if let Some(src) = config.energy_sources.get_mut("natGas") {
            src.emissions_factors
                .insert(Gas::CO2, FactorDef::Yearly(vec![50.0, 40.0, 30.0]));
        }
        let reg = FactorRegistry::new(&config, &UnitRegistry::with_builtins()).unwrap();
        assert_eq!(reg.factor("natGas", Gas::CO2, 2024).unwrap(), 40.0);
        assert_eq!(reg.factor("natGas", Gas::CO2, 2025).unwrap(), 30.0);
        assert_eq!(reg.factor("natGas", Gas::CO2, 2040).unwrap(), 30.0);
    }

    #[test]
    fn empty_sequence_is_an_error_not_zero() {
        let mut config = ReferenceConfig::builtin().unwrap();
        if let Some(src) = config.energy_sources.get_mut("natGas") {
            src.emissions_factors.insert(Gas::CO2, FactorDef::Yearly(vec![]));
        }
        let reg = FactorRegistry::new(&config, &UnitRegistry::with_builtins()).unwrap();
        assert_eq!(
            reg.factor("natGas", Gas::CO2, 2030),
            Err(ConfigError::EmptyFactorSequence {
                source_id: "natGas".into(),
                gas: Gas::CO2
            })
        );
        assert_eq!(reg.factor("natGas", Gas::CH4, 2030).unwrap(), 0.001);
    }

    #[test]
    fn unknown_source_and_gas_are_errors() {
        let reg = registry();
        assert!(matches!(
            reg.factor("coal", Gas::CO2, 2023),
            Err(ConfigError::UnknownSource { .. })
        ));

        let mut config = ReferenceConfig::builtin().unwrap();
        if let Some(src) = config.energy_sources.get_mut("hydrogen") {
            src.emissions_factors.remove(&Gas::N2O);
        }
        let reg = FactorRegistry::new(&config, &UnitRegistry::with_builtins()).unwrap();
        assert_eq!(
            reg.factor("hydrogen", Gas::N2O, 2023),
            Err(ConfigError::UndeclaredGas {
                source_id: "hydrogen".into(),
                gas: Gas::N2O
            })
        );
        assert_eq!(reg.gases("hydrogen").unwrap(), vec![Gas::CO2, Gas::CH4]);
    }

    #[test]
    fn gwp_lookup() {
        let reg = registry();
        assert_eq!(reg.gwp(Gas::CO2).unwrap(), 1.0);
        assert_eq!(reg.gwp(Gas::CH4).unwrap(), 25.0);
        assert_eq!(reg.gwp(Gas::N2O).unwrap(), 298.0);
    }

    #[test]
    fn only_grid_varies_over_time() {
        let reg = registry();
        assert!(reg.is_time_varying("grid").unwrap());
        assert!(!reg.is_time_varying("diesel").unwrap());
        assert_eq!(reg.span(), YearSpan { start: 2023, end: 2050 });
    }
}
