//! Calculation session: the immutable reference data every call reads.

use nc_config::{
    BuildingEnergyCodeDef, CostTypeDef, EnergySourceDef, HomeTypeDef, ReferenceConfig, RegionDef,
    Sector, TransportationTypeDef, merge_region, validate_reference,
};
use nc_core::YearSpan;
use nc_units::{Dimension, FuelUnit, UnitRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, EngineResult};
use crate::registry::FactorRegistry;

/// Engine switches fixed for the life of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// When set, source lists containing a time-varying source produce a
    /// per-year series instead of a single-year result.
    pub track_time_variance: bool,
}

/// Reference configuration (region applied), unit registry and factor
/// registry for one calculation session.
///
/// Built once and shared read-only between calls and threads.
#[derive(Debug, Clone)]
pub struct CalcContext {
    config: ReferenceConfig,
    region: Option<String>,
    units: UnitRegistry,
    factors: FactorRegistry,
    options: EngineOptions,
}

impl CalcContext {
    pub fn new(
        reference: &ReferenceConfig,
        region: Option<&RegionDef>,
        options: EngineOptions,
    ) -> EngineResult<Self> {
        let config = match region {
            Some(region) => merge_region(reference, region)?,
            None => {
                validate_reference(reference)?;
                reference.clone()
            }
        };

        let units = build_units(&config)?;
        let factors = FactorRegistry::new(&config, &units)?;

        debug!(
            region = region.map(|r| r.name.as_str()).unwrap_or("<none>"),
            sources = config.energy_sources.len(),
            units = units.symbols().len(),
            track_time_variance = options.track_time_variance,
            "calculation context ready"
        );

        Ok(Self {
            region: region.map(|r| r.name.clone()),
            config,
            units,
            factors,
            options,
        })
    }

    pub fn config(&self) -> &ReferenceConfig {
        &self.config
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn factors(&self) -> &FactorRegistry {
        &self.factors
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn span(&self) -> YearSpan {
        self.factors.span()
    }

    pub fn source(&self, id: &str) -> Result<&EnergySourceDef, ConfigError> {
        self.config
            .energy_sources
            .get(id)
            .ok_or_else(|| ConfigError::UnknownSource {
                source_id: id.to_string(),
            })
    }

    /// Sources offered for a sector. Ids the session does not define are
    /// skipped.
    pub fn sector_sources(&self, sector: Sector) -> Vec<&EnergySourceDef> {
        self.config
            .sector_energy_sources
            .get(sector)
            .iter()
            .filter_map(|id| self.config.energy_sources.get(id))
            .collect()
    }

    pub fn transportation_type(&self, id: &str) -> Result<&TransportationTypeDef, ConfigError> {
        self.config
            .transportation_types
            .get(id)
            .ok_or_else(|| ConfigError::UnknownTransportationType { id: id.to_string() })
    }

    /// MJ per 100 vehicle-km for `source_id` in `type_id`.
    pub fn fuel_consumption(&self, type_id: &str, source_id: &str) -> Result<f64, ConfigError> {
        self.transportation_type(type_id)?
            .fuel_consumption
            .get(source_id)
            .copied()
            .ok_or_else(|| ConfigError::MissingFuelConsumption {
                transportation_type: type_id.to_string(),
                source_id: source_id.to_string(),
            })
    }

    pub fn home_type(&self, id: &str) -> Result<&HomeTypeDef, ConfigError> {
        self.config
            .home_types
            .get(id)
            .ok_or_else(|| ConfigError::UnknownHomeType { id: id.to_string() })
    }

    pub fn building_code(&self, id: &str) -> Result<&BuildingEnergyCodeDef, ConfigError> {
        self.config
            .building_energy_codes
            .get(id)
            .ok_or_else(|| ConfigError::UnknownBuildingCode { id: id.to_string() })
    }

    /// EUI in MJ/m²/yr that building code `code` sets for `home_type`.
    pub fn eui(&self, code: &str, home_type: &str) -> Result<f64, ConfigError> {
        self.building_code(code)?
            .eui
            .get(home_type)
            .copied()
            .ok_or_else(|| ConfigError::MissingEui {
                code: code.to_string(),
                home_type: home_type.to_string(),
            })
    }

    pub fn service_type(&self, id: &str) -> Result<&CostTypeDef, ConfigError> {
        self.config
            .service_types
            .get(id)
            .ok_or_else(|| ConfigError::UnknownServiceType { id: id.to_string() })
    }

    pub fn infrastructure_type(&self, id: &str) -> Result<&CostTypeDef, ConfigError> {
        self.config
            .infrastructure_types
            .get(id)
            .ok_or_else(|| ConfigError::UnknownInfrastructureType { id: id.to_string() })
    }
}

/// Builtin units plus one fuel unit per source. A source whose conversion
/// unit is a builtin energy unit and that gives no conversion value needs no
/// registration; every other source registers, so two sources claiming one
/// symbol with different anchors fail as ambiguous.
fn build_units(config: &ReferenceConfig) -> EngineResult<UnitRegistry> {
    let builtins = UnitRegistry::with_builtins();
    let mut units = builtins.clone();
    for source in config.energy_sources.values() {
        let builtin_energy = builtins
            .get(&source.conv_unit)
            .is_some_and(|def| def.dimension == Dimension::Energy);
        if builtin_energy && source.conv_val.is_none() {
            continue;
        }
        let conv_val = source.conv_val.ok_or_else(|| ConfigError::MissingConversion {
            source_id: source.id.clone(),
            unit: source.conv_unit.clone(),
        })?;
        units.register_fuel(&FuelUnit::new(
            source.id.as_str(),
            &source.abs_unit,
            source.conv_unit.as_str(),
            conv_val,
        ))?;
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use nc_units::UnitError;

    fn builtin() -> ReferenceConfig {
        ReferenceConfig::builtin().unwrap()
    }

    #[test]
    fn builtin_context_registers_fuel_units() {
        let ctx = CalcContext::new(&builtin(), None, EngineOptions::default()).unwrap();
        assert!(ctx.units().contains("Lgasoline"));
        assert!(ctx.units().contains("kgpropane"));
        assert_eq!(
            ctx.units().resolve_for_source("diesel", "L/yr").unwrap(),
            "Ldiesel"
        );
        assert_eq!(
            ctx.units().resolve_for_source("grid", "kWh/yr").unwrap(),
            "kWh"
        );
        assert!(ctx.region().is_none());
        assert!(!ctx.options().track_time_variance);
    }

    #[test]
    fn lookups_report_unknown_ids() {
        let ctx = CalcContext::new(&builtin(), None, EngineOptions::default()).unwrap();
        assert!(matches!(
            ctx.source("coal"),
            Err(ConfigError::UnknownSource { .. })
        ));
        assert!(matches!(
            ctx.transportation_type("boat"),
            Err(ConfigError::UnknownTransportationType { .. })
        ));
        assert!(matches!(
            ctx.fuel_consumption("puv", "woodWaste"),
            Err(ConfigError::MissingFuelConsumption { .. })
        ));
        assert!(matches!(
            ctx.eui("NECB_1", "castle"),
            Err(ConfigError::MissingEui { .. })
        ));
        assert_eq!(ctx.eui("NECB_1", "single").unwrap(), 563.0);
        assert_eq!(ctx.fuel_consumption("puv", "gasoline").unwrap(), 214.0);
    }

    #[test]
    fn fuel_without_conversion_value_is_rejected() {
        let mut config = builtin();
        if let Some(src) = config.energy_sources.get_mut("diesel") {
            src.conv_val = None;
        }
        let err = CalcContext::new(&config, None, EngineOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::MissingConversion { .. })
        ));
    }

    #[test]
    fn colliding_conversion_symbols_are_rejected() {
        let mut config = builtin();
        if let Some(src) = config.energy_sources.get_mut("ethanol") {
            src.conv_unit = "Lgasoline".to_string();
        }
        let err = CalcContext::new(&config, None, EngineOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::Unit(UnitError::Ambiguous { .. })));
    }

    #[test]
    fn shared_conversion_symbol_with_same_anchor_serves_both_sources() {
        let mut config = builtin();
        if let Some(src) = config.energy_sources.get_mut("ethanol") {
            src.conv_unit = "Lgasoline".to_string();
            src.conv_val = Some(35e6);
        }
        let ctx = CalcContext::new(&config, None, EngineOptions::default()).unwrap();
        assert_eq!(
            ctx.units().resolve_for_source("ethanol", "L/yr").unwrap(),
            "Lgasoline"
        );
        let mj = ctx
            .units()
            .convert_for_source("gasoline", 10.0, "L/yr", "MJ")
            .unwrap();
        assert!((mj - 350.0).abs() < 1e-9);
    }

    #[test]
    fn builtin_energy_unit_with_conflicting_value_is_rejected() {
        let mut config = builtin();
        if let Some(src) = config.energy_sources.get_mut("natGas") {
            src.conv_val = Some(1.0);
        }
        let err = CalcContext::new(&config, None, EngineOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::Unit(UnitError::Ambiguous { .. })));
    }

    #[test]
    fn sector_sources_follow_configured_order() {
        let ctx = CalcContext::new(&builtin(), None, EngineOptions::default()).unwrap();
        let ids: Vec<&str> = ctx
            .sector_sources(Sector::Transportation)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids[0], "grid");
        assert!(ids.contains(&"gasoline"));
        assert!(!ids.contains(&"woodWaste"));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: EngineOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, EngineOptions::default());
        let options: EngineOptions =
            serde_json::from_str(r#"{"track_time_variance": true}"#).unwrap();
        assert!(options.track_time_variance);
    }
}
