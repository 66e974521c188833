//! Reference configuration validation.

use crate::schema::{CostTypeDef, EnergySourceDef, FactorDef, ReferenceConfig, Sector};
use nc_core::{Gas, YearSpan};
use std::collections::BTreeMap;

/// Latest reference configuration format understood by this crate.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Key '{key}' does not match id '{id}' in {context}")]
    IdMismatch {
        key: String,
        id: String,
        context: String,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Empty factor sequence for {gas} in energy source '{source_id}'")]
    EmptyFactorSequence { source_id: String, gas: Gas },

    #[error("Invalid year span: {start}..={end}")]
    InvalidYearSpan { start: i32, end: i32 },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_reference(config: &ReferenceConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    YearSpan::new(config.ef_start_year, config.ef_end_year).map_err(|_| {
        ValidationError::InvalidYearSpan {
            start: config.ef_start_year,
            end: config.ef_end_year,
        }
    })?;

    for (gas, value) in &config.gwp.values {
        check_non_negative(&format!("gwp.values.{gas}"), *value)?;
    }

    for (key, source) in &config.energy_sources {
        check_id(key, &source.id, "energy_sources")?;
        validate_energy_source(source)?;
    }

    for sector in Sector::ALL {
        for id in config.sector_energy_sources.get(sector) {
            check_known_source(config, id, &format!("sector_energy_sources.{sector}"))?;
        }
    }

    for (key, ty) in &config.transportation_types {
        check_id(key, &ty.id, "transportation_types")?;
        if ty.active && !ty.fuel_consumption.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("transportation_types.{key}.fuel_consumption"),
                value: format!("{} entries", ty.fuel_consumption.len()),
                reason: "active modes use no energy source".to_string(),
            });
        }
        for (source_id, fc) in &ty.fuel_consumption {
            let context = format!("transportation_types.{key}.fuel_consumption");
            check_known_source(config, source_id, &context)?;
            check_non_negative(&format!("{context}.{source_id}"), *fc)?;
        }
    }

    for (key, home) in &config.home_types {
        check_id(key, &home.id, "home_types")?;
        check_positive(&format!("home_types.{key}.size_m2"), home.size_m2)?;
    }

    for (key, code) in &config.building_energy_codes {
        check_id(key, &code.id, "building_energy_codes")?;
        for (home_id, eui) in &code.eui {
            if !config.home_types.contains_key(home_id) {
                return Err(ValidationError::MissingReference {
                    id: home_id.clone(),
                    context: format!("building_energy_codes.{key}.eui"),
                });
            }
            check_non_negative(&format!("building_energy_codes.{key}.eui.{home_id}"), *eui)?;
        }
    }

    validate_cost_types(&config.service_types, "service_types")?;
    validate_cost_types(&config.infrastructure_types, "infrastructure_types")?;

    Ok(())
}

fn validate_energy_source(source: &EnergySourceDef) -> Result<(), ValidationError> {
    if let Some(conv_val) = source.conv_val {
        check_positive(&format!("energy_sources.{}.conv_val", source.id), conv_val)?;
    }

    if source.conv_unit.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("energy_sources.{}.conv_unit", source.id),
            value: String::new(),
            reason: "must not be empty".to_string(),
        });
    }

    for (gas, factor) in &source.emissions_factors {
        if let FactorDef::Yearly(values) = factor {
            if values.is_empty() {
                return Err(ValidationError::EmptyFactorSequence {
                    source_id: source.id.clone(),
                    gas: *gas,
                });
            }
        }
        for value in factor.values() {
            check_non_negative(
                &format!("energy_sources.{}.emissions_factors.{gas}", source.id),
                *value,
            )?;
        }
    }

    Ok(())
}

fn validate_cost_types(
    types: &BTreeMap<String, CostTypeDef>,
    context: &str,
) -> Result<(), ValidationError> {
    for (key, ty) in types {
        check_id(key, &ty.id, context)?;
        check_non_negative(&format!("{context}.{key}.cap_cost_intensity"), ty.cap_cost_intensity)?;
        check_non_negative(
            &format!("{context}.{key}.maint_cost_intensity"),
            ty.maint_cost_intensity,
        )?;
    }
    Ok(())
}

fn check_id(key: &str, id: &str, context: &str) -> Result<(), ValidationError> {
    if key != id {
        return Err(ValidationError::IdMismatch {
            key: key.to_string(),
            id: id.to_string(),
            context: context.to_string(),
        });
    }
    Ok(())
}

fn check_known_source(
    config: &ReferenceConfig,
    id: &str,
    context: &str,
) -> Result<(), ValidationError> {
    if !config.energy_sources.contains_key(id) {
        return Err(ValidationError::MissingReference {
            id: id.to_string(),
            context: context.to_string(),
        });
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite and non-negative".to_string(),
        });
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite and positive".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GwpDef, SectorEnergySourcesDef, TransportationTypeDef};

    fn minimal() -> ReferenceConfig {
        let mut energy_sources = BTreeMap::new();
        energy_sources.insert(
            "natGas".to_string(),
            EnergySourceDef {
                id: "natGas".to_string(),
                name: "Natural Gas".to_string(),
                description: String::new(),
                abs_unit: "GJ/yr".to_string(),
                conv_unit: "GJ".to_string(),
                conv_val: None,
                emissions_factors: BTreeMap::from([(Gas::CO2, FactorDef::Constant(50.0))]),
                ef_unit: None,
                references: Vec::new(),
            },
        );
        ReferenceConfig {
            version: 1,
            ef_start_year: 2023,
            ef_end_year: 2050,
            gwp: GwpDef {
                name: "test".to_string(),
                references: Vec::new(),
                values: BTreeMap::from([(Gas::CH4, 25.0), (Gas::N2O, 298.0)]),
            },
            energy_sources,
            sector_energy_sources: SectorEnergySourcesDef {
                buildings: vec!["natGas".to_string()],
                transportation: Vec::new(),
            },
            transportation_types: BTreeMap::new(),
            home_types: BTreeMap::new(),
            building_energy_codes: BTreeMap::new(),
            service_types: BTreeMap::new(),
            infrastructure_types: BTreeMap::new(),
        }
    }

    #[test]
    fn minimal_config_is_valid() {
        assert_eq!(validate_reference(&minimal()), Ok(()));
    }

    #[test]
    fn rejects_future_version() {
        let mut config = minimal();
        config.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_reference(&config),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_inverted_year_span() {
        let mut config = minimal();
        config.ef_end_year = 2000;
        assert_eq!(
            validate_reference(&config),
            Err(ValidationError::InvalidYearSpan {
                start: 2023,
                end: 2000
            })
        );
    }

    #[test]
    fn rejects_empty_sequence() {
        let mut config = minimal();
        if let Some(src) = config.energy_sources.get_mut("natGas") {
            src.emissions_factors
                .insert(Gas::CH4, FactorDef::Yearly(Vec::new()));
        }
        assert!(matches!(
            validate_reference(&config),
            Err(ValidationError::EmptyFactorSequence { gas: Gas::CH4, .. })
        ));
    }

    #[test]
    fn rejects_non_positive_conv_val() {
        let mut config = minimal();
        if let Some(src) = config.energy_sources.get_mut("natGas") {
            src.conv_val = Some(0.0);
        }
        assert!(matches!(
            validate_reference(&config),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_dangling_sector_source() {
        let mut config = minimal();
        config
            .sector_energy_sources
            .transportation
            .push("unobtainium".to_string());
        assert!(matches!(
            validate_reference(&config),
            Err(ValidationError::MissingReference { id, .. }) if id == "unobtainium"
        ));
    }

    #[test]
    fn rejects_dangling_fuel_consumption_source() {
        let mut config = minimal();
        config.transportation_types.insert(
            "puv".to_string(),
            TransportationTypeDef {
                id: "puv".to_string(),
                name: "Car".to_string(),
                active: false,
                fuel_consumption: BTreeMap::from([("gasoline".to_string(), 214.0)]),
            },
        );
        assert!(matches!(
            validate_reference(&config),
            Err(ValidationError::MissingReference { id, .. }) if id == "gasoline"
        ));
    }

    #[test]
    fn rejects_key_id_mismatch() {
        let mut config = minimal();
        if let Some(src) = config.energy_sources.get_mut("natGas") {
            src.id = "gas".to_string();
        }
        assert!(matches!(
            validate_reference(&config),
            Err(ValidationError::IdMismatch { .. })
        ));
    }
}
