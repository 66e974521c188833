//! Error types for the calculation engine.

use nc_config::ValidationError;
use nc_core::{CoreError, Gas};
use nc_units::UnitError;
use thiserror::Error;

use crate::resolver::SourceListMode;

/// Reference data the calculation needed but the session does not have.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown energy source: {source_id}")]
    UnknownSource { source_id: String },

    #[error("Energy source '{source_id}' declares no {gas} factor")]
    UndeclaredGas { source_id: String, gas: Gas },

    #[error("Energy source '{source_id}' has an empty {gas} factor sequence")]
    EmptyFactorSequence { source_id: String, gas: Gas },

    #[error("No GWP value for {gas}")]
    MissingGwp { gas: Gas },

    #[error("Energy source '{source_id}' uses '{unit}' but has no conversion value")]
    MissingConversion { source_id: String, unit: String },

    #[error("Unknown transportation type: {id}")]
    UnknownTransportationType { id: String },

    #[error("Transportation type '{transportation_type}' has no fuel consumption for '{source_id}'")]
    MissingFuelConsumption {
        transportation_type: String,
        source_id: String,
    },

    #[error("Unknown home type: {id}")]
    UnknownHomeType { id: String },

    #[error("Unknown building energy code: {id}")]
    UnknownBuildingCode { id: String },

    #[error("Building energy code '{code}' has no EUI for home type '{home_type}'")]
    MissingEui { code: String, home_type: String },

    #[error("Unknown service type: {id}")]
    UnknownServiceType { id: String },

    #[error("Unknown infrastructure type: {id}")]
    UnknownInfrastructureType { id: String },
}

/// A computed field the aggregator needs was never filled in.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Missing field '{field}' on {category}.{item}")]
pub struct MissingFieldError {
    pub category: String,
    pub item: String,
    pub field: &'static str,
}

impl MissingFieldError {
    pub fn new(category: impl Into<String>, item: impl Into<String>, field: &'static str) -> Self {
        Self {
            category: category.into(),
            item: item.into(),
            field,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    #[error("Invalid reference data: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {0}")]
    Input(#[from] CoreError),

    #[error("{operation} does not support {mode} source lists")]
    UnsupportedMode {
        operation: &'static str,
        mode: SourceListMode,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigError::UndeclaredGas {
            source_id: "grid".into(),
            gas: Gas::N2O,
        };
        let msg = err.to_string();
        assert!(msg.contains("grid"));
        assert!(msg.contains("N2O"));

        let err = MissingFieldError::new("buildings", "single", "energy_use");
        assert_eq!(err.to_string(), "Missing field 'energy_use' on buildings.single");
    }

    #[test]
    fn error_conversion() {
        let err: EngineError = ConfigError::UnknownSource {
            source_id: "coal".into(),
        }
        .into();
        assert!(matches!(err, EngineError::Config(_)));

        let err: EngineError = UnitError::UnknownUnit { unit: "bbl".into() }.into();
        assert!(matches!(err, EngineError::Unit(_)));

        let err = EngineError::UnsupportedMode {
            operation: "transport energy",
            mode: SourceListMode::Abs,
        };
        assert!(err.to_string().contains("abs"));
    }
}
