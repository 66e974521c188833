//! Unit conversion errors.

use thiserror::Error;

use crate::Dimension;

/// Result type for unit operations.
pub type UnitResult<T> = Result<T, UnitError>;

/// Errors raised while registering, resolving or converting units.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Symbol not present in the registry.
    #[error("Unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    /// Bare unit entered against a source that registered no such unit.
    #[error("Unit '{unit}' is not recognised for energy source '{source_id}'")]
    UnknownSourceUnit { source_id: String, unit: String },

    /// Both units exist but measure different things.
    #[error("Cannot convert '{from}' ({from_dim}) to '{to}' ({to_dim})")]
    IncompatibleDimensions {
        from: String,
        to: String,
        from_dim: Dimension,
        to_dim: Dimension,
    },

    /// A symbol would mean two different things.
    #[error("Ambiguous unit '{unit}': {reason}")]
    Ambiguous { unit: String, reason: String },

    /// Anchor factor must be finite and positive.
    #[error("Invalid conversion factor {value} for unit '{unit}'")]
    InvalidAnchor { unit: String, value: f64 },

    /// Quantity being converted is NaN or infinite.
    #[error("Non-finite quantity {value} in '{unit}'")]
    NonFinite { unit: String, value: f64 },

    /// Input text did not parse to a number + optional unit.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UnitError::UnknownSourceUnit {
            source_id: "diesel".into(),
            unit: "gal".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("diesel"));
        assert!(msg.contains("gal"));

        let err = UnitError::IncompatibleDimensions {
            from: "m".into(),
            to: "MJ".into(),
            from_dim: Dimension::Length,
            to_dim: Dimension::Energy,
        };
        assert!(err.to_string().contains("Length"));
    }
}
