//! Error type for the command-line front end.

use std::path::PathBuf;

/// Wraps the library errors so every command can return one type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calculation error: {0}")]
    Engine(String),

    #[error("Unit error: {0}")]
    Unit(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid scenario file {path}: {message}")]
    ScenarioParse { path: PathBuf, message: String },

    #[error("{failed} of {total} scenarios failed to evaluate")]
    BatchFailed { failed: usize, total: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<nc_config::LoadError> for AppError {
    fn from(err: nc_config::LoadError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<nc_engine::EngineError> for AppError {
    fn from(err: nc_engine::EngineError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<nc_engine::ConfigError> for AppError {
    fn from(err: nc_engine::ConfigError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<nc_engine::MissingFieldError> for AppError {
    fn from(err: nc_engine::MissingFieldError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<nc_units::UnitError> for AppError {
    fn from(err: nc_units::UnitError) -> Self {
        AppError::Unit(err.to_string())
    }
}

impl From<nc_core::CoreError> for AppError {
    fn from(err: nc_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
