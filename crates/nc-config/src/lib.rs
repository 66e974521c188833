//! nc-config: reference configuration for the neighbourhood calculator.
//!
//! The reference configuration holds the energy sources and their emissions
//! factors, the GWP table, transportation fuel-consumption profiles, home
//! types, building energy codes and cost intensities. A built-in copy is
//! embedded in the crate; regional tables override parts of it.

pub mod merge;
pub mod schema;
pub mod validate;

pub use merge::merge_region;
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_reference};

use std::path::Path;

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown region: {id}")]
    UnknownRegion { id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const BUILTIN_REFERENCE: &str = include_str!("../defaults/reference.yaml");

impl ReferenceConfig {
    /// The reference configuration shipped with the crate.
    pub fn builtin() -> LoadResult<Self> {
        from_yaml_str(BUILTIN_REFERENCE)
    }
}

impl RegionTable {
    pub fn get(&self, id: &str) -> LoadResult<&RegionDef> {
        self.regions
            .get(id)
            .ok_or_else(|| LoadError::UnknownRegion { id: id.to_string() })
    }
}

pub fn from_yaml_str(content: &str) -> LoadResult<ReferenceConfig> {
    let config: ReferenceConfig = serde_yaml::from_str(content)?;
    validate_reference(&config)?;
    Ok(config)
}

pub fn load_yaml(path: &Path) -> LoadResult<ReferenceConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = from_yaml_str(&content)?;
    tracing::debug!(path = %path.display(), sources = config.energy_sources.len(), "loaded reference configuration");
    Ok(config)
}

pub fn load_json(path: &Path) -> LoadResult<ReferenceConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ReferenceConfig = serde_json::from_str(&content)?;
    validate_reference(&config)?;
    tracing::debug!(path = %path.display(), sources = config.energy_sources.len(), "loaded reference configuration");
    Ok(config)
}

/// Load a reference configuration, picking the format from the extension.
pub fn load_path(path: &Path) -> LoadResult<ReferenceConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

pub fn regions_from_yaml_str(content: &str) -> LoadResult<RegionTable> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn load_regions_yaml(path: &Path) -> LoadResult<RegionTable> {
    let content = std::fs::read_to_string(path)?;
    regions_from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &ReferenceConfig) -> LoadResult<()> {
    validate_reference(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
