//! nc-engine: energy and greenhouse-gas calculations for neighbourhood
//! scenarios.
//!
//! A [`CalcContext`] is assembled once from the reference configuration and
//! an optional region. Every calculation takes it by reference:
//! - [`registry`]: emissions factors by source, gas and year
//! - [`resolver`]: source lists to MJ per source
//! - [`ghg`]: MJ to tonnes CO2e per gas
//! - [`evaluate`]: whole scenarios to per-category results
//! - [`aggregate`]: per-category results to scenario totals

pub mod aggregate;
pub mod context;
pub mod error;
pub mod evaluate;
pub mod ghg;
pub mod registry;
pub mod resolver;
pub mod scenario;

pub use aggregate::{
    CostCategory, CostKind, EnergyItem, ScenarioSummary, sum_costs, sum_emissions_for_scenario,
    sum_emissions_from_collection, sum_energy_for_scenario, sum_energy_from_collection,
    sum_ghgs_for_scenario, sum_revenue, summarize,
};
pub use context::{CalcContext, EngineOptions};
pub use error::{ConfigError, EngineError, EngineResult, MissingFieldError};
pub use evaluate::{evaluate_scenario, evaluate_scenarios};
pub use ghg::{
    Emissions, GhgResult, YearSeries, compute_ghgs_for_energy, compute_ghgs_for_source,
    compute_ghgs_for_sources_list, compute_ghgs_for_year,
};
pub use registry::{FactorRegistry, FactorSeries};
pub use resolver::{
    EnergyBySource, EnergySourcesList, SourceListMode, SourceShare, resolve_energy,
    resolve_transport_energy, resolve_transport_energy_by_source, sum_energy_from_sources,
};
pub use scenario::*;
