//! Scenario-level totals from per-category results.

use std::collections::BTreeMap;

use nc_core::Year;
use serde::{Deserialize, Serialize};

use crate::error::MissingFieldError;
use crate::ghg::GhgResult;
use crate::scenario::{
    BuildingResult, CostResult, RevenueKind, ScenarioResults, TransportationResult,
};

pub const BUILDINGS: &str = "buildings";
pub const TRANSPORTATION: &str = "transportation";

/// An item of a category that uses energy and emits.
pub trait EnergyItem {
    /// MJ/yr, if computed.
    fn energy_use(&self) -> Option<f64>;

    fn emissions(&self) -> Option<&GhgResult>;
}

impl EnergyItem for BuildingResult {
    fn energy_use(&self) -> Option<f64> {
        self.energy_use
    }

    fn emissions(&self) -> Option<&GhgResult> {
        self.emissions.as_ref()
    }
}

impl EnergyItem for TransportationResult {
    fn energy_use(&self) -> Option<f64> {
        self.energy_use
    }

    fn emissions(&self) -> Option<&GhgResult> {
        self.emissions.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Services,
    Infrastructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    Capital,
    Maintenance,
}

impl CostKind {
    fn field(self) -> &'static str {
        match self {
            CostKind::Capital => "cap_cost",
            CostKind::Maintenance => "maint_cost",
        }
    }

    fn value(self, item: &CostResult) -> Option<f64> {
        match self {
            CostKind::Capital => item.cap_cost,
            CostKind::Maintenance => item.maint_cost,
        }
    }
}

pub fn sum_energy_from_collection<T: EnergyItem>(
    category: &str,
    items: &BTreeMap<String, T>,
) -> Result<f64, MissingFieldError> {
    items.iter().try_fold(0.0, |sum, (id, item)| {
        item.energy_use()
            .map(|e| sum + e)
            .ok_or_else(|| MissingFieldError::new(category, id.as_str(), "energy_use"))
    })
}

/// Total emissions (all gases, t CO2e) of a collection in `year`.
pub fn sum_emissions_from_collection<T: EnergyItem>(
    category: &str,
    items: &BTreeMap<String, T>,
    year: Year,
) -> Result<f64, MissingFieldError> {
    items.iter().try_fold(0.0, |sum, (id, item)| {
        item.emissions()
            .map(|e| sum + e.total_at(year))
            .ok_or_else(|| MissingFieldError::new(category, id.as_str(), "emissions"))
    })
}

pub fn sum_energy_for_scenario(results: &ScenarioResults) -> Result<f64, MissingFieldError> {
    Ok(sum_energy_from_collection(BUILDINGS, &results.buildings)?
        + sum_energy_from_collection(TRANSPORTATION, &results.transportation)?)
}

pub fn sum_emissions_for_scenario(
    results: &ScenarioResults,
    year: Year,
) -> Result<f64, MissingFieldError> {
    Ok(sum_emissions_from_collection(BUILDINGS, &results.buildings, year)?
        + sum_emissions_from_collection(TRANSPORTATION, &results.transportation, year)?)
}

/// Buildings and transportation emissions combined into one result.
pub fn sum_ghgs_for_scenario(results: &ScenarioResults) -> Result<GhgResult, MissingFieldError> {
    let mut total = GhgResult::default();
    for (id, item) in &results.buildings {
        let e = item
            .emissions()
            .ok_or_else(|| MissingFieldError::new(BUILDINGS, id.as_str(), "emissions"))?;
        total = total.combine(e);
    }
    for (id, item) in &results.transportation {
        let e = item
            .emissions()
            .ok_or_else(|| MissingFieldError::new(TRANSPORTATION, id.as_str(), "emissions"))?;
        total = total.combine(e);
    }
    Ok(total)
}

pub fn sum_costs(
    results: &ScenarioResults,
    category: CostCategory,
    kind: CostKind,
) -> Result<f64, MissingFieldError> {
    let (name, items) = match category {
        CostCategory::Services => ("services", &results.services),
        CostCategory::Infrastructure => ("infrastructure", &results.infrastructure),
    };
    items.iter().try_fold(0.0, |sum, (id, item)| {
        kind.value(item)
            .map(|c| sum + c)
            .ok_or_else(|| MissingFieldError::new(name, id.as_str(), kind.field()))
    })
}

/// Revenue of one kind: per-dwelling rate times the dwellings of that home
/// type.
pub fn sum_revenue(results: &ScenarioResults, kind: RevenueKind) -> Result<f64, MissingFieldError> {
    results
        .revenue
        .get(kind)
        .iter()
        .try_fold(0.0, |sum, (home_type, rate)| {
            results
                .buildings
                .get(home_type)
                .map(|b| sum + rate.per_unit * b.qty)
                .ok_or_else(|| MissingFieldError::new(BUILDINGS, home_type.as_str(), "qty"))
        })
}

/// Headline figures for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub year: Year,
    /// MJ/yr
    pub energy_use: f64,
    /// t CO2e in `year`
    pub emissions: f64,
    pub services_cap_cost: f64,
    pub services_maint_cost: f64,
    pub infrastructure_cap_cost: f64,
    pub infrastructure_maint_cost: f64,
    pub development_charges: f64,
    pub property_taxes: f64,
}

pub fn summarize(results: &ScenarioResults) -> Result<ScenarioSummary, MissingFieldError> {
    Ok(ScenarioSummary {
        id: results.id.clone(),
        year: results.year,
        energy_use: sum_energy_for_scenario(results)?,
        emissions: sum_emissions_for_scenario(results, results.year)?,
        services_cap_cost: sum_costs(results, CostCategory::Services, CostKind::Capital)?,
        services_maint_cost: sum_costs(results, CostCategory::Services, CostKind::Maintenance)?,
        infrastructure_cap_cost: sum_costs(results, CostCategory::Infrastructure, CostKind::Capital)?,
        infrastructure_maint_cost: sum_costs(
            results,
            CostCategory::Infrastructure,
            CostKind::Maintenance,
        )?,
        development_charges: sum_revenue(results, RevenueKind::DevelopmentCharges)?,
        property_taxes: sum_revenue(results, RevenueKind::PropertyTaxes)?,
    })
}
