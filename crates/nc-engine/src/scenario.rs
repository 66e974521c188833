//! Scenario inputs and the per-category results computed from them.

use std::collections::BTreeMap;

use nc_core::{Year, ensure_year};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ghg::GhgResult;
use crate::resolver::{EnergySourcesList, SourceListMode};

/// A neighbourhood development scenario.
///
/// Buildings are keyed by home type id, transportation by transportation
/// type id, services and infrastructure by their type ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Year the emissions factors are read for.
    #[serde(deserialize_with = "deserialize_year")]
    pub year: Year,
    #[serde(default)]
    pub buildings: BTreeMap<String, BuildingInput>,
    #[serde(default)]
    pub transportation: BTreeMap<String, TransportationInput>,
    #[serde(default)]
    pub services: BTreeMap<String, CostItemInput>,
    #[serde(default)]
    pub infrastructure: BTreeMap<String, CostItemInput>,
    #[serde(default)]
    pub revenue: Revenue,
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Year, D::Error>
where
    D: Deserializer<'de>,
{
    let year = Year::deserialize(deserializer)?;
    ensure_year(year).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInput {
    /// Number of dwellings.
    pub qty: f64,
    /// Code the EUI is taken from when `eui` is not given.
    #[serde(default)]
    pub building_energy_code: Option<String>,
    /// MJ/m²/yr; overrides the building code.
    #[serde(default)]
    pub eui: Option<f64>,
    #[serde(default)]
    pub energy_sources_mode: SourceListMode,
    #[serde(default)]
    pub energy_sources: EnergySourcesList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationInput {
    /// Vehicle-km travelled per dwelling per year.
    pub qty: f64,
    #[serde(default)]
    pub energy_sources_mode: SourceListMode,
    #[serde(default)]
    pub energy_sources: EnergySourcesList,
}

/// Quantity of a service (students, dwellings served) or of an
/// infrastructure item (metres).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItemInput {
    pub qty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerUnit {
    pub per_unit: f64,
}

/// Revenue rates per dwelling, keyed by home type id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    #[serde(default)]
    pub development_charges: BTreeMap<String, PerUnit>,
    #[serde(default)]
    pub property_taxes: BTreeMap<String, PerUnit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueKind {
    DevelopmentCharges,
    PropertyTaxes,
}

impl Revenue {
    pub fn get(&self, kind: RevenueKind) -> &BTreeMap<String, PerUnit> {
        match kind {
            RevenueKind::DevelopmentCharges => &self.development_charges,
            RevenueKind::PropertyTaxes => &self.property_taxes,
        }
    }
}

/// Computed values for one scenario. Fields are optional so partially
/// evaluated scenarios can be represented; the aggregator reports any gap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub id: String,
    pub year: Year,
    #[serde(default)]
    pub buildings: BTreeMap<String, BuildingResult>,
    #[serde(default)]
    pub transportation: BTreeMap<String, TransportationResult>,
    #[serde(default)]
    pub services: BTreeMap<String, CostResult>,
    #[serde(default)]
    pub infrastructure: BTreeMap<String, CostResult>,
    #[serde(default)]
    pub revenue: Revenue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingResult {
    pub qty: f64,
    /// MJ/yr
    #[serde(default)]
    pub energy_use: Option<f64>,
    #[serde(default)]
    pub emissions: Option<GhgResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportationResult {
    /// VKT per dwelling.
    pub qty: f64,
    /// VKT for the whole scenario.
    #[serde(default)]
    pub qty_total: Option<f64>,
    #[serde(default)]
    pub energy_use: Option<f64>,
    #[serde(default)]
    pub emissions: Option<GhgResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub qty: f64,
    #[serde(default)]
    pub cap_cost: Option<f64>,
    #[serde(default)]
    pub maint_cost: Option<f64>,
}
