//! Reference configuration schema definitions.

use std::collections::BTreeMap;

use nc_core::{Gas, Year};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceConfig {
    pub version: u32,
    pub ef_start_year: Year,
    pub ef_end_year: Year,
    pub gwp: GwpDef,
    pub energy_sources: BTreeMap<String, EnergySourceDef>,
    #[serde(default)]
    pub sector_energy_sources: SectorEnergySourcesDef,
    #[serde(default)]
    pub transportation_types: BTreeMap<String, TransportationTypeDef>,
    #[serde(default)]
    pub home_types: BTreeMap<String, HomeTypeDef>,
    #[serde(default)]
    pub building_energy_codes: BTreeMap<String, BuildingEnergyCodeDef>,
    #[serde(default)]
    pub service_types: BTreeMap<String, CostTypeDef>,
    #[serde(default)]
    pub infrastructure_types: BTreeMap<String, CostTypeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceDef {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Global warming potentials. CO2 is implicitly 1 and is not listed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GwpDef {
    pub name: String,
    #[serde(default)]
    pub references: Vec<ReferenceDef>,
    pub values: BTreeMap<Gas, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergySourceDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Unit absolute quantities are entered in, e.g. `L/yr`.
    pub abs_unit: String,
    /// Timeless conversion symbol, unique for volume/mass fuels (`Lgasoline`).
    pub conv_unit: String,
    /// Joules per `conv_unit`. Required when `abs_unit` is not an energy unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_val: Option<f64>,
    pub emissions_factors: BTreeMap<Gas, FactorDef>,
    /// Energy unit the factors are expressed per. `None` means MJ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceDef>,
}

/// Emissions factor: one value for every year, or one value per year from
/// `ef_start_year`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FactorDef {
    Constant(f64),
    Yearly(Vec<f64>),
}

impl FactorDef {
    pub fn is_yearly(&self) -> bool {
        matches!(self, FactorDef::Yearly(_))
    }

    pub fn values(&self) -> &[f64] {
        match self {
            FactorDef::Constant(v) => std::slice::from_ref(v),
            FactorDef::Yearly(vs) => vs,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Buildings,
    Transportation,
}

impl Sector {
    pub const ALL: [Sector; 2] = [Sector::Buildings, Sector::Transportation];

    pub fn as_str(self) -> &'static str {
        match self {
            Sector::Buildings => "buildings",
            Sector::Transportation => "transportation",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Energy sources offered per sector.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SectorEnergySourcesDef {
    #[serde(default)]
    pub buildings: Vec<String>,
    #[serde(default)]
    pub transportation: Vec<String>,
}

impl SectorEnergySourcesDef {
    pub fn get(&self, sector: Sector) -> &[String] {
        match sector {
            Sector::Buildings => &self.buildings,
            Sector::Transportation => &self.transportation,
        }
    }

    pub fn get_mut(&mut self, sector: Sector) -> &mut Vec<String> {
        match sector {
            Sector::Buildings => &mut self.buildings,
            Sector::Transportation => &mut self.transportation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportationTypeDef {
    pub id: String,
    pub name: String,
    /// Active modes (walking, cycling) use no energy source.
    #[serde(default)]
    pub active: bool,
    /// MJ per 100 vehicle-km, by energy source id.
    #[serde(default)]
    pub fuel_consumption: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeTypeDef {
    pub id: String,
    pub name: String,
    /// Floor area of one dwelling.
    pub size_m2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingEnergyCodeDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// MJ/m²/yr by home type id.
    pub eui: BTreeMap<String, f64>,
}

/// Service or infrastructure type with per-unit cost intensities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostTypeDef {
    pub id: String,
    pub name: String,
    pub cap_cost_intensity: f64,
    pub maint_cost_intensity: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub units: String,
}

/// Regional overrides, keyed by region (province) id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegionTable {
    #[serde(default)]
    pub regions: BTreeMap<String, RegionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionDef {
    pub name: String,
    /// Per-source shallow overrides; unknown ids add new sources.
    #[serde(default)]
    pub energy_sources: BTreeMap<String, EnergySourcePatch>,
    /// Extra source ids appended to a sector's list.
    #[serde(default)]
    pub x_sector_energy_sources: BTreeMap<Sector, Vec<String>>,
    #[serde(default)]
    pub transportation_types: BTreeMap<String, TransportationTypePatch>,
}

/// Top-level keys of an energy source to replace. Absent keys keep the base
/// value; present keys replace it whole (`emissions_factors` included).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnergySourcePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_val: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissions_factors: Option<BTreeMap<Gas, FactorDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ReferenceDef>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransportationTypePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_consumption: Option<BTreeMap<String, f64>>,
}
