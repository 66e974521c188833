//! Turning source lists into MJ per energy source.

use std::collections::BTreeMap;
use std::fmt;

use nc_core::percent_of;
use nc_units::strip_per_year;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::context::CalcContext;
use crate::error::{EngineError, EngineResult};

const PERCENT_SUM_TOLERANCE: f64 = 1e-6;

/// How the values of a source list are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceListMode {
    /// Absolute quantities in the units given with each entry.
    Abs,
    /// Shares of a baseline, in percent.
    #[default]
    Percent,
}

impl fmt::Display for SourceListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceListMode::Abs => f.write_str("abs"),
            SourceListMode::Percent => f.write_str("percent"),
        }
    }
}

/// One entry of a source list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceShare {
    pub value: f64,
    /// Unit of `value` in absolute mode (`"L/yr"`); ignored for percentages.
    #[serde(default)]
    pub units: String,
}

impl SourceShare {
    pub fn percent(value: f64) -> Self {
        Self {
            value,
            units: "%".to_string(),
        }
    }

    pub fn absolute(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }
}

/// Energy source id -> entry.
pub type EnergySourcesList = BTreeMap<String, SourceShare>;

/// Energy source id -> MJ.
pub type EnergyBySource = BTreeMap<String, f64>;

/// MJ for every entry of `list`.
///
/// In absolute mode each value is converted from its own units; in percent
/// mode it is that share of `baseline_mj`. `scale`, when given, multiplies
/// every result in either mode.
pub fn resolve_energy(
    ctx: &CalcContext,
    list: &EnergySourcesList,
    mode: SourceListMode,
    baseline_mj: f64,
    scale: Option<f64>,
) -> EngineResult<EnergyBySource> {
    if mode == SourceListMode::Percent {
        check_percent_sum(list);
    }

    let mut energy = EnergyBySource::new();
    for (source_id, share) in list {
        ctx.source(source_id)?;
        let mut mj = match mode {
            SourceListMode::Abs => {
                ctx.units()
                    .convert_for_source(source_id, share.value, &share.units, "MJ")?
            }
            SourceListMode::Percent => percent_of(share.value, baseline_mj),
        };
        if let Some(factor) = scale {
            mj *= factor;
        }
        trace!(source = %source_id, %mode, mj, "resolved source energy");
        energy.insert(source_id.clone(), mj);
    }
    Ok(energy)
}

/// MJ per source for `vkt` vehicle-km of transportation type `type_id`.
///
/// Each share is the fraction of distance driven on that source:
/// `share / 100 × fuel consumption (MJ/100 km) × vkt / 100`. Active types
/// use no energy. Absolute lists are not supported.
pub fn resolve_transport_energy_by_source(
    ctx: &CalcContext,
    list: &EnergySourcesList,
    mode: SourceListMode,
    type_id: &str,
    vkt: f64,
) -> EngineResult<EnergyBySource> {
    let ty = ctx.transportation_type(type_id)?;
    if ty.active {
        return Ok(EnergyBySource::new());
    }
    if mode == SourceListMode::Abs {
        return Err(EngineError::UnsupportedMode {
            operation: "transportation energy",
            mode,
        });
    }
    check_percent_sum(list);

    let mut energy = EnergyBySource::new();
    for (source_id, share) in list {
        ctx.source(source_id)?;
        let fc = ctx.fuel_consumption(type_id, source_id)?;
        let mj = share.value / 100.0 * fc * (vkt / 100.0);
        trace!(transportation_type = %type_id, source = %source_id, mj, "resolved transport energy");
        energy.insert(source_id.clone(), mj);
    }
    Ok(energy)
}

/// Total MJ for `vkt` vehicle-km of `type_id`.
pub fn resolve_transport_energy(
    ctx: &CalcContext,
    list: &EnergySourcesList,
    mode: SourceListMode,
    type_id: &str,
    vkt: f64,
) -> EngineResult<f64> {
    Ok(resolve_transport_energy_by_source(ctx, list, mode, type_id, vkt)?
        .values()
        .sum())
}

/// Sum of an absolute list, each value read in its source's conversion unit
/// and expressed in `display_units` (a per-year suffix is ignored).
pub fn sum_energy_from_sources(
    ctx: &CalcContext,
    list: &EnergySourcesList,
    display_units: &str,
) -> EngineResult<f64> {
    let to = strip_per_year(display_units);
    let mut sum = 0.0;
    for (source_id, share) in list {
        let source = ctx.source(source_id)?;
        sum += ctx.units().convert(share.value, &source.conv_unit, to)?;
    }
    Ok(sum)
}

fn check_percent_sum(list: &EnergySourcesList) {
    if list.is_empty() {
        return;
    }
    let total: f64 = list.values().map(|s| s.value).sum();
    if (total - 100.0).abs() > PERCENT_SUM_TOLERANCE {
        warn!(total, "percent source list does not sum to 100");
    }
}
