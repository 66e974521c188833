//! Greenhouse-gas emissions from energy use.
//!
//! Every figure here is tonnes of CO2-equivalent. Non-CO2 gases are weighted
//! by their GWP before they are stored, so the per-gas buckets add up to
//! `total`.

use std::collections::BTreeMap;

use nc_core::{Gas, Year, grams_to_tonnes};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::context::CalcContext;
use crate::error::{ConfigError, EngineResult};
use crate::resolver::{EnergyBySource, EnergySourcesList, SourceListMode, resolve_energy};

/// Emissions for one year, by gas and in total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Emissions {
    pub by_gas: BTreeMap<Gas, f64>,
    pub total: f64,
}

impl Emissions {
    pub fn gas(&self, gas: Gas) -> f64 {
        self.by_gas.get(&gas).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, other: &Emissions) {
        for (gas, value) in &other.by_gas {
            *self.by_gas.entry(*gas).or_insert(0.0) += value;
        }
        self.total += other.total;
    }
}

/// Consecutive yearly emissions starting at `start_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    pub start_year: Year,
    pub values: Vec<Emissions>,
}

impl YearSeries {
    pub fn end_year(&self) -> Year {
        self.start_year + self.values.len().saturating_sub(1) as Year
    }

    pub fn get(&self, year: Year) -> Option<&Emissions> {
        let offset = usize::try_from(year - self.start_year).ok()?;
        self.values.get(offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Year, &Emissions)> {
        (self.start_year..).zip(self.values.iter())
    }
}

/// Emissions that are the same every year, or a year-by-year series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum GhgResult {
    Constant(Emissions),
    TimeSeries(YearSeries),
}

impl Default for GhgResult {
    fn default() -> Self {
        GhgResult::Constant(Emissions::default())
    }
}

impl GhgResult {
    /// Emissions in `year`. Series are read clamped to their first and last
    /// years.
    pub fn emissions_at(&self, year: Year) -> Emissions {
        match self {
            GhgResult::Constant(e) => e.clone(),
            GhgResult::TimeSeries(series) => {
                let clamped = year.clamp(series.start_year, series.end_year());
                series.get(clamped).cloned().unwrap_or_default()
            }
        }
    }

    pub fn total_at(&self, year: Year) -> f64 {
        self.emissions_at(year).total
    }

    pub fn is_time_series(&self) -> bool {
        matches!(self, GhgResult::TimeSeries(_))
    }

    /// Sum of two results. Two constants stay constant; otherwise the result
    /// covers the years of both series, each operand read with
    /// [`GhgResult::emissions_at`].
    pub fn combine(&self, other: &GhgResult) -> GhgResult {
        match (self, other) {
            (GhgResult::Constant(a), GhgResult::Constant(b)) => {
                let mut sum = a.clone();
                sum.add(b);
                GhgResult::Constant(sum)
            }
            _ => {
                let (start, end) = year_bounds(self, other);
                let values = (start..=end)
                    .map(|year| {
                        let mut sum = self.emissions_at(year);
                        sum.add(&other.emissions_at(year));
                        sum
                    })
                    .collect();
                GhgResult::TimeSeries(YearSeries {
                    start_year: start,
                    values,
                })
            }
        }
    }
}

fn year_bounds(a: &GhgResult, b: &GhgResult) -> (Year, Year) {
    let bounds = |r: &GhgResult| match r {
        GhgResult::Constant(_) => None,
        GhgResult::TimeSeries(s) => Some((s.start_year, s.end_year())),
    };
    match (bounds(a), bounds(b)) {
        (Some((s1, e1)), Some((s2, e2))) => (s1.min(s2), e1.max(e2)),
        (Some(b), None) | (None, Some(b)) => b,
        (None, None) => (0, 0),
    }
}

/// Add the emissions of `energy_mj` from `source_id` in `year` into `ghgs`.
///
/// Each gas the source declares contributes `factor × energy`, weighted by
/// GWP for non-CO2 gases and converted from grams to tonnes.
pub fn compute_ghgs_for_year(
    ctx: &CalcContext,
    source_id: &str,
    year: Year,
    energy_mj: f64,
    ghgs: &mut Emissions,
) -> Result<(), ConfigError> {
    let factors = ctx.factors();
    for gas in factors.gases(source_id)? {
        let mut grams = factors.factor(source_id, gas, year)? * energy_mj;
        if !gas.is_reference() {
            grams *= factors.gwp(gas)?;
        }
        let tonnes = grams_to_tonnes(grams);
        *ghgs.by_gas.entry(gas).or_insert(0.0) += tonnes;
        ghgs.total += tonnes;
        trace!(source = %source_id, %gas, year, tonnes, "gas emissions");
    }
    Ok(())
}

/// Emissions of a single source. Sources whose CO2 factor varies by year
/// yield a series from `year` through the last factor year.
pub fn compute_ghgs_for_source(
    ctx: &CalcContext,
    source_id: &str,
    year: Year,
    energy_mj: f64,
) -> Result<GhgResult, ConfigError> {
    if ctx.factors().is_time_varying(source_id)? {
        let mut values = Vec::new();
        for y in ctx.span().years_from(year) {
            let mut ghgs = Emissions::default();
            compute_ghgs_for_year(ctx, source_id, y, energy_mj, &mut ghgs)?;
            values.push(ghgs);
        }
        Ok(GhgResult::TimeSeries(YearSeries {
            start_year: year,
            values,
        }))
    } else {
        let mut ghgs = Emissions::default();
        compute_ghgs_for_year(ctx, source_id, year, energy_mj, &mut ghgs)?;
        Ok(GhgResult::Constant(ghgs))
    }
}

/// Emissions of an already-resolved energy split.
///
/// A single-year result unless the session tracks time variance and one of
/// the sources varies by year.
pub fn compute_ghgs_for_energy(
    ctx: &CalcContext,
    energy: &EnergyBySource,
    year: Year,
) -> Result<GhgResult, ConfigError> {
    let mut time_varying = false;
    if ctx.options().track_time_variance {
        for source_id in energy.keys() {
            if ctx.factors().is_time_varying(source_id)? {
                time_varying = true;
                break;
            }
        }
    }

    let year_total = |y: Year| -> Result<Emissions, ConfigError> {
        let mut ghgs = Emissions::default();
        for (source_id, mj) in energy {
            compute_ghgs_for_year(ctx, source_id, y, *mj, &mut ghgs)?;
        }
        Ok(ghgs)
    };

    if time_varying {
        let values = ctx
            .span()
            .years_from(year)
            .map(year_total)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GhgResult::TimeSeries(YearSeries {
            start_year: year,
            values,
        }))
    } else {
        Ok(GhgResult::Constant(year_total(year)?))
    }
}

/// Resolve a source list to MJ and compute its emissions.
pub fn compute_ghgs_for_sources_list(
    ctx: &CalcContext,
    list: &EnergySourcesList,
    year: Year,
    mode: SourceListMode,
    baseline_mj: f64,
    scale: Option<f64>,
) -> EngineResult<GhgResult> {
    let energy = resolve_energy(ctx, list, mode, baseline_mj, scale)?;
    Ok(compute_ghgs_for_energy(ctx, &energy, year)?)
}
