//! Evaluating whole scenarios against a calculation context.

use nc_core::{Year, ensure_non_negative, ensure_year};
use rayon::prelude::*;
use tracing::debug;

use crate::context::CalcContext;
use crate::error::{EngineResult, MissingFieldError};
use crate::ghg::compute_ghgs_for_energy;
use crate::resolver::{SourceListMode, resolve_energy, resolve_transport_energy_by_source};
use crate::scenario::{
    BuildingInput, BuildingResult, CostItemInput, CostResult, Scenario, ScenarioResults,
    TransportationInput, TransportationResult,
};

/// Compute energy use, emissions and costs for every item of `scenario`.
///
/// Building energy is dwellings × floor area × EUI, split across sources by
/// percentage, or the converted sum of an absolute list. Transportation VKT
/// scales with the total number of dwellings.
pub fn evaluate_scenario(ctx: &CalcContext, scenario: &Scenario) -> EngineResult<ScenarioResults> {
    ensure_year(scenario.year)?;
    let mut results = ScenarioResults {
        id: scenario.id.clone(),
        year: scenario.year,
        revenue: scenario.revenue.clone(),
        ..Default::default()
    };

    let mut dwellings = 0.0;
    for (home_type, input) in &scenario.buildings {
        let result = evaluate_building(ctx, home_type, input, scenario.year)?;
        dwellings += result.qty;
        results.buildings.insert(home_type.clone(), result);
    }

    for (type_id, input) in &scenario.transportation {
        let result = evaluate_transportation(ctx, type_id, input, dwellings, scenario.year)?;
        results.transportation.insert(type_id.clone(), result);
    }

    for (id, input) in &scenario.services {
        let ty = ctx.service_type(id)?;
        let result = cost_result(input, ty.cap_cost_intensity, ty.maint_cost_intensity)?;
        results.services.insert(id.clone(), result);
    }

    for (id, input) in &scenario.infrastructure {
        let ty = ctx.infrastructure_type(id)?;
        let result = cost_result(input, ty.cap_cost_intensity, ty.maint_cost_intensity)?;
        results.infrastructure.insert(id.clone(), result);
    }

    debug!(
        scenario = %scenario.id,
        buildings = results.buildings.len(),
        transportation = results.transportation.len(),
        dwellings,
        "evaluated scenario"
    );
    Ok(results)
}

/// Evaluate a batch in parallel. Results keep the input order.
pub fn evaluate_scenarios(
    ctx: &CalcContext,
    scenarios: &[Scenario],
) -> Vec<EngineResult<ScenarioResults>> {
    scenarios
        .par_iter()
        .map(|scenario| evaluate_scenario(ctx, scenario))
        .collect()
}

fn evaluate_building(
    ctx: &CalcContext,
    home_type: &str,
    input: &BuildingInput,
    year: Year,
) -> EngineResult<BuildingResult> {
    let qty = ensure_non_negative(input.qty, "building quantity")?;
    let home = ctx.home_type(home_type)?;

    let (energy, energy_use) = match input.energy_sources_mode {
        SourceListMode::Percent => {
            let eui = match (input.eui, input.building_energy_code.as_deref()) {
                (Some(eui), _) => eui,
                (None, Some(code)) => ctx.eui(code, home_type)?,
                (None, None) => {
                    return Err(MissingFieldError::new("buildings", home_type, "eui").into());
                }
            };
            let baseline = qty * home.size_m2 * eui;
            let energy = resolve_energy(
                ctx,
                &input.energy_sources,
                SourceListMode::Percent,
                baseline,
                None,
            )?;
            (energy, baseline)
        }
        SourceListMode::Abs => {
            let energy =
                resolve_energy(ctx, &input.energy_sources, SourceListMode::Abs, 0.0, None)?;
            let total: f64 = energy.values().sum();
            (energy, total)
        }
    };

    Ok(BuildingResult {
        qty,
        energy_use: Some(energy_use),
        emissions: Some(compute_ghgs_for_energy(ctx, &energy, year)?),
    })
}

fn evaluate_transportation(
    ctx: &CalcContext,
    type_id: &str,
    input: &TransportationInput,
    dwellings: f64,
    year: Year,
) -> EngineResult<TransportationResult> {
    let qty = ensure_non_negative(input.qty, "vehicle-km per dwelling")?;
    let vkt = qty * dwellings;
    let energy = resolve_transport_energy_by_source(
        ctx,
        &input.energy_sources,
        input.energy_sources_mode,
        type_id,
        vkt,
    )?;

    Ok(TransportationResult {
        qty,
        qty_total: Some(vkt),
        energy_use: Some(energy.values().sum()),
        emissions: Some(compute_ghgs_for_energy(ctx, &energy, year)?),
    })
}

fn cost_result(
    input: &CostItemInput,
    cap_intensity: f64,
    maint_intensity: f64,
) -> EngineResult<CostResult> {
    let qty = ensure_non_negative(input.qty, "cost item quantity")?;
    Ok(CostResult {
        qty,
        cap_cost: Some(qty * cap_intensity),
        maint_cost: Some(qty * maint_intensity),
    })
}
