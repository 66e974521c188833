//! Applying a region's overrides to the base reference configuration.

use crate::schema::{
    EnergySourceDef, EnergySourcePatch, ReferenceConfig, RegionDef, TransportationTypeDef,
    TransportationTypePatch,
};
use crate::validate::{ValidationError, validate_reference};
use tracing::debug;

/// Merge `region` into a copy of `base` and validate the result.
///
/// Energy sources and transportation types are merged one entry at a time:
/// keys present in the patch replace the base value whole, absent keys are
/// kept. Entries the base does not have are added. Sector source lists are
/// extended with the region's ids.
pub fn merge_region(
    base: &ReferenceConfig,
    region: &RegionDef,
) -> Result<ReferenceConfig, ValidationError> {
    let mut merged = base.clone();

    for (id, patch) in &region.energy_sources {
        match merged.energy_sources.get_mut(id) {
            Some(source) => {
                debug!(region = %region.name, source = %id, "overriding energy source");
                apply_source_patch(source, patch);
            }
            None => {
                debug!(region = %region.name, source = %id, "adding energy source");
                let source = source_from_patch(id, patch)?;
                merged.energy_sources.insert(id.clone(), source);
            }
        }
    }

    for (sector, extra) in &region.x_sector_energy_sources {
        let list = merged.sector_energy_sources.get_mut(*sector);
        for id in extra {
            if !list.contains(id) {
                list.push(id.clone());
            }
        }
        debug!(region = %region.name, %sector, added = extra.len(), "extended sector sources");
    }

    for (id, patch) in &region.transportation_types {
        match merged.transportation_types.get_mut(id) {
            Some(ty) => apply_transport_patch(ty, patch),
            None => {
                let ty = TransportationTypeDef {
                    id: id.clone(),
                    name: patch.name.clone().unwrap_or_else(|| id.clone()),
                    active: patch.active.unwrap_or(false),
                    fuel_consumption: patch.fuel_consumption.clone().unwrap_or_default(),
                };
                merged.transportation_types.insert(id.clone(), ty);
            }
        }
    }

    validate_reference(&merged)?;
    Ok(merged)
}

fn apply_source_patch(source: &mut EnergySourceDef, patch: &EnergySourcePatch) {
    if let Some(name) = &patch.name {
        source.name = name.clone();
    }
    if let Some(description) = &patch.description {
        source.description = description.clone();
    }
    if let Some(abs_unit) = &patch.abs_unit {
        source.abs_unit = abs_unit.clone();
    }
    if let Some(conv_unit) = &patch.conv_unit {
        source.conv_unit = conv_unit.clone();
    }
    if let Some(conv_val) = patch.conv_val {
        source.conv_val = Some(conv_val);
    }
    if let Some(factors) = &patch.emissions_factors {
        source.emissions_factors = factors.clone();
    }
    if let Some(ef_unit) = &patch.ef_unit {
        source.ef_unit = Some(ef_unit.clone());
    }
    if let Some(references) = &patch.references {
        source.references = references.clone();
    }
}

fn apply_transport_patch(ty: &mut TransportationTypeDef, patch: &TransportationTypePatch) {
    if let Some(name) = &patch.name {
        ty.name = name.clone();
    }
    if let Some(active) = patch.active {
        ty.active = active;
    }
    if let Some(fc) = &patch.fuel_consumption {
        ty.fuel_consumption = fc.clone();
    }
}

fn source_from_patch(
    id: &str,
    patch: &EnergySourcePatch,
) -> Result<EnergySourceDef, ValidationError> {
    let required = |field: &str, value: Option<&String>| {
        value.cloned().ok_or_else(|| ValidationError::InvalidValue {
            field: format!("energy_sources.{id}.{field}"),
            value: "<missing>".to_string(),
            reason: "required for a source the base configuration does not define".to_string(),
        })
    };

    let abs_unit = required("abs_unit", patch.abs_unit.as_ref())?;
    let conv_unit = required("conv_unit", patch.conv_unit.as_ref())?;
    let emissions_factors =
        patch
            .emissions_factors
            .clone()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: format!("energy_sources.{id}.emissions_factors"),
                value: "<missing>".to_string(),
                reason: "required for a source the base configuration does not define"
                    .to_string(),
            })?;

    Ok(EnergySourceDef {
        id: id.to_string(),
        name: patch.name.clone().unwrap_or_else(|| id.to_string()),
        description: patch.description.clone().unwrap_or_default(),
        abs_unit,
        conv_unit,
        conv_val: patch.conv_val,
        emissions_factors,
        ef_unit: patch.ef_unit.clone(),
        references: patch.references.clone().unwrap_or_default(),
    })
}
