use std::path::Path;

use nc_config::{
    FactorDef, LoadError, ReferenceConfig, RegionDef, Sector, ValidationError, load_regions_yaml,
    merge_region,
};
use nc_core::Gas;

fn regions() -> nc_config::RegionTable {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/regions.yaml");
    load_regions_yaml(&path).unwrap()
}

#[test]
fn override_replaces_only_given_keys() {
    let base = ReferenceConfig::builtin().unwrap();
    let table = regions();
    let merged = merge_region(&base, table.get("BC").unwrap()).unwrap();

    let grid = &merged.energy_sources["grid"];
    assert_eq!(grid.emissions_factors[&Gas::CO2], FactorDef::Constant(11.5));
    // untouched keys survive the shallow merge
    assert_eq!(grid.name, base.energy_sources["grid"].name);
    assert_eq!(grid.ef_unit.as_deref(), Some("kWh"));
    assert_eq!(grid.abs_unit, "kWh/yr");
    // other sources are unchanged
    assert_eq!(merged.energy_sources["natGas"], base.energy_sources["natGas"]);
}

#[test]
fn factor_table_is_replaced_whole() {
    let base = ReferenceConfig::builtin().unwrap();
    let table = regions();
    let merged = merge_region(&base, table.get("BC").unwrap()).unwrap();
    let grid = &merged.energy_sources["grid"];
    assert!(!grid.emissions_factors.values().any(FactorDef::is_yearly));
}

#[test]
fn sector_lists_are_appended() {
    let base = ReferenceConfig::builtin().unwrap();
    let table = regions();
    let merged = merge_region(&base, table.get("BC").unwrap()).unwrap();

    let before = base.sector_energy_sources.get(Sector::Transportation);
    let after = merged.sector_energy_sources.get(Sector::Transportation);
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], before);
    assert_eq!(after.last().map(String::as_str), Some("ethanol"));
}

#[test]
fn region_can_add_sources_and_transport_tables() {
    let base = ReferenceConfig::builtin().unwrap();
    let table = regions();
    let merged = merge_region(&base, table.get("QC").unwrap()).unwrap();

    assert_eq!(merged.energy_sources["grid"].name, "Hydro-Quebec Grid");
    assert!(merged.energy_sources["grid"].emissions_factors[&Gas::CO2].is_yearly());

    let sawdust = &merged.energy_sources["sawdust"];
    assert_eq!(sawdust.conv_val, Some(16e6));
    assert!(merged
        .sector_energy_sources
        .get(Sector::Buildings)
        .iter()
        .any(|s| s == "sawdust"));

    let transit = &merged.transportation_types["transit"];
    assert_eq!(transit.fuel_consumption.len(), 1);
    assert_eq!(transit.fuel_consumption["grid"], 400.0);
}

#[test]
fn unknown_region_is_an_error() {
    let table = regions();
    assert!(matches!(
        table.get("YT"),
        Err(LoadError::UnknownRegion { id }) if id == "YT"
    ));
}

#[test]
fn incomplete_new_source_is_rejected() {
    let base = ReferenceConfig::builtin().unwrap();
    let region: RegionDef = serde_yaml::from_str(
        "name: Nowhere\nenergy_sources:\n  peat:\n    name: Peat\n",
    )
    .unwrap();
    assert!(matches!(
        merge_region(&base, &region),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn merged_result_is_validated() {
    let base = ReferenceConfig::builtin().unwrap();
    let region: RegionDef = serde_yaml::from_str(
        "name: Nowhere\nx_sector_energy_sources:\n  buildings: [peat]\n",
    )
    .unwrap();
    assert!(matches!(
        merge_region(&base, &region),
        Err(ValidationError::MissingReference { id, .. }) if id == "peat"
    ));
}
