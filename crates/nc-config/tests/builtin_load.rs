use nc_config::{FactorDef, ReferenceConfig, Sector, load_yaml, save_yaml, validate_reference};
use nc_core::Gas;

#[test]
fn builtin_config_loads_and_validates() {
    let config = ReferenceConfig::builtin().unwrap();
    validate_reference(&config).unwrap();

    assert_eq!(config.ef_start_year, 2023);
    assert_eq!(config.ef_end_year, 2050);
    assert_eq!(config.energy_sources.len(), 12);
    assert_eq!(config.gwp.values[&Gas::CH4], 25.0);
    assert_eq!(config.gwp.values[&Gas::N2O], 298.0);
    assert!(!config.gwp.values.contains_key(&Gas::CO2));
}

#[test]
fn grid_is_the_only_time_varying_source() {
    let config = ReferenceConfig::builtin().unwrap();
    let varying: Vec<&str> = config
        .energy_sources
        .values()
        .filter(|s| s.emissions_factors.values().any(FactorDef::is_yearly))
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(varying, vec!["grid"]);

    let grid = &config.energy_sources["grid"];
    assert_eq!(grid.ef_unit.as_deref(), Some("kWh"));
    let span = (config.ef_end_year - config.ef_start_year + 1) as usize;
    for gas in Gas::ALL {
        assert!(grid.emissions_factors[&gas].values().len() >= span);
    }
    assert_eq!(grid.emissions_factors[&Gas::CO2].values()[0], 29.2);
}

#[test]
fn volume_and_mass_fuels_carry_a_conversion_value() {
    let config = ReferenceConfig::builtin().unwrap();
    for source in config.energy_sources.values() {
        let bare = source.abs_unit.trim_end_matches("/yr");
        if bare == "L" || bare == "kg" {
            assert!(source.conv_val.is_some(), "{} has no conv_val", source.id);
            assert_ne!(source.conv_unit, bare);
        }
    }
}

#[test]
fn reference_tables_are_populated() {
    let config = ReferenceConfig::builtin().unwrap();
    assert_eq!(config.home_types["single"].size_m2, 186.0);
    assert_eq!(config.building_energy_codes.len(), 13);
    assert!(config.transportation_types["walk"].active);
    assert!(config.transportation_types["bike"].active);
    assert_eq!(config.transportation_types["puv"].fuel_consumption["gasoline"], 214.0);
    assert_eq!(config.service_types.len(), 4);
    assert_eq!(config.infrastructure_types.len(), 6);
    assert!(config
        .sector_energy_sources
        .get(Sector::Buildings)
        .iter()
        .any(|s| s == "natGas"));
}

#[test]
fn roundtrip_yaml_builtin() {
    let config = ReferenceConfig::builtin().unwrap();
    let path = std::env::temp_dir().join("nc_config_roundtrip_builtin.yaml");

    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn invalid_yaml_is_rejected() {
    let err = nc_config::from_yaml_str("version: 1\nef_start_year: [").unwrap_err();
    assert!(matches!(err, nc_config::LoadError::Yaml(_)));
}
