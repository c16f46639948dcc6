use ds_components::Fault;
use ds_core::NEVER;
use ds_project::{
    LATEST_VERSION, ProjectError, Scenario, ValidationError, migrate_to_latest, save_yaml,
    validate_scenario,
};
use std::path::Path;

fn baseline() -> Scenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/baseline.yaml");
    ds_project::load_yaml(&path).unwrap()
}

fn invalid_field(scenario: &Scenario) -> String {
    match validate_scenario(scenario) {
        Err(ValidationError::InvalidValue { field, .. }) => field,
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn rejects_future_version() {
    let mut scenario = baseline();
    scenario.version = LATEST_VERSION + 1;
    assert!(matches!(
        validate_scenario(&scenario),
        Err(ValidationError::UnsupportedVersion { .. })
    ));
}

#[test]
fn rejects_non_positive_step() {
    let mut scenario = baseline();
    scenario.plant.dt = 0;
    assert_eq!(invalid_field(&scenario), "plant.dt");
}

#[test]
fn rejects_zero_time_constant() {
    let mut scenario = baseline();
    scenario.plant.branch_b.valve_2.time_constant = 0;
    assert_eq!(invalid_field(&scenario), "plant.branch_b.valve_2.time_constant");
}

#[test]
fn rejects_bad_tank_geometry() {
    let mut scenario = baseline();
    scenario.plant.reservoir_1.tank_area = 0.0;
    assert_eq!(invalid_field(&scenario), "plant.reservoir_1.tank_area");

    let mut scenario = baseline();
    scenario.plant.reservoir_2.water_level = 150.0;
    assert_eq!(invalid_field(&scenario), "plant.reservoir_2.water_level");
}

#[test]
fn rejects_negative_fault_time() {
    let mut scenario = baseline();
    scenario.plant.heater_1.faults.first = Some(Fault::new(10.0, -5));
    assert_eq!(invalid_field(&scenario), "plant.heater_1.faults.first.time");

    scenario.plant.heater_1.faults.first = Some(Fault::new(10.0, NEVER));
    assert!(validate_scenario(&scenario).is_ok());
}

#[test]
fn rejects_duplicate_reservoir_names() {
    let mut scenario = baseline();
    scenario.plant.reservoir_2.name = scenario.plant.reservoir_1.name.clone();
    assert!(matches!(
        validate_scenario(&scenario),
        Err(ValidationError::DuplicateName { .. })
    ));
}

#[test]
fn save_refuses_invalid_scenario() {
    let mut scenario = baseline();
    scenario.plant.demand_margin = -1.0;
    let path = std::env::temp_dir().join("ds_project_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &scenario),
        Err(ProjectError::Validation(_))
    ));
}

#[test]
fn legacy_sentinels_removed_on_migration() {
    let mut scenario = baseline();
    scenario.version = 0;
    scenario.plant.steady_min_time = Some(NEVER);
    scenario.plant.branch_a.pump.trip_time = Some(NEVER);
    scenario.plant.branch_a.valve.faults.second = Some(Fault::new(0.0, NEVER));

    let migrated = migrate_to_latest(scenario).unwrap();
    assert_eq!(migrated.version, LATEST_VERSION);
    assert_eq!(migrated.plant.steady_min_time, None);
    assert_eq!(migrated.plant.branch_a.pump.trip_time, None);
    assert_eq!(migrated.plant.branch_a.valve.faults.second, None);
    assert_eq!(migrated.plant.reservoir_2.leak, None);
    // Enabled faults survive.
    assert!(migrated.plant.hidden_heater_2.faults.first.is_some());
}
