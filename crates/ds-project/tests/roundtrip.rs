use ds_core::NEVER;
use ds_project::{
    Format, LATEST_VERSION, ProjectError, Scenario, ValidationError, load_json, load_yaml,
    save_json, save_yaml,
};
use std::path::Path;

fn baseline() -> Scenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/baseline.yaml");
    load_yaml(&path).unwrap()
}

#[test]
fn roundtrip_yaml() {
    let scenario = baseline();
    let path = std::env::temp_dir().join("ds_project_roundtrip.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json() {
    let scenario = baseline();
    let path = std::env::temp_dir().join("ds_project_roundtrip.json");
    save_json(&path, &scenario).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(scenario, loaded);

    // Extension picks the format.
    let by_ext = ds_project::load(&path).unwrap();
    assert_eq!(scenario, by_ext);
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("ds_project_does_not_exist.yaml");
    assert!(matches!(
        load_yaml(&path),
        Err(ProjectError::Io(_))
    ));
}

#[test]
fn legacy_file_is_migrated_on_load() {
    let mut legacy = baseline();
    legacy.version = 0;
    legacy.plant.steady_min_time = Some(NEVER);
    legacy.plant.branch_b.pump.trip_time = Some(NEVER);
    let path = std::env::temp_dir().join("ds_project_legacy_v0.yaml");
    std::fs::write(&path, serde_yaml::to_string(&legacy).unwrap()).unwrap();

    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.version, LATEST_VERSION);
    assert_eq!(loaded.plant.steady_min_time, None);
    assert_eq!(loaded.plant.branch_b.pump.trip_time, None);
}

#[test]
fn invalid_file_reports_path_and_stored_version() {
    let mut scenario = baseline();
    scenario.version = 0;
    scenario.plant.reservoir_1.tank_area = 0.0;
    let path = std::env::temp_dir().join("ds_project_invalid_v0.json");
    std::fs::write(&path, serde_json::to_string(&scenario).unwrap()).unwrap();

    match ds_project::load(&path) {
        Err(ProjectError::InvalidFile {
            path: reported,
            version,
            source: ValidationError::InvalidValue { field, .. },
        }) => {
            assert_eq!(reported, path);
            assert_eq!(version, 0);
            assert_eq!(field, "plant.reservoir_1.tank_area");
        }
        other => panic!("expected InvalidFile, got {:?}", other),
    }
}

#[test]
fn saving_legacy_scenario_writes_latest_version() {
    let mut scenario = baseline();
    scenario.version = 0;
    let path = std::env::temp_dir().join("ds_project_saved_from_v0.yaml");
    ds_project::save(&path, &scenario).unwrap();
    assert_eq!(Format::from_path(&path), Format::Yaml);

    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.version, LATEST_VERSION);
}
