//! Tests for configuration and coefficient loading

use std::path::Path;

use nursing_home_synth::{
    CoefficientTables, GenerationMode, PopulationGenerator, SynthError, SynthesisConfig,
};

use crate::utils::{day, scratch_dir};

#[test]
fn test_bundled_coefficients_match_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/coefficients.json");
    let tables = CoefficientTables::from_json_file(&path).unwrap();
    assert_eq!(tables, CoefficientTables::default());
    assert!(tables.validate().is_ok());
}

#[test]
fn test_partial_config_takes_defaults() {
    let dir = scratch_dir("config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(
        &path,
        r#"{
            "patient_count": 12,
            "study_end_date": "2025-06-30",
            "mode": "parallel",
            "seed": 5
        }"#,
    )
    .unwrap();

    let config = SynthesisConfig::from_json_file(&path).unwrap();
    assert_eq!(config.patient_count, 12);
    assert_eq!(config.study_end_date, day(2025, 6, 30));
    assert_eq!(config.mode, GenerationMode::Parallel);
    assert_eq!(config.seed, 5);
    assert_eq!(config.max_screenings, SynthesisConfig::default().max_screenings);

    let cohort = PopulationGenerator::with_default_tables(config)
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(cohort.population.len(), 12);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_config_round_trips_through_json() {
    let config = SynthesisConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: SynthesisConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_incomplete_coefficients_rejected() {
    let mut value = serde_json::to_value(CoefficientTables::default()).unwrap();
    value["survival"]["gender"]
        .as_object_mut()
        .unwrap()
        .remove("Male");
    let tables = CoefficientTables::from_json_str(&value.to_string()).unwrap();

    match PopulationGenerator::new(SynthesisConfig::default(), tables) {
        Err(SynthError::MissingCoefficient { table, key }) => {
            assert_eq!(table, "survival");
            assert_eq!(key, "gender.Male");
        }
        other => panic!("expected missing coefficient, got {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_reported() {
    assert!(matches!(
        CoefficientTables::from_json_str("{ not json"),
        Err(SynthError::Json(_))
    ));
    assert!(matches!(
        SynthesisConfig::from_json_file(Path::new("/nonexistent/config.json")),
        Err(SynthError::Io(_))
    ));
}
