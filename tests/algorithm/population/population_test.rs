//! Tests for population generation functionality

use std::collections::BTreeMap;

use nursing_home_synth::algorithm::population::config::add_years;
use nursing_home_synth::{
    ArchetypeKind, CareModel, CoefficientTables, DateWindow, Diagnosis, GenerationMode,
    PopulationGenerator, RandomStream, SurvivalModel, SynthError, SynthesisConfig,
    check_population, generate_population,
};

use crate::utils::{day, single_archetype_config, single_patient_config, small_config};

#[test]
fn test_same_seed_same_cohort() {
    let first = PopulationGenerator::with_default_tables(small_config(200))
        .unwrap()
        .generate()
        .unwrap();
    let second = PopulationGenerator::with_default_tables(small_config(200))
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_different_seed_different_cohort() {
    let first = PopulationGenerator::with_default_tables(small_config(50))
        .unwrap()
        .generate()
        .unwrap();
    let other = SynthesisConfig {
        seed: 7,
        ..small_config(50)
    };
    let second = PopulationGenerator::with_default_tables(other)
        .unwrap()
        .generate()
        .unwrap();
    assert_ne!(first.population.patients, second.population.patients);
}

#[test]
fn test_generated_cohort_is_consistent() {
    let config = small_config(500);
    let generator = PopulationGenerator::with_default_tables(config.clone()).unwrap();
    let cohort = generator.generate().unwrap();

    assert_eq!(cohort.population.len(), 500);
    assert!(check_population(&config, &cohort.population.patients, &cohort.screenings).is_empty());

    for (patient, profile) in cohort
        .population
        .patients
        .iter()
        .zip(&cohort.population.profiles)
    {
        assert_eq!(patient.id, profile.patient_id);
        assert_eq!(patient.archetype, profile.archetype);
        assert_eq!(patient.gender, profile.covariates.gender);
        assert_eq!(patient.primary_diagnosis, profile.covariates.primary_diagnosis);
        assert!(profile.survival_days >= 1.0);
        assert!(patient.date_of_admission >= add_years(patient.date_of_birth, 18));
        assert!(config.admission_window.contains(&patient.date_of_admission));

        match patient.date_of_death {
            Some(death) => {
                assert!(death > patient.date_of_admission);
                assert_eq!(death, profile.raw_death_date);
                assert!(death <= config.study_end_date);
            }
            None => assert!(profile.raw_death_date > config.study_end_date),
        }
    }
}

#[test]
fn test_single_patient_scenario() {
    let config = single_patient_config();
    let generator = PopulationGenerator::with_default_tables(config.clone()).unwrap();
    let cohort = generator.generate().unwrap();

    let patient = &cohort.population.patients[0];
    let profile = &cohort.population.profiles[0];
    assert_eq!(patient.id, "P00001");
    assert_eq!(patient.date_of_birth, day(1930, 1, 1));
    assert_eq!(patient.date_of_admission, day(2020, 1, 1));
    assert_eq!(patient.archetype, ArchetypeKind::RelativelyIndependent);
    assert_eq!(
        patient.date_of_death.is_none(),
        profile.raw_death_date > day(2020, 6, 1)
    );

    let end = patient.effective_end_date(day(2020, 6, 1));
    assert!(cohort.screenings.iter().all(|s| s.screening_date <= end));
    assert!(check_population(&config, &cohort.population.patients, &cohort.screenings).is_empty());
}

#[test]
fn test_fixed_diagnosis_archetypes() {
    for (kind, diagnosis) in [
        (ArchetypeKind::VeryDependentNervous, Diagnosis::Nervous),
        (ArchetypeKind::ModeratelyDependentTumour, Diagnosis::Tumour),
    ] {
        let generator =
            PopulationGenerator::with_default_tables(single_archetype_config(kind, 100)).unwrap();
        let cohort = generator.generate().unwrap();
        assert!(
            cohort
                .population
                .patients
                .iter()
                .all(|p| p.archetype == kind && p.primary_diagnosis == diagnosis)
        );
        assert!(cohort.screenings.iter().all(|s| s.primary_diagnosis == diagnosis));
    }
}

#[test]
fn test_zero_weight_archetype_never_selected() {
    let mut weights: BTreeMap<ArchetypeKind, f64> = ArchetypeKind::ALL
        .iter()
        .map(|kind| (*kind, kind.default_weight()))
        .collect();
    weights.insert(ArchetypeKind::VeryDependent, 0.0);
    let config = SynthesisConfig {
        archetype_weights: weights,
        ..small_config(400)
    };
    let cohort = PopulationGenerator::with_default_tables(config)
        .unwrap()
        .generate()
        .unwrap();
    assert!(
        cohort
            .population
            .patients
            .iter()
            .all(|p| p.archetype != ArchetypeKind::VeryDependent)
    );
}

#[test]
fn test_parallel_mode_deterministic_and_consistent() {
    let config = SynthesisConfig {
        mode: GenerationMode::Parallel,
        ..small_config(300)
    };
    let generator = PopulationGenerator::with_default_tables(config.clone()).unwrap();
    let first = generator.generate().unwrap();
    let second = generator.generate().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.population.patients[299].id, "P00300");
    assert!(check_population(&config, &first.population.patients, &first.screenings).is_empty());
}

#[test]
fn test_archetype_survival_model() {
    let config = SynthesisConfig {
        survival_model: SurvivalModel::ArchetypeExponential,
        ..small_config(200)
    };
    let generator = PopulationGenerator::with_default_tables(config.clone()).unwrap();
    let cohort = generator.generate().unwrap();
    assert!(cohort.population.profiles.iter().all(|p| p.survival_days >= 1.0));
    let violations = check_population(&config, &cohort.population.patients, &cohort.screenings);
    assert!(violations.is_empty());
}

#[test]
fn test_archetype_normal_care_model() {
    let config = SynthesisConfig {
        care_model: CareModel::ArchetypeNormal,
        ..single_archetype_config(ArchetypeKind::RelativelyIndependent, 300)
    };
    let generator = PopulationGenerator::with_default_tables(config.clone()).unwrap();
    let cohort = generator.generate().unwrap();
    assert!(!cohort.screenings.is_empty());
    assert!(cohort.screenings.iter().all(|s| s.care_minutes_per_week >= 0.0));

    let mean = cohort
        .screenings
        .iter()
        .map(|s| s.care_minutes_per_week)
        .sum::<f64>()
        / cohort.screenings.len() as f64;
    assert!((mean - 150.0).abs() < 10.0);
    let violations = check_population(&config, &cohort.population.patients, &cohort.screenings);
    assert!(violations.is_empty());
}

#[test]
fn test_generate_population_function() {
    let config = SynthesisConfig::default();
    let mut stream = RandomStream::new(99);
    let (patients, profiles) =
        generate_population(25, &config, &CoefficientTables::default(), &mut stream).unwrap();
    assert_eq!(patients.len(), 25);
    assert_eq!(profiles.len(), 25);
}

#[test]
fn test_invalid_population_count() {
    let result = PopulationGenerator::with_default_tables(small_config(0));
    assert!(matches!(result, Err(SynthError::InvalidPopulationCount(0))));
}

#[test]
fn test_zero_archetype_weights() {
    let config = SynthesisConfig {
        archetype_weights: ArchetypeKind::ALL.iter().map(|kind| (*kind, 0.0)).collect(),
        ..small_config(10)
    };
    assert!(matches!(
        PopulationGenerator::with_default_tables(config),
        Err(SynthError::ZeroArchetypeWeight)
    ));
}

#[test]
fn test_infeasible_admission_window() {
    // Born in 2010, cannot be 18 before the window closes in 2020
    let config = SynthesisConfig {
        birth_window: DateWindow::new(day(2000, 1, 1), day(2010, 1, 1)),
        admission_window: DateWindow::new(day(2019, 1, 1), day(2020, 1, 1)),
        study_end_date: day(2021, 1, 1),
        ..small_config(10)
    };
    let err = PopulationGenerator::with_default_tables(config).unwrap_err();
    assert!(matches!(err, SynthError::InfeasibleAdmissionWindow { .. }));
    assert!(err.is_validation_error());
}

#[test]
fn test_study_end_before_admission_window() {
    let config = SynthesisConfig {
        study_end_date: day(2020, 1, 1),
        ..small_config(10)
    };
    assert!(matches!(
        PopulationGenerator::with_default_tables(config),
        Err(SynthError::StudyEndBeforeAdmissionWindow { .. })
    ));
}

#[test]
fn test_missing_coefficient_rejected_before_generation() {
    let mut tables = CoefficientTables::default();
    tables
        .care_minutes
        .primary_diagnosis
        .remove(&nursing_home_synth::DiagnosisCategory::Other);
    match PopulationGenerator::new(small_config(10), tables) {
        Err(SynthError::MissingCoefficient { table, key }) => {
            assert_eq!(table, "care_minutes");
            assert_eq!(key, "primary_diagnosis.Other");
        }
        other => panic!("expected missing coefficient, got {other:?}"),
    }
}
