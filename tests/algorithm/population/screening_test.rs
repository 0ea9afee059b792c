//! Tests for health screening generation

use itertools::Itertools;
use nursing_home_synth::{
    CareCovariates, Cohort, Diagnosis, PopulationGenerator, SynthError, SynthesisConfig,
    check_population,
};

use crate::utils::small_config;

fn generate(config: SynthesisConfig) -> Cohort {
    PopulationGenerator::with_default_tables(config)
        .unwrap()
        .generate()
        .unwrap()
}

#[test]
fn test_no_secondary_diagnosis_when_probability_zero() {
    let cohort = generate(SynthesisConfig {
        secondary_diagnosis_probability: 0.0,
        ..small_config(150)
    });
    assert!(!cohort.screenings.is_empty());
    assert!(cohort.screenings.iter().all(|s| s.secondary_diagnosis.is_none()));
}

#[test]
fn test_secondary_diagnosis_always_present_when_probability_one() {
    let cohort = generate(SynthesisConfig {
        secondary_diagnosis_probability: 1.0,
        ..small_config(150)
    });
    assert!(!cohort.screenings.is_empty());
    assert!(
        cohort
            .screenings
            .iter()
            .all(|s| matches!(s.secondary_diagnosis, Some(d) if d != s.primary_diagnosis))
    );
}

#[test]
fn test_single_diagnosis_requires_zero_secondary_probability() {
    let config = SynthesisConfig {
        diagnoses: vec![Diagnosis::Heart],
        ..small_config(10)
    };
    assert!(matches!(
        PopulationGenerator::with_default_tables(config.clone()),
        Err(SynthError::InsufficientDiagnoses { .. })
    ));

    let config = SynthesisConfig {
        secondary_diagnosis_probability: 0.0,
        // Fixed-diagnosis archetypes would bring other diagnoses back in
        archetype_weights: [(nursing_home_synth::ArchetypeKind::VeryDependent, 1.0)].into(),
        ..config
    };
    let cohort = generate(config);
    assert!(cohort.screenings.iter().all(|s| s.primary_diagnosis == Diagnosis::Heart));
}

#[test]
fn test_screenings_ordered_and_within_observation() {
    let config = small_config(300);
    let cohort = generate(config.clone());
    let by_patient = cohort.screenings.iter().into_group_map_by(|s| s.patient_id.clone());

    for patient in &cohort.population.patients {
        let end = patient.effective_end_date(config.study_end_date);
        let Some(visits) = by_patient.get(&patient.id) else {
            continue;
        };
        assert!(visits.len() <= config.max_screenings as usize);
        assert!(
            visits
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.screening_date < b.screening_date)
        );
        assert!(
            visits
                .iter()
                .all(|s| s.screening_date > patient.date_of_admission && s.screening_date <= end)
        );
        assert!(visits.iter().all(|s| s.primary_diagnosis == patient.primary_diagnosis));
        assert!(visits.iter().all(|s| s.care_minutes_per_week >= 0.0));
    }
}

#[test]
fn test_screening_count_clamp() {
    let config = SynthesisConfig {
        min_screenings: 3,
        max_screenings: 3,
        ..small_config(200)
    };
    let cohort = generate(config.clone());
    let counts = cohort.screenings.iter().counts_by(|s| s.patient_id.clone());

    for patient in &cohort.population.patients {
        let count = counts.get(&patient.id).copied().unwrap_or(0);
        assert!(count <= 3);
        if count < 3 {
            // Shorter only when the observation window ran out
            let end = patient.effective_end_date(config.study_end_date);
            let last = cohort
                .screenings
                .iter()
                .filter(|s| s.patient_id == patient.id)
                .map(|s| s.screening_date)
                .max();
            assert!(last.is_none_or(|d| d == end));
        }
    }
    assert!(check_population(&config, &cohort.population.patients, &cohort.screenings).is_empty());
}

#[test]
fn test_admission_care_covariates() {
    let config = SynthesisConfig {
        care_covariates: CareCovariates::Admission,
        ..small_config(100)
    };
    let cohort = generate(config.clone());
    assert!(check_population(&config, &cohort.population.patients, &cohort.screenings).is_empty());
    assert!(cohort.screenings.iter().all(|s| s.care_minutes_per_week <= 10_080.0));
}

#[test]
fn test_explicit_screening_call_matches_configured_run() {
    let config = small_config(60);
    let generator = PopulationGenerator::with_default_tables(config.clone()).unwrap();
    let mut stream = generator.stream();
    let population = generator
        .generate_population(config.patient_count, &mut stream)
        .unwrap();
    let screenings = generator
        .generate_screenings(
            &population.patients,
            &config.diagnoses,
            config.secondary_diagnosis_probability,
            &mut stream,
        )
        .unwrap();

    let cohort = generator.generate().unwrap();
    assert_eq!(cohort.population, population);
    assert_eq!(cohort.screenings, screenings);
}
