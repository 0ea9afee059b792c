//! Consistency checks over generated cohorts
//!
//! Every patient and screening is checked against the rules the generator
//! promises to uphold. An empty result means the cohort is consistent.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;

use crate::models::{LEVELS, Patient, ScreeningEvent};

use super::config::SynthesisConfig;

/// One broken rule for one patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Patient the violation refers to
    pub patient_id: String,
    /// Short rule name
    pub rule: &'static str,
    /// Human-readable detail
    pub detail: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.patient_id, self.rule, self.detail)
    }
}

struct Violations(Vec<InvariantViolation>);

impl Violations {
    fn push(&mut self, patient_id: &str, rule: &'static str, detail: String) {
        self.0.push(InvariantViolation {
            patient_id: patient_id.to_string(),
            rule,
            detail,
        });
    }
}

/// Check patients and screenings against the generation rules
#[must_use]
pub fn check_population(
    config: &SynthesisConfig,
    patients: &[Patient],
    screenings: &[ScreeningEvent],
) -> Vec<InvariantViolation> {
    let mut violations = Violations(Vec::new());
    let by_patient = screenings
        .iter()
        .into_group_map_by(|s| s.patient_id.as_str());

    for patient in patients {
        check_patient(config, patient, &mut violations);
        let visits = by_patient
            .get(patient.id.as_str())
            .map_or(&[][..], Vec::as_slice);
        check_screenings(config, patient, visits, &mut violations);
    }

    let known: HashSet<&str> = patients.iter().map(|p| p.id.as_str()).collect();
    for id in by_patient.keys().filter(|id| !known.contains(*id)) {
        violations.push(id, "unknown_patient", "screening refers to no patient".to_string());
    }

    violations.0
}

fn check_patient(config: &SynthesisConfig, patient: &Patient, violations: &mut Violations) {
    let id = patient.id.as_str();

    let age = patient.age_at_admission();
    if i64::from(age) < i64::from(config.minimum_admission_age) {
        violations.push(
            id,
            "minimum_admission_age",
            format!(
                "admitted {} at age {age}, below {}",
                patient.date_of_admission, config.minimum_admission_age
            ),
        );
    }
    if !config.admission_window.contains(&patient.date_of_admission) {
        violations.push(
            id,
            "admission_window",
            format!(
                "admission {} outside {}",
                patient.date_of_admission, config.admission_window
            ),
        );
    }
    if !config.birth_window.contains(&patient.date_of_birth) {
        violations.push(
            id,
            "birth_window",
            format!("birth {} outside {}", patient.date_of_birth, config.birth_window),
        );
    }
    if let Some(death) = patient.date_of_death {
        if death <= patient.date_of_admission {
            violations.push(
                id,
                "death_after_admission",
                format!("death {death} not after admission {}", patient.date_of_admission),
            );
        }
        if death > config.study_end_date {
            violations.push(
                id,
                "censoring",
                format!("death {death} after study end {}", config.study_end_date),
            );
        }
    }
    if !LEVELS.contains(&patient.dependence_level) || !LEVELS.contains(&patient.mobility_level) {
        violations.push(
            id,
            "level_range",
            format!(
                "admission levels {}/{} outside 1-9",
                patient.dependence_level, patient.mobility_level
            ),
        );
    }
}

fn check_screenings(
    config: &SynthesisConfig,
    patient: &Patient,
    visits: &[&ScreeningEvent],
    violations: &mut Violations,
) {
    let id = patient.id.as_str();
    let end = patient.effective_end_date(config.study_end_date);

    if visits.len() > config.max_screenings as usize {
        violations.push(
            id,
            "screening_count",
            format!("{} screenings above maximum {}", visits.len(), config.max_screenings),
        );
    }
    // Fewer than the minimum is only allowed when the window ran out
    let exhausted = patient.date_of_admission >= end
        || visits.last().is_some_and(|s| s.screening_date == end);
    if visits.len() < config.min_screenings as usize && !exhausted {
        violations.push(
            id,
            "screening_count",
            format!("{} screenings below minimum {}", visits.len(), config.min_screenings),
        );
    }

    for (previous, next) in visits.iter().tuple_windows() {
        if next.screening_date <= previous.screening_date {
            violations.push(
                id,
                "screening_order",
                format!("{} follows {}", next.screening_date, previous.screening_date),
            );
        }
    }

    for visit in visits {
        if visit.screening_date <= patient.date_of_admission || visit.screening_date > end {
            violations.push(
                id,
                "screening_window",
                format!(
                    "screening {} outside ({}, {end}]",
                    visit.screening_date, patient.date_of_admission
                ),
            );
        }
        if visit.primary_diagnosis != patient.primary_diagnosis {
            violations.push(
                id,
                "primary_diagnosis",
                format!(
                    "screening primary {} differs from {}",
                    visit.primary_diagnosis, patient.primary_diagnosis
                ),
            );
        }
        if visit.secondary_diagnosis == Some(visit.primary_diagnosis) {
            violations.push(
                id,
                "secondary_diagnosis",
                format!("secondary equals primary {}", visit.primary_diagnosis),
            );
        }
        if visit.care_minutes_per_week.is_nan() || visit.care_minutes_per_week < 0.0 {
            violations.push(
                id,
                "care_minutes",
                format!("care minutes {}", visit.care_minutes_per_week),
            );
        }
        if !LEVELS.contains(&visit.dependence_level) || !LEVELS.contains(&visit.mobility_level) {
            violations.push(
                id,
                "level_range",
                format!(
                    "screening levels {}/{} outside 1-9",
                    visit.dependence_level, visit.mobility_level
                ),
            );
        }
    }
}
