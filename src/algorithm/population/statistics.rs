//! Population statistics and analysis functions
//!
//! This module provides functions for summarizing a generated cohort.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::algorithm::archetype::ArchetypeKind;
use crate::models::{Gender, Patient, ScreeningEvent};

/// Functions for population statistics and summaries
pub struct PopulationStatistics;

/// Basic statistics of a generated cohort
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationStats {
    /// Number of patients
    pub patient_count: usize,
    /// Patients with an observed death
    pub death_count: usize,
    /// Patients still alive at the study end
    pub censored_count: usize,
    /// Patients per archetype
    pub archetype_counts: BTreeMap<ArchetypeKind, usize>,
    /// Patients per gender
    pub gender_counts: BTreeMap<Gender, usize>,
    /// Number of screenings
    pub screening_count: usize,
    /// Patients without a single screening
    pub unscreened_count: usize,
    /// Average number of screenings per patient
    pub mean_screenings_per_patient: f64,
    /// Average weekly care minutes over all screenings
    pub mean_care_minutes: f64,
    /// Share of screenings with a secondary diagnosis
    pub secondary_diagnosis_share: f64,
}

impl PopulationStatistics {
    /// Calculate basic statistics for a set of patients and their screenings
    #[must_use]
    pub fn calculate(patients: &[Patient], screenings: &[ScreeningEvent]) -> PopulationStats {
        let patient_count = patients.len();
        let death_count = patients.iter().filter(|p| !p.is_censored()).count();

        let mut archetype_counts = BTreeMap::new();
        let mut gender_counts = BTreeMap::new();
        for patient in patients {
            *archetype_counts.entry(patient.archetype).or_insert(0) += 1;
            *gender_counts.entry(patient.gender).or_insert(0) += 1;
        }

        let screened: std::collections::BTreeSet<&str> =
            screenings.iter().map(|s| s.patient_id.as_str()).collect();
        let unscreened_count = patients
            .iter()
            .filter(|p| !screened.contains(p.id.as_str()))
            .count();

        let screening_count = screenings.len();
        let care_total: f64 = screenings.iter().map(|s| s.care_minutes_per_week).sum();
        let with_secondary = screenings
            .iter()
            .filter(|s| s.secondary_diagnosis.is_some())
            .count();

        PopulationStats {
            patient_count,
            death_count,
            censored_count: patient_count - death_count,
            archetype_counts,
            gender_counts,
            screening_count,
            unscreened_count,
            mean_screenings_per_patient: ratio(screening_count as f64, patient_count),
            mean_care_minutes: ratio(care_total, screening_count),
            secondary_diagnosis_share: ratio(with_secondary as f64, screening_count),
        }
    }

    /// Generate a readable cohort summary
    #[must_use]
    pub fn generate_summary(stats: &PopulationStats) -> String {
        let mut summary = String::new();
        let _ = writeln!(summary, "Synthetic Cohort Summary:");
        let _ = writeln!(summary, "  Total Patients: {}", stats.patient_count);
        let _ = writeln!(
            summary,
            "  Deceased: {} ({:.1}%)",
            stats.death_count,
            percentage(stats.death_count, stats.patient_count)
        );
        let _ = writeln!(
            summary,
            "  Censored: {} ({:.1}%)",
            stats.censored_count,
            percentage(stats.censored_count, stats.patient_count)
        );

        let _ = writeln!(summary, "\nDistribution by Health Profile:");
        for (kind, count) in &stats.archetype_counts {
            let _ = writeln!(
                summary,
                "    {}: {count} ({:.1}%)",
                kind.name(),
                percentage(*count, stats.patient_count)
            );
        }

        let _ = writeln!(summary, "\nDistribution by Gender:");
        for (gender, count) in &stats.gender_counts {
            let _ = writeln!(
                summary,
                "    {gender}: {count} ({:.1}%)",
                percentage(*count, stats.patient_count)
            );
        }

        let _ = writeln!(summary, "\nHealth Screenings:");
        let _ = writeln!(summary, "  Total Screenings: {}", stats.screening_count);
        let _ = writeln!(summary, "  Patients Without Screenings: {}", stats.unscreened_count);
        let _ = writeln!(
            summary,
            "  Average Screenings per Patient: {:.2}",
            stats.mean_screenings_per_patient
        );
        let _ = writeln!(
            summary,
            "  Average Care Minutes per Week: {:.1}",
            stats.mean_care_minutes
        );
        let _ = writeln!(
            summary,
            "  Screenings with Secondary Diagnosis: {:.1}%",
            stats.secondary_diagnosis_share * 100.0
        );

        summary
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator / denominator as f64
    } else {
        0.0
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    ratio(count as f64, total) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Diagnosis;
    use chrono::NaiveDate;

    fn patient(index: usize, death: Option<NaiveDate>) -> Patient {
        Patient {
            id: Patient::format_id(index),
            index,
            date_of_birth: NaiveDate::from_ymd_opt(1940, 1, 1).unwrap(),
            gender: Gender::Female,
            date_of_admission: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            date_of_death: death,
            archetype: ArchetypeKind::VeryDependent,
            dependence_level: 7,
            mobility_level: 6,
            primary_diagnosis: Diagnosis::Heart,
        }
    }

    fn screening(patient_id: &str, minutes: f64, secondary: Option<Diagnosis>) -> ScreeningEvent {
        ScreeningEvent {
            patient_id: patient_id.to_string(),
            screening_date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            dependence_level: 7,
            mobility_level: 6,
            primary_diagnosis: Diagnosis::Heart,
            secondary_diagnosis: secondary,
            care_minutes_per_week: minutes,
        }
    }

    #[test]
    fn test_calculate_counts() {
        let patients = vec![
            patient(0, NaiveDate::from_ymd_opt(2012, 5, 1)),
            patient(1, None),
        ];
        let screenings = vec![
            screening("P00001", 100.0, Some(Diagnosis::Mental)),
            screening("P00001", 300.0, None),
        ];
        let stats = PopulationStatistics::calculate(&patients, &screenings);

        assert_eq!(stats.patient_count, 2);
        assert_eq!(stats.death_count, 1);
        assert_eq!(stats.censored_count, 1);
        assert_eq!(stats.unscreened_count, 1);
        assert_eq!(stats.archetype_counts[&ArchetypeKind::VeryDependent], 2);
        assert!((stats.mean_screenings_per_patient - 1.0).abs() < 1e-12);
        assert!((stats.mean_care_minutes - 200.0).abs() < 1e-12);
        assert!((stats.secondary_diagnosis_share - 0.5).abs() < 1e-12);

        let summary = PopulationStatistics::generate_summary(&stats);
        assert!(summary.contains("Total Patients: 2"));
        assert!(summary.contains("Total Screenings: 2"));
    }

    #[test]
    fn test_empty_cohort() {
        let stats = PopulationStatistics::calculate(&[], &[]);
        assert_eq!(stats, PopulationStats::default());
    }
}
