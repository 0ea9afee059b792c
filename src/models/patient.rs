//! Patient entity model
//!
//! A [`Patient`] is created once per synthesized resident and carries the
//! demographic record together with the covariates drawn at admission.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::algorithm::archetype::ArchetypeKind;
use crate::models::diagnosis::Diagnosis;
use crate::models::types::{Gender, Level};

/// One realization of the covariates that drive the regression links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Covariates {
    /// Gender of the patient
    pub gender: Gender,
    /// Dependence level (1-9)
    pub dependence_level: Level,
    /// Mobility level (1-9)
    pub mobility_level: Level,
    /// Primary diagnosis
    pub primary_diagnosis: Diagnosis,
}

impl Covariates {
    /// Same patient-level covariates with per-visit functional levels
    #[must_use]
    pub fn with_levels(self, dependence_level: Level, mobility_level: Level) -> Self {
        Self {
            dependence_level,
            mobility_level,
            ..self
        }
    }
}

/// A synthesized nursing-home resident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Patient identifier (`P00001`, `P00002`, ...)
    pub id: String,
    /// Position of the patient in the population, used for sub-stream seeding
    pub index: usize,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Gender
    pub gender: Gender,
    /// Date of admission to the nursing home
    pub date_of_admission: NaiveDate,
    /// Date of death, `None` when censored at the study end
    pub date_of_death: Option<NaiveDate>,
    /// Health archetype the patient was assigned to
    pub archetype: ArchetypeKind,
    /// Dependence level at admission
    pub dependence_level: Level,
    /// Mobility level at admission
    pub mobility_level: Level,
    /// Primary diagnosis, fixed for the whole record
    pub primary_diagnosis: Diagnosis,
}

impl Patient {
    /// Format the identifier for the patient at `index` (zero-based)
    #[must_use]
    pub fn format_id(index: usize) -> String {
        format!("P{:05}", index + 1)
    }

    /// Covariates drawn for this patient at admission
    #[must_use]
    pub fn covariates(&self) -> Covariates {
        Covariates {
            gender: self.gender,
            dependence_level: self.dependence_level,
            mobility_level: self.mobility_level,
            primary_diagnosis: self.primary_diagnosis,
        }
    }

    /// Whether the death date falls after the study end and is unobserved
    #[must_use]
    pub fn is_censored(&self) -> bool {
        self.date_of_death.is_none()
    }

    /// Last date on which the patient can be screened
    #[must_use]
    pub fn effective_end_date(&self, study_end: NaiveDate) -> NaiveDate {
        self.date_of_death.unwrap_or(study_end)
    }

    /// Age in completed years on `date`
    #[must_use]
    pub fn age_at(&self, date: &NaiveDate) -> i32 {
        let years = date.year() - self.date_of_birth.year();
        // 29 February birthdays fall on 28 February in common years
        let birthday = self
            .date_of_birth
            .with_year(date.year())
            .or_else(|| NaiveDate::from_ymd_opt(date.year(), 2, 28));
        match birthday {
            Some(birthday) if birthday > *date => years - 1,
            _ => years,
        }
    }

    /// Age in completed years at admission
    #[must_use]
    pub fn age_at_admission(&self) -> i32 {
        self.age_at(&self.date_of_admission)
    }
}

/// Latent assignment behind a patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Patient identifier
    pub patient_id: String,
    /// Assigned archetype
    pub archetype: ArchetypeKind,
    /// Covariates drawn at admission
    pub covariates: Covariates,
    /// Sampled survival duration in days (at least one)
    pub survival_days: f64,
    /// Death date before censoring was applied
    pub raw_death_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        Patient {
            id: Patient::format_id(0),
            index: 0,
            date_of_birth: NaiveDate::from_ymd_opt(1940, 3, 15).unwrap(),
            gender: Gender::Female,
            date_of_admission: NaiveDate::from_ymd_opt(2010, 3, 14).unwrap(),
            date_of_death: None,
            archetype: ArchetypeKind::RelativelyIndependent,
            dependence_level: 6,
            mobility_level: 5,
            primary_diagnosis: Diagnosis::Heart,
        }
    }

    #[test]
    fn test_patient_id_format() {
        assert_eq!(Patient::format_id(0), "P00001");
        assert_eq!(Patient::format_id(4999), "P05000");
    }

    #[test]
    fn test_age_at_admission() {
        let p = patient();
        assert_eq!(p.age_at_admission(), 69);
        assert_eq!(p.age_at(&NaiveDate::from_ymd_opt(2010, 3, 15).unwrap()), 70);
    }

    #[test]
    fn test_leap_day_birthday() {
        let mut p = patient();
        p.date_of_birth = NaiveDate::from_ymd_opt(1992, 2, 29).unwrap();
        assert_eq!(p.age_at(&NaiveDate::from_ymd_opt(2010, 2, 27).unwrap()), 17);
        assert_eq!(p.age_at(&NaiveDate::from_ymd_opt(2010, 2, 28).unwrap()), 18);
        assert_eq!(p.age_at(&NaiveDate::from_ymd_opt(2012, 2, 28).unwrap()), 19);
        assert_eq!(p.age_at(&NaiveDate::from_ymd_opt(2012, 2, 29).unwrap()), 20);
    }

    #[test]
    fn test_effective_end_date() {
        let study_end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let mut p = patient();
        assert!(p.is_censored());
        assert_eq!(p.effective_end_date(study_end), study_end);

        let death = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
        p.date_of_death = Some(death);
        assert!(!p.is_censored());
        assert_eq!(p.effective_end_date(study_end), death);
    }
}
