//! Population configuration for cohort synthesis
//!
//! This module defines the configuration options for generating a synthetic
//! nursing-home cohort, and the validation that must pass before any patient
//! is generated.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use crate::algorithm::archetype::ArchetypeKind;
use crate::algorithm::parameters::{CareModel, SurvivalModel};
use crate::error::{Result, SynthError};
use crate::models::{Diagnosis, GenderProbabilities};
use crate::random::DEFAULT_SEED;

/// Build a calendar date, falling back to the minimum date for invalid input
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Add whole years to a date using calendar arithmetic.
///
/// February 29th maps to February 28th in non-leap years. Saturates at the
/// maximum representable date.
#[must_use]
pub fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_add_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MAX)
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First date of the window
    pub start: NaiveDate,
    /// Last date of the window
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Single-day window
    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Whether `date` lies inside the window
    #[must_use]
    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.start && *date <= self.end
    }

    fn validate(&self, window: &'static str) -> Result<()> {
        if self.start > self.end {
            return Err(SynthError::InvalidDateWindow {
                window,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// How patients are distributed over threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// One stream, patient by patient
    #[default]
    Sequential,
    /// One sub-stream per patient, generated with rayon
    Parallel,
}

/// Which dependence and mobility levels feed the care-minutes regression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareCovariates {
    /// Levels observed at the screening itself
    #[default]
    Visit,
    /// Levels drawn at admission
    Admission,
}

/// Configuration for cohort synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Number of patients to generate
    pub patient_count: usize,
    /// Window of possible birth dates
    pub birth_window: DateWindow,
    /// Window of possible admission dates
    pub admission_window: DateWindow,
    /// End of the observation period; later deaths are censored
    pub study_end_date: NaiveDate,
    /// Minimum age in years at admission
    pub minimum_admission_age: u32,
    /// Population-level gender shares (informational, archetypes decide the draw)
    pub gender_probabilities: GenderProbabilities,
    /// Selection weight of each archetype
    pub archetype_weights: BTreeMap<ArchetypeKind, f64>,
    /// Diagnoses to draw primary and secondary diagnoses from
    pub diagnoses: Vec<Diagnosis>,
    /// Lower clamp of the screening count
    pub min_screenings: u32,
    /// Upper clamp of the screening count
    pub max_screenings: u32,
    /// Success probability of the geometric screening count
    pub screening_count_probability: f64,
    /// Mean days between screenings
    pub screening_interval_mean_days: f64,
    /// Probability that a screening records a secondary diagnosis
    pub secondary_diagnosis_probability: f64,
    /// Seed of the random stream
    pub seed: u64,
    /// Sequential or parallel generation
    pub mode: GenerationMode,
    /// Source of survival durations
    pub survival_model: SurvivalModel,
    /// Source of weekly care minutes
    pub care_model: CareModel,
    /// Levels used for the care-minutes regression
    pub care_covariates: CareCovariates,
    /// Show progress bars while generating
    pub show_progress: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            patient_count: 5000,
            birth_window: DateWindow::new(date(1920, 1, 1), date(1970, 12, 31)),
            admission_window: DateWindow::new(date(2000, 1, 1), date(2023, 12, 31)),
            study_end_date: date(2024, 12, 31),
            minimum_admission_age: 18,
            gender_probabilities: GenderProbabilities::default(),
            archetype_weights: ArchetypeKind::ALL
                .iter()
                .map(|kind| (*kind, kind.default_weight()))
                .collect(),
            diagnoses: Diagnosis::ALL.to_vec(),
            min_screenings: 1,
            max_screenings: 10,
            screening_count_probability: 0.5,
            screening_interval_mean_days: 365.0,
            secondary_diagnosis_probability: 0.9,
            seed: DEFAULT_SEED,
            mode: GenerationMode::default(),
            survival_model: SurvivalModel::default(),
            care_model: CareModel::default(),
            care_covariates: CareCovariates::default(),
            show_progress: false,
        }
    }
}

impl SynthesisConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Earliest legal admission date for a patient born on `date_of_birth`
    #[must_use]
    pub fn admission_floor(&self, date_of_birth: NaiveDate) -> NaiveDate {
        add_years(date_of_birth, self.minimum_admission_age).max(self.admission_window.start)
    }

    /// Number of distinct diagnoses in the diagnosis set
    #[must_use]
    pub fn distinct_diagnoses(&self) -> usize {
        self.diagnoses.iter().collect::<BTreeSet<_>>().len()
    }

    /// Check every precondition of generation.
    ///
    /// # Errors
    /// Returns the error describing the first violated precondition.
    pub fn validate(&self) -> Result<()> {
        if self.patient_count == 0 {
            return Err(SynthError::InvalidPopulationCount(self.patient_count));
        }

        self.birth_window.validate("birth")?;
        self.admission_window.validate("admission")?;

        let earliest_admission = self.admission_floor(self.birth_window.end);
        if earliest_admission > self.admission_window.end {
            return Err(SynthError::InfeasibleAdmissionWindow {
                latest_birth: self.birth_window.end,
                earliest_admission,
                admission_end: self.admission_window.end,
            });
        }

        if self.study_end_date < self.admission_window.end {
            return Err(SynthError::StudyEndBeforeAdmissionWindow {
                study_end: self.study_end_date,
                admission_end: self.admission_window.end,
            });
        }

        for (kind, weight) in &self.archetype_weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(SynthError::NegativeArchetypeWeight {
                    archetype: kind.name().to_string(),
                    weight: *weight,
                });
            }
        }
        if self.archetype_weights.values().sum::<f64>() <= 0.0 {
            return Err(SynthError::ZeroArchetypeWeight);
        }

        if self.diagnoses.is_empty() {
            return Err(SynthError::EmptyDiagnosisSet);
        }

        check_probability(
            "secondary_diagnosis_probability",
            self.secondary_diagnosis_probability,
        )?;
        if self.secondary_diagnosis_probability > 0.0 && self.distinct_diagnoses() < 2 {
            return Err(SynthError::InsufficientDiagnoses {
                probability: self.secondary_diagnosis_probability,
                available: self.distinct_diagnoses(),
            });
        }

        check_probability(
            "screening_count_probability",
            self.screening_count_probability,
        )?;
        if self.screening_count_probability == 0.0 {
            return Err(SynthError::InvalidProbability {
                name: "screening_count_probability",
                value: self.screening_count_probability,
            });
        }

        if self.min_screenings > self.max_screenings {
            return Err(SynthError::InvalidScreeningBounds {
                min: self.min_screenings,
                max: self.max_screenings,
            });
        }

        let interval_mean = self.screening_interval_mean_days;
        if !interval_mean.is_finite() || interval_mean <= 0.0 {
            return Err(SynthError::InvalidIntervalMean(interval_mean));
        }

        check_probability("gender_probabilities.male", self.gender_probabilities.male)?;
        check_probability("gender_probabilities.female", self.gender_probabilities.female)?;

        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SynthError::InvalidProbability { name, value })
    }
}

impl fmt::Display for SynthesisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Synthesis Configuration:")?;
        writeln!(f, "  Patients: {}", self.patient_count)?;
        writeln!(f, "  Birth Window: {}", self.birth_window)?;
        writeln!(f, "  Admission Window: {}", self.admission_window)?;
        writeln!(f, "  Study End Date: {}", self.study_end_date)?;
        writeln!(f, "  Minimum Admission Age: {}", self.minimum_admission_age)?;
        writeln!(
            f,
            "  Gender Probabilities: male {:.2}, female {:.2}",
            self.gender_probabilities.male, self.gender_probabilities.female
        )?;
        writeln!(f, "  Archetype Weights:")?;
        for (kind, weight) in &self.archetype_weights {
            writeln!(f, "    {kind}: {weight}")?;
        }
        let diagnoses: Vec<&str> = self.diagnoses.iter().map(Diagnosis::as_str).collect();
        writeln!(f, "  Diagnoses: {}", diagnoses.join(", "))?;
        writeln!(
            f,
            "  Screenings per Patient: {}-{} (geometric p = {})",
            self.min_screenings, self.max_screenings, self.screening_count_probability
        )?;
        writeln!(
            f,
            "  Mean Screening Interval: {} days",
            self.screening_interval_mean_days
        )?;
        writeln!(
            f,
            "  Secondary Diagnosis Probability: {}",
            self.secondary_diagnosis_probability
        )?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Mode: {:?}", self.mode)?;
        writeln!(f, "  Survival Model: {:?}", self.survival_model)?;
        writeln!(f, "  Care Model: {:?}", self.care_model)?;
        writeln!(f, "  Care Covariates: {:?}", self.care_covariates)?;
        Ok(())
    }
}
