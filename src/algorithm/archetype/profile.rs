//! Archetype definitions
//!
//! Each [`ArchetypeKind`] maps to a fixed [`ArchetypeProfile`] describing the
//! marginal covariate distributions of patients in that archetype. Profiles
//! are plain data so they can be inspected, serialized and tested without
//! running any sampling.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Diagnosis, GenderProbabilities};

/// Days in a (non-leap) year, used for survival scales
const DAYS_PER_YEAR: f64 = 365.0;

/// Latent health archetype of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchetypeKind {
    /// Mostly independent residents with long survival
    RelativelyIndependent,
    /// Residents with high dependence and low mobility
    VeryDependent,
    /// Highly dependent residents with a nervous-system diagnosis
    VeryDependentNervous,
    /// Moderately dependent residents with a tumour diagnosis
    ModeratelyDependentTumour,
}

impl ArchetypeKind {
    /// Every archetype, in catalog order
    pub const ALL: [Self; 4] = [
        Self::RelativelyIndependent,
        Self::VeryDependent,
        Self::VeryDependentNervous,
        Self::ModeratelyDependentTumour,
    ];

    /// Name used in exported tables
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RelativelyIndependent => "RELATIVELY_INDEPENDENT",
            Self::VeryDependent => "VERY_DEPENDENT",
            Self::VeryDependentNervous => "VERY_DEPENDENT_NERVOUS",
            Self::ModeratelyDependentTumour => "MODERATELY_DEPENDENT_TUMOUR",
        }
    }

    /// Default selection weight of the archetype
    #[must_use]
    pub fn default_weight(&self) -> f64 {
        match self {
            Self::RelativelyIndependent => 0.4,
            Self::VeryDependent => 0.32,
            Self::VeryDependentNervous => 0.2,
            Self::ModeratelyDependentTumour => 0.08,
        }
    }

    /// Baked-in profile of the archetype with its default weight
    #[must_use]
    pub fn profile(&self) -> ArchetypeProfile {
        let (dependence_prevalence, mobility_prevalence, diagnosis_rule, survival_years, care) =
            match self {
                Self::RelativelyIndependent => (
                    [1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 8.0, 4.0, 4.0],
                    [1.0, 2.0, 3.0, 4.0, 9.0, 10.0, 6.0, 5.0, 4.0],
                    DiagnosisRule::Uniform,
                    6.0,
                    (150.0, 30.0),
                ),
                Self::VeryDependent => (
                    [1.0, 1.0, 1.0, 2.0, 5.0, 5.0, 9.0, 10.0, 7.0],
                    [1.0, 1.0, 1.0, 1.0, 2.0, 6.0, 9.0, 10.0, 9.0],
                    DiagnosisRule::Uniform,
                    4.0,
                    (800.0, 50.0),
                ),
                Self::VeryDependentNervous => (
                    [1.0, 1.0, 1.0, 2.0, 5.0, 5.0, 9.0, 10.0, 7.0],
                    [1.0, 1.0, 1.0, 3.0, 4.0, 6.0, 10.0, 8.0, 8.0],
                    DiagnosisRule::Fixed(Diagnosis::Nervous),
                    3.5,
                    (900.0, 50.0),
                ),
                Self::ModeratelyDependentTumour => (
                    [1.0, 1.0, 1.0, 2.0, 4.0, 5.0, 10.0, 8.0, 7.0],
                    [1.0, 1.0, 1.0, 3.0, 4.0, 6.0, 10.0, 8.0, 8.0],
                    DiagnosisRule::Fixed(Diagnosis::Tumour),
                    0.8,
                    (500.0, 50.0),
                ),
            };

        ArchetypeProfile {
            kind: *self,
            weight: self.default_weight(),
            dependence_prevalence,
            mobility_prevalence,
            gender: GenderProbabilities::default(),
            diagnosis_rule,
            survival_base_scale: survival_years * DAYS_PER_YEAR,
            care_minutes_mean: care.0,
            care_minutes_sd: care.1,
        }
    }
}

impl fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the primary diagnosis of an archetype is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisRule {
    /// Uniform over the configured diagnosis set
    Uniform,
    /// Always the given diagnosis
    Fixed(Diagnosis),
}

/// Marginal covariate distributions of one archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    /// Archetype this profile belongs to
    pub kind: ArchetypeKind,
    /// Selection weight, not necessarily normalized
    pub weight: f64,
    /// Prevalence weights of dependence levels 1..=9
    pub dependence_prevalence: [f64; 9],
    /// Prevalence weights of mobility levels 1..=9
    pub mobility_prevalence: [f64; 9],
    /// Gender distribution
    pub gender: GenderProbabilities,
    /// Primary-diagnosis rule
    pub diagnosis_rule: DiagnosisRule,
    /// Mean survival in days when the archetype-level survival model is used
    pub survival_base_scale: f64,
    /// Mean weekly care minutes of the archetype-level care model
    pub care_minutes_mean: f64,
    /// Standard deviation of the archetype-level care model
    pub care_minutes_sd: f64,
}

impl ArchetypeProfile {
    /// Same profile with another selection weight
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}
