//! Common domain type definitions
//!
//! This module contains common enum types used across the patient and
//! screening models and as keys in the coefficient tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal functional-impairment score (1 = independent, 9 = fully dependent)
pub type Level = u8;

/// All valid dependence and mobility levels in ascending order
pub const LEVELS: [Level; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Gender of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    /// Female gender
    Female,
    /// Male gender
    Male,
}

impl Gender {
    /// Every gender, in coefficient-table order
    pub const ALL: [Self; 2] = [Self::Female, Self::Male];

    /// Label used in exported tables
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability of each gender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenderProbabilities {
    /// Probability of a male patient
    pub male: f64,
    /// Probability of a female patient
    pub female: f64,
}

impl GenderProbabilities {
    /// Create a distribution from the probability of a male patient
    #[must_use]
    pub fn with_male_share(male: f64) -> Self {
        Self {
            male,
            female: 1.0 - male,
        }
    }

    /// Probability of a male patient after normalizing both weights
    #[must_use]
    pub fn male_share(&self) -> f64 {
        let total = self.male + self.female;
        if total > 0.0 { self.male / total } else { 0.0 }
    }
}

impl Default for GenderProbabilities {
    fn default() -> Self {
        Self::with_male_share(0.4)
    }
}
