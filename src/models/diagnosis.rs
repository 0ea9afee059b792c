//! Diagnosis model
//!
//! Primary and secondary diagnoses are drawn from a small set of broad
//! diagnostic groups. The regression tables only distinguish a subset of
//! them; the rest share the `Other` offset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad diagnostic group of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Diagnosis {
    /// Mental and behavioural disorders
    Mental,
    /// Diseases of the nervous system
    Nervous,
    /// Diseases of the respiratory system
    Respiratory,
    /// Diseases of the circulatory system
    Heart,
    /// Diseases of the musculoskeletal system
    Osteoarticular,
    /// Neoplasms
    Tumour,
}

impl Diagnosis {
    /// The default diagnosis set used when generating a cohort
    pub const ALL: [Self; 6] = [
        Self::Mental,
        Self::Nervous,
        Self::Respiratory,
        Self::Heart,
        Self::Osteoarticular,
        Self::Tumour,
    ];

    /// Coefficient category used for regression lookups
    #[must_use]
    pub fn category(&self) -> DiagnosisCategory {
        match self {
            Self::Mental => DiagnosisCategory::Mental,
            Self::Nervous => DiagnosisCategory::Nervous,
            Self::Osteoarticular => DiagnosisCategory::Osteoarticular,
            Self::Tumour => DiagnosisCategory::Tumour,
            Self::Respiratory | Self::Heart => DiagnosisCategory::Other,
        }
    }

    /// Label used in exported tables
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mental => "Mental",
            Self::Nervous => "Nervous",
            Self::Respiratory => "Respiratory",
            Self::Heart => "Heart",
            Self::Osteoarticular => "Osteoarticular",
            Self::Tumour => "Tumour",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnosis key of the coefficient tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosisCategory {
    /// Baseline category
    Mental,
    /// Nervous system
    Nervous,
    /// Musculoskeletal
    Osteoarticular,
    /// Neoplasms
    Tumour,
    /// Every diagnosis without its own offset
    Other,
}

impl DiagnosisCategory {
    /// Every category, in coefficient-table order
    pub const ALL: [Self; 5] = [
        Self::Mental,
        Self::Nervous,
        Self::Osteoarticular,
        Self::Tumour,
        Self::Other,
    ];
}

impl fmt::Display for DiagnosisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mental => "Mental",
            Self::Nervous => "Nervous",
            Self::Osteoarticular => "Osteoarticular",
            Self::Tumour => "Tumour",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}
