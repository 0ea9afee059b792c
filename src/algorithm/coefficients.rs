//! Regression coefficient tables
//!
//! The survival and care-intensity models are additive regressions over the
//! patient covariates. Low dependence and mobility levels share a baseline
//! bucket; each higher level has its own offset. Tables are configuration
//! data and can be loaded from JSON in the same shape as the published
//! coefficient dictionaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Result, SynthError};
use crate::models::{DiagnosisCategory, Gender, Level};

/// Name of the survival table in error messages
pub const SURVIVAL_TABLE: &str = "survival";
/// Name of the care-intensity table in error messages
pub const CARE_MINUTES_TABLE: &str = "care_minutes";

/// Dependence-level coefficient bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DependenceBucket {
    /// Levels 1 to 6
    #[serde(rename = "1-6")]
    Baseline,
    /// Level 7
    #[serde(rename = "7")]
    Level7,
    /// Level 8
    #[serde(rename = "8")]
    Level8,
    /// Level 9
    #[serde(rename = "9")]
    Level9,
}

impl DependenceBucket {
    /// Every bucket
    pub const ALL: [Self; 4] = [Self::Baseline, Self::Level7, Self::Level8, Self::Level9];

    /// Bucket of a dependence level
    #[must_use]
    pub fn from_level(level: Level) -> Self {
        match level {
            7 => Self::Level7,
            8 => Self::Level8,
            9..=Level::MAX => Self::Level9,
            _ => Self::Baseline,
        }
    }
}

impl fmt::Display for DependenceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Baseline => "1-6",
            Self::Level7 => "7",
            Self::Level8 => "8",
            Self::Level9 => "9",
        })
    }
}

/// Mobility-level coefficient bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MobilityBucket {
    /// Levels 1 to 5
    #[serde(rename = "1-5")]
    Baseline,
    /// Level 6
    #[serde(rename = "6")]
    Level6,
    /// Level 7
    #[serde(rename = "7")]
    Level7,
    /// Level 8
    #[serde(rename = "8")]
    Level8,
    /// Level 9
    #[serde(rename = "9")]
    Level9,
}

impl MobilityBucket {
    /// Every bucket
    pub const ALL: [Self; 5] = [
        Self::Baseline,
        Self::Level6,
        Self::Level7,
        Self::Level8,
        Self::Level9,
    ];

    /// Bucket of a mobility level
    #[must_use]
    pub fn from_level(level: Level) -> Self {
        match level {
            6 => Self::Level6,
            7 => Self::Level7,
            8 => Self::Level8,
            9..=Level::MAX => Self::Level9,
            _ => Self::Baseline,
        }
    }
}

impl fmt::Display for MobilityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Baseline => "1-5",
            Self::Level6 => "6",
            Self::Level7 => "7",
            Self::Level8 => "8",
            Self::Level9 => "9",
        })
    }
}

/// Coefficients of the Weibull survival regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalCoefficients {
    /// Intercept of the location predictor
    pub intercept: f64,
    /// Log of the Weibull sigma (inverse shape)
    pub ln_sigma: f64,
    /// Gender offsets
    pub gender: BTreeMap<Gender, f64>,
    /// Dependence-bucket offsets
    pub dependence_level: BTreeMap<DependenceBucket, f64>,
    /// Mobility-bucket offsets
    pub mobility_level: BTreeMap<MobilityBucket, f64>,
    /// Diagnosis-category offsets
    pub primary_diagnosis: BTreeMap<DiagnosisCategory, f64>,
}

/// A pair of offsets for the beta (mean) and theta (precision) predictors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarePair {
    /// Offset on the logit of the mean
    pub beta: f64,
    /// Offset on the log of the precision
    pub theta: f64,
}

impl CarePair {
    /// Create a pair
    #[must_use]
    pub const fn new(beta: f64, theta: f64) -> Self {
        Self { beta, theta }
    }
}

impl std::ops::Add for CarePair {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.beta + rhs.beta, self.theta + rhs.theta)
    }
}

/// Coefficients of the Beta care-minutes regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareMinutesCoefficients {
    /// Intercepts
    pub intercept: CarePair,
    /// Gender offsets
    pub gender: BTreeMap<Gender, CarePair>,
    /// Dependence-bucket offsets
    pub dependence_level: BTreeMap<DependenceBucket, CarePair>,
    /// Mobility-bucket offsets
    pub mobility_level: BTreeMap<MobilityBucket, CarePair>,
    /// Diagnosis-category offsets
    pub primary_diagnosis: BTreeMap<DiagnosisCategory, CarePair>,
}

/// Both coefficient tables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoefficientTables {
    /// Survival-time regression
    pub survival: SurvivalCoefficients,
    /// Weekly care-minutes regression
    pub care_minutes: CareMinutesCoefficients,
}

impl CoefficientTables {
    /// Parse tables from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tables from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize the tables to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that both tables hold an offset for every gender, every level bucket
    /// and every diagnosis category in `categories`.
    ///
    /// # Errors
    /// Returns [`SynthError::MissingCoefficient`] naming the first missing key.
    pub fn validate_for(&self, categories: &[DiagnosisCategory]) -> Result<()> {
        let s = &self.survival;
        let c = &self.care_minutes;
        for gender in Gender::ALL {
            lookup(&s.gender, &gender, SURVIVAL_TABLE, "gender")?;
            lookup(&c.gender, &gender, CARE_MINUTES_TABLE, "gender")?;
        }
        for bucket in DependenceBucket::ALL {
            lookup(&s.dependence_level, &bucket, SURVIVAL_TABLE, "dependence_level")?;
            lookup(&c.dependence_level, &bucket, CARE_MINUTES_TABLE, "dependence_level")?;
        }
        for bucket in MobilityBucket::ALL {
            lookup(&s.mobility_level, &bucket, SURVIVAL_TABLE, "mobility_level")?;
            lookup(&c.mobility_level, &bucket, CARE_MINUTES_TABLE, "mobility_level")?;
        }
        for category in categories {
            lookup(&s.primary_diagnosis, category, SURVIVAL_TABLE, "primary_diagnosis")?;
            lookup(&c.primary_diagnosis, category, CARE_MINUTES_TABLE, "primary_diagnosis")?;
        }
        Ok(())
    }

    /// Check the tables against every diagnosis category
    pub fn validate(&self) -> Result<()> {
        self.validate_for(&DiagnosisCategory::ALL)
    }
}

impl Default for SurvivalCoefficients {
    fn default() -> Self {
        Self {
            intercept: 4.9862,
            ln_sigma: -0.2702,
            gender: BTreeMap::from([(Gender::Female, 0.0), (Gender::Male, -0.3884)]),
            dependence_level: BTreeMap::from([
                (DependenceBucket::Baseline, 0.0),
                (DependenceBucket::Level7, -0.0750),
                (DependenceBucket::Level8, -0.2532),
                (DependenceBucket::Level9, -0.5687),
            ]),
            mobility_level: BTreeMap::from([
                (MobilityBucket::Baseline, 0.0),
                (MobilityBucket::Level6, -0.1407),
                (MobilityBucket::Level7, -0.2299),
                (MobilityBucket::Level8, -0.2930),
                (MobilityBucket::Level9, -0.2842),
            ]),
            primary_diagnosis: BTreeMap::from([
                (DiagnosisCategory::Mental, 0.0),
                (DiagnosisCategory::Nervous, -0.0821),
                (DiagnosisCategory::Osteoarticular, 0.0276),
                (DiagnosisCategory::Tumour, -0.8512),
                (DiagnosisCategory::Other, -0.1266),
            ]),
        }
    }
}

impl Default for CareMinutesCoefficients {
    fn default() -> Self {
        Self {
            intercept: CarePair::new(-3.4955, 5.6313),
            gender: BTreeMap::from([
                (Gender::Female, CarePair::new(0.0, 0.0)),
                (Gender::Male, CarePair::new(0.0684, -0.0793)),
            ]),
            dependence_level: BTreeMap::from([
                (DependenceBucket::Baseline, CarePair::new(0.0, 0.0)),
                (DependenceBucket::Level7, CarePair::new(0.4308, -1.0442)),
                (DependenceBucket::Level8, CarePair::new(0.6946, -0.7241)),
                (DependenceBucket::Level9, CarePair::new(0.9084, -0.7383)),
            ]),
            mobility_level: BTreeMap::from([
                (MobilityBucket::Baseline, CarePair::new(0.0, 0.0)),
                (MobilityBucket::Level6, CarePair::new(0.1756, -0.1266)),
                (MobilityBucket::Level7, CarePair::new(0.3212, -0.0973)),
                (MobilityBucket::Level8, CarePair::new(0.3838, -0.0077)),
                (MobilityBucket::Level9, CarePair::new(0.5207, 0.4890)),
            ]),
            primary_diagnosis: BTreeMap::from([
                (DiagnosisCategory::Mental, CarePair::new(0.0, 0.0)),
                (DiagnosisCategory::Nervous, CarePair::new(0.0332, -0.0244)),
                (DiagnosisCategory::Osteoarticular, CarePair::new(0.0229, -0.1177)),
                (DiagnosisCategory::Tumour, CarePair::new(0.0328, -0.0171)),
                (DiagnosisCategory::Other, CarePair::new(0.0358, -0.0864)),
            ]),
        }
    }
}

/// Look up an offset, reporting the missing key with its table and family
pub(crate) fn lookup<K, V>(
    map: &BTreeMap<K, V>,
    key: &K,
    table: &'static str,
    family: &str,
) -> Result<V>
where
    K: Ord + fmt::Display,
    V: Copy,
{
    map.get(key)
        .copied()
        .ok_or_else(|| SynthError::MissingCoefficient {
            table,
            key: format!("{family}.{key}"),
        })
}
