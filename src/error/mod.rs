//! Error handling for the cohort generator.
//!
//! Configuration problems are detected before any patient is generated and
//! each one maps to its own variant, so callers can tell exactly which
//! precondition was violated.

use chrono::NaiveDate;

/// Specialized error type for cohort generation and export
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// Population size must be at least one patient
    #[error("Invalid population count: {0} (must be greater than zero)")]
    InvalidPopulationCount(usize),

    /// A configured date window ends before it starts
    #[error("Invalid {window} window: start {start} is after end {end}")]
    InvalidDateWindow {
        /// Name of the window (birth, admission)
        window: &'static str,
        /// Configured start date
        start: NaiveDate,
        /// Configured end date
        end: NaiveDate,
    },

    /// The latest possible birth date leaves no admission date inside the window
    #[error(
        "Infeasible admission window: a patient born on {latest_birth} reaches the minimum admission age on {earliest_admission}, after the admission window closes on {admission_end}"
    )]
    InfeasibleAdmissionWindow {
        /// Last date of the birth window
        latest_birth: NaiveDate,
        /// Earliest legal admission date for that birth date
        earliest_admission: NaiveDate,
        /// Last date of the admission window
        admission_end: NaiveDate,
    },

    /// The study must not end before the last possible admission
    #[error("Study end date {study_end} is before the admission window end {admission_end}")]
    StudyEndBeforeAdmissionWindow {
        /// Configured study end date
        study_end: NaiveDate,
        /// Last date of the admission window
        admission_end: NaiveDate,
    },

    /// Archetype selection weights sum to zero
    #[error("Archetype weights sum to zero; at least one archetype must be selectable")]
    ZeroArchetypeWeight,

    /// A single archetype weight is negative or not finite
    #[error("Invalid weight {weight} for archetype {archetype}")]
    NegativeArchetypeWeight {
        /// Archetype name
        archetype: String,
        /// Offending weight
        weight: f64,
    },

    /// No diagnoses to draw from
    #[error("Diagnosis set is empty")]
    EmptyDiagnosisSet,

    /// Secondary diagnoses need at least two distinct diagnoses
    #[error(
        "Secondary diagnosis probability is {probability} but the diagnosis set only holds {available} distinct diagnosis"
    )]
    InsufficientDiagnoses {
        /// Configured secondary-diagnosis probability
        probability: f64,
        /// Number of distinct diagnoses available
        available: usize,
    },

    /// A probability parameter is outside its valid range
    #[error("Invalid probability for {name}: {value}")]
    InvalidProbability {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Screening count bounds are inverted
    #[error("Invalid screening bounds: min {min} is greater than max {max}")]
    InvalidScreeningBounds {
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },

    /// Mean interval between screenings must be positive
    #[error("Invalid screening interval mean: {0} days")]
    InvalidIntervalMean(f64),

    /// A coefficient table lacks an offset for a covariate value that can occur
    #[error("Coefficient table '{table}' has no entry for {key}")]
    MissingCoefficient {
        /// Table name (survival, care_minutes)
        table: &'static str,
        /// Missing key, e.g. `primary_diagnosis.Other`
        key: String,
    },

    /// A patient refers to an archetype that is not in the catalog
    #[error("Archetype {0} is not part of the catalog")]
    UnknownArchetype(String),

    /// A computed distribution parameter is non-finite or out of range
    #[error("Invalid {distribution} parameter {name} = {value}")]
    InvalidParameter {
        /// Distribution being parameterized
        distribution: &'static str,
        /// Parameter name
        name: &'static str,
        /// Computed value
        value: f64,
    },

    /// IO error during configuration loading or export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a JSON configuration or coefficient file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error building Arrow data during export
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error converting records to Arrow
    #[error("Serialization error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// Error writing Parquet output
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl SynthError {
    /// Whether the error was raised by configuration validation
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        !matches!(
            self,
            Self::InvalidParameter { .. }
                | Self::UnknownArchetype(_)
                | Self::Io(_)
                | Self::Json(_)
                | Self::Arrow(_)
                | Self::SerdeArrow(_)
                | Self::Parquet(_)
        )
    }
}

/// Result type for cohort generation operations
pub type Result<T> = std::result::Result<T, SynthError>;
