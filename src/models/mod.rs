//! Domain models for the synthetic cohort
//!
//! This module contains the entity models emitted by the generator: patients
//! with their demographic record and the health screenings recorded for them.

pub mod diagnosis;
pub mod patient;
pub mod screening;
pub mod types;

// Re-export commonly used types
pub use diagnosis::{Diagnosis, DiagnosisCategory};
pub use patient::{Covariates, Patient, PatientProfile};
pub use screening::ScreeningEvent;
pub use types::{Gender, GenderProbabilities, LEVELS, Level};
