//! A Rust library for generating synthetic nursing-home cohorts: patients
//! with censored survival and irregularly spaced health screenings, drawn
//! from archetype mixtures and coefficient-linked distributions.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod random;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use error::{Result, SynthError};
pub use models::{Diagnosis, DiagnosisCategory, Gender, Patient, PatientProfile, ScreeningEvent};
pub use random::{DEFAULT_SEED, RandomStream};

// Generation
pub use algorithm::archetype::{ArchetypeCatalog, ArchetypeKind};
pub use algorithm::coefficients::CoefficientTables;
pub use algorithm::parameters::{CareModel, SurvivalModel};
pub use algorithm::population::{
    CareCovariates, Cohort, DateWindow, GenerationMode, Population, PopulationGenerator,
    PopulationStatistics, SynthesisConfig, check_population, generate_population,
};

// Export
pub use config::ExportConfig;
pub use export::export_cohort;
