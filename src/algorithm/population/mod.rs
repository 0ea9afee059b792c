//! Population generation for synthetic cohorts
//!
//! This module assembles patients and their screenings from a validated
//! configuration, and provides summaries and consistency checks of the
//! generated data.

pub mod builder;
pub mod config;
pub mod invariants;
pub mod statistics;

// Re-export commonly used items
pub use builder::{Cohort, Population, PopulationGenerator, generate_population};
pub use config::{CareCovariates, DateWindow, GenerationMode, SynthesisConfig};
pub use invariants::{InvariantViolation, check_population};
pub use statistics::{PopulationStatistics, PopulationStats};
