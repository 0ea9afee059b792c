//! Runtime configuration for the generator binary.
//!
//! Generation parameters live in [`SynthesisConfig`]; this module holds the
//! export settings and the environment overrides applied on top of them.

use std::path::PathBuf;

use crate::algorithm::population::{GenerationMode, SynthesisConfig};

/// Environment variable overriding the random seed
pub const ENV_SEED: &str = "SYNTH_SEED";
/// Environment variable overriding the number of patients
pub const ENV_PATIENTS: &str = "SYNTH_PATIENTS";
/// Environment variable naming a JSON configuration file
pub const ENV_CONFIG: &str = "SYNTH_CONFIG";
/// Environment variable naming a JSON coefficient file
pub const ENV_COEFFICIENTS: &str = "SYNTH_COEFFICIENTS";
/// Environment variable enabling parallel generation
pub const ENV_PARALLEL: &str = "SYNTH_PARALLEL";
/// Environment variable overriding the output directory
pub const ENV_OUTPUT_DIR: &str = "SYNTH_OUTPUT_DIR";

/// Configuration for writing the generated tables
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory the tables are written to, created on demand
    pub output_dir: PathBuf,
    /// File name of the demographics table
    pub demographics_file: String,
    /// File name of the screenings table
    pub screenings_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("nursing_home_data"),
            demographics_file: "demographics.parquet".to_string(),
            screenings_file: "health_screenings.parquet".to_string(),
        }
    }
}

impl ExportConfig {
    /// Path of the demographics table
    #[must_use]
    pub fn demographics_path(&self) -> PathBuf {
        self.output_dir.join(&self.demographics_file)
    }

    /// Path of the screenings table
    #[must_use]
    pub fn screenings_path(&self) -> PathBuf {
        self.output_dir.join(&self.screenings_file)
    }

    /// Apply the output directory override from the environment
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }
}

/// Path of a JSON file named by an environment variable
#[must_use]
pub fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Helper function to get a parsed value from the environment
#[must_use]
pub fn env_value<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse::<T>().ok())
}

/// Apply seed, patient count and mode overrides from the environment
#[must_use]
pub fn apply_env_overrides(mut config: SynthesisConfig) -> SynthesisConfig {
    if let Some(seed) = env_value::<u64>(ENV_SEED) {
        log::info!("Using seed {seed} from {ENV_SEED}");
        config.seed = seed;
    }
    if let Some(count) = env_value::<usize>(ENV_PATIENTS) {
        log::info!("Generating {count} patients from {ENV_PATIENTS}");
        config.patient_count = count;
    }
    if let Some(parallel) = env_value::<bool>(ENV_PARALLEL) {
        config.mode = if parallel {
            GenerationMode::Parallel
        } else {
            GenerationMode::Sequential
        };
    }
    config
}
