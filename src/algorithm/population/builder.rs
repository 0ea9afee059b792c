//! Population assembly
//!
//! This module applies archetype selection, covariate sampling, the timeline
//! generator and the screening generator to every patient of the cohort.

use std::collections::BTreeSet;

use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

use crate::algorithm::archetype::{ArchetypeCatalog, DiagnosisRule};
use crate::algorithm::coefficients::CoefficientTables;
use crate::algorithm::timeline::{admit_patient, patient_screenings};
use crate::error::{Result, SynthError};
use crate::models::{Diagnosis, DiagnosisCategory, Patient, PatientProfile, ScreeningEvent};
use crate::random::RandomStream;
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar, log_warning};

use super::config::{GenerationMode, SynthesisConfig};

/// Largest accepted gap between the configured gender shares and the archetype mixture
const GENDER_SHARE_TOLERANCE: f64 = 0.05;

/// Demographic records and the latent assignment behind each of them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    /// Generated patients, ordered by identifier
    pub patients: Vec<Patient>,
    /// Archetype and covariate assignment of each patient, same order
    pub profiles: Vec<PatientProfile>,
}

impl Population {
    /// Number of patients
    #[must_use]
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Whether the population holds no patients
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

/// A complete synthetic cohort
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cohort {
    /// Patients and their assignments
    pub population: Population,
    /// Screenings of all patients, grouped by patient in date order
    pub screenings: Vec<ScreeningEvent>,
}

/// Validated generator for synthetic cohorts
#[derive(Debug, Clone)]
pub struct PopulationGenerator {
    config: SynthesisConfig,
    catalog: ArchetypeCatalog,
    tables: CoefficientTables,
}

impl PopulationGenerator {
    /// Validate the configuration and coefficient tables and build the catalog.
    ///
    /// # Errors
    /// Returns the first configuration problem found; no patient is generated
    /// from an invalid configuration.
    pub fn new(config: SynthesisConfig, tables: CoefficientTables) -> Result<Self> {
        config.validate()?;
        let catalog = ArchetypeCatalog::with_weights(&config.archetype_weights)?;
        tables.validate_for(&required_categories(&config, &catalog))?;

        let generator = Self {
            config,
            catalog,
            tables,
        };
        generator.check_gender_shares();
        Ok(generator)
    }

    /// Generator with the built-in coefficient tables
    pub fn with_default_tables(config: SynthesisConfig) -> Result<Self> {
        Self::new(config, CoefficientTables::default())
    }

    /// Configuration of the generator
    #[must_use]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Archetype catalog built from the configured weights
    #[must_use]
    pub fn catalog(&self) -> &ArchetypeCatalog {
        &self.catalog
    }

    /// Coefficient tables
    #[must_use]
    pub fn tables(&self) -> &CoefficientTables {
        &self.tables
    }

    /// Fresh random stream seeded from the configuration
    #[must_use]
    pub fn stream(&self) -> RandomStream {
        RandomStream::new(self.config.seed)
    }

    /// Generate `count` patients from one shared stream
    pub fn generate_population(
        &self,
        count: usize,
        stream: &mut RandomStream,
    ) -> Result<Population> {
        if count == 0 {
            return Err(SynthError::InvalidPopulationCount(count));
        }
        log::info!("Generating demographics for {count} patients");

        let pb = self.progress_bar(count, "Generating demographics");
        let mut population = Population {
            patients: Vec::with_capacity(count),
            profiles: Vec::with_capacity(count),
        };
        for index in 0..count {
            let archetype = self.catalog.select_archetype(stream);
            let (patient, profile) =
                admit_patient(index, archetype, &self.config, &self.tables, stream)?;
            population.patients.push(patient);
            population.profiles.push(profile);
            pb.inc(1);
        }
        finish_progress_bar(&pb, Some("Demographics complete"));

        Ok(population)
    }

    /// Generate the screenings of every patient from one shared stream
    pub fn generate_screenings(
        &self,
        patients: &[Patient],
        diagnoses: &[Diagnosis],
        secondary_probability: f64,
        stream: &mut RandomStream,
    ) -> Result<Vec<ScreeningEvent>> {
        check_screening_inputs(diagnoses, secondary_probability)?;
        log::info!("Generating health screenings for {} patients", patients.len());

        let pb = self.progress_bar(patients.len(), "Generating screenings");
        let mut screenings = Vec::new();
        for patient in patients {
            let archetype = self
                .catalog
                .get(patient.archetype)
                .ok_or_else(|| SynthError::UnknownArchetype(patient.archetype.to_string()))?;
            screenings.extend(patient_screenings(
                patient,
                archetype,
                diagnoses,
                secondary_probability,
                &self.config,
                &self.tables,
                stream,
            )?);
            pb.inc(1);
        }
        finish_progress_bar(&pb, Some("Screenings complete"));

        log::info!("Generated {} screenings", screenings.len());
        Ok(screenings)
    }

    /// Generate the full cohort in the configured mode
    pub fn generate(&self) -> Result<Cohort> {
        match self.config.mode {
            GenerationMode::Sequential => {
                let mut stream = self.stream();
                let population = self.generate_population(self.config.patient_count, &mut stream)?;
                let screenings = self.generate_screenings(
                    &population.patients,
                    &self.config.diagnoses,
                    self.config.secondary_diagnosis_probability,
                    &mut stream,
                )?;
                Ok(Cohort {
                    population,
                    screenings,
                })
            }
            GenerationMode::Parallel => self.generate_parallel(),
        }
    }

    /// Generate every patient on its own sub-stream with rayon
    fn generate_parallel(&self) -> Result<Cohort> {
        let count = self.config.patient_count;
        log::info!(
            "Generating {count} patients in parallel on {} threads",
            rayon::current_num_threads()
        );

        let pb = self.progress_bar(count, "Generating patients");
        let results: Vec<(Patient, PatientProfile, Vec<ScreeningEvent>)> = (0..count)
            .into_par_iter()
            .map(|index| -> Result<(Patient, PatientProfile, Vec<ScreeningEvent>)> {
                let mut stream = RandomStream::for_patient(self.config.seed, index);
                let archetype = self.catalog.select_archetype(&mut stream);
                let (patient, profile) =
                    admit_patient(index, archetype, &self.config, &self.tables, &mut stream)?;
                let screenings = patient_screenings(
                    &patient,
                    archetype,
                    &self.config.diagnoses,
                    self.config.secondary_diagnosis_probability,
                    &self.config,
                    &self.tables,
                    &mut stream,
                )?;
                Ok((patient, profile, screenings))
            })
            .progress_with(pb.clone())
            .collect::<Result<Vec<_>>>()?;
        finish_progress_bar(&pb, Some("Patients complete"));

        let mut cohort = Cohort::default();
        for (patient, profile, screenings) in results {
            cohort.population.patients.push(patient);
            cohort.population.profiles.push(profile);
            cohort.screenings.extend(screenings);
        }
        log::info!("Generated {} screenings", cohort.screenings.len());
        Ok(cohort)
    }

    fn progress_bar(&self, len: usize, description: &str) -> ProgressBar {
        if self.config.show_progress {
            create_main_progress_bar(len as u64, Some(description))
        } else {
            ProgressBar::hidden()
        }
    }

    /// Warn when the informational gender shares disagree with the archetype mixture
    fn check_gender_shares(&self) {
        let total: f64 = self.catalog.archetypes().iter().map(|a| a.weight()).sum();
        let mixture: f64 = self
            .catalog
            .archetypes()
            .iter()
            .map(|a| a.weight() * a.profile().gender.male_share())
            .sum::<f64>()
            / total;
        let configured = self.config.gender_probabilities.male_share();
        if (mixture - configured).abs() > GENDER_SHARE_TOLERANCE {
            log_warning(
                &format!(
                    "Configured male share {configured:.2} differs from archetype mixture {mixture:.2}; archetype shares are used"
                ),
                None,
            );
        }
    }
}

/// Generate `count` patients with the given configuration and tables
pub fn generate_population(
    count: usize,
    config: &SynthesisConfig,
    tables: &CoefficientTables,
    stream: &mut RandomStream,
) -> Result<(Vec<Patient>, Vec<PatientProfile>)> {
    let config = SynthesisConfig {
        patient_count: count,
        ..config.clone()
    };
    let generator = PopulationGenerator::new(config, tables.clone())?;
    let population = generator.generate_population(count, stream)?;
    Ok((population.patients, population.profiles))
}

/// Diagnosis categories that can reach the coefficient tables
fn required_categories(
    config: &SynthesisConfig,
    catalog: &ArchetypeCatalog,
) -> Vec<DiagnosisCategory> {
    let mut categories: BTreeSet<DiagnosisCategory> =
        config.diagnoses.iter().map(Diagnosis::category).collect();
    for archetype in catalog.selectable() {
        if let DiagnosisRule::Fixed(diagnosis) = archetype.profile().diagnosis_rule {
            categories.insert(diagnosis.category());
        }
    }
    categories.into_iter().collect()
}

fn check_screening_inputs(diagnoses: &[Diagnosis], secondary_probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&secondary_probability) {
        return Err(SynthError::InvalidProbability {
            name: "secondary_diagnosis_probability",
            value: secondary_probability,
        });
    }
    let distinct = diagnoses.iter().collect::<BTreeSet<_>>().len();
    if secondary_probability > 0.0 && distinct < 2 {
        return Err(SynthError::InsufficientDiagnoses {
            probability: secondary_probability,
            available: distinct,
        });
    }
    Ok(())
}
