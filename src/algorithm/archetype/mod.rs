//! Archetype catalog
//!
//! The catalog holds the fixed, ordered set of health archetypes together with
//! their selection weights, and picks an archetype for each new patient.

pub mod profile;

use std::collections::BTreeMap;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::algorithm::covariates::CovariateSampler;
use crate::error::{Result, SynthError};
use crate::models::{Covariates, Diagnosis, Level};
use crate::random::RandomStream;

pub use profile::{ArchetypeKind, ArchetypeProfile, DiagnosisRule};

/// An archetype ready for sampling
#[derive(Debug, Clone)]
pub struct Archetype {
    profile: ArchetypeProfile,
    sampler: CovariateSampler,
}

impl Archetype {
    /// Build an archetype from its profile
    pub fn new(profile: ArchetypeProfile) -> Result<Self> {
        let sampler = CovariateSampler::new(&profile)?;
        Ok(Self { profile, sampler })
    }

    /// Kind of the archetype
    #[must_use]
    pub fn kind(&self) -> ArchetypeKind {
        self.profile.kind
    }

    /// Underlying profile
    #[must_use]
    pub fn profile(&self) -> &ArchetypeProfile {
        &self.profile
    }

    /// Selection weight
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.profile.weight
    }

    /// Mean survival in days of the archetype-level survival model
    #[must_use]
    pub fn survival_base_scale(&self) -> f64 {
        self.profile.survival_base_scale
    }

    /// Mean and standard deviation of the archetype-level care model
    #[must_use]
    pub fn care_minutes_moments(&self) -> (f64, f64) {
        (self.profile.care_minutes_mean, self.profile.care_minutes_sd)
    }

    /// Draw gender, levels and primary diagnosis for a new patient
    pub fn sample_covariates(
        &self,
        diagnoses: &[Diagnosis],
        stream: &mut RandomStream,
    ) -> Result<Covariates> {
        self.sampler.sample(diagnoses, stream)
    }

    /// Re-draw the dependence and mobility levels for a screening visit
    pub fn sample_visit_levels(&self, stream: &mut RandomStream) -> (Level, Level) {
        self.sampler.sample_visit_levels(stream)
    }
}

/// Ordered set of archetypes with weighted selection
#[derive(Debug, Clone)]
pub struct ArchetypeCatalog {
    archetypes: Vec<Archetype>,
    selector: WeightedIndex<f64>,
}

impl ArchetypeCatalog {
    /// Create a catalog from explicit profiles
    ///
    /// # Errors
    /// Returns an error if any weight is negative or non-finite, if all weights
    /// are zero, or if a profile has invalid prevalence tables.
    pub fn new(profiles: Vec<ArchetypeProfile>) -> Result<Self> {
        for profile in &profiles {
            if !profile.weight.is_finite() || profile.weight < 0.0 {
                return Err(SynthError::NegativeArchetypeWeight {
                    archetype: profile.kind.name().to_string(),
                    weight: profile.weight,
                });
            }
        }

        let total: f64 = profiles.iter().map(|p| p.weight).sum();
        if total <= 0.0 {
            return Err(SynthError::ZeroArchetypeWeight);
        }

        let selector = WeightedIndex::new(profiles.iter().map(|p| p.weight))
            .map_err(|_| SynthError::ZeroArchetypeWeight)?;
        let archetypes = profiles
            .into_iter()
            .map(Archetype::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            archetypes,
            selector,
        })
    }

    /// Create the baked-in catalog with overridden selection weights.
    ///
    /// Archetypes missing from `weights` get weight zero.
    pub fn with_weights(weights: &BTreeMap<ArchetypeKind, f64>) -> Result<Self> {
        let profiles = ArchetypeKind::ALL
            .iter()
            .map(|kind| kind.profile().with_weight(weights.get(kind).copied().unwrap_or(0.0)))
            .collect();
        Self::new(profiles)
    }

    /// The baked-in catalog with its default weights
    pub fn builtin() -> Result<Self> {
        Self::new(ArchetypeKind::ALL.iter().map(ArchetypeKind::profile).collect())
    }

    /// All archetypes in catalog order
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Look up an archetype by kind
    #[must_use]
    pub fn get(&self, kind: ArchetypeKind) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.kind() == kind)
    }

    /// Archetypes that can actually be selected
    pub fn selectable(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter().filter(|a| a.weight() > 0.0)
    }

    /// Normalized selection probability of each archetype
    #[must_use]
    pub fn selection_probabilities(&self) -> Vec<(ArchetypeKind, f64)> {
        let total: f64 = self.archetypes.iter().map(Archetype::weight).sum();
        self.archetypes
            .iter()
            .map(|a| (a.kind(), a.weight() / total))
            .collect()
    }

    /// Pick an archetype with probability proportional to its weight
    pub fn select_archetype(&self, stream: &mut RandomStream) -> &Archetype {
        &self.archetypes[self.selector.sample(stream)]
    }
}
