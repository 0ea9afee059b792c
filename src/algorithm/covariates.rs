//! Covariate sampling
//!
//! Draws gender, dependence level, mobility level and primary diagnosis for a
//! patient from the marginal distributions of its archetype. The covariates
//! are drawn independently of each other; any correlation between them comes
//! from the archetype mixture.

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;

use crate::algorithm::archetype::{ArchetypeProfile, DiagnosisRule};
use crate::error::{Result, SynthError};
use crate::models::{Covariates, Diagnosis, Gender, LEVELS, Level};
use crate::random::RandomStream;

/// Pre-built categorical samplers for one archetype
#[derive(Debug, Clone)]
pub struct CovariateSampler {
    dependence: WeightedIndex<f64>,
    mobility: WeightedIndex<f64>,
    male_share: f64,
    diagnosis_rule: DiagnosisRule,
}

impl CovariateSampler {
    /// Build the samplers for an archetype profile
    ///
    /// # Errors
    /// Returns an error if a prevalence table has negative entries or sums to zero,
    /// or if the gender distribution is not a valid probability.
    pub fn new(profile: &ArchetypeProfile) -> Result<Self> {
        let dependence = categorical(&profile.dependence_prevalence, "dependence prevalence")?;
        let mobility = categorical(&profile.mobility_prevalence, "mobility prevalence")?;

        let male_share = profile.gender.male_share();
        if !(0.0..=1.0).contains(&male_share) || profile.gender.male < 0.0 {
            return Err(SynthError::InvalidProbability {
                name: "archetype gender",
                value: profile.gender.male,
            });
        }

        Ok(Self {
            dependence,
            mobility,
            male_share,
            diagnosis_rule: profile.diagnosis_rule,
        })
    }

    /// Draw one full set of covariates
    pub fn sample(&self, diagnoses: &[Diagnosis], stream: &mut RandomStream) -> Result<Covariates> {
        let gender = self.sample_gender(stream);
        let dependence_level = self.sample_dependence_level(stream);
        let mobility_level = self.sample_mobility_level(stream);
        let primary_diagnosis = self.sample_primary_diagnosis(diagnoses, stream)?;

        Ok(Covariates {
            gender,
            dependence_level,
            mobility_level,
            primary_diagnosis,
        })
    }

    /// Draw a gender
    pub fn sample_gender(&self, stream: &mut RandomStream) -> Gender {
        if stream.bernoulli(self.male_share) {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// Draw a dependence level in 1..=9
    pub fn sample_dependence_level(&self, stream: &mut RandomStream) -> Level {
        LEVELS[self.dependence.sample(stream)]
    }

    /// Draw a mobility level in 1..=9
    pub fn sample_mobility_level(&self, stream: &mut RandomStream) -> Level {
        LEVELS[self.mobility.sample(stream)]
    }

    /// Draw the dependence and mobility levels observed at a screening
    pub fn sample_visit_levels(&self, stream: &mut RandomStream) -> (Level, Level) {
        let dependence = self.sample_dependence_level(stream);
        let mobility = self.sample_mobility_level(stream);
        (dependence, mobility)
    }

    /// Draw a primary diagnosis following the archetype's rule
    pub fn sample_primary_diagnosis(
        &self,
        diagnoses: &[Diagnosis],
        stream: &mut RandomStream,
    ) -> Result<Diagnosis> {
        match self.diagnosis_rule {
            DiagnosisRule::Fixed(diagnosis) => Ok(diagnosis),
            DiagnosisRule::Uniform => diagnoses
                .choose(stream)
                .copied()
                .ok_or(SynthError::EmptyDiagnosisSet),
        }
    }
}

/// Build a categorical sampler over the nine levels from prevalence weights
fn categorical(weights: &[f64; 9], name: &'static str) -> Result<WeightedIndex<f64>> {
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(SynthError::InvalidProbability { name, value: *bad });
    }
    let total: f64 = weights.iter().sum();
    WeightedIndex::new(weights.iter().map(|w| w / total)).map_err(|_| {
        SynthError::InvalidProbability { name, value: total }
    })
}
