//! Coefficient-linked distribution parameters
//!
//! Maps a patient's covariates through the additive regressions of the
//! coefficient tables and transforms the linear predictors into parameters
//! of the survival-time (Weibull) and weekly care-minutes (Beta)
//! distributions.

use rand::distr::Distribution;
use rand_distr::{Beta, Exp, Normal, Weibull};
use serde::{Deserialize, Serialize};

use crate::algorithm::archetype::Archetype;
use crate::algorithm::coefficients::{
    CARE_MINUTES_TABLE, CareMinutesCoefficients, CarePair, DependenceBucket, MobilityBucket,
    SURVIVAL_TABLE, SurvivalCoefficients, lookup,
};
use crate::error::{Result, SynthError};
use crate::models::Covariates;
use crate::random::RandomStream;

/// Minutes in one week
pub const MINUTES_PER_WEEK: f64 = 10_080.0;

/// Shortest possible survival duration in days
pub const MIN_SURVIVAL_DAYS: f64 = 1.0;

/// Source of a patient's survival duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalModel {
    /// Weibull regression on the covariates
    #[default]
    Regression,
    /// Exponential with the archetype's base survival scale as mean
    ArchetypeExponential,
}

/// Source of weekly care minutes at a screening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareModel {
    /// Beta regression on the covariates
    #[default]
    Regression,
    /// Normal with the archetype's mean and standard deviation, floored at zero
    ArchetypeNormal,
}

/// Weibull survival parameters of one patient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalParameters {
    /// Linear predictor
    pub mu: f64,
    /// Weibull sigma, `exp(ln_sigma)`
    pub sigma: f64,
    /// Weibull shape, `1 / sigma`
    pub shape: f64,
    /// Weibull scale in days, `2 * exp(mu)`
    pub scale: f64,
}

impl SurvivalParameters {
    /// Evaluate the survival regression for a set of covariates
    pub fn from_covariates(covariates: &Covariates, table: &SurvivalCoefficients) -> Result<Self> {
        let mu = table.intercept
            + lookup(&table.gender, &covariates.gender, SURVIVAL_TABLE, "gender")?
            + lookup(
                &table.dependence_level,
                &DependenceBucket::from_level(covariates.dependence_level),
                SURVIVAL_TABLE,
                "dependence_level",
            )?
            + lookup(
                &table.mobility_level,
                &MobilityBucket::from_level(covariates.mobility_level),
                SURVIVAL_TABLE,
                "mobility_level",
            )?
            + lookup(
                &table.primary_diagnosis,
                &covariates.primary_diagnosis.category(),
                SURVIVAL_TABLE,
                "primary_diagnosis",
            )?;

        let sigma = table.ln_sigma.exp();
        let params = Self {
            mu,
            sigma,
            shape: 1.0 / sigma,
            scale: 2.0 * mu.exp(),
        };
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<()> {
        check_positive("weibull", "shape", self.shape)?;
        check_positive("weibull", "scale", self.scale)
    }

    /// The Weibull distribution of survival days
    pub fn distribution(&self) -> Result<Weibull<f64>> {
        Weibull::new(self.scale, self.shape).map_err(|_| SynthError::InvalidParameter {
            distribution: "weibull",
            name: "scale",
            value: self.scale,
        })
    }

    /// Draw a survival duration in days, floored at one day
    pub fn sample_days(&self, stream: &mut RandomStream) -> Result<f64> {
        let days = self.distribution()?.sample(stream);
        Ok(days.max(MIN_SURVIVAL_DAYS))
    }
}

/// Beta care-intensity parameters for one set of covariates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CareIntensityParameters {
    /// Linear predictor of the logit mean
    pub beta_acc: f64,
    /// Linear predictor of the log precision
    pub theta_acc: f64,
    /// Mean share of the week, `sigmoid(beta_acc)`
    pub mean: f64,
    /// Precision, `exp(theta_acc)`
    pub precision: f64,
    /// First Beta shape, `mean * precision`
    pub alpha: f64,
    /// Second Beta shape, `(1 - mean) * precision`
    pub beta: f64,
}

impl CareIntensityParameters {
    /// Evaluate the care-intensity regression for a set of covariates
    pub fn from_covariates(
        covariates: &Covariates,
        table: &CareMinutesCoefficients,
    ) -> Result<Self> {
        let acc: CarePair = table.intercept
            + lookup(&table.gender, &covariates.gender, CARE_MINUTES_TABLE, "gender")?
            + lookup(
                &table.dependence_level,
                &DependenceBucket::from_level(covariates.dependence_level),
                CARE_MINUTES_TABLE,
                "dependence_level",
            )?
            + lookup(
                &table.mobility_level,
                &MobilityBucket::from_level(covariates.mobility_level),
                CARE_MINUTES_TABLE,
                "mobility_level",
            )?
            + lookup(
                &table.primary_diagnosis,
                &covariates.primary_diagnosis.category(),
                CARE_MINUTES_TABLE,
                "primary_diagnosis",
            )?;

        let mean = sigmoid(acc.beta);
        let precision = acc.theta.exp();
        let params = Self {
            beta_acc: acc.beta,
            theta_acc: acc.theta,
            mean,
            precision,
            alpha: mean * precision,
            beta: (1.0 - mean) * precision,
        };
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<()> {
        check_positive("beta", "alpha", self.alpha)?;
        check_positive("beta", "beta", self.beta)
    }

    /// Expected weekly care minutes
    #[must_use]
    pub fn expected_minutes(&self) -> f64 {
        self.mean * MINUTES_PER_WEEK
    }

    /// The Beta distribution of the weekly care share
    pub fn distribution(&self) -> Result<Beta<f64>> {
        Beta::new(self.alpha, self.beta).map_err(|_| SynthError::InvalidParameter {
            distribution: "beta",
            name: "alpha",
            value: self.alpha,
        })
    }

    /// Draw weekly care minutes, floored at zero
    pub fn sample_minutes(&self, stream: &mut RandomStream) -> Result<f64> {
        let share = self.distribution()?.sample(stream);
        Ok((share * MINUTES_PER_WEEK).max(0.0))
    }
}

/// Draw a survival duration in days for a patient
pub fn sample_survival_days(
    model: SurvivalModel,
    covariates: &Covariates,
    archetype: &Archetype,
    table: &SurvivalCoefficients,
    stream: &mut RandomStream,
) -> Result<f64> {
    match model {
        SurvivalModel::Regression => {
            SurvivalParameters::from_covariates(covariates, table)?.sample_days(stream)
        }
        SurvivalModel::ArchetypeExponential => {
            let scale = archetype.survival_base_scale();
            check_positive("exponential", "scale", scale)?;
            let exp = Exp::new(1.0 / scale).map_err(|_| SynthError::InvalidParameter {
                distribution: "exponential",
                name: "scale",
                value: scale,
            })?;
            Ok(exp.sample(stream).max(MIN_SURVIVAL_DAYS))
        }
    }
}

/// Draw weekly care minutes for one screening
pub fn sample_care_minutes(
    model: CareModel,
    covariates: &Covariates,
    archetype: &Archetype,
    table: &CareMinutesCoefficients,
    stream: &mut RandomStream,
) -> Result<f64> {
    match model {
        CareModel::Regression => {
            CareIntensityParameters::from_covariates(covariates, table)?.sample_minutes(stream)
        }
        CareModel::ArchetypeNormal => {
            let (mean, sd) = archetype.care_minutes_moments();
            check_positive("normal", "std_dev", sd)?;
            let normal = Normal::new(mean, sd).map_err(|_| SynthError::InvalidParameter {
                distribution: "normal",
                name: "mean",
                value: mean,
            })?;
            Ok(normal.sample(stream).max(0.0))
        }
    }
}

/// Logistic function
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn check_positive(distribution: &'static str, name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidParameter {
            distribution,
            name,
            value,
        })
    }
}
