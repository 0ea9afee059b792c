//! Patient timeline generation
//!
//! A patient moves through a fixed sequence of steps: birth, admission, a
//! single survival draw that decides death or censoring at the study end, and
//! finally a renewal-like sequence of screenings between admission and the
//! effective end of observation.

use chrono::{Days, NaiveDate};
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand_distr::{Exp, Geometric};
use smallvec::SmallVec;

use crate::algorithm::archetype::Archetype;
use crate::algorithm::coefficients::CoefficientTables;
use crate::algorithm::parameters::{sample_care_minutes, sample_survival_days};
use crate::algorithm::population::config::{CareCovariates, SynthesisConfig};
use crate::error::{Result, SynthError};
use crate::models::{Covariates, Diagnosis, Patient, PatientProfile, ScreeningEvent};
use crate::random::RandomStream;

/// Screening dates of one patient
pub type ScreeningDates = SmallVec<[NaiveDate; 10]>;

/// Terminal state of a patient's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Death observed before the study end
    Deceased(NaiveDate),
    /// Death falls after the study end and is not observed
    Censored,
}

/// Decide whether a raw death date is observed
#[must_use]
pub fn censor(raw_death: NaiveDate, study_end: NaiveDate) -> Outcome {
    if raw_death > study_end {
        Outcome::Censored
    } else {
        Outcome::Deceased(raw_death)
    }
}

/// Generate the demographic record of one patient.
///
/// Draws the archetype's covariates, the birth and admission dates and the
/// survival duration, then applies censoring at the study end.
pub fn admit_patient(
    index: usize,
    archetype: &Archetype,
    config: &SynthesisConfig,
    tables: &CoefficientTables,
    stream: &mut RandomStream,
) -> Result<(Patient, PatientProfile)> {
    let covariates = archetype.sample_covariates(&config.diagnoses, stream)?;

    let date_of_birth = stream.uniform_date(config.birth_window.start, config.birth_window.end);
    let floor = config.admission_floor(date_of_birth);
    let date_of_admission = stream.uniform_date(floor, config.admission_window.end);

    let survival_days = sample_survival_days(
        config.survival_model,
        &covariates,
        archetype,
        &tables.survival,
        stream,
    )?;
    let raw_death_date = date_of_admission
        .checked_add_days(Days::new(survival_days.floor() as u64))
        .unwrap_or(NaiveDate::MAX);

    let date_of_death = match censor(raw_death_date, config.study_end_date) {
        Outcome::Deceased(date) => Some(date),
        Outcome::Censored => None,
    };

    let id = Patient::format_id(index);
    log::debug!(
        "{id}: {} admitted {date_of_admission}, survival {survival_days:.1} days, death {:?}",
        archetype.kind(),
        date_of_death
    );

    let patient = Patient {
        id: id.clone(),
        index,
        date_of_birth,
        gender: covariates.gender,
        date_of_admission,
        date_of_death,
        archetype: archetype.kind(),
        dependence_level: covariates.dependence_level,
        mobility_level: covariates.mobility_level,
        primary_diagnosis: covariates.primary_diagnosis,
    };
    let profile = PatientProfile {
        patient_id: id,
        archetype: archetype.kind(),
        covariates,
        survival_days,
        raw_death_date,
    };

    Ok((patient, profile))
}

/// Draw the number of screenings: geometric trials to first success, clamped
pub fn screening_count(config: &SynthesisConfig, stream: &mut RandomStream) -> Result<u32> {
    let geometric = Geometric::new(config.screening_count_probability).map_err(|_| {
        SynthError::InvalidProbability {
            name: "screening_count_probability",
            value: config.screening_count_probability,
        }
    })?;
    let trials = geometric.sample(stream).saturating_add(1);
    let trials = u32::try_from(trials).unwrap_or(u32::MAX);
    Ok(trials.clamp(config.min_screenings, config.max_screenings))
}

/// Generate strictly increasing screening dates in `(start, end]`.
///
/// Intervals are exponential with the given mean, rounded up to whole days.
/// A date past `end` is clamped to `end` and closes the sequence.
pub fn screening_dates(
    start: NaiveDate,
    end: NaiveDate,
    count: u32,
    mean_interval_days: f64,
    stream: &mut RandomStream,
) -> Result<ScreeningDates> {
    let exp = Exp::new(1.0 / mean_interval_days)
        .map_err(|_| SynthError::InvalidIntervalMean(mean_interval_days))?;

    let mut dates = ScreeningDates::new();
    let mut current = start;
    while dates.len() < count as usize && current < end {
        let interval = exp.sample(stream).ceil().max(1.0);
        current = current
            .checked_add_days(Days::new(interval as u64))
            .map_or(end, |next| next.min(end));
        dates.push(current);
    }

    Ok(dates)
}

/// Draw a secondary diagnosis different from the primary one, with probability `p`
pub fn secondary_diagnosis(
    primary: Diagnosis,
    diagnoses: &[Diagnosis],
    p: f64,
    stream: &mut RandomStream,
) -> Option<Diagnosis> {
    if !stream.bernoulli(p) {
        return None;
    }
    let choices: SmallVec<[Diagnosis; 8]> =
        diagnoses.iter().copied().filter(|d| *d != primary).collect();
    choices.choose(stream).copied()
}

/// Generate all screenings of one patient
pub fn patient_screenings(
    patient: &Patient,
    archetype: &Archetype,
    diagnoses: &[Diagnosis],
    secondary_probability: f64,
    config: &SynthesisConfig,
    tables: &CoefficientTables,
    stream: &mut RandomStream,
) -> Result<Vec<ScreeningEvent>> {
    let count = screening_count(config, stream)?;
    let end = patient.effective_end_date(config.study_end_date);
    let dates = screening_dates(
        patient.date_of_admission,
        end,
        count,
        config.screening_interval_mean_days,
        stream,
    )?;

    let admission = patient.covariates();
    dates
        .into_iter()
        .map(|screening_date| -> Result<ScreeningEvent> {
            let (dependence_level, mobility_level) = archetype.sample_visit_levels(stream);
            let care_covariates: Covariates = match config.care_covariates {
                CareCovariates::Visit => admission.with_levels(dependence_level, mobility_level),
                CareCovariates::Admission => admission,
            };
            let care_minutes_per_week = sample_care_minutes(
                config.care_model,
                &care_covariates,
                archetype,
                &tables.care_minutes,
                stream,
            )?;
            let secondary = secondary_diagnosis(
                patient.primary_diagnosis,
                diagnoses,
                secondary_probability,
                stream,
            );

            Ok(ScreeningEvent {
                patient_id: patient.id.clone(),
                screening_date,
                dependence_level,
                mobility_level,
                primary_diagnosis: patient.primary_diagnosis,
                secondary_diagnosis: secondary,
                care_minutes_per_week,
            })
        })
        .collect()
}
