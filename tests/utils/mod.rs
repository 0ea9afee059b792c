use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use nursing_home_synth::{ArchetypeKind, DateWindow, SynthesisConfig};

/// Shorthand for building test dates
#[must_use]
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Default configuration scaled down to `patients` patients
#[must_use]
pub fn small_config(patients: usize) -> SynthesisConfig {
    SynthesisConfig {
        patient_count: patients,
        ..Default::default()
    }
}

/// Configuration selecting only one archetype
#[must_use]
pub fn single_archetype_config(kind: ArchetypeKind, patients: usize) -> SynthesisConfig {
    SynthesisConfig {
        archetype_weights: BTreeMap::from([(kind, 1.0)]),
        ..small_config(patients)
    }
}

/// One patient with fixed birth and admission dates and a short study
#[must_use]
pub fn single_patient_config() -> SynthesisConfig {
    SynthesisConfig {
        birth_window: DateWindow::single(day(1930, 1, 1)),
        admission_window: DateWindow::single(day(2020, 1, 1)),
        study_end_date: day(2020, 6, 1),
        ..single_archetype_config(ArchetypeKind::RelativelyIndependent, 1)
    }
}

/// Fresh scratch directory under the system temp dir
#[must_use]
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "nursing_home_synth_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
