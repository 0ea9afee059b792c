//! Health screening model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::diagnosis::Diagnosis;
use crate::models::types::Level;

/// One health screening of a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningEvent {
    /// Identifier of the screened patient
    pub patient_id: String,
    /// Date of the screening
    pub screening_date: NaiveDate,
    /// Dependence level observed at this visit
    pub dependence_level: Level,
    /// Mobility level observed at this visit
    pub mobility_level: Level,
    /// Primary diagnosis of the patient
    pub primary_diagnosis: Diagnosis,
    /// Secondary diagnosis, never equal to the primary one
    pub secondary_diagnosis: Option<Diagnosis>,
    /// Weekly care need in minutes
    pub care_minutes_per_week: f64,
}
