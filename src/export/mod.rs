//! Tabular export of generated cohorts
//!
//! Patients and screenings are flattened into row records, converted to
//! Arrow record batches with `serde_arrow` and written as Parquet files.
//! Date columns are stored as Arrow `Date32`.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::config::ExportConfig;
use crate::error::Result;
use crate::models::{Patient, ScreeningEvent};
use crate::utils::logging::{log_table_write_start, log_table_written};

/// Columns written as `Date32` instead of the traced string type
const DATE_COLUMNS: [&str; 4] = ["DateOfBirth", "DateOfAdmission", "DateOfDeath", "ScreeningDate"];

/// One row of the demographics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRecord {
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    #[serde(rename = "DateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "DateOfAdmission")]
    pub date_of_admission: NaiveDate,
    /// Null when the patient is censored
    #[serde(rename = "DateOfDeath")]
    pub date_of_death: Option<NaiveDate>,
    #[serde(rename = "HealthProfile")]
    pub health_profile: String,
}

impl From<&Patient> for DemographicRecord {
    fn from(patient: &Patient) -> Self {
        Self {
            patient_id: patient.id.clone(),
            date_of_birth: patient.date_of_birth,
            gender: patient.gender.as_str().to_string(),
            date_of_admission: patient.date_of_admission,
            date_of_death: patient.date_of_death,
            health_profile: patient.archetype.name().to_string(),
        }
    }
}

/// One row of the screenings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRecord {
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    #[serde(rename = "ScreeningDate")]
    pub screening_date: NaiveDate,
    #[serde(rename = "DependenceLevel")]
    pub dependence_level: u8,
    #[serde(rename = "PhysicalMobility")]
    pub physical_mobility: u8,
    #[serde(rename = "PrimaryDiagnosis")]
    pub primary_diagnosis: String,
    #[serde(rename = "SecondaryDiagnosis")]
    pub secondary_diagnosis: Option<String>,
    #[serde(rename = "CareMinutesPerWeek")]
    pub care_minutes_per_week: f64,
}

impl From<&ScreeningEvent> for ScreeningRecord {
    fn from(event: &ScreeningEvent) -> Self {
        Self {
            patient_id: event.patient_id.clone(),
            screening_date: event.screening_date,
            dependence_level: event.dependence_level,
            physical_mobility: event.mobility_level,
            primary_diagnosis: event.primary_diagnosis.as_str().to_string(),
            secondary_diagnosis: event.secondary_diagnosis.map(|d| d.as_str().to_string()),
            care_minutes_per_week: event.care_minutes_per_week,
        }
    }
}

/// Convert rows into a record batch with a schema traced from the row type
pub fn to_record_batch<T>(records: &[T]) -> Result<RecordBatch>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let options = TracingOptions::default().allow_null_fields(true);
    let fields: Vec<FieldRef> = Vec::<FieldRef>::from_type::<T>(options)?
        .into_iter()
        .map(date_field)
        .collect();
    Ok(serde_arrow::to_record_batch(&fields, &records)?)
}

fn date_field(field: FieldRef) -> FieldRef {
    if DATE_COLUMNS.contains(&field.name().as_str()) {
        Arc::new(Field::new(field.name(), DataType::Date32, field.is_nullable()))
    } else {
        field
    }
}

/// Demographics of all patients as a record batch
pub fn demographics_batch(patients: &[Patient]) -> Result<RecordBatch> {
    let records: Vec<DemographicRecord> = patients.iter().map(DemographicRecord::from).collect();
    to_record_batch(&records)
}

/// All screenings as a record batch
pub fn screenings_batch(screenings: &[ScreeningEvent]) -> Result<RecordBatch> {
    let records: Vec<ScreeningRecord> = screenings.iter().map(ScreeningRecord::from).collect();
    to_record_batch(&records)
}

/// Write a record batch to a Parquet file, logging it under `table`
pub fn write_parquet(table: &str, path: &Path, batch: &RecordBatch) -> Result<()> {
    log_table_write_start(table, path);
    let start = Instant::now();

    let file = File::create(path)?;
    let schema: Arc<Schema> = batch.schema();
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(batch)?;
    writer.close()?;

    log_table_written(table, path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}

/// Write demographics and screenings into the configured output directory
pub fn export_cohort(
    config: &ExportConfig,
    patients: &[Patient],
    screenings: &[ScreeningEvent],
) -> Result<()> {
    fs::create_dir_all(&config.output_dir)?;
    let demographics = demographics_batch(patients)?;
    write_parquet("demographics", &config.demographics_path(), &demographics)?;
    let screenings = screenings_batch(screenings)?;
    write_parquet("screenings", &config.screenings_path(), &screenings)?;
    Ok(())
}
