//! Tests for Parquet export of generated cohorts

use std::fs::File;

use arrow::array::{Array, Date32Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use nursing_home_synth::{ExportConfig, PopulationGenerator, export_cohort};

use crate::utils::{scratch_dir, small_config};

fn read_rows(path: &std::path::Path) -> Vec<arrow::record_batch::RecordBatch> {
    let file = File::open(path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    reader.collect::<Result<Vec<_>, _>>().unwrap()
}

#[test]
fn test_export_writes_both_tables() {
    let generator = PopulationGenerator::with_default_tables(small_config(80)).unwrap();
    let cohort = generator.generate().unwrap();

    let config = ExportConfig {
        output_dir: scratch_dir("export").join("nested"),
        ..Default::default()
    };
    export_cohort(&config, &cohort.population.patients, &cohort.screenings).unwrap();

    let demographics = read_rows(&config.demographics_path());
    let rows: usize = demographics.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 80);

    let batch = &demographics[0];
    let death = batch.column_by_name("DateOfDeath").unwrap();
    let censored = cohort
        .population
        .patients
        .iter()
        .take(batch.num_rows())
        .filter(|p| p.is_censored())
        .count();
    assert_eq!(death.null_count(), censored);

    let ids = batch.column_by_name("PatientID").unwrap();
    let first_id = match ids.as_any().downcast_ref::<StringArray>() {
        Some(array) => array.value(0).to_string(),
        None => arrow::array::cast::as_largestring_array(ids.as_ref())
            .value(0)
            .to_string(),
    };
    assert_eq!(first_id, "P00001");

    let births = batch.column_by_name("DateOfBirth").unwrap();
    assert_eq!(births.data_type(), &DataType::Date32);
    let births = births.as_any().downcast_ref::<Date32Array>().unwrap();
    assert_eq!(
        births.value_as_date(0),
        Some(cohort.population.patients[0].date_of_birth)
    );
    assert_eq!(death.data_type(), &DataType::Date32);

    let screenings = read_rows(&config.screenings_path());
    let rows: usize = screenings.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, cohort.screenings.len());
    assert!(screenings[0].column_by_name("CareMinutesPerWeek").is_some());
    let dates = screenings[0].column_by_name("ScreeningDate").unwrap();
    assert_eq!(dates.data_type(), &DataType::Date32);

    let _ = std::fs::remove_dir_all(config.output_dir.parent().unwrap());
}
