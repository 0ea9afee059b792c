//! Log lines for table export and generation warnings
//!
//! Every Parquet table the generator writes is announced before the write
//! and reported with its row count afterwards, so runs can be compared from
//! the log alone.

use std::path::Path;
use std::time::Duration;

/// Announce that a table is about to be written
///
/// # Arguments
/// * `table` - Name of the table, e.g. `demographics`
/// * `path` - Destination Parquet file
pub fn log_table_write_start(table: &str, path: &Path) {
    log::info!("Writing {table} table to {}", path.display());
}

/// Report a finished table write
///
/// # Arguments
/// * `table` - Name of the table
/// * `path` - Parquet file that was written
/// * `rows` - Number of rows in the file
/// * `elapsed` - Time spent encoding and writing, when measured
pub fn log_table_written(table: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => log::info!(
            "Wrote {rows} {table} rows to {} in {duration:?}",
            path.display()
        ),
        None => log::info!("Wrote {rows} {table} rows to {}", path.display()),
    }
}

/// Log a warning, optionally tied to a file
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
