//! Logging utilities for output and progress tracking
//!
//! This module provides consistent log messages and progress bars for the
//! generation and export stages.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use log::{log_table_write_start, log_table_written, log_warning};
pub use progress::{create_main_progress_bar, create_spinner, finish_progress_bar};
