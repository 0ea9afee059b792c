//! Utility functions shared by the generator and the binary.

pub mod logging;
