//! Generation algorithms
//!
//! Archetype selection, covariate sampling, the coefficient-linked
//! distribution parameters, patient timelines and population assembly.

pub mod archetype;
pub mod coefficients;
pub mod covariates;
pub mod parameters;
pub mod population;
pub mod timeline;
