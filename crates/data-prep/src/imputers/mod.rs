//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their mean, categorical columns with
//! their mode.

mod statistical;

pub use statistical::StatisticalImputer;
