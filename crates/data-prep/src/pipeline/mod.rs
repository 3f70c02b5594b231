//! Pipeline module.
//!
//! This module provides the pipeline driver and the stages that only make
//! sense inside it.

mod builder;
pub mod outliers;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use outliers::OutlierFilter;
pub use progress::{
    CleaningStage, ClosureProgressReporter, LogLevel, ProgressReporter, ProgressUpdate,
    TracingReporter,
};
