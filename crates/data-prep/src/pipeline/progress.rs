//! Progress and log reporting for the cleaning pipeline.
//!
//! Every stage describes its effect (rows removed, columns renamed, fill
//! values used) as a [`ProgressUpdate`] sent to an injected
//! [`ProgressReporter`]. The pipeline never writes to a global sink directly;
//! the default [`TracingReporter`] forwards updates to `tracing`.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_prep::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Stages of the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Pipeline is starting and recording the input shape
    Initializing,
    /// Trimming whitespace around column names
    NormalizingColumns,
    /// Dropping exact-duplicate rows
    RemovingDuplicates,
    /// Filling missing values with mean or mode
    ImputingValues,
    /// Dropping rows with extreme z-scores
    RemovingOutliers,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::NormalizingColumns => "Normalizing Column Names",
            Self::RemovingDuplicates => "Removing Duplicates",
            Self::ImputingValues => "Imputing Values",
            Self::RemovingOutliers => "Removing Outliers",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall pipeline (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.05,
            Self::NormalizingColumns => 0.05,
            Self::RemovingDuplicates => 0.20,
            Self::ImputingValues => 0.40,
            Self::RemovingOutliers => 0.30,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    ///
    /// Summed from the weights of the stages before it, so a stage's end
    /// (`base_progress() + weight()`) is exactly the next stage's start.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            stage => Self::ORDERED
                .iter()
                .take_while(|s| *s != stage)
                .map(|s| s.weight())
                .fold(0.0, |acc, w| acc + w),
        }
    }

    /// Cumulative progress at the end of this stage.
    pub fn end_progress(&self) -> f32 {
        self.base_progress() + self.weight()
    }

    /// Working stages in execution order.
    const ORDERED: [CleaningStage; 5] = [
        Self::Initializing,
        Self::NormalizingColumns,
        Self::RemovingDuplicates,
        Self::ImputingValues,
        Self::RemovingOutliers,
    ];
}

/// Severity of a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single leveled message emitted by a pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: CleaningStage,

    /// Severity of the message
    pub level: LogLevel,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing the stage's effect
    pub message: String,
}

impl ProgressUpdate {
    /// Creates an info-level update for a stage.
    pub fn new(stage: CleaningStage, stage_progress: f32, message: impl Into<String>) -> Self {
        Self::with_level(stage, LogLevel::Info, stage_progress, message)
    }

    /// Creates an update with an explicit level.
    pub fn with_level(
        stage: CleaningStage,
        level: LogLevel,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        let progress = (stage.base_progress() + stage.weight() * stage_progress.clamp(0.0, 1.0))
            .min(stage.end_progress());
        Self {
            stage,
            level,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a debug-level update for a stage.
    pub fn debug(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self::with_level(stage, LogLevel::Debug, 0.0, message)
    }

    /// Creates a completion update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Complete,
            level: LogLevel::Info,
            progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failure update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Failed,
            level: LogLevel::Error,
            progress: 0.0,
            message: message.into(),
        }
    }
}

/// Trait for receiving the messages emitted by the cleaning stages.
///
/// Implementations must be `Send + Sync` so a pipeline holding one can be
/// moved to a worker thread.
pub trait ProgressReporter: Send + Sync {
    /// Called once per message. Implementations should be cheap.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

/// Reporter that forwards every update to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, update: ProgressUpdate) {
        let stage = update.stage.display_name();
        match update.level {
            LogLevel::Debug => debug!(stage, "{}", update.message),
            LogLevel::Info => info!(stage, "{}", update.message),
            LogLevel::Warn => warn!(stage, "{}", update.message),
            LogLevel::Error => error!(stage, "{}", update.message),
        }
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
static_assertions::assert_impl_all!(TracingReporter: ProgressReporter);
