//! Engine error types.
//!
//! Only caller contract violations are errors. Outcomes such as an empty
//! word pool or an inconclusive sample are ordinary results and never show
//! up here.

use thiserror::Error;

/// A grade that is not one of `A`, `B`, `C`, `D` (or the keys `1`–`4`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid grade '{0}', expected one of A, B, C, D or 1-4")]
pub struct GradeError(pub String);

/// Errors raised when a session cannot be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No tier word lists were supplied.
    #[error("at least one tier word list is required")]
    NoTiers,

    /// The finding round has no words to serve.
    #[error("finding sample size must be greater than zero")]
    ZeroFindingSample,

    /// Thresholds are not ordered within the finding sample.
    #[error("thresholds must satisfy lower ({lower}) <= upper ({upper}) <= sample size ({sample})")]
    InvalidThresholds { lower: u32, upper: u32, sample: u32 },
}

/// Errors raised by the estimator for inputs that have no defined estimate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// The sample size was zero.
    #[error("sample size must be greater than zero")]
    EmptySample,

    /// More words known than were sampled.
    #[error("known count {known} exceeds sample size {sample_size}")]
    KnownExceedsSample { known: u32, sample_size: u32 },

    /// The population is too small for a finite-population correction.
    #[error("total population must be at least 2 words, got {0}")]
    PopulationTooSmall(u64),

    /// Sampling without replacement cannot draw more than the population.
    #[error("sample size {sample_size} exceeds population of {total_words} words")]
    SampleExceedsPopulation { sample_size: u32, total_words: u64 },

    /// A tier range whose lower bound is above its upper bound.
    #[error("invalid tier range: min {min_words} > max {max_words}")]
    InvertedRange { min_words: u64, max_words: u64 },
}

impl EstimateError {
    /// Returns `true` if the error comes from the population parameters
    /// rather than from the observed counts.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            EstimateError::PopulationTooSmall(_)
                | EstimateError::SampleExceedsPopulation { .. }
                | EstimateError::InvertedRange { .. }
        )
    }
}
