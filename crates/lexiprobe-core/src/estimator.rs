//! Vocabulary size estimation with 95% confidence intervals.
//!
//! Two strategies project a sample count onto a population:
//!
//! - [`EstimationMode::ProportionalRange`] interpolates inside a tier's
//!   word-count range, with a plain binomial standard error.
//! - [`EstimationMode::TotalPopulation`] scales the sample proportion to the
//!   full dictionary, with a finite-population correction.

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::model::TierRange;

/// z-score of a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// Default size of the reference Portuguese dictionary.
pub const DEFAULT_TOTAL_WORDS: u64 = 312_368;

/// How a sample proportion is projected onto a population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EstimationMode {
    /// Interpolate within a tier's `(min_words, max_words)`.
    ProportionalRange { range: TierRange },
    /// Scale to a dictionary of `total_words`.
    TotalPopulation { total_words: u64 },
}

/// A point estimate with its 95% interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub point_estimate: u64,
    pub lower_bound: u64,
    pub upper_bound: u64,
    /// Known words over sample size.
    pub sample_proportion: f64,
    /// Half-width of the interval as a percentage of the proportion scale.
    pub margin_of_error_percent: f64,
    pub standard_error: f64,
}

/// Estimate a population count from `known` words out of `sample_size`.
pub fn estimate(
    known: u32,
    sample_size: u32,
    mode: &EstimationMode,
) -> Result<EstimationResult, EstimateError> {
    if sample_size == 0 {
        return Err(EstimateError::EmptySample);
    }
    if known > sample_size {
        return Err(EstimateError::KnownExceedsSample { known, sample_size });
    }

    match *mode {
        EstimationMode::ProportionalRange { range } => proportional_range(known, sample_size, range),
        EstimationMode::TotalPopulation { total_words } => {
            total_population(known, sample_size, total_words)
        }
    }
}

fn proportional_range(
    known: u32,
    sample_size: u32,
    range: TierRange,
) -> Result<EstimationResult, EstimateError> {
    if range.is_inverted() {
        return Err(EstimateError::InvertedRange {
            min_words: range.min_words,
            max_words: range.max_words,
        });
    }

    let n = f64::from(sample_size);
    let p = f64::from(known) / n;
    let min = range.min_words as f64;
    let max = range.max_words as f64;
    let span = max - min;

    let standard_error = (p * (1.0 - p) / n).sqrt();
    let margin = Z_95 * standard_error;
    let project = |proportion: f64| (proportion * span + min).clamp(min, max).round() as u64;

    Ok(EstimationResult {
        point_estimate: project(p),
        lower_bound: project(p - margin),
        upper_bound: project(p + margin),
        sample_proportion: p,
        margin_of_error_percent: margin * 100.0,
        standard_error,
    })
}

fn total_population(
    known: u32,
    sample_size: u32,
    total_words: u64,
) -> Result<EstimationResult, EstimateError> {
    if total_words < 2 {
        return Err(EstimateError::PopulationTooSmall(total_words));
    }
    if u64::from(sample_size) > total_words {
        return Err(EstimateError::SampleExceedsPopulation {
            sample_size,
            total_words,
        });
    }

    let n = f64::from(sample_size);
    let total = total_words as f64;
    let p_hat = f64::from(known) / n;

    let finite_correction = (total - n) / (total - 1.0);
    let standard_error = ((p_hat * (1.0 - p_hat) / n) * finite_correction).sqrt();
    let margin = Z_95 * standard_error;

    let lower = (p_hat - margin).max(0.0);
    let upper = (p_hat + margin).min(1.0);

    Ok(EstimationResult {
        point_estimate: (p_hat * total).round() as u64,
        lower_bound: (lower * total).round() as u64,
        upper_bound: (upper * total).round() as u64,
        sample_proportion: p_hat,
        margin_of_error_percent: margin * 100.0,
        standard_error,
    })
}

/// Final result of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VocabularyEstimate {
    /// Too few recognized words for a meaningful projection.
    Inconclusive { passive: u32, sample_size: u32 },
    Estimated {
        passive: EstimationResult,
        active: EstimationResult,
        /// Active count over passive count (passive floored at 1).
        active_ratio: f64,
    },
}

impl VocabularyEstimate {
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, VocabularyEstimate::Inconclusive { .. })
    }
}

/// Estimate passive and active vocabulary from the counts of one sample.
///
/// A passive count below `inconclusive_fraction` of the sample, or an empty
/// sample, yields [`VocabularyEstimate::Inconclusive`].
pub fn estimate_vocabulary(
    passive: u32,
    active: u32,
    sample_size: u32,
    mode: &EstimationMode,
    inconclusive_fraction: f64,
) -> Result<VocabularyEstimate, EstimateError> {
    if sample_size == 0 || f64::from(passive) < f64::from(sample_size) * inconclusive_fraction {
        tracing::debug!(passive, sample_size, "inconclusive sample");
        return Ok(VocabularyEstimate::Inconclusive {
            passive,
            sample_size,
        });
    }

    let passive_estimate = estimate(passive, sample_size, mode)?;
    let active_estimate = estimate(active, sample_size, mode)?;

    Ok(VocabularyEstimate::Estimated {
        passive: passive_estimate,
        active: active_estimate,
        active_ratio: f64::from(active) / f64::from(passive.max(1)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leveler::LevelerConfig;

    const TOTAL: EstimationMode = EstimationMode::TotalPopulation {
        total_words: DEFAULT_TOTAL_WORDS,
    };

    fn range_mode(min: u64, max: u64) -> EstimationMode {
        EstimationMode::ProportionalRange {
            range: TierRange::new(min, max),
        }
    }

    #[test]
    fn total_population_nothing_known() {
        let r = estimate(0, 147, &TOTAL).unwrap();
        assert_eq!(r.point_estimate, 0);
        assert_eq!(r.lower_bound, 0);
        assert_eq!(r.upper_bound, 0);
        assert_eq!(r.sample_proportion, 0.0);
    }

    #[test]
    fn total_population_everything_known() {
        let r = estimate(147, 147, &TOTAL).unwrap();
        assert_eq!(r.point_estimate, 312_368);
        assert_eq!(r.upper_bound, 312_368);
        assert_eq!(r.lower_bound, 312_368);
    }

    #[test]
    fn total_population_applies_finite_correction() {
        let mode = EstimationMode::TotalPopulation { total_words: 1000 };
        let r = estimate(50, 100, &mode).unwrap();
        assert_eq!(r.point_estimate, 500);
        assert_eq!(r.lower_bound, 407);
        assert_eq!(r.upper_bound, 593);
        assert!((r.margin_of_error_percent - 9.3017).abs() < 1e-3, "{r:?}");

        // Without the correction the interval would be wider.
        let uncorrected = Z_95 * (0.25f64 / 100.0).sqrt() * 100.0;
        assert!(r.margin_of_error_percent < uncorrected);
    }

    #[test]
    fn total_population_interval_contains_estimate() {
        for known in [1, 20, 73, 120, 146] {
            let r = estimate(known, 147, &TOTAL).unwrap();
            assert!(r.lower_bound <= r.point_estimate, "{known}: {r:?}");
            assert!(r.point_estimate <= r.upper_bound, "{known}: {r:?}");
            assert!(r.upper_bound <= DEFAULT_TOTAL_WORDS);
        }
    }

    #[test]
    fn proportional_range_midpoint() {
        let r = estimate(18, 36, &range_mode(3_000, 18_000)).unwrap();
        assert_eq!(r.point_estimate, 10_500);
        assert_eq!(r.lower_bound, 8_050);
        assert_eq!(r.upper_bound, 12_950);
        assert!((r.sample_proportion - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn proportional_range_bounds_are_clamped() {
        let mode = range_mode(3_000, 18_000);
        let low = estimate(1, 36, &mode).unwrap();
        assert_eq!(low.lower_bound, 3_000);

        let none = estimate(0, 36, &mode).unwrap();
        assert_eq!(none.point_estimate, 3_000);
        assert_eq!(none.upper_bound, 3_000);

        let all = estimate(36, 36, &mode).unwrap();
        assert_eq!(all.point_estimate, 18_000);
        assert_eq!(all.upper_bound, 18_000);
    }

    #[test]
    fn estimate_is_deterministic() {
        for mode in [TOTAL, range_mode(3_000, 18_000)] {
            let a = estimate(17, 36, &mode).unwrap();
            let b = estimate(17, 36, &mode).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.standard_error.to_bits(), b.standard_error.to_bits());
        }
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(estimate(0, 0, &TOTAL), Err(EstimateError::EmptySample));
        assert!(matches!(
            estimate(5, 4, &TOTAL),
            Err(EstimateError::KnownExceedsSample { known: 5, sample_size: 4 })
        ));
        let tiny = EstimationMode::TotalPopulation { total_words: 1 };
        assert_eq!(estimate(0, 1, &tiny), Err(EstimateError::PopulationTooSmall(1)));
        let small = EstimationMode::TotalPopulation { total_words: 10 };
        let err = estimate(3, 20, &small).unwrap_err();
        assert!(err.is_parameter_error());
        let inverted = estimate(1, 2, &range_mode(10, 5)).unwrap_err();
        assert!(matches!(inverted, EstimateError::InvertedRange { .. }));
    }

    #[test]
    fn vocabulary_inconclusive_below_fraction() {
        let v = estimate_vocabulary(22, 10, 147, &TOTAL, 0.15).unwrap();
        assert!(v.is_inconclusive());
        assert_eq!(
            v,
            VocabularyEstimate::Inconclusive {
                passive: 22,
                sample_size: 147
            }
        );
    }

    #[test]
    fn vocabulary_inconclusive_boundary() {
        let fraction = LevelerConfig::default().inconclusive_fraction;
        let refinement = range_mode(500, 3_000);
        assert!(estimate_vocabulary(7, 0, 48, &refinement, fraction)
            .unwrap()
            .is_inconclusive());
        assert!(!estimate_vocabulary(8, 0, 48, &refinement, fraction)
            .unwrap()
            .is_inconclusive());
        assert!(!estimate_vocabulary(23, 0, 147, &TOTAL, fraction)
            .unwrap()
            .is_inconclusive());
    }

    #[test]
    fn vocabulary_empty_sample_is_inconclusive() {
        let v = estimate_vocabulary(0, 0, 0, &TOTAL, 0.15).unwrap();
        assert!(v.is_inconclusive());
    }

    #[test]
    fn vocabulary_estimates_both_counts() {
        let v = estimate_vocabulary(24, 12, 48, &range_mode(3_000, 18_000), 0.15).unwrap();
        let VocabularyEstimate::Estimated {
            passive,
            active,
            active_ratio,
        } = v
        else {
            panic!("expected an estimate, got {v:?}");
        };
        assert_eq!(passive.point_estimate, 10_500);
        assert_eq!(active.point_estimate, 6_750);
        assert!((active_ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mode_serializes_with_tag() {
        let json = serde_json::to_string(&TOTAL).unwrap();
        assert!(json.contains("\"mode\":\"total_population\""));
        let back: EstimationMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TOTAL);
    }
}
