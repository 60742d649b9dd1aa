//! The `lexiprobe estimate` command.

use anyhow::Result;

use lexiprobe_core::estimator::{estimate, estimate_vocabulary, EstimationMode, DEFAULT_TOTAL_WORDS};
use lexiprobe_core::model::TierRange;

use crate::output;

pub fn execute(
    known: u32,
    sample: u32,
    active: Option<u32>,
    total_words: Option<u64>,
    range: Option<(u64, u64)>,
    inconclusive_fraction: f64,
    format: String,
) -> Result<()> {
    let mode = match range {
        Some((min_words, max_words)) => EstimationMode::ProportionalRange {
            range: TierRange::new(min_words, max_words),
        },
        None => EstimationMode::TotalPopulation {
            total_words: total_words.unwrap_or(DEFAULT_TOTAL_WORDS),
        },
    };

    match active {
        Some(active) => {
            let result = estimate_vocabulary(known, active, sample, &mode, inconclusive_fraction)?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&result)?),
                _ => output::print_vocabulary(&result),
            }
        }
        None => {
            let result = estimate(known, sample, &mode)?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&result)?),
                _ => output::print_estimate("Known", &result),
            }
        }
    }

    Ok(())
}
