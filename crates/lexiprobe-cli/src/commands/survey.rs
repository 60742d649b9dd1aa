//! The `lexiprobe survey` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use lexiprobe_core::config::load_config_from;
use lexiprobe_core::report::AssessmentReport;
use lexiprobe_core::sampler::shuffler_for;
use lexiprobe_core::survey::{MarginPreset, Survey};
use lexiprobe_core::wordlist::load_word_list;

use crate::interactive::{self, Outcome};
use crate::output;

pub async fn execute(
    config_path: Option<PathBuf>,
    dictionary: Option<PathBuf>,
    margin: Option<String>,
    total_words: Option<u64>,
    seed: Option<u64>,
    output_dir: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let dictionary = dictionary
        .or(config.survey.dictionary.clone())
        .context("no dictionary given, pass --dictionary or set survey.dictionary")?;
    let preset = match margin {
        Some(m) => m.parse::<MarginPreset>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.survey.margin,
    };
    let total_words = total_words.unwrap_or(config.survey.total_words);

    let words = load_word_list(&dictionary).await?;
    tracing::debug!(words = words.len(), %preset, total_words, "dictionary loaded");

    let mut shuffler = shuffler_for(seed.or(config.seed));
    let mut survey = Survey::start(&words, preset, total_words, shuffler.as_mut());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if interactive::run(&mut survey, stdin.lock(), &mut stdout)? == Outcome::Quit {
        println!("Survey abandoned.");
        return Ok(());
    }

    let report = AssessmentReport::from_survey(&survey, config.leveler.inconclusive_fraction)?;
    output::print_report(&report, &format)?;
    if let Some(dir) = output_dir {
        output::save_report(&report, &dir)?;
    }
    Ok(())
}
