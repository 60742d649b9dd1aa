//! The `lexiprobe level` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use lexiprobe_core::config::load_config_from;
use lexiprobe_core::leveler::Session;
use lexiprobe_core::report::AssessmentReport;
use lexiprobe_core::sampler::shuffler_for;
use lexiprobe_core::wordlist::load_tiers;

use crate::interactive::{self, Outcome};
use crate::output;

pub async fn execute(
    config_path: Option<PathBuf>,
    tier_files: Vec<PathBuf>,
    seed: Option<u64>,
    output_dir: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let paths = if tier_files.is_empty() {
        config.tier_word_paths()?
    } else {
        tier_files
    };
    let specs = config.tier_specs();
    anyhow::ensure!(
        paths.len() <= specs.len(),
        "got {} tier word lists but only {} tiers are configured",
        paths.len(),
        specs.len()
    );

    let words = load_tiers(&paths).await?;
    let seed = seed.or(config.seed);
    tracing::debug!(tiers = words.len(), ?seed, "word lists loaded");
    let mut session = Session::start(words, config.leveler.clone(), shuffler_for(seed))
        .context("failed to start assessment")?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if interactive::run(&mut session, stdin.lock(), &mut stdout)? == Outcome::Quit {
        println!("Assessment abandoned.");
        return Ok(());
    }

    let report = AssessmentReport::from_session(&session, &specs[..paths.len()])?;
    output::print_report(&report, &format)?;
    tracing::info!(
        id = %report.id,
        final_tier = ?session.final_tier(),
        refined_tier = ?session.refined_tier(),
        "assessment finished"
    );
    if let Some(dir) = output_dir {
        output::save_report(&report, &dir)?;
    }
    Ok(())
}
