//! The `lexiprobe validate` command.

use std::path::PathBuf;

use anyhow::Result;

use lexiprobe_core::config::{load_config_from, validate_config};
use lexiprobe_core::wordlist::load_word_list;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    println!("Tiers: {}", config.tiers.len());
    for (i, tier) in config.tiers.iter().enumerate() {
        let words = match &tier.words {
            Some(path) if path.exists() => match load_word_list(path).await {
                Ok(words) => format!("{} words", words.len()),
                Err(e) => format!("unreadable ({e})"),
            },
            _ => "no word list".to_string(),
        };
        println!(
            "  {}. {} [{} - {}] {words}",
            i + 1,
            tier.label,
            tier.min_words,
            tier.max_words
        );
    }

    let warnings = validate_config(&config);
    for w in &warnings {
        let prefix = w
            .tier
            .as_ref()
            .map(|label| format!("  [{label}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Config valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
