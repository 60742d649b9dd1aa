//! Plain-text word lists.
//!
//! Files hold one word per line. Blank lines and `#` comments are skipped,
//! surrounding whitespace is trimmed, and duplicates keep their first
//! position.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::try_join_all;

/// Parse word-list text into distinct words.
pub fn parse_word_list(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|word| seen.insert(*word))
        .map(str::to_owned)
        .collect()
}

/// Read and parse a word-list file. An empty list is an error.
pub async fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read word list: {}", path.display()))?;

    let words = parse_word_list(&content);
    if words.is_empty() {
        anyhow::bail!("word list is empty: {}", path.display());
    }
    tracing::debug!(path = %path.display(), words = words.len(), "loaded word list");
    Ok(words)
}

/// Load tier word lists concurrently, keeping the order of `paths`.
pub async fn load_tiers(paths: &[PathBuf]) -> Result<Vec<Vec<String>>> {
    if paths.is_empty() {
        anyhow::bail!("no tier word lists given");
    }
    try_join_all(paths.iter().map(|p| load_word_list(p))).await
}
