//! TOML configuration.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! standard four-tier assessment with 24/48 word rounds.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::estimator::DEFAULT_TOTAL_WORDS;
use crate::leveler::LevelerConfig;
use crate::model::{default_tiers, TierRange, TierSpec};
use crate::survey::MarginPreset;

/// A tier entry: label, estimation range and optional word-list file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub label: String,
    pub min_words: u64,
    pub max_words: u64,
    /// Word-list file for this tier.
    #[serde(default)]
    pub words: Option<PathBuf>,
}

impl TierConfig {
    pub fn range(&self) -> TierRange {
        TierRange::new(self.min_words, self.max_words)
    }

    pub fn spec(&self) -> TierSpec {
        TierSpec {
            label: self.label.clone(),
            range: self.range(),
        }
    }
}

/// Settings for the flat survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Dictionary file the survey samples from.
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
    /// Size of the full dictionary the sample is projected onto.
    #[serde(default = "default_total_words")]
    pub total_words: u64,
    #[serde(default)]
    pub margin: MarginPreset,
}

fn default_total_words() -> u64 {
    DEFAULT_TOTAL_WORDS
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            total_words: default_total_words(),
            margin: MarginPreset::default(),
        }
    }
}

/// Top-level lexiprobe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiprobeConfig {
    #[serde(default)]
    pub leveler: LevelerConfig,
    /// Tiers from easiest to hardest.
    #[serde(default = "default_tier_configs")]
    pub tiers: Vec<TierConfig>,
    #[serde(default)]
    pub survey: SurveyConfig,
    /// Fixed shuffle seed; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tier_configs() -> Vec<TierConfig> {
    default_tiers()
        .into_iter()
        .map(|t| TierConfig {
            label: t.label,
            min_words: t.range.min_words,
            max_words: t.range.max_words,
            words: None,
        })
        .collect()
}

impl Default for LexiprobeConfig {
    fn default() -> Self {
        Self {
            leveler: LevelerConfig::default(),
            tiers: default_tier_configs(),
            survey: SurveyConfig::default(),
            seed: None,
        }
    }
}

impl LexiprobeConfig {
    /// Word-list files of all tiers, failing on the first tier without one.
    pub fn tier_word_paths(&self) -> Result<Vec<PathBuf>> {
        self.tiers
            .iter()
            .map(|t| {
                t.words
                    .clone()
                    .with_context(|| format!("tier '{}' has no word list configured", t.label))
            })
            .collect()
    }

    pub fn tier_specs(&self) -> Vec<TierSpec> {
        self.tiers.iter().map(TierConfig::spec).collect()
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!(
            "{}{}{}",
            &result[..start],
            value,
            &result[start + end + 1..]
        );
        cursor = start + value.len();
    }
    result
}

/// Expand env vars and anchor relative paths at `base`.
fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    let expanded = PathBuf::from(resolve_env_vars(&path.to_string_lossy()));
    match base {
        Some(base) if expanded.is_relative() => base.join(expanded),
        _ => expanded,
    }
}

/// Parse a TOML string into a config. Relative word-list paths are
/// resolved against `base_dir` when given.
pub fn parse_config_str(content: &str, base_dir: Option<&Path>) -> Result<LexiprobeConfig> {
    let mut config: LexiprobeConfig =
        toml::from_str(content).context("failed to parse lexiprobe config")?;

    for tier in &mut config.tiers {
        tier.words = tier.words.as_deref().map(|p| resolve_path(p, base_dir));
    }
    config.survey.dictionary = config
        .survey
        .dictionary
        .as_deref()
        .map(|p| resolve_path(p, base_dir));

    Ok(config)
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `lexiprobe.toml` in the current directory
/// 2. `~/.config/lexiprobe/config.toml`
///
/// `LEXIPROBE_SEED` overrides the shuffle seed.
pub fn load_config_from(path: Option<&Path>) -> Result<LexiprobeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("lexiprobe.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let base = path.parent().filter(|p| !p.as_os_str().is_empty());
            tracing::debug!(path = %path.display(), "loading config");
            parse_config_str(&content, base)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LexiprobeConfig::default(),
    };

    if let Ok(seed) = std::env::var("LEXIPROBE_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("LEXIPROBE_SEED is not a number: {seed}"))?;
        config.seed = Some(seed);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lexiprobe"))
}

/// A warning from config validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The tier label (if applicable).
    pub tier: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn general(message: impl Into<String>) -> Self {
        Self {
            tier: None,
            message: message.into(),
        }
    }

    fn tier(label: &str, message: impl Into<String>) -> Self {
        Self {
            tier: Some(label.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a config for common issues.
pub fn validate_config(config: &LexiprobeConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Err(e) = config.leveler.validate() {
        warnings.push(ValidationWarning::general(e.to_string()));
    }

    if config.leveler.refinement_sample_size == 0 {
        warnings.push(ValidationWarning::general(
            "refinement_sample_size is 0, the refinement round will be empty",
        ));
    }

    if !(0.0..=1.0).contains(&config.leveler.inconclusive_fraction) {
        warnings.push(ValidationWarning::general(format!(
            "inconclusive_fraction {} is outside [0, 1]",
            config.leveler.inconclusive_fraction
        )));
    }

    if config.tiers.is_empty() {
        warnings.push(ValidationWarning::general("no tiers configured"));
    }

    for tier in &config.tiers {
        let range = tier.range();
        if range.is_inverted() {
            warnings.push(ValidationWarning::tier(
                &tier.label,
                format!("min_words {} > max_words {}", range.min_words, range.max_words),
            ));
        } else if range.span() == 0 {
            warnings.push(ValidationWarning::tier(&tier.label, "word range is empty"));
        }

        match &tier.words {
            Some(path) if !path.exists() => warnings.push(ValidationWarning::tier(
                &tier.label,
                format!("word list not found: {}", path.display()),
            )),
            None => warnings.push(ValidationWarning::tier(&tier.label, "no word list configured")),
            _ => {}
        }
    }

    for pair in config.tiers.windows(2) {
        if pair[0].range().overlaps(&pair[1].range()) {
            warnings.push(ValidationWarning::tier(
                &pair[1].label,
                format!("word range overlaps tier '{}'", pair[0].label),
            ));
        }
    }

    if config.survey.total_words < 2 {
        warnings.push(ValidationWarning::general(format!(
            "survey total_words {} is too small",
            config.survey.total_words
        )));
    } else if u64::from(config.survey.margin.sample_size()) > config.survey.total_words {
        warnings.push(ValidationWarning::general(format!(
            "survey sample of {} exceeds total_words {}",
            config.survey.margin.sample_size(),
            config.survey.total_words
        )));
    }

    if let Some(path) = &config.survey.dictionary {
        if !path.exists() {
            warnings.push(ValidationWarning::general(format!(
                "survey dictionary not found: {}",
                path.display()
            )));
        }
    }

    warnings
}
