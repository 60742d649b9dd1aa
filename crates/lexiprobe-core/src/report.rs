//! Assessment reports with JSON persistence.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EstimateError;
use crate::estimator::{estimate_vocabulary, EstimationMode, EstimationResult, VocabularyEstimate};
use crate::leveler::Session;
use crate::model::{RoundScore, TierSpec};
use crate::survey::{MarginPreset, Survey};

/// Which kind of assessment produced the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentKind {
    /// Adaptive tier search. `final_tier` is `None` when the test-taker
    /// stayed below the lowest tier or dropped back to a lower one;
    /// `refined_tier` tells the two apart.
    Leveled {
        final_tier: Option<usize>,
        #[serde(default)]
        refined_tier: Option<usize>,
        tier_label: Option<String>,
        rounds: usize,
    },
    /// Flat dictionary survey.
    Survey { preset: MarginPreset, total_words: u64 },
}

impl AssessmentKind {
    /// Human-readable tier placement; `None` for surveys.
    pub fn tier_summary(&self) -> Option<String> {
        let AssessmentKind::Leveled {
            final_tier,
            refined_tier,
            tier_label,
            ..
        } = self
        else {
            return None;
        };
        let label = tier_label
            .as_deref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        Some(match (final_tier, refined_tier) {
            (Some(t), _) => format!("{t}{label}"),
            (None, Some(t)) => format!("not pinned, refined in tier {t}{label}"),
            (None, None) => "below the lowest tier".to_string(),
        })
    }
}

/// A complete assessment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub kind: AssessmentKind,
    /// Counts the estimate was computed from.
    pub score: RoundScore,
    pub estimate: VocabularyEstimate,
}

impl AssessmentReport {
    fn new(kind: AssessmentKind, score: RoundScore, estimate: VocabularyEstimate) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            kind,
            score,
            estimate,
        }
    }

    /// Build the report of a finished leveled session.
    ///
    /// The final round is projected onto the range of the tier it was drawn
    /// from. A session that ended below the lowest tier is reported as
    /// inconclusive.
    pub fn from_session(session: &Session, tiers: &[TierSpec]) -> Result<Self, EstimateError> {
        let score = session.final_score().unwrap_or_default();
        let refined_tier = session.refined_tier();
        let spec = refined_tier.and_then(|t| tiers.get(t - 1));

        let estimate = match spec {
            Some(spec) => estimate_vocabulary(
                score.passive,
                score.active,
                score.drawn,
                &EstimationMode::ProportionalRange { range: spec.range },
                session.config().inconclusive_fraction,
            )?,
            None => VocabularyEstimate::Inconclusive {
                passive: score.passive,
                sample_size: score.drawn,
            },
        };

        Ok(Self::new(
            AssessmentKind::Leveled {
                final_tier: session.final_tier(),
                refined_tier,
                tier_label: spec.map(|s| s.label.clone()),
                rounds: session.rounds_completed(),
            },
            score,
            estimate,
        ))
    }

    /// Build the report of a finished survey.
    pub fn from_survey(survey: &Survey, inconclusive_fraction: f64) -> Result<Self, EstimateError> {
        let estimate = survey.estimate(inconclusive_fraction)?;
        Ok(Self::new(
            AssessmentKind::Survey {
                preset: survey.preset(),
                total_words: survey.total_words(),
            },
            survey.score(),
            estimate,
        ))
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// File name used when saving into an output directory.
    pub fn file_name(&self) -> String {
        format!("lexiprobe-{}.json", self.id)
    }

    /// Render the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# Vocabulary assessment\n");

        match &self.kind {
            AssessmentKind::Leveled { rounds, .. } => {
                if let Some(tier) = self.kind.tier_summary() {
                    let _ = writeln!(md, "- Tier: {tier}");
                }
                let _ = writeln!(md, "- Rounds: {rounds}");
            }
            AssessmentKind::Survey {
                preset,
                total_words,
            } => {
                let _ = writeln!(
                    md,
                    "- Survey: {preset} (±{}%) over {total_words} words",
                    preset.margin_percent()
                );
            }
        }
        let _ = writeln!(
            md,
            "- Sample: {} recognized and {} mastered of {} tested\n",
            self.score.passive, self.score.active, self.score.drawn
        );

        match &self.estimate {
            VocabularyEstimate::Inconclusive { .. } => {
                let _ = writeln!(md, "**Inconclusive**: not enough recognized words for a reliable estimate.");
            }
            VocabularyEstimate::Estimated {
                passive,
                active,
                active_ratio,
            } => {
                md.push_str("| Vocabulary | Estimate | 95% interval | Margin |\n");
                md.push_str("|------------|----------|--------------|--------|\n");
                push_row(&mut md, "Passive", passive);
                push_row(&mut md, "Active", active);
                let _ = writeln!(md, "\nActive/passive ratio: {:.0}%", active_ratio * 100.0);
            }
        }
        md
    }
}

fn push_row(md: &mut String, name: &str, r: &EstimationResult) {
    let _ = writeln!(
        md,
        "| {name} | {} | {}–{} | ±{:.1}% |",
        r.point_estimate, r.lower_bound, r.upper_bound, r.margin_of_error_percent
    );
}
