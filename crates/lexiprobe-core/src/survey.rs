//! Flat, non-adaptive vocabulary survey.
//!
//! One sample is drawn from the whole dictionary and scored against the
//! dictionary size with the finite-population estimator.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::estimator::{estimate_vocabulary, EstimationMode, VocabularyEstimate};
use crate::model::{Grade, RoundScore, RoundStatus};
use crate::round::{AnswerRecord, Round};
use crate::sampler::{draw_sample, Shuffler};

/// Named sample size with its advertised margin of error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginPreset {
    /// 5 words, ±50%.
    Rough,
    /// 147 words, ±7%.
    Standard,
    /// 289 words, ±5%.
    #[default]
    Precise,
}

impl MarginPreset {
    pub fn sample_size(self) -> u32 {
        match self {
            MarginPreset::Rough => 5,
            MarginPreset::Standard => 147,
            MarginPreset::Precise => 289,
        }
    }

    pub fn margin_percent(self) -> u32 {
        match self {
            MarginPreset::Rough => 50,
            MarginPreset::Standard => 7,
            MarginPreset::Precise => 5,
        }
    }
}

impl fmt::Display for MarginPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginPreset::Rough => write!(f, "rough"),
            MarginPreset::Standard => write!(f, "standard"),
            MarginPreset::Precise => write!(f, "precise"),
        }
    }
}

impl FromStr for MarginPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rough" | "50" => Ok(MarginPreset::Rough),
            "standard" | "7" => Ok(MarginPreset::Standard),
            "precise" | "5" => Ok(MarginPreset::Precise),
            other => Err(format!("unknown margin preset: {other}")),
        }
    }
}

/// A single-round survey over the full dictionary.
pub struct Survey {
    preset: MarginPreset,
    total_words: u64,
    round: Round,
}

impl fmt::Debug for Survey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Survey")
            .field("preset", &self.preset)
            .field("total_words", &self.total_words)
            .field("index", &self.round.index())
            .field("drawn", &self.round.drawn())
            .finish()
    }
}

impl Survey {
    /// Draw the survey sample. A dictionary smaller than the preset gives a
    /// shorter survey.
    pub fn start(
        dictionary: &[String],
        preset: MarginPreset,
        total_words: u64,
        shuffler: &mut dyn Shuffler,
    ) -> Self {
        let sample = draw_sample(
            dictionary,
            &HashSet::new(),
            preset.sample_size() as usize,
            shuffler,
        );
        tracing::info!(
            %preset,
            drawn = sample.len(),
            dictionary = dictionary.len(),
            total_words,
            "starting survey"
        );
        Self {
            preset,
            total_words,
            round: Round::new(sample),
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.round.current_word()
    }

    pub fn submit_answer(&mut self, grade: Grade) -> RoundStatus {
        if self.round.answer(grade).is_none() || self.round.is_exhausted() {
            RoundStatus::SessionDone
        } else {
            RoundStatus::Continue
        }
    }

    /// Take back the last answer; `false` at the start or once finished.
    pub fn undo(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        self.round.undo().is_some()
    }

    pub fn is_done(&self) -> bool {
        self.round.is_exhausted()
    }

    pub fn preset(&self) -> MarginPreset {
        self.preset
    }

    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    pub fn index(&self) -> usize {
        self.round.index()
    }

    pub fn len(&self) -> usize {
        self.round.drawn()
    }

    pub fn is_empty(&self) -> bool {
        self.round.drawn() == 0
    }

    pub fn score(&self) -> RoundScore {
        self.round.score()
    }

    pub fn history(&self) -> &[AnswerRecord] {
        self.round.history()
    }

    pub fn mode(&self) -> EstimationMode {
        EstimationMode::TotalPopulation {
            total_words: self.total_words,
        }
    }

    /// Passive and active estimates over the dictionary.
    pub fn estimate(&self, inconclusive_fraction: f64) -> Result<VocabularyEstimate, EstimateError> {
        let score = self.round.score();
        estimate_vocabulary(
            score.passive,
            score.active,
            score.drawn,
            &self.mode(),
            inconclusive_fraction,
        )
    }
}
