//! Core data model types for lexiprobe.
//!
//! Grades, phases, tier ranges and round scores shared by the leveler, the
//! survey and the estimator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GradeError;

/// Self-reported knowledge of a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Unknown.
    A,
    /// Vaguely familiar.
    B,
    /// Recognized when read or heard.
    C,
    /// Mastered and used actively.
    D,
}

impl Grade {
    /// All grades in ascending order.
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];

    /// Counts toward passive vocabulary (C or D).
    pub fn is_passive(self) -> bool {
        matches!(self, Grade::C | Grade::D)
    }

    /// Counts toward active vocabulary (D only).
    pub fn is_active(self) -> bool {
        self == Grade::D
    }

    /// Short description shown next to the answer key.
    pub fn description(self) -> &'static str {
        match self {
            Grade::A => "I don't know this word",
            Grade::B => "I've seen it but don't know what it means",
            Grade::C => "I understand it but don't use it",
            Grade::D => "I know it and use it",
        }
    }

    /// The keyboard digit that selects this grade.
    pub fn key(self) -> char {
        match self {
            Grade::A => '1',
            Grade::B => '2',
            Grade::C => '3',
            Grade::D => '4',
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
        }
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" | "1" => Ok(Grade::A),
            "B" | "2" => Ok(Grade::B),
            "C" | "3" => Ok(Grade::C),
            "D" | "4" => Ok(Grade::D),
            other => Err(GradeError(other.to_string())),
        }
    }
}

/// Which kind of round a session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Adaptive search for the tier.
    Finding,
    /// Larger fixed-tier sample.
    Refinement,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Finding => write!(f, "finding"),
            Phase::Refinement => write!(f, "refinement"),
        }
    }
}

/// Word-count bounds of a difficulty tier, used for interpolated estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRange {
    pub min_words: u64,
    pub max_words: u64,
}

impl TierRange {
    pub fn new(min_words: u64, max_words: u64) -> Self {
        Self {
            min_words,
            max_words,
        }
    }

    /// Width of the range in words.
    pub fn span(&self) -> u64 {
        self.max_words.saturating_sub(self.min_words)
    }

    pub fn is_inverted(&self) -> bool {
        self.min_words > self.max_words
    }

    pub fn overlaps(&self, other: &TierRange) -> bool {
        self.min_words < other.max_words && other.min_words < self.max_words
    }
}

/// A labelled tier with its estimation range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    pub label: String,
    pub range: TierRange,
}

/// The four tiers of the default Portuguese dictionary split.
pub fn default_tiers() -> Vec<TierSpec> {
    [
        ("basic", 500, 3_000),
        ("intermediate", 3_000, 18_000),
        ("fluent", 18_000, 40_000),
        ("proficient", 40_000, 80_000),
    ]
    .into_iter()
    .map(|(label, min, max)| TierSpec {
        label: label.to_string(),
        range: TierRange::new(min, max),
    })
    .collect()
}

/// Counts of a completed round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    /// C or D answers.
    pub passive: u32,
    /// D answers.
    pub active: u32,
    /// Words actually served; below the requested size on a short round.
    pub drawn: u32,
}

/// What happened after an answer was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// More words remain in the current round.
    Continue,
    /// The round finished and a new one has started.
    RoundComplete,
    /// The assessment is over.
    SessionDone,
}
