//! A single round: one word sample, its answers and running counts.

use serde::{Deserialize, Serialize};

use crate::model::{Grade, RoundScore};

/// One graded word of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub word: String,
    pub grade: Grade,
}

/// Word sample plus answer history for the round in progress.
///
/// Counters only move together with the history, so `passive` and `active`
/// always equal the tallies over `history`.
#[derive(Debug, Clone, Default)]
pub struct Round {
    sample: Vec<String>,
    history: Vec<AnswerRecord>,
    passive: u32,
    active: u32,
}

impl Round {
    pub fn new(sample: Vec<String>) -> Self {
        Self {
            sample,
            history: Vec::new(),
            passive: 0,
            active: 0,
        }
    }

    /// The word awaiting an answer, if any.
    pub fn current_word(&self) -> Option<&str> {
        self.sample.get(self.history.len()).map(String::as_str)
    }

    /// Position of the current word in the sample.
    pub fn index(&self) -> usize {
        self.history.len()
    }

    pub fn drawn(&self) -> usize {
        self.sample.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.history.len() >= self.sample.len()
    }

    /// Grade the current word. Returns the graded word, or `None` when the
    /// round has no word left.
    pub fn answer(&mut self, grade: Grade) -> Option<&str> {
        let word = self.sample.get(self.history.len())?.clone();
        if grade.is_passive() {
            self.passive += 1;
        }
        if grade.is_active() {
            self.active += 1;
        }
        self.history.push(AnswerRecord { word, grade });
        self.history.last().map(|r| r.word.as_str())
    }

    /// Take back the most recent answer.
    pub fn undo(&mut self) -> Option<AnswerRecord> {
        let record = self.history.pop()?;
        if record.grade.is_passive() {
            self.passive -= 1;
        }
        if record.grade.is_active() {
            self.active -= 1;
        }
        Some(record)
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn score(&self) -> RoundScore {
        RoundScore {
            passive: self.passive,
            active: self.active,
            drawn: u32::try_from(self.sample.len()).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(n: usize) -> Round {
        Round::new((0..n).map(|i| format!("w{i}")).collect())
    }

    #[test]
    fn counts_follow_grades() {
        let mut r = round(4);
        for grade in Grade::ALL {
            r.answer(grade);
        }
        let score = r.score();
        assert_eq!(score.passive, 2);
        assert_eq!(score.active, 1);
        assert_eq!(score.drawn, 4);
        assert!(r.is_exhausted());
        assert_eq!(r.current_word(), None);
    }

    #[test]
    fn undo_restores_counts_for_every_grade() {
        for grade in Grade::ALL {
            let mut r = round(3);
            r.answer(Grade::D);
            let before = (r.score(), r.index(), r.current_word().map(str::to_owned));
            r.answer(grade);
            let undone = r.undo().unwrap();
            assert_eq!(undone.grade, grade);
            assert_eq!(undone.word, "w1");
            assert_eq!(
                (r.score(), r.index(), r.current_word().map(str::to_owned)),
                before
            );
        }
    }

    #[test]
    fn undo_on_fresh_round_is_none() {
        let mut r = round(2);
        assert!(r.undo().is_none());
        assert_eq!(r.score(), RoundScore { passive: 0, active: 0, drawn: 2 });
    }

    #[test]
    fn answer_past_end_is_ignored() {
        let mut r = round(1);
        assert_eq!(r.answer(Grade::C), Some("w0"));
        assert_eq!(r.answer(Grade::C), None);
        assert_eq!(r.score().passive, 1);
    }
}
