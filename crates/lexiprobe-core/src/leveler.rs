//! Adaptive tier search.
//!
//! A [`Session`] starts in the lowest tier, serves a finding sample, and after
//! each sample either climbs a tier, pins the tier, or drops one. Once the
//! tier is pinned a larger refinement sample is served from words not yet
//! shown, and the session finishes.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{Grade, Phase, RoundScore, RoundStatus};
use crate::round::{AnswerRecord, Round};
use crate::sampler::{draw_sample, Shuffler};

/// Sample sizes and thresholds for the tier search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelerConfig {
    /// Words per finding round.
    #[serde(default = "default_finding_sample_size")]
    pub finding_sample_size: u32,
    /// Words in the refinement round.
    #[serde(default = "default_refinement_sample_size")]
    pub refinement_sample_size: u32,
    /// Passive scores below this drop a tier (or end the search at the bottom).
    #[serde(default = "default_lower_threshold")]
    pub lower_threshold: u32,
    /// Passive scores above this climb a tier.
    #[serde(default = "default_upper_threshold")]
    pub upper_threshold: u32,
    /// Share of the final sample below which the result is inconclusive.
    #[serde(default = "default_inconclusive_fraction")]
    pub inconclusive_fraction: f64,
}

fn default_finding_sample_size() -> u32 {
    24
}
fn default_refinement_sample_size() -> u32 {
    48
}
fn default_lower_threshold() -> u32 {
    6
}
fn default_upper_threshold() -> u32 {
    17
}
fn default_inconclusive_fraction() -> f64 {
    0.15
}

impl Default for LevelerConfig {
    fn default() -> Self {
        Self {
            finding_sample_size: default_finding_sample_size(),
            refinement_sample_size: default_refinement_sample_size(),
            lower_threshold: default_lower_threshold(),
            upper_threshold: default_upper_threshold(),
            inconclusive_fraction: default_inconclusive_fraction(),
        }
    }
}

/// Where a finding score falls relative to the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Below,
    Within,
    Above,
}

impl LevelerConfig {
    /// Check that the thresholds fit inside the finding sample.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.finding_sample_size == 0 {
            return Err(SessionError::ZeroFindingSample);
        }
        if self.lower_threshold > self.upper_threshold
            || self.upper_threshold > self.finding_sample_size
        {
            return Err(SessionError::InvalidThresholds {
                lower: self.lower_threshold,
                upper: self.upper_threshold,
                sample: self.finding_sample_size,
            });
        }
        Ok(())
    }

    /// Classify a finding-round score.
    ///
    /// Thresholds are expressed against a full finding sample and scale to
    /// the drawn count on a short round. An empty round counts as below.
    pub fn classify(&self, score: RoundScore) -> Verdict {
        if score.drawn == 0 {
            return Verdict::Below;
        }
        let scaled = u64::from(score.passive) * u64::from(self.finding_sample_size);
        let drawn = u64::from(score.drawn);
        if scaled < u64::from(self.lower_threshold) * drawn {
            Verdict::Below
        } else if scaled > u64::from(self.upper_threshold) * drawn {
            Verdict::Above
        } else {
            Verdict::Within
        }
    }
}

/// Session state. Tiers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionState {
    Finding { tier: usize },
    Refining { tier: usize },
    Done { final_tier: Option<usize> },
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Finding { tier } => write!(f, "finding(tier {tier})"),
            SessionState::Refining { tier } => write!(f, "refining(tier {tier})"),
            SessionState::Done {
                final_tier: Some(tier),
            } => write!(f, "done(tier {tier})"),
            SessionState::Done { final_tier: None } => write!(f, "done(no final tier)"),
        }
    }
}

/// One adaptive assessment.
pub struct Session {
    tiers: Vec<Vec<String>>,
    config: LevelerConfig,
    shuffler: Box<dyn Shuffler>,
    state: SessionState,
    final_tier: Option<usize>,
    refined_tier: Option<usize>,
    round: Round,
    used: HashSet<String>,
    last_score: Option<RoundScore>,
    rounds_completed: usize,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tiers", &self.tiers.len())
            .field("state", &self.state)
            .field("final_tier", &self.final_tier)
            .field("refined_tier", &self.refined_tier)
            .field("index", &self.round.index())
            .field("round_size", &self.round.drawn())
            .field("rounds_completed", &self.rounds_completed)
            .finish()
    }
}

impl Session {
    /// Start a session over word lists ordered from easiest to hardest tier.
    pub fn start(
        words_by_tier: Vec<Vec<String>>,
        config: LevelerConfig,
        shuffler: Box<dyn Shuffler>,
    ) -> Result<Self, SessionError> {
        if words_by_tier.is_empty() {
            return Err(SessionError::NoTiers);
        }
        config.validate()?;

        tracing::info!(
            tiers = words_by_tier.len(),
            finding = config.finding_sample_size,
            refinement = config.refinement_sample_size,
            "starting leveled session"
        );

        let mut session = Self {
            tiers: words_by_tier,
            config,
            shuffler,
            state: SessionState::Finding { tier: 1 },
            final_tier: None,
            refined_tier: None,
            round: Round::default(),
            used: HashSet::new(),
            last_score: None,
            rounds_completed: 0,
        };
        session.begin_round();
        Ok(session)
    }

    /// The word awaiting an answer; `None` once the session is done.
    pub fn current_word(&self) -> Option<&str> {
        if self.is_done() {
            return None;
        }
        self.round.current_word()
    }

    /// Record a grade for the current word.
    pub fn submit_answer(&mut self, grade: Grade) -> RoundStatus {
        if self.is_done() {
            return RoundStatus::SessionDone;
        }
        let Some(word) = self.round.answer(grade).map(str::to_owned) else {
            return RoundStatus::SessionDone;
        };
        self.used.insert(word);

        if !self.round.is_exhausted() {
            return RoundStatus::Continue;
        }

        let score = self.round.score();
        self.complete_round(score);
        self.begin_round();

        if self.is_done() {
            RoundStatus::SessionDone
        } else {
            RoundStatus::RoundComplete
        }
    }

    /// Take back the last answer of the current round.
    ///
    /// Returns `false` when there is nothing to undo in this round or the
    /// session is already done.
    pub fn undo(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        match self.round.undo() {
            Some(record) => {
                self.used.remove(&record.word);
                tracing::debug!(word = %record.word, grade = %record.grade, "undid answer");
                true
            }
            None => false,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, SessionState::Done { .. })
    }

    /// The pinned tier, once known. A session that dropped a tier refines
    /// the lower one without pinning it.
    pub fn final_tier(&self) -> Option<usize> {
        self.final_tier
    }

    /// Tier the refinement round was drawn from, once one began.
    pub fn refined_tier(&self) -> Option<usize> {
        self.refined_tier
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> Option<Phase> {
        match self.state {
            SessionState::Finding { .. } => Some(Phase::Finding),
            SessionState::Refining { .. } => Some(Phase::Refinement),
            SessionState::Done { .. } => None,
        }
    }

    /// Tier of the round in progress.
    pub fn tier(&self) -> Option<usize> {
        match self.state {
            SessionState::Finding { tier } | SessionState::Refining { tier } => Some(tier),
            SessionState::Done { .. } => None,
        }
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    pub fn config(&self) -> &LevelerConfig {
        &self.config
    }

    /// Passive count of the round in progress.
    pub fn passive(&self) -> u32 {
        self.round.score().passive
    }

    /// Active count of the round in progress.
    pub fn active(&self) -> u32 {
        self.round.score().active
    }

    /// Index of the current word within its round.
    pub fn index(&self) -> usize {
        self.round.index()
    }

    /// Number of words in the round in progress.
    pub fn round_size(&self) -> usize {
        self.round.drawn()
    }

    pub fn history(&self) -> &[AnswerRecord] {
        self.round.history()
    }

    pub fn rounds_completed(&self) -> usize {
        self.rounds_completed
    }

    /// Score of the most recently completed round.
    pub fn last_round_score(&self) -> Option<RoundScore> {
        self.last_score
    }

    /// Score the estimate should be computed from, once the session is done.
    pub fn final_score(&self) -> Option<RoundScore> {
        if self.is_done() {
            self.last_score
        } else {
            None
        }
    }

    /// Draw the sample for the current state. Empty pools complete their
    /// round immediately, which may cascade through several states.
    fn begin_round(&mut self) {
        loop {
            let (tier, size) = match self.state {
                SessionState::Finding { tier } => (tier, self.config.finding_sample_size),
                SessionState::Refining { tier } => (tier, self.config.refinement_sample_size),
                SessionState::Done { .. } => {
                    self.round = Round::default();
                    return;
                }
            };

            let sample = draw_sample(
                &self.tiers[tier - 1],
                &self.used,
                size as usize,
                self.shuffler.as_mut(),
            );

            if sample.is_empty() {
                tracing::warn!(tier, state = %self.state, "no unused words left in tier");
                self.round = Round::default();
                self.complete_round(RoundScore::default());
                continue;
            }

            if sample.len() < size as usize {
                tracing::debug!(tier, drawn = sample.len(), requested = size, "short round");
            }
            self.round = Round::new(sample);
            return;
        }
    }

    fn complete_round(&mut self, score: RoundScore) {
        // An empty round measures nothing; keep the last real score.
        if score.drawn > 0 || self.last_score.is_none() {
            self.last_score = Some(score);
        }
        self.rounds_completed += 1;

        let next = match self.state {
            SessionState::Finding { tier } => match self.config.classify(score) {
                Verdict::Below if tier == 1 => SessionState::Done { final_tier: None },
                Verdict::Below => SessionState::Refining { tier: tier - 1 },
                Verdict::Within => {
                    self.final_tier = Some(tier);
                    SessionState::Refining { tier }
                }
                Verdict::Above if tier == self.tiers.len() => {
                    self.final_tier = Some(tier);
                    SessionState::Refining { tier }
                }
                Verdict::Above => SessionState::Finding { tier: tier + 1 },
            },
            SessionState::Refining { .. } => SessionState::Done {
                final_tier: self.final_tier,
            },
            SessionState::Done { .. } => self.state,
        };

        tracing::debug!(
            from = %self.state,
            to = %next,
            passive = score.passive,
            active = score.active,
            drawn = score.drawn,
            "round complete"
        );
        self.state = next;

        if let SessionState::Refining { tier } = next {
            self.refined_tier = Some(tier);
        }
        if let SessionState::Done { final_tier } = next {
            tracing::info!(?final_tier, rounds = self.rounds_completed, "session finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{IdentityShuffler, SeededShuffler};

    fn tier_words(tier: usize, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{tier}-{i}")).collect()
    }

    fn tiers(count: usize, words_per_tier: usize) -> Vec<Vec<String>> {
        (1..=count).map(|t| tier_words(t, words_per_tier)).collect()
    }

    fn session(count: usize, words_per_tier: usize) -> Session {
        Session::start(
            tiers(count, words_per_tier),
            LevelerConfig::default(),
            Box::new(SeededShuffler::new(11)),
        )
        .unwrap()
    }

    fn answer_n(session: &mut Session, grade: Grade, n: usize) -> RoundStatus {
        let mut status = RoundStatus::Continue;
        for _ in 0..n {
            status = session.submit_answer(grade);
        }
        status
    }

    /// Answer a full round with `passive` C answers followed by A answers.
    fn score_round(session: &mut Session, passive: usize) -> RoundStatus {
        let size = session.round_size();
        answer_n(session, Grade::C, passive);
        answer_n(session, Grade::A, size - passive)
    }

    #[test]
    fn starts_finding_at_lowest_tier() {
        let s = session(3, 100);
        assert_eq!(s.state(), SessionState::Finding { tier: 1 });
        assert_eq!(s.phase(), Some(Phase::Finding));
        assert_eq!(s.round_size(), 24);
        assert!(s.current_word().is_some());
        assert_eq!(s.final_tier(), None);
    }

    #[test]
    fn all_mastered_round_climbs() {
        let mut s = session(3, 100);
        answer_n(&mut s, Grade::D, 23);
        assert_eq!(s.passive(), 23);
        assert_eq!(s.active(), 23);

        let status = s.submit_answer(Grade::D);
        assert_eq!(status, RoundStatus::RoundComplete);
        assert_eq!(
            s.last_round_score(),
            Some(RoundScore { passive: 24, active: 24, drawn: 24 })
        );
        assert_eq!(s.state(), SessionState::Finding { tier: 2 });
        assert_eq!(s.passive(), 0);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn all_mastered_at_top_tier_pins_it() {
        let mut s = session(2, 100);
        answer_n(&mut s, Grade::D, 24);
        answer_n(&mut s, Grade::D, 24);
        assert_eq!(s.state(), SessionState::Refining { tier: 2 });
        assert_eq!(s.final_tier(), Some(2));
        assert_eq!(s.round_size(), 48);
    }

    #[test]
    fn all_unknown_at_lowest_tier_ends() {
        let mut s = session(3, 100);
        answer_n(&mut s, Grade::A, 23);
        assert_eq!(s.passive(), 0);
        assert_eq!(s.active(), 0);
        assert_eq!(s.submit_answer(Grade::A), RoundStatus::SessionDone);
        assert_eq!(s.state(), SessionState::Done { final_tier: None });
        assert!(s.is_done());
        assert_eq!(s.current_word(), None);
        assert_eq!(s.refined_tier(), None);
    }

    #[test]
    fn low_score_on_lowest_tier_never_refines() {
        let mut s = session(3, 100);
        let status = score_round(&mut s, 5);
        assert_eq!(status, RoundStatus::SessionDone);
        assert_eq!(s.state(), SessionState::Done { final_tier: None });
        assert_eq!(s.rounds_completed(), 1);
        assert_eq!(s.final_score().map(|sc| sc.passive), Some(5));
    }

    #[test]
    fn mid_score_pins_tier_and_resets_counters() {
        let mut s = session(3, 100);
        answer_n(&mut s, Grade::D, 24);
        assert_eq!(s.tier(), Some(2));

        let status = score_round(&mut s, 10);
        assert_eq!(status, RoundStatus::RoundComplete);
        assert_eq!(s.final_tier(), Some(2));
        assert_eq!(s.refined_tier(), Some(2));
        assert_eq!(s.state(), SessionState::Refining { tier: 2 });
        assert_eq!(s.passive(), 0);
        assert_eq!(s.active(), 0);
        assert_eq!(s.index(), 0);
        assert!(s.history().is_empty());
    }

    #[test]
    fn threshold_edges() {
        for (passive, expected) in [
            (5, SessionState::Refining { tier: 1 }),
            (6, SessionState::Refining { tier: 2 }),
            (17, SessionState::Refining { tier: 2 }),
            (18, SessionState::Finding { tier: 3 }),
        ] {
            let mut s = session(3, 100);
            answer_n(&mut s, Grade::D, 24);
            score_round(&mut s, passive);
            assert_eq!(s.state(), expected, "score {passive}");
        }
    }

    #[test]
    fn low_score_above_lowest_drops_and_refines() {
        let mut s = session(3, 100);
        answer_n(&mut s, Grade::D, 24);
        score_round(&mut s, 3);
        assert_eq!(s.state(), SessionState::Refining { tier: 1 });
        assert_eq!(s.final_tier(), None);
        assert_eq!(s.refined_tier(), Some(1));
        assert_eq!(s.round_size(), 48);

        let status = score_round(&mut s, 30);
        assert_eq!(status, RoundStatus::SessionDone);
        assert_eq!(s.state(), SessionState::Done { final_tier: None });
        assert_eq!(s.final_tier(), None);
        assert_eq!(s.refined_tier(), Some(1));
        assert_eq!(
            s.final_score(),
            Some(RoundScore { passive: 30, active: 0, drawn: 48 })
        );
    }

    #[test]
    fn refinement_finishes_unconditionally() {
        let mut s = session(3, 100);
        score_round(&mut s, 12);
        assert_eq!(s.state(), SessionState::Refining { tier: 1 });
        let status = answer_n(&mut s, Grade::A, 48);
        assert_eq!(status, RoundStatus::SessionDone);
        assert_eq!(s.state(), SessionState::Done { final_tier: Some(1) });
    }

    #[test]
    fn undo_restores_previous_counts_for_every_grade() {
        for grade in Grade::ALL {
            let mut s = session(3, 100);
            s.submit_answer(Grade::C);
            let before = (s.passive(), s.active(), s.index(), s.current_word().map(str::to_owned));
            s.submit_answer(grade);
            assert!(s.undo());
            assert_eq!(
                (s.passive(), s.active(), s.index(), s.current_word().map(str::to_owned)),
                before,
                "grade {grade}"
            );
        }
    }

    #[test]
    fn undo_at_round_boundary_is_noop() {
        let mut s = session(3, 100);
        assert!(!s.undo());
        answer_n(&mut s, Grade::D, 24);
        assert!(!s.undo());
        assert_eq!(s.state(), SessionState::Finding { tier: 2 });
    }

    #[test]
    fn undo_after_done_is_noop() {
        let mut s = session(1, 100);
        answer_n(&mut s, Grade::A, 24);
        assert!(s.is_done());
        assert!(!s.undo());
        assert_eq!(s.submit_answer(Grade::D), RoundStatus::SessionDone);
        assert_eq!(s.final_score().map(|sc| sc.passive), Some(0));
    }

    #[test]
    fn undone_word_can_be_shown_again() {
        let mut s = session(3, 100);
        let first = s.current_word().unwrap().to_owned();
        s.submit_answer(Grade::B);
        assert!(s.undo());
        assert_eq!(s.current_word(), Some(first.as_str()));
    }

    #[test]
    fn words_are_not_repeated_across_rounds() {
        let mut s = Session::start(
            vec![tier_words(1, 80)],
            LevelerConfig::default(),
            Box::new(SeededShuffler::new(3)),
        )
        .unwrap();
        let mut seen = HashSet::new();
        while let Some(word) = s.current_word().map(str::to_owned) {
            assert!(seen.insert(word.clone()), "{word} shown twice");
            s.submit_answer(Grade::C);
        }
        assert_eq!(seen.len(), 24 + 48);
    }

    #[test]
    fn short_round_is_scored_against_drawn_count() {
        // 12 words: 3 passive is exactly the scaled lower threshold, 2 is below.
        for (passive, expected) in [(3, Some(1)), (2, None)] {
            let mut s = Session::start(
                vec![tier_words(1, 12)],
                LevelerConfig::default(),
                Box::new(IdentityShuffler),
            )
            .unwrap();
            assert_eq!(s.round_size(), 12);
            score_round(&mut s, passive);
            assert_eq!(s.state(), SessionState::Done { final_tier: expected });
        }
    }

    #[test]
    fn classify_short_round() {
        let config = LevelerConfig::default();
        let score = |passive| RoundScore { passive, active: 0, drawn: 12 };
        assert_eq!(config.classify(score(2)), Verdict::Below);
        assert_eq!(config.classify(score(3)), Verdict::Within);
        assert_eq!(config.classify(score(8)), Verdict::Within);
        assert_eq!(config.classify(score(9)), Verdict::Above);
    }

    #[test]
    fn exhausted_refinement_pool_finishes_immediately() {
        // Tier 1 has exactly one finding round of words.
        let mut s = Session::start(
            vec![tier_words(1, 24)],
            LevelerConfig::default(),
            Box::new(IdentityShuffler),
        )
        .unwrap();
        let status = score_round(&mut s, 12);
        assert_eq!(status, RoundStatus::SessionDone);
        assert_eq!(s.state(), SessionState::Done { final_tier: Some(1) });
        assert_eq!(s.rounds_completed(), 2);
        assert_eq!(
            s.final_score(),
            Some(RoundScore { passive: 12, active: 0, drawn: 24 })
        );
    }

    #[test]
    fn empty_tier_counts_as_below() {
        let mut s = Session::start(
            vec![tier_words(1, 100), Vec::new()],
            LevelerConfig::default(),
            Box::new(IdentityShuffler),
        )
        .unwrap();
        let status = answer_n(&mut s, Grade::D, 24);
        assert_eq!(status, RoundStatus::RoundComplete);
        assert_eq!(s.state(), SessionState::Refining { tier: 1 });
        assert_eq!(s.final_tier(), None);
        assert_eq!(s.refined_tier(), Some(1));
    }

    #[test]
    fn empty_lowest_tier_ends_at_start() {
        let s = Session::start(
            vec![Vec::new(), tier_words(2, 10)],
            LevelerConfig::default(),
            Box::new(IdentityShuffler),
        )
        .unwrap();
        assert_eq!(s.state(), SessionState::Done { final_tier: None });
        assert_eq!(s.current_word(), None);
        assert_eq!(s.final_score(), Some(RoundScore::default()));
    }

    #[test]
    fn rejects_bad_setup() {
        let err = Session::start(vec![], LevelerConfig::default(), Box::new(IdentityShuffler))
            .unwrap_err();
        assert_eq!(err, SessionError::NoTiers);

        let config = LevelerConfig {
            lower_threshold: 20,
            upper_threshold: 10,
            ..Default::default()
        };
        let err = Session::start(tiers(1, 10), config, Box::new(IdentityShuffler)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidThresholds { .. }));
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Finding { tier: 2 }.to_string(), "finding(tier 2)");
        assert_eq!(SessionState::Refining { tier: 1 }.to_string(), "refining(tier 1)");
        assert_eq!(
            SessionState::Done { final_tier: Some(3) }.to_string(),
            "done(tier 3)"
        );
        assert_eq!(
            SessionState::Done { final_tier: None }.to_string(),
            "done(no final tier)"
        );
    }

    #[test]
    fn classify_full_round() {
        let config = LevelerConfig::default();
        let score = |passive| RoundScore { passive, active: 0, drawn: 24 };
        assert_eq!(config.classify(score(0)), Verdict::Below);
        assert_eq!(config.classify(score(5)), Verdict::Below);
        assert_eq!(config.classify(score(6)), Verdict::Within);
        assert_eq!(config.classify(score(17)), Verdict::Within);
        assert_eq!(config.classify(score(18)), Verdict::Above);
        assert_eq!(config.classify(RoundScore::default()), Verdict::Below);
    }

    #[test]
    fn same_seed_same_session() {
        let run = || {
            let mut s = Session::start(
                tiers(3, 200),
                LevelerConfig::default(),
                Box::new(SeededShuffler::new(99)),
            )
            .unwrap();
            let mut words = Vec::new();
            while let Some(w) = s.current_word().map(str::to_owned) {
                words.push(w);
                s.submit_answer(Grade::D);
            }
            (words, s.state())
        };
        assert_eq!(run(), run());
    }
}
