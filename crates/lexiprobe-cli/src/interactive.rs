//! Line-based answer loop shared by the `level` and `survey` commands.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use lexiprobe_core::leveler::Session;
use lexiprobe_core::model::{Grade, RoundStatus};
use lexiprobe_core::survey::Survey;

/// Something that serves words and takes grades.
pub trait Assessment {
    fn current_word(&self) -> Option<&str>;
    fn submit(&mut self, grade: Grade) -> RoundStatus;
    fn undo(&mut self) -> bool;
    /// Where the test-taker is, e.g. `finding(tier 2) 3/24`.
    fn progress(&self) -> String;
    /// Stage label announced after a round completes.
    fn stage(&self) -> String;
}

impl Assessment for Session {
    fn current_word(&self) -> Option<&str> {
        Session::current_word(self)
    }

    fn submit(&mut self, grade: Grade) -> RoundStatus {
        self.submit_answer(grade)
    }

    fn undo(&mut self) -> bool {
        Session::undo(self)
    }

    fn progress(&self) -> String {
        format!("{} {}/{}", self.state(), self.index() + 1, self.round_size())
    }

    fn stage(&self) -> String {
        self.state().to_string()
    }
}

impl Assessment for Survey {
    fn current_word(&self) -> Option<&str> {
        Survey::current_word(self)
    }

    fn submit(&mut self, grade: Grade) -> RoundStatus {
        self.submit_answer(grade)
    }

    fn undo(&mut self) -> bool {
        Survey::undo(self)
    }

    fn progress(&self) -> String {
        format!("survey {}/{}", self.index() + 1, self.len())
    }

    fn stage(&self) -> String {
        format!("survey ({})", self.preset())
    }
}

/// How the answer loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Quit,
}

fn print_legend<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Answer each word with:")?;
    for grade in Grade::ALL {
        writeln!(out, "  {} / {}  {}", grade.key(), grade, grade.description())?;
    }
    writeln!(out, "  u  undo the last answer, q  quit\n")?;
    Ok(())
}

/// Serve words until the assessment is done, the user quits, or input ends.
pub fn run<A, R, W>(assessment: &mut A, input: R, out: &mut W) -> Result<Outcome>
where
    A: Assessment,
    R: BufRead,
    W: Write,
{
    print_legend(out)?;
    let mut lines = input.lines();

    while let Some(word) = assessment.current_word().map(str::to_owned) {
        write!(out, "[{}] {word}\n> ", assessment.progress())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            anyhow::bail!("input ended before the assessment finished");
        };
        let line = line.context("failed to read answer")?;

        match line.trim().to_lowercase().as_str() {
            "" => {}
            "u" | "undo" => {
                if !assessment.undo() {
                    writeln!(out, "Nothing to undo in this round.")?;
                }
            }
            "q" | "quit" => return Ok(Outcome::Quit),
            answer => match answer.parse::<Grade>() {
                Ok(grade) => {
                    if assessment.submit(grade) == RoundStatus::RoundComplete {
                        writeln!(out, "\nRound complete, now {}.\n", assessment.stage())?;
                    }
                }
                Err(e) => writeln!(out, "{e}")?,
            },
        }
    }

    writeln!(out)?;
    Ok(Outcome::Finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexiprobe_core::leveler::LevelerConfig;
    use lexiprobe_core::sampler::IdentityShuffler;
    use lexiprobe_core::survey::MarginPreset;

    fn survey(n: usize) -> Survey {
        let dict: Vec<String> = (0..n).map(|i| format!("w{i}")).collect();
        Survey::start(&dict, MarginPreset::Rough, 1_000, &mut IdentityShuffler)
    }

    #[test]
    fn answers_undo_and_invalid_input() {
        let mut s = survey(10);
        let mut out = Vec::new();
        let input = "u\nx\n4\n3\nundo\nc\n\n1\nB\n2\n";
        let outcome = run(&mut s, input.as_bytes(), &mut out).unwrap();
        assert_eq!(outcome, Outcome::Finished);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Nothing to undo"));
        assert!(text.contains("invalid grade 'X'"));
        assert!(text.contains("[survey 1/5] w0"));
        assert_eq!(s.score().passive, 2);
        assert_eq!(s.score().active, 1);
    }

    #[test]
    fn quit_stops_early() {
        let mut s = survey(10);
        let mut out = Vec::new();
        let outcome = run(&mut s, "4\nq\n".as_bytes(), &mut out).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(s.index(), 1);
    }

    #[test]
    fn eof_before_done_is_an_error() {
        let mut s = survey(10);
        let err = run(&mut s, "4\n".as_bytes(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("input ended"));
    }

    #[test]
    fn session_announces_round_changes() {
        let tiers: Vec<Vec<String>> = (1..=2)
            .map(|t| (0..100).map(|i| format!("t{t}-{i}")).collect())
            .collect();
        let mut session =
            Session::start(tiers, LevelerConfig::default(), Box::new(IdentityShuffler)).unwrap();
        let input = "4\n".repeat(24 + 24 + 48);
        let mut out = Vec::new();
        run(&mut session, input.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Round complete, now finding(tier 2)"));
        assert!(text.contains("Round complete, now refining(tier 2)"));
        assert!(session.is_done());
        assert_eq!(session.final_tier(), Some(2));
    }
}
