//! Confirmation prompts

use crate::diff::SyncPlan;
use crate::executor::ConfirmationGate;
use crate::types::SyncError;
use crate::ui::summary::summarize;
use console::{style, Term};
use std::io::BufRead;

const QUESTION: &str = "Proceed with these changes? (y/n): ";

/// Whether a typed answer confirms. Only a lone `y`, in either case, does.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Interactive gate: prints the review summary and asks on the terminal.
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn read_answer(&self) -> Result<String, SyncError> {
        if self.term.features().is_attended() {
            return Ok(self.term.read_line()?);
        }

        // Piped stdin: console only reads from a real terminal
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationGate for TerminalPrompt {
    fn review(&mut self, plan: &SyncPlan) -> Result<bool, SyncError> {
        for line in summarize(plan) {
            self.term.write_line(&line)?;
        }
        self.term
            .write_str(&style(QUESTION).bold().to_string())?;
        self.term.flush()?;

        let answer = self.read_answer()?;
        Ok(is_affirmative(&answer))
    }
}

/// Non-interactive gate that prints the summary and always confirms.
pub struct AssumeYes;

impl ConfirmationGate for AssumeYes {
    fn review(&mut self, plan: &SyncPlan) -> Result<bool, SyncError> {
        for line in summarize(plan) {
            println!("{}", line);
        }
        println!("{}y (--yes)", QUESTION);
        Ok(true)
    }
}

/// Gate with a fixed answer that keeps the summary it was shown.
#[derive(Debug, Clone, Default)]
pub struct FixedAnswer {
    answer: bool,
    pub reviewed: Vec<String>,
    pub asked: usize,
}

impl FixedAnswer {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            reviewed: Vec::new(),
            asked: 0,
        }
    }
}

impl ConfirmationGate for FixedAnswer {
    fn review(&mut self, plan: &SyncPlan) -> Result<bool, SyncError> {
        self.asked += 1;
        self.reviewed = summarize(plan);
        Ok(self.answer)
    }
}
