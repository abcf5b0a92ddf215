//! Terminal adapters: render exam events to a writer and read answers from stdin.

use std::io::{self, Write};

use async_trait::async_trait;
use exam_core::model::{AnswerRecord, BestScore, ExamSummary, Question};
use services::{AnswerInput, ExamCommand, ExamEvents, QuestionView, TimeRemaining};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::vm::{
    QuestionVm, ResultsVm, map_review_rows, option_letter, parse_command, should_announce,
    timer_banner,
};

/// Writes questions, countdown and results as plain lines.
pub struct TerminalEvents<W> {
    out: W,
    remaining: Option<TimeRemaining>,
    review: Vec<AnswerRecord>,
}

impl TerminalEvents<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalEvents<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            remaining: None,
            review: Vec::new(),
        }
    }

    pub fn render_review(&mut self) {
        if self.review.is_empty() {
            self.emit("No answers to review.");
            return;
        }
        self.emit("");
        self.emit("Review");
        let rows = map_review_rows(&self.review);
        for row in rows {
            for line in row.lines() {
                self.emit(&line);
            }
        }
    }

    pub fn notice(&mut self, text: &str) {
        self.emit(text);
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            tracing::warn!(error = %err, "terminal write failed");
        }
    }
}

impl<W: Write> ExamEvents for TerminalEvents<W> {
    fn on_question_changed(&mut self, view: &QuestionView<'_>) {
        self.emit("");
        if let Some(remaining) = self.remaining {
            self.emit(&timer_banner(remaining));
        }
        for line in QuestionVm::from(view).lines() {
            self.emit(&line);
        }
    }

    fn on_tick(&mut self, remaining: TimeRemaining) {
        let previous = self.remaining.replace(remaining);
        if should_announce(previous, remaining) {
            self.emit(&timer_banner(remaining));
        }
    }

    fn on_exam_finished(&mut self, summary: &ExamSummary, best_score: BestScore) {
        self.emit("");
        let results = ResultsVm::new(summary, best_score);
        for line in results.lines() {
            self.emit(line);
        }
    }

    fn on_review_available(&mut self, records: &[AnswerRecord]) {
        self.review = records.to_vec();
    }
}

/// Reads one command per line from stdin.
pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask a yes/no question; anything but `y`/`yes` is a no.
    pub async fn confirm(&mut self, prompt: &str) -> bool {
        show_prompt(prompt);
        self.read_line().await.is_some_and(|line| {
            let line = line.trim();
            line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes")
        })
    }

    async fn read_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "stdin read failed");
                None
            }
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerInput for StdinInput {
    async fn next_command(&mut self, question: &Question) -> Option<ExamCommand> {
        let last = question
            .options()
            .len()
            .checked_sub(1)
            .and_then(option_letter)
            .unwrap_or('A');
        loop {
            show_prompt(&format!("Your answer (A-{last}, or q to quit): "));
            let line = self.read_line().await?;
            if let Some(command) = parse_command(&line, question.options()) {
                return Some(command);
            }
            println!("Please type a letter A-{last}, the option text, or q.");
        }
    }
}

fn show_prompt(prompt: &str) {
    let mut stdout = io::stdout();
    if write!(stdout, "{prompt}").and_then(|()| stdout.flush()).is_err() {
        tracing::warn!("could not write prompt");
    }
}
