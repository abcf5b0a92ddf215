use std::collections::VecDeque;

use async_trait::async_trait;
use exam_core::model::{AnswerRecord, BestScore, ExamSummary, Question};

use crate::timer::TimeRemaining;

/// What the presentation layer needs to render the current question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionView<'a> {
    pub question: &'a Question,
    /// Zero-based position of `question`.
    pub index: usize,
    pub total: usize,
    pub score: f64,
}

/// Notifications from a running exam to whatever renders it.
///
/// Every method has an empty default so sinks only implement what they show.
pub trait ExamEvents {
    fn on_question_changed(&mut self, _view: &QuestionView<'_>) {}

    /// Countdown update for timed exams. Low time is read from the value.
    fn on_tick(&mut self, _remaining: TimeRemaining) {}

    fn on_exam_finished(&mut self, _summary: &ExamSummary, _best_score: BestScore) {}

    fn on_review_available(&mut self, _records: &[AnswerRecord]) {}
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl ExamEvents for NoopEvents {}

/// Commands a user can issue while a question is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamCommand {
    /// Select the option with this text.
    Answer(String),
    /// Leave the exam; the attempt is discarded.
    Cancel,
}

/// Source of user commands for a running exam.
///
/// Returning `None` means the input is closed and is treated as a cancel.
/// Implementations must tolerate their future being dropped mid-wait, which
/// happens when the countdown ends first.
#[async_trait]
pub trait AnswerInput: Send {
    async fn next_command(&mut self, question: &Question) -> Option<ExamCommand>;
}

/// Replays a fixed list of commands; closed once the list is exhausted.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    commands: VecDeque<ExamCommand>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(commands: impl IntoIterator<Item = ExamCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    /// Replays the given answers in order, then closes.
    #[must_use]
    pub fn answers(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(answers.into_iter().map(|a| ExamCommand::Answer(a.into())))
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

#[async_trait]
impl AnswerInput for ScriptedInput {
    async fn next_command(&mut self, _question: &Question) -> Option<ExamCommand> {
        self.commands.pop_front()
    }
}

/// Answers each question correctly, forever. Useful for demos and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysCorrect;

#[async_trait]
impl AnswerInput for AlwaysCorrect {
    async fn next_command(&mut self, question: &Question) -> Option<ExamCommand> {
        Some(ExamCommand::Answer(question.correct_answer().to_owned()))
    }
}

/// Never answers; waits until the exam is ended by other means.
#[derive(Debug, Default, Clone, Copy)]
pub struct PendingInput;

#[async_trait]
impl AnswerInput for PendingInput {
    async fn next_command(&mut self, _question: &Question) -> Option<ExamCommand> {
        std::future::pending().await
    }
}
