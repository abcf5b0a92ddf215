use serde::{Deserialize, Serialize};

use crate::model::{AnswerRecord, Subject};

/// Why an exam session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Every question was answered.
    Completed,
    /// The countdown ran out first.
    TimeExpired,
}

/// Results of a finished (or in-progress) exam, for the results screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub subject: Subject,
    pub total_questions: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub score: f64,
    pub accuracy_percent: u32,
    pub finish_reason: Option<FinishReason>,
}

impl ExamSummary {
    /// Build a summary from the review log and the running score.
    ///
    /// The score is taken as given rather than recomputed from `records`.
    #[must_use]
    pub fn from_records(
        subject: Subject,
        total_questions: usize,
        score: f64,
        records: &[AnswerRecord],
        finish_reason: Option<FinishReason>,
    ) -> Self {
        let correct = records.iter().filter(|r| r.is_correct()).count();
        let answered = records.len();

        Self {
            subject,
            total_questions,
            answered,
            correct,
            incorrect: answered - correct,
            unanswered: total_questions.saturating_sub(answered),
            score,
            accuracy_percent: accuracy_percent(score, total_questions),
            finish_reason,
        }
    }
}

/// `score / total` as a whole percentage, clamped at zero for display.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn accuracy_percent(score: f64, total_questions: usize) -> u32 {
    if total_questions == 0 {
        return 0;
    }
    let pct = (score / total_questions as f64 * 100.0).round();
    pct.max(0.0) as u32
}
