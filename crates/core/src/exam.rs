use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::ExamError;
use crate::model::{
    AnswerRecord, ExamId, ExamSummary, FinishReason, Question, Subject, score_delta,
};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamState {
    /// `index < N`; answers are accepted.
    Active,
    /// Terminal. Reached by answering the last question or by time expiry.
    Finished,
}

/// Effect of a single accepted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub record: AnswerRecord,
    /// `+1` for a correct answer, `-0.25` otherwise.
    pub delta: f64,
    /// Running score after this answer.
    pub score: f64,
    /// Position after this answer.
    pub index: usize,
    /// True when this answer completed the exam.
    pub is_finished: bool,
}

/// Snapshot of progress for rendering a question header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: f64,
    pub is_finished: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One exam attempt: a fixed question list stepped through in order.
///
/// Invariants: `index <= questions.len()` and `records.len() == index`.
/// The score only changes together with a record append and an index
/// increment, and is never recomputed from the log.
pub struct ExamSession {
    id: ExamId,
    subject: Subject,
    questions: Vec<Question>,
    index: usize,
    score: f64,
    records: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    finish_reason: Option<FinishReason>,
}

impl ExamSession {
    /// Start a session over `questions` in the given order.
    ///
    /// An empty question list yields a session that is already finished.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::InvalidInput` if `subject` is blank.
    pub fn start(
        subject: &str,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ExamError> {
        let subject = Subject::new(subject)?;
        let (completed_at, finish_reason) = if questions.is_empty() {
            (Some(started_at), Some(FinishReason::Completed))
        } else {
            (None, None)
        };

        Ok(Self {
            id: ExamId::new(),
            subject,
            questions,
            index: 0,
            score: 0.0,
            records: Vec::new(),
            started_at,
            completed_at,
            finish_reason,
        })
    }

    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn state(&self) -> ExamState {
        if self.finish_reason.is_some() {
            ExamState::Finished
        } else {
            ExamState::Active
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state() == ExamState::Finished
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question awaiting an answer.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::OutOfRange` once the session is finished, including
    /// when time expired with questions left.
    pub fn current_question(&self) -> Result<&Question, ExamError> {
        if self.is_finished() {
            return Err(ExamError::OutOfRange);
        }
        self.questions.get(self.index).ok_or(ExamError::OutOfRange)
    }

    /// Answer the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::InvalidState` if the session is finished; nothing is
    /// mutated in that case.
    pub fn submit_answer(
        &mut self,
        selected: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<SubmitOutcome, ExamError> {
        if self.is_finished() {
            return Err(ExamError::InvalidState);
        }
        let question = self
            .questions
            .get(self.index)
            .ok_or(ExamError::InvalidState)?;

        let record = AnswerRecord::new(question.text(), selected, question.correct_answer());
        let delta = score_delta(question.is_correct(selected));

        // Everything fallible is done; apply the step as a unit.
        self.records.push(record.clone());
        self.score += delta;
        self.index += 1;
        if self.index == self.questions.len() {
            self.finish(FinishReason::Completed, answered_at);
        }

        Ok(SubmitOutcome {
            record,
            delta,
            score: self.score,
            index: self.index,
            is_finished: self.is_finished(),
        })
    }

    /// Force the session to finish because its countdown ran out.
    ///
    /// Unanswered questions get no record. Returns `true` if this call ended
    /// the session and `false` if it was already finished.
    pub fn time_expired(&mut self, expired_at: DateTime<Utc>) -> bool {
        if self.is_finished() {
            return false;
        }
        self.finish(FinishReason::TimeExpired, expired_at);
        true
    }

    /// Answers given so far, oldest first.
    #[must_use]
    pub fn review_log(&self) -> &[AnswerRecord] {
        &self.records
    }

    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        ExamProgress {
            total: self.questions.len(),
            answered: self.records.len(),
            remaining: self.questions.len().saturating_sub(self.index),
            score: self.score,
            is_finished: self.is_finished(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> ExamSummary {
        ExamSummary::from_records(
            self.subject.clone(),
            self.questions.len(),
            self.score,
            &self.records,
            self.finish_reason,
        )
    }

    fn finish(&mut self, reason: FinishReason, at: DateTime<Utc>) {
        self.finish_reason = Some(reason);
        self.completed_at = Some(at);
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("id", &self.id)
            .field("subject", &self.subject)
            .field("questions_len", &self.questions.len())
            .field("index", &self.index)
            .field("score", &self.score)
            .field("records_len", &self.records.len())
            .field("finish_reason", &self.finish_reason)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn question(n: usize) -> Question {
        Question::new(format!("Q{n}"), ["right", "wrong"], "right").unwrap()
    }

    fn session(n: usize) -> ExamSession {
        ExamSession::start("physics", (1..=n).map(question).collect(), fixed_now()).unwrap()
    }

    #[test]
    fn blank_subject_is_invalid_input() {
        let err = ExamSession::start(" ", vec![question(1)], fixed_now()).unwrap_err();
        assert!(matches!(err, ExamError::InvalidInput(_)));
    }

    #[test]
    fn empty_session_starts_finished() {
        let mut s = session(0);
        assert_eq!(s.state(), ExamState::Finished);
        assert_eq!(s.finish_reason(), Some(FinishReason::Completed));
        assert_eq!(s.current_question().unwrap_err(), ExamError::OutOfRange);
        assert_eq!(
            s.submit_answer("x", fixed_now()).unwrap_err(),
            ExamError::InvalidState
        );
        assert!(!s.time_expired(fixed_now()));
    }

    #[test]
    fn two_question_scenario() {
        let mut s = session(2);
        assert_eq!(s.state(), ExamState::Active);
        assert_eq!(s.current_question().unwrap().text(), "Q1");

        let first = s.submit_answer("right", fixed_now()).unwrap();
        assert_eq!(first.score, 1.0);
        assert_eq!(first.index, 1);
        assert!(!first.is_finished);

        let second = s.submit_answer("wrong", fixed_now()).unwrap();
        assert_eq!(second.delta, -0.25);
        assert_eq!(second.score, 0.75);
        assert_eq!(second.index, 2);
        assert!(second.is_finished);
        assert_eq!(s.state(), ExamState::Finished);
        assert_eq!(s.completed_at(), Some(fixed_now()));

        let log = s.review_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], AnswerRecord::new("Q1", "right", "right"));
        assert_eq!(log[1], AnswerRecord::new("Q2", "wrong", "right"));
    }

    #[test]
    fn score_tracks_deltas_and_can_go_negative() {
        let mut s = session(5);
        let answers = ["wrong", "right", "wrong", "wrong", "wrong"];
        let mut expected = 0.0;
        for answer in answers {
            let before = s.score();
            let outcome = s.submit_answer(answer, fixed_now()).unwrap();
            let delta = if answer == "right" { 1.0 } else { -0.25 };
            expected += delta;
            assert_eq!(outcome.score, before + delta);
            assert_eq!(s.review_log().len(), s.index());
        }
        assert_eq!(s.score(), expected);
        assert_eq!(s.score(), 0.0);

        let mut all_wrong = session(3);
        for _ in 0..3 {
            all_wrong.submit_answer("nope", fixed_now()).unwrap();
        }
        assert_eq!(all_wrong.score(), -0.75);
        assert_eq!(all_wrong.summary().accuracy_percent, 0);
    }

    #[test]
    fn submit_after_finish_fails_without_mutation() {
        let mut s = session(1);
        s.submit_answer("right", fixed_now()).unwrap();

        let err = s.submit_answer("right", fixed_now()).unwrap_err();
        assert_eq!(err, ExamError::InvalidState);
        assert_eq!(s.index(), 1);
        assert_eq!(s.score(), 1.0);
        assert_eq!(s.review_log().len(), 1);
    }

    #[test]
    fn time_expiry_finishes_early_and_is_idempotent() {
        let mut s = session(3);
        s.submit_answer("right", fixed_now()).unwrap();

        assert!(s.time_expired(fixed_now()));
        assert_eq!(s.state(), ExamState::Finished);
        assert_eq!(s.finish_reason(), Some(FinishReason::TimeExpired));
        assert_eq!(s.index(), 1);
        assert_eq!(s.review_log().len(), 1);
        assert_eq!(s.current_question().unwrap_err(), ExamError::OutOfRange);

        assert!(!s.time_expired(fixed_now()));
        assert_eq!(s.finish_reason(), Some(FinishReason::TimeExpired));
        assert_eq!(
            s.submit_answer("right", fixed_now()).unwrap_err(),
            ExamError::InvalidState
        );

        let summary = s.summary();
        assert_eq!(summary.unanswered, 2);
        assert_eq!(summary.score, 1.0);
    }

    #[test]
    fn time_expiry_after_completion_is_a_no_op() {
        let mut s = session(1);
        s.submit_answer("right", fixed_now()).unwrap();
        assert!(!s.time_expired(fixed_now()));
        assert_eq!(s.finish_reason(), Some(FinishReason::Completed));
    }

    #[test]
    fn any_answer_sequence_finishes_with_full_log() {
        for n in 0..6 {
            let mut s = session(n);
            for i in 0..n {
                let answer = if i % 2 == 0 { "right" } else { "x" };
                s.submit_answer(answer, fixed_now()).unwrap();
            }
            assert!(s.is_finished());
            assert_eq!(s.index(), n);
            assert_eq!(s.review_log().len(), n);
        }
    }

    #[test]
    fn progress_reports_remaining() {
        let mut s = session(3);
        s.submit_answer("right", fixed_now()).unwrap();
        let p = s.progress();
        assert_eq!(p.total, 3);
        assert_eq!(p.answered, 1);
        assert_eq!(p.remaining, 2);
        assert!(!p.is_finished);
    }
}
