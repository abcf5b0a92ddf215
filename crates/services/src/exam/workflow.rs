use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use exam_core::model::{BestScore, ExamSummary, Question, Subject};
use exam_core::{ExamError, ExamSession, Shuffler, SubmitOutcome};
use futures::future::try_join_all;
use storage::repository::{BestScoreRepository, QuestionSource};

use super::plan::{ExamPlan, MockExamConfig, PlanBuilder};
use crate::Clock;
use crate::error::ExamServiceError;

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// A started exam: the session plus its timing policy.
///
/// Owned by whoever hosts the exam view and passed explicitly to every
/// command; there is no shared current exam.
#[derive(Debug)]
pub struct ExamAttempt {
    session: ExamSession,
    time_limit: Option<Duration>,
    per_subject: Vec<(Subject, usize)>,
    score_recorded: bool,
}

impl ExamAttempt {
    #[must_use]
    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    /// Countdown length for timed (mock) exams; `None` for practice.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[must_use]
    pub fn per_subject(&self) -> &[(Subject, usize)] {
        &self.per_subject
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }
}

/// Final results handed to the results view.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedExam {
    pub summary: ExamSummary,
    /// Best score after folding this exam in.
    pub best_score: BestScore,
    pub is_new_best: bool,
}

/// Result of answering a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub outcome: SubmitOutcome,
    /// Present when this answer completed the exam.
    pub finished: Option<FinishedExam>,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Orchestrates exam start, answering, expiry and best-score bookkeeping.
#[derive(Clone)]
pub struct ExamLoopService {
    clock: Clock,
    questions: Arc<dyn QuestionSource>,
    scores: Arc<dyn BestScoreRepository>,
    shuffler: Arc<Mutex<Shuffler>>,
    shuffle_options: bool,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionSource>,
        scores: Arc<dyn BestScoreRepository>,
    ) -> Self {
        Self {
            clock,
            questions,
            scores,
            shuffler: Arc::new(Mutex::new(Shuffler::new())),
            shuffle_options: true,
        }
    }

    #[must_use]
    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = Arc::new(Mutex::new(shuffler));
        self
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle_options: bool) -> Self {
        self.shuffle_options = shuffle_options;
        self
    }

    /// Start an untimed practice exam over one subject.
    ///
    /// `count` limits the number of questions; `None` asks the whole pool.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::NoQuestions` when the subject has no questions,
    /// `ExamServiceError::SourceUnavailable` when the source fails, and
    /// `ExamServiceError::Exam` for a blank subject or a zero count.
    pub async fn start_exam(
        &self,
        subject: &str,
        count: Option<usize>,
    ) -> Result<ExamAttempt, ExamServiceError> {
        let subject = Subject::new(subject).map_err(ExamError::from)?;
        if count == Some(0) {
            return Err(ExamError::InvalidInput("question count must be at least 1".into()).into());
        }

        let pool = self.fetch(&subject).await?;
        if pool.is_empty() {
            return Err(ExamServiceError::NoQuestions {
                subject: subject.to_string(),
            });
        }

        let plan = self.with_builder(|builder| builder.practice(subject, &pool, count));
        self.begin(plan)
    }

    /// Start a timed mock exam composed from per-subject quotas.
    ///
    /// All subjects are fetched concurrently; the result does not depend on
    /// which fetch completes first.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::SourceUnavailable` if any subject fails to
    /// load and `ExamServiceError::NoQuestions` if every pool is empty.
    pub async fn start_mock_exam(
        &self,
        config: &MockExamConfig,
    ) -> Result<ExamAttempt, ExamServiceError> {
        let fetches = config.quotas().iter().map(|quota| async move {
            let pool = self.fetch(&quota.subject).await?;
            Ok::<_, ExamServiceError>((quota.clone(), pool))
        });
        let pools = try_join_all(fetches).await?;

        let plan = self.with_builder(|builder| builder.mock(pools, config.duration()));
        if plan.is_empty() {
            return Err(ExamServiceError::NoQuestions {
                subject: plan.subject.to_string(),
            });
        }
        self.begin(plan)
    }

    /// Answer the current question; on the last one, finish and record the score.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Exam` with `ExamError::InvalidState` if the
    /// exam is already finished, and `ExamServiceError::Storage` if the best
    /// score cannot be recorded.
    pub async fn answer(
        &self,
        attempt: &mut ExamAttempt,
        selected: &str,
    ) -> Result<AnswerResult, ExamServiceError> {
        let outcome = attempt.session.submit_answer(selected, self.clock.now())?;
        tracing::debug!(
            exam_id = %attempt.session.id(),
            index = outcome.index,
            correct = outcome.record.is_correct(),
            score = outcome.score,
            "answer recorded"
        );

        let finished = if outcome.is_finished {
            Some(self.finalize(attempt).await?)
        } else {
            None
        };
        Ok(AnswerResult { outcome, finished })
    }

    /// End the exam because its countdown ran out.
    ///
    /// Returns `None` when the exam had already finished.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the best score cannot be recorded.
    pub async fn expire(
        &self,
        attempt: &mut ExamAttempt,
    ) -> Result<Option<FinishedExam>, ExamServiceError> {
        if !attempt.session.time_expired(self.clock.now()) {
            return Ok(None);
        }
        tracing::info!(
            exam_id = %attempt.session.id(),
            answered = attempt.session.index(),
            total = attempt.session.total_questions(),
            "exam time expired"
        );
        self.finalize(attempt).await.map(Some)
    }

    /// Record the best score for a finished exam, once.
    ///
    /// Called by `answer` and `expire`; call it directly to retry after a
    /// storage failure. A driven exam hands its attempt back for this through
    /// `DriveError::into_parts`.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::NotFinished` for an exam still in progress,
    /// or `ExamServiceError::Storage` if persistence fails.
    pub async fn finalize(&self, attempt: &mut ExamAttempt) -> Result<FinishedExam, ExamServiceError> {
        if !attempt.session.is_finished() {
            return Err(ExamServiceError::NotFinished);
        }

        let summary = attempt.session.summary();
        let previous = self
            .scores
            .get_best_score()
            .await?
            .unwrap_or(BestScore::ZERO);

        let best_score = if attempt.score_recorded {
            previous
        } else {
            let best = self.scores.record_score(summary.score).await?;
            attempt.score_recorded = true;
            best
        };
        let is_new_best = best_score > previous;

        tracing::info!(
            exam_id = %attempt.session.id(),
            subject = %summary.subject,
            score = summary.score,
            answered = summary.answered,
            total = summary.total_questions,
            reason = ?summary.finish_reason,
            best = %best_score,
            is_new_best,
            "exam finished"
        );

        Ok(FinishedExam {
            summary,
            best_score,
            is_new_best,
        })
    }

    /// Abandon an exam. The attempt is dropped and no score is recorded.
    pub fn cancel_exam(&self, attempt: ExamAttempt) {
        tracing::info!(
            exam_id = %attempt.session.id(),
            answered = attempt.session.index(),
            finished = attempt.session.is_finished(),
            "exam cancelled"
        );
    }

    /// Stored best score, `0.00` when none was recorded yet.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the store cannot be read.
    pub async fn best_score(&self) -> Result<BestScore, ExamServiceError> {
        Ok(self
            .scores
            .get_best_score()
            .await?
            .unwrap_or(BestScore::ZERO))
    }

    async fn fetch(&self, subject: &Subject) -> Result<Vec<Question>, ExamServiceError> {
        self.questions.fetch_subject(subject).await.map_err(|err| {
            tracing::warn!(%subject, error = %err, "question fetch failed");
            ExamServiceError::SourceUnavailable(err.to_string())
        })
    }

    fn with_builder<F>(&self, build: F) -> ExamPlan
    where
        F: FnOnce(PlanBuilder<'_>) -> ExamPlan,
    {
        let mut shuffler = self.shuffler.lock().unwrap_or_else(PoisonError::into_inner);
        build(PlanBuilder::new(&mut shuffler).with_shuffle_options(self.shuffle_options))
    }

    fn begin(&self, plan: ExamPlan) -> Result<ExamAttempt, ExamServiceError> {
        let ExamPlan {
            subject,
            questions,
            per_subject,
            time_limit,
        } = plan;
        let session = ExamSession::start(subject.as_str(), questions, self.clock.now())?;
        tracing::info!(
            exam_id = %session.id(),
            %subject,
            questions = session.total_questions(),
            timed = time_limit.is_some(),
            "exam started"
        );
        Ok(ExamAttempt {
            session,
            time_limit,
            per_subject,
            score_recorded: false,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
