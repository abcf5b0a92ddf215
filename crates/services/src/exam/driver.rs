use thiserror::Error;
use tokio::sync::mpsc;

use super::events::{AnswerInput, ExamCommand, ExamEvents, QuestionView};
use super::workflow::{ExamAttempt, ExamLoopService, FinishedExam};
use crate::error::ExamServiceError;
use crate::timer::{ExamTimer, TimeRemaining};

/// How a driven exam ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveOutcome {
    Finished(FinishedExam),
    /// The user left before finishing; nothing was recorded.
    Cancelled { answered: usize },
}

enum TimerSignal {
    Tick(TimeRemaining),
    Expired,
}

enum Step {
    Command(Option<ExamCommand>),
    Expired,
}

/// Driving failed; the attempt is handed back.
///
/// When the attempt already finished, the usual cause is a best-score write
/// failure and [`ExamLoopService::finalize`] can be retried on it.
#[derive(Debug, Error)]
#[error("exam run failed")]
pub struct DriveError {
    source: ExamServiceError,
    attempt: Box<ExamAttempt>,
}

impl DriveError {
    #[must_use]
    pub fn error(&self) -> &ExamServiceError {
        &self.source
    }

    #[must_use]
    pub fn attempt(&self) -> &ExamAttempt {
        &self.attempt
    }

    #[must_use]
    pub fn into_parts(self) -> (ExamServiceError, ExamAttempt) {
        (self.source, *self.attempt)
    }
}

enum Ended {
    Finished(FinishedExam),
    Cancelled,
}

/// Runs one exam attempt from first question to results.
///
/// Owns the countdown for timed attempts: the timer starts with the first
/// question and is cancelled whenever `run` returns.
pub struct ExamDriver<'a> {
    service: &'a ExamLoopService,
}

impl<'a> ExamDriver<'a> {
    #[must_use]
    pub fn new(service: &'a ExamLoopService) -> Self {
        Self { service }
    }

    /// Drive `attempt` until it finishes or the user cancels.
    ///
    /// # Errors
    ///
    /// Returns `DriveError`, carrying the attempt, when answering or
    /// recording the score fails.
    pub async fn run(
        &self,
        mut attempt: ExamAttempt,
        input: &mut dyn AnswerInput,
        events: &mut dyn ExamEvents,
    ) -> Result<DriveOutcome, DriveError> {
        match self.drive(&mut attempt, input, events).await {
            Ok(Ended::Finished(finished)) => {
                events.on_exam_finished(&finished.summary, finished.best_score);
                events.on_review_available(attempt.session().review_log());
                Ok(DriveOutcome::Finished(finished))
            }
            Ok(Ended::Cancelled) => {
                let answered = attempt.session().index();
                self.service.cancel_exam(attempt);
                Ok(DriveOutcome::Cancelled { answered })
            }
            Err(source) => Err(DriveError {
                source,
                attempt: Box::new(attempt),
            }),
        }
    }

    async fn drive(
        &self,
        attempt: &mut ExamAttempt,
        input: &mut dyn AnswerInput,
        events: &mut dyn ExamEvents,
    ) -> Result<Ended, ExamServiceError> {
        let (tx, mut signals) = mpsc::unbounded_channel();
        let mut timer = attempt.time_limit().map(|limit| {
            events.on_tick(TimeRemaining::from(limit));
            let tick_tx = tx.clone();
            let expire_tx = tx.clone();
            ExamTimer::start(
                limit,
                move |remaining| {
                    let _ = tick_tx.send(TimerSignal::Tick(remaining));
                },
                move || {
                    let _ = expire_tx.send(TimerSignal::Expired);
                },
            )
        });
        drop(tx);
        let mut timer_live = timer.is_some();

        let ended = loop {
            let session = attempt.session();
            if session.is_finished() {
                // Only reachable for an attempt that started with no questions.
                break Ended::Finished(self.service.finalize(attempt).await?);
            }
            let question = session.current_question()?.clone();
            events.on_question_changed(&QuestionView {
                question: &question,
                index: session.index(),
                total: session.total_questions(),
                score: session.score(),
            });

            let step = {
                let mut command = input.next_command(&question);
                loop {
                    tokio::select! {
                        biased;
                        signal = signals.recv(), if timer_live => match signal {
                            Some(TimerSignal::Tick(remaining)) => events.on_tick(remaining),
                            Some(TimerSignal::Expired) => break Step::Expired,
                            None => timer_live = false,
                        },
                        next = &mut command => break Step::Command(next),
                    }
                }
            };

            match step {
                Step::Expired => {
                    if let Some(finished) = self.service.expire(attempt).await? {
                        break Ended::Finished(finished);
                    }
                }
                Step::Command(Some(ExamCommand::Answer(selected))) => {
                    let result = self.service.answer(attempt, &selected).await?;
                    if let Some(finished) = result.finished {
                        break Ended::Finished(finished);
                    }
                }
                Step::Command(Some(ExamCommand::Cancel) | None) => break Ended::Cancelled,
            }
        };

        if let Some(timer) = timer.as_mut() {
            timer.cancel();
        }
        Ok(ended)
    }
}
