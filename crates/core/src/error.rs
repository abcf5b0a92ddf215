use thiserror::Error;

use crate::model::{QuestionError, SubjectError};

/// Contract violations raised by the exam session state machine.
///
/// These are programming errors from the caller's point of view: a correct
/// presentation layer never triggers them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("exam session is already finished")]
    InvalidState,

    #[error("no current question: exam session is finished")]
    OutOfRange,
}

impl From<SubjectError> for ExamError {
    fn from(err: SubjectError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<QuestionError> for ExamError {
    fn from(err: QuestionError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
