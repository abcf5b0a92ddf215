//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::ExamError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by exam orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamServiceError {
    /// The source answered but had nothing for the request.
    #[error("no questions found for {subject}")]
    NoQuestions { subject: String },

    /// The source could not be reached or read.
    #[error("could not load question bank: {0}")]
    SourceUnavailable(String),

    #[error("exam is still in progress")]
    NotFinished,

    #[error(transparent)]
    Exam(#[from] ExamError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ExamServiceError {
    /// Message to show the user for non-fatal start failures.
    ///
    /// Returns `None` for contract violations and storage faults, which are
    /// not meant to be shown as a notice.
    #[must_use]
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::NoQuestions { .. } => Some("No questions found for this exam."),
            Self::SourceUnavailable(_) => Some("Could not load the question bank."),
            _ => None,
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
