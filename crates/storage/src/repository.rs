use async_trait::async_trait;
use exam_core::model::{BestScore, Question, Subject};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters and question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    /// The question bank could not be reached or read.
    #[error("question source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Supplies the questions filed under a subject.
///
/// An unknown subject yields an empty list, not an error. Order carries no
/// meaning; callers shuffle.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::SourceUnavailable` when the backing store cannot be read.
    async fn fetch_subject(&self, subject: &Subject) -> Result<Vec<Question>, StorageError>;
}

/// Durable home of the single best-score value.
#[async_trait]
pub trait BestScoreRepository: Send + Sync {
    /// Current best score, `None` when nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or holds a malformed value.
    async fn get_best_score(&self) -> Result<Option<BestScore>, StorageError>;

    /// Raise the stored best score to `max(stored, score)` in one atomic step
    /// and return the value now stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn record_score(&self, score: f64) -> Result<BestScore, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<HashMap<Subject, Vec<Question>>>>,
    best_score: Arc<Mutex<Option<BestScore>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the questions stored under `subject`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_subject(
        &self,
        subject: Subject,
        questions: Vec<Question>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(subject, questions);
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn fetch_subject(&self, subject: &Subject) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(subject).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl BestScoreRepository for InMemoryRepository {
    async fn get_best_score(&self) -> Result<Option<BestScore>, StorageError> {
        let guard = self
            .best_score
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn record_score(&self, score: f64) -> Result<BestScore, StorageError> {
        let mut guard = self
            .best_score
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let best = guard.unwrap_or(BestScore::ZERO).max_with(score);
        *guard = Some(best);
        Ok(best)
    }
}

/// Question source and score store behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
    pub scores: Arc<dyn BestScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionSource>, scores: Arc<dyn BestScoreRepository>) -> Self {
        Self { questions, scores }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionSource> = Arc::new(repo.clone());
        let scores: Arc<dyn BestScoreRepository> = Arc::new(repo);
        Self { questions, scores }
    }
}
