use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::{QuestionSource, Storage, StorageError};
use storage::sources::{FallbackSource, HttpQuestionSource, JsonFileSource};

use crate::Clock;
use crate::error::AppServicesError;
use crate::exam::{ExamLoopService, MockExamConfig};

/// Where questions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSourceConfig {
    /// Local question bank file.
    pub bank_path: PathBuf,
    /// Remote document store; when set it is consulted before the local file.
    pub remote_url: Option<String>,
}

impl QuestionSourceConfig {
    #[must_use]
    pub fn local(bank_path: impl Into<PathBuf>) -> Self {
        Self {
            bank_path: bank_path.into(),
            remote_url: None,
        }
    }

    /// Build the configured source.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the remote URL is invalid.
    pub fn build(&self) -> Result<Arc<dyn QuestionSource>, StorageError> {
        let local: Arc<dyn QuestionSource> = Arc::new(JsonFileSource::new(&self.bank_path));
        match self.remote_url.as_deref() {
            Some(url) => {
                let remote: Arc<dyn QuestionSource> = Arc::new(HttpQuestionSource::new(url)?);
                Ok(Arc::new(FallbackSource::new(remote, local)))
            }
            None => Ok(local),
        }
    }
}

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    exam_loop: Arc<ExamLoopService>,
    mock_config: MockExamConfig,
}

impl AppServices {
    /// Build services with the best score persisted in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// question source is misconfigured.
    pub async fn new_sqlite(
        db_url: &str,
        sources: &QuestionSourceConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let questions = sources.build()?;
        let storage = Storage::sqlite(db_url, questions).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let exam_loop = Arc::new(ExamLoopService::new(
            clock,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.scores),
        ));
        Self {
            exam_loop,
            mock_config: MockExamConfig::standard(),
        }
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle_options: bool) -> Self {
        let service = (*self.exam_loop).clone().with_shuffle_options(shuffle_options);
        self.exam_loop = Arc::new(service);
        self
    }

    #[must_use]
    pub fn with_mock_config(mut self, config: MockExamConfig) -> Self {
        self.mock_config = config;
        self
    }

    #[must_use]
    pub fn exam_loop(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam_loop)
    }

    #[must_use]
    pub fn mock_config(&self) -> &MockExamConfig {
        &self.mock_config
    }
}
