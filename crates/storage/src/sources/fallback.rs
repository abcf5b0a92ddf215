use std::sync::Arc;

use async_trait::async_trait;
use exam_core::model::{Question, Subject};

use crate::repository::{QuestionSource, StorageError};

/// Tries `primary` first and falls back to `secondary` when the primary is
/// unavailable or has nothing for the subject.
#[derive(Clone)]
pub struct FallbackSource {
    primary: Arc<dyn QuestionSource>,
    secondary: Arc<dyn QuestionSource>,
}

impl FallbackSource {
    #[must_use]
    pub fn new(primary: Arc<dyn QuestionSource>, secondary: Arc<dyn QuestionSource>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl QuestionSource for FallbackSource {
    async fn fetch_subject(&self, subject: &Subject) -> Result<Vec<Question>, StorageError> {
        match self.primary.fetch_subject(subject).await {
            Ok(questions) if !questions.is_empty() => return Ok(questions),
            Ok(_) => {
                tracing::debug!(%subject, "primary source has no questions; trying fallback");
            }
            Err(err) => {
                tracing::warn!(%subject, error = %err, "primary source failed; trying fallback");
            }
        }
        self.secondary.fetch_subject(subject).await
    }
}
