use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::{Question, Subject};

use crate::bank::QuestionBank;
use crate::repository::{QuestionSource, StorageError};

/// Question bank stored as a local JSON file.
///
/// The file is re-read on every fetch so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::SourceUnavailable` if the file is missing,
    /// unreadable, or not a bank document.
    pub async fn load(&self) -> Result<QuestionBank, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            StorageError::SourceUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        QuestionBank::from_json(&raw).map_err(|e| {
            StorageError::SourceUnavailable(format!("{}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn fetch_subject(&self, subject: &Subject) -> Result<Vec<Question>, StorageError> {
        let bank = self.load().await?;
        let questions = bank.subject(subject);
        tracing::debug!(
            path = %self.path.display(),
            %subject,
            count = questions.len(),
            "loaded questions from bank file"
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn bank_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn fetches_subject_from_file() {
        let file = bank_file(
            r#"{"mat": [{"q": "EJOTY?", "options": ["5-10-15-20-25", "1-2-3"], "a": "5-10-15-20-25"}]}"#,
        );
        let source = JsonFileSource::new(file.path());

        let mat = source
            .fetch_subject(&Subject::new("mat").unwrap())
            .await
            .unwrap();
        assert_eq!(mat.len(), 1);
        assert_eq!(mat[0].text(), "EJOTY?");

        let none = source
            .fetch_subject(&Subject::new("physics").unwrap())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("nope.json"));
        let err = source
            .fetch_subject(&Subject::new("mat").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn corrupt_file_is_unavailable() {
        let file = bank_file("{ not json");
        let err = JsonFileSource::new(file.path())
            .fetch_subject(&Subject::new("mat").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::SourceUnavailable(_)));
    }
}
