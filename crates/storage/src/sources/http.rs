use async_trait::async_trait;
use exam_core::model::{Question, Subject};
use reqwest::{Client, StatusCode, Url};

use crate::bank::validate_drafts;
use crate::repository::{QuestionSource, StorageError};

/// Question bank served by a remote document store.
///
/// Each subject lives at `GET {base}/subjects/{subject}` as a JSON array of
/// questions. A 404 means the store does not know the subject.
#[derive(Debug, Clone)]
pub struct HttpQuestionSource {
    client: Client,
    base: Url,
}

impl HttpQuestionSource {
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if `base_url` is not a usable base URL.
    pub fn new(base_url: &str) -> Result<Self, StorageError> {
        Self::with_client(Client::new(), base_url)
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if `base_url` is not a usable base URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, StorageError> {
        let base = Url::parse(base_url)
            .map_err(|e| StorageError::Connection(format!("invalid remote url {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(StorageError::Connection(format!(
                "remote url cannot be a base: {base_url}"
            )));
        }
        Ok(Self { client, base })
    }

    fn subject_url(&self, subject: &Subject) -> Result<Url, StorageError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::Connection("remote url cannot be a base".into()))?
            .pop_if_empty()
            .push("subjects")
            .push(subject.as_str());
        Ok(url)
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch_subject(&self, subject: &Subject) -> Result<Vec<Question>, StorageError> {
        let url = self.subject_url(subject)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StorageError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(StorageError::SourceUnavailable(format!(
                "remote store returned {status}"
            )));
        }

        let entries: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StorageError::SourceUnavailable(e.to_string()))?;
        let mut rejected = Vec::new();
        let questions = validate_drafts(subject.as_str(), entries, &mut rejected);
        tracing::debug!(
            %subject,
            count = questions.len(),
            rejected = rejected.len(),
            "loaded questions from remote store"
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_subject_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects/botany"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"q": "C4 anatomy?", "options": ["Kranz", "Casparian"], "a": "Kranz"},
                {"q": "   ", "options": ["x"], "a": "x"}
            ])))
            .mount(&server)
            .await;

        let source = HttpQuestionSource::new(&server.uri()).unwrap();
        let questions = source
            .fetch_subject(&Subject::new("botany").unwrap())
            .await
            .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer(), "Kranz");
    }

    #[tokio::test]
    async fn keyless_entry_is_dropped_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects/zoology"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"q": "Bile is made by?", "options": ["Liver", "Pancreas"]},
                {"q": "Largest gland?", "options": ["Liver", "Thyroid"], "a": "Liver"}
            ])))
            .mount(&server)
            .await;

        let source = HttpQuestionSource::new(&server.uri()).unwrap();
        let questions = source
            .fetch_subject(&Subject::new("zoology").unwrap())
            .await
            .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text(), "Largest gland?");
    }

    #[tokio::test]
    async fn not_found_is_empty_and_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects/zoology"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subjects/physics"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpQuestionSource::new(&server.uri()).unwrap();
        let zoology = source
            .fetch_subject(&Subject::new("zoology").unwrap())
            .await
            .unwrap();
        assert!(zoology.is_empty());

        let err = source
            .fetch_subject(&Subject::new("physics").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::SourceUnavailable(_)));
    }

    #[test]
    fn subject_url_appends_segments() {
        let source = HttpQuestionSource::new("https://bank.example/v1/").unwrap();
        let url = source
            .subject_url(&Subject::new("mat").unwrap())
            .unwrap();
        assert_eq!(url.as_str(), "https://bank.example/v1/subjects/mat");
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(HttpQuestionSource::new("not a url").is_err());
        assert!(HttpQuestionSource::new("mailto:bank@example.com").is_err());
    }
}
