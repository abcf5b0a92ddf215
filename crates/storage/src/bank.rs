//! Question bank documents: `{ "<subject>": [ { "q": .., "options": [..], "a": .. } ] }`.

use std::collections::BTreeMap;

use exam_core::model::{Question, QuestionDraft, QuestionError, Subject};
use serde::Deserialize;
use serde_json::Value;

use crate::repository::StorageError;

/// A question that failed validation while loading a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedQuestion {
    pub subject: String,
    pub position: usize,
    pub error: QuestionError,
}

/// A parsed, validated question bank keyed by subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    subjects: BTreeMap<Subject, Vec<Question>>,
    rejected: Vec<RejectedQuestion>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct RawBank(BTreeMap<String, Vec<Value>>);

impl QuestionBank {
    /// Parse a bank document.
    ///
    /// Malformed questions are dropped and reported through [`Self::rejected`]
    /// rather than failing the whole bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the document is not a bank.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let RawBank(raw) =
            serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut bank = Self::default();
        for (key, entries) in raw {
            let Ok(subject) = Subject::new(key.as_str()) else {
                tracing::warn!(subject = %key, "skipping bank entry with blank subject key");
                continue;
            };
            let questions = validate_drafts(&key, entries, &mut bank.rejected);
            if let Some(existing) = bank.subjects.get_mut(&subject) {
                tracing::warn!(
                    %subject,
                    key = %key,
                    "bank keys name the same subject; merging their questions"
                );
                existing.extend(questions);
            } else {
                bank.subjects.insert(subject, questions);
            }
        }
        Ok(bank)
    }

    /// Questions for `subject`, empty if the bank does not know it.
    #[must_use]
    pub fn subject(&self, subject: &Subject) -> Vec<Question> {
        self.subjects.get(subject).cloned().unwrap_or_default()
    }

    pub fn subjects(&self) -> impl Iterator<Item = (&Subject, &[Question])> {
        self.subjects.iter().map(|(s, qs)| (s, qs.as_slice()))
    }

    #[must_use]
    pub fn rejected(&self) -> &[RejectedQuestion] {
        &self.rejected
    }

    /// Questions whose correct answer is not among their options.
    pub fn unanswerable(&self) -> impl Iterator<Item = (&Subject, &Question)> {
        self.subjects.iter().flat_map(|(subject, questions)| {
            questions
                .iter()
                .filter(|q| !q.has_valid_answer())
                .map(move |q| (subject, q))
        })
    }
}

/// Decode and validate the raw entries listed under one subject, recording
/// rejects. A bad entry never affects its neighbours.
pub(crate) fn validate_drafts(
    subject: &str,
    entries: Vec<Value>,
    rejected: &mut Vec<RejectedQuestion>,
) -> Vec<Question> {
    let mut questions = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        let parsed = QuestionDraft::deserialize(entry)
            .map_err(|e| QuestionError::Malformed(e.to_string()))
            .and_then(QuestionDraft::validate);
        match parsed {
            Ok(question) => {
                if !question.has_valid_answer() {
                    tracing::warn!(
                        subject,
                        position,
                        "correct answer is not among the options; question can never be scored correct"
                    );
                }
                questions.push(question);
            }
            Err(error) => {
                tracing::warn!(subject, position, %error, "dropping malformed question");
                rejected.push(RejectedQuestion {
                    subject: subject.to_owned(),
                    position,
                    error,
                });
            }
        }
    }
    questions
}
