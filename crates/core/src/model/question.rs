use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shuffle::Shuffler;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Malformed question data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    BlankText,

    #[error("question has no options")]
    NoOptions,

    #[error("option {index} is empty")]
    BlankOption { index: usize },

    #[error("correct answer cannot be empty")]
    BlankAnswer,

    /// The entry does not have the shape of a question at all.
    #[error("malformed question: {0}")]
    Malformed(String),
}

//
// ─── DRAFT ────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in a question bank.
///
/// The bank format uses the short keys `q` and `a`; the long names are
/// accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "q", alias = "text", alias = "question")]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "a", alias = "correctAnswer", alias = "correct_answer")]
    pub correct_answer: String,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_answer: correct_answer.into(),
        }
    }

    /// Check structural validity.
    ///
    /// A correct answer missing from `options` is a data-quality problem, not a
    /// structural one: such a question is accepted and can only ever be
    /// answered wrong. See [`Question::has_valid_answer`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when text, options or answer are blank.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::BlankText);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::BlankOption { index });
        }
        if self.correct_answer.trim().is_empty() {
            return Err(QuestionError::BlankAnswer);
        }

        Ok(Question {
            text: self.text,
            options: self.options,
            correct_answer: self.correct_answer,
        })
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft", into = "QuestionDraft")]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_answer: String,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the question is malformed.
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        QuestionDraft::new(text, options, correct_answer).validate()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_answer
    }

    /// True when the correct answer is one of the options.
    #[must_use]
    pub fn has_valid_answer(&self) -> bool {
        self.options.iter().any(|o| *o == self.correct_answer)
    }

    /// Returns the same question with its options in random order.
    #[must_use]
    pub fn with_shuffled_options(mut self, shuffler: &mut Shuffler) -> Self {
        self.options = shuffler.shuffle(&self.options);
        self
    }
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Question> for QuestionDraft {
    fn from(q: Question) -> Self {
        Self {
            text: q.text,
            options: q.options,
            correct_answer: q.correct_answer,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        let err = Question::new("  ", ["a", "b"], "a").unwrap_err();
        assert_eq!(err, QuestionError::BlankText);
    }

    #[test]
    fn missing_options_are_rejected() {
        let err = Question::new("Q", Vec::<String>::new(), "a").unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);

        let err = Question::new("Q", ["a", " "], "a").unwrap_err();
        assert_eq!(err, QuestionError::BlankOption { index: 1 });
    }

    #[test]
    fn answer_outside_options_is_accepted_but_flagged() {
        let q = Question::new("Q", ["a", "b"], "c").unwrap();
        assert!(!q.has_valid_answer());
        assert!(!q.is_correct("a"));
        assert!(q.is_correct("c"));
    }

    #[test]
    fn correctness_is_exact_string_equality() {
        let q = Question::new("Q", ["Kranz", "kranz"], "Kranz").unwrap();
        assert!(q.is_correct("Kranz"));
        assert!(!q.is_correct("kranz"));
        assert!(!q.is_correct("Kranz "));
    }

    #[test]
    fn parses_bank_format_and_long_names() {
        let short: Question =
            serde_json::from_str(r#"{"q":"SA node?","options":["Pacemaker","Valve"],"a":"Pacemaker"}"#)
                .unwrap();
        assert_eq!(short.text(), "SA node?");
        assert_eq!(short.correct_answer(), "Pacemaker");

        let long: Question = serde_json::from_str(
            r#"{"text":"SA node?","options":["Pacemaker","Valve"],"correctAnswer":"Pacemaker"}"#,
        )
        .unwrap();
        assert_eq!(long, short);

        let bad = serde_json::from_str::<Question>(r#"{"q":"","options":["x"],"a":"x"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn shuffled_options_keep_answer_and_option_set() {
        let q = Question::new("Q", ["a", "b", "c", "d"], "c").unwrap();
        let mut shuffler = Shuffler::seeded(7);
        let shuffled = q.clone().with_shuffled_options(&mut shuffler);

        assert_eq!(shuffled.correct_answer(), "c");
        let mut before = q.options().to_vec();
        let mut after = shuffled.options().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }
}
