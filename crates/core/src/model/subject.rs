use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("subject key cannot be empty")]
    Empty,
}

/// Key naming a category of questions, e.g. `physics` or `mat`.
///
/// Keys are free-form; whatever the question source recognizes is valid.
/// Surrounding whitespace is trimmed and an empty key is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    pub const PHYSICS: &'static str = "physics";
    pub const CHEMISTRY: &'static str = "chemistry";
    pub const BOTANY: &'static str = "botany";
    pub const ZOOLOGY: &'static str = "zoology";
    pub const MAT: &'static str = "mat";

    /// Label carried by sessions composed from several subjects.
    pub const MOCK: &'static str = "mega-mock";

    /// # Errors
    ///
    /// Returns `SubjectError::Empty` if the key is blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, SubjectError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SubjectError::Empty);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn mock() -> Self {
        Self(Self::MOCK.to_owned())
    }

    /// Subjects the bundled question bank ships with.
    #[must_use]
    pub fn well_known() -> [&'static str; 5] {
        [
            Self::PHYSICS,
            Self::CHEMISTRY,
            Self::BOTANY,
            Self::ZOOLOGY,
            Self::MAT,
        ]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Subject {
    type Error = SubjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Subject {
    type Error = SubjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.0
    }
}
