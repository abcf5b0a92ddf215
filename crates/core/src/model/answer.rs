use serde::{Deserialize, Serialize};

/// One answered question in an exam's review log.
///
/// Records are appended in answer order and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_text: String,
    pub selected: String,
    pub correct: String,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        question_text: impl Into<String>,
        selected: impl Into<String>,
        correct: impl Into<String>,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            selected: selected.into(),
            correct: correct.into(),
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_correctness_compares_selected_to_correct() {
        assert!(AnswerRecord::new("Q", "A", "A").is_correct());
        assert!(!AnswerRecord::new("Q", "B", "A").is_correct());
    }
}
