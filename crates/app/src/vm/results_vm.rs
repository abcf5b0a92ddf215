use exam_core::model::{AnswerRecord, BestScore, ExamSummary, FinishReason};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub title: String,
    pub score_str: String,
    pub accuracy_str: String,
    pub breakdown_str: String,
    pub best_str: String,
}

impl ResultsVm {
    #[must_use]
    pub fn new(summary: &ExamSummary, best_score: BestScore) -> Self {
        let title = match summary.finish_reason {
            Some(FinishReason::TimeExpired) => "⏰ Time's up!".to_owned(),
            _ => format!("Exam finished: {}", summary.subject),
        };
        Self {
            title,
            score_str: format!(
                "Your Score: {:.2} / {}",
                summary.score, summary.total_questions
            ),
            accuracy_str: format!("Accuracy: {}%", summary.accuracy_percent),
            breakdown_str: format!(
                "Correct: {}  Wrong: {}  Unanswered: {}",
                summary.correct, summary.incorrect, summary.unanswered
            ),
            best_str: format!("Best Score: {best_score}"),
        }
    }

    #[must_use]
    pub fn lines(&self) -> [&str; 5] {
        [
            self.title.as_str(),
            self.score_str.as_str(),
            self.accuracy_str.as_str(),
            self.breakdown_str.as_str(),
            self.best_str.as_str(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub number: usize,
    pub question: String,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
}

impl ReviewRowVm {
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mark = if self.is_correct { "✔" } else { "✘" };
        let mut lines = vec![
            format!("{}. {mark} {}", self.number, self.question),
            format!("   Your answer: {}", self.selected),
        ];
        if !self.is_correct {
            lines.push(format!("   Correct answer: {}", self.correct));
        }
        lines
    }
}

#[must_use]
pub fn map_review_rows(records: &[AnswerRecord]) -> Vec<ReviewRowVm> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| ReviewRowVm {
            number: i + 1,
            question: record.question_text.clone(),
            selected: record.selected.clone(),
            correct: record.correct.clone(),
            is_correct: record.is_correct(),
        })
        .collect()
}
