mod answer;
mod ids;
mod question;
mod score;
mod subject;
mod summary;

pub use answer::AnswerRecord;
pub use ids::ExamId;
pub use question::{Question, QuestionDraft, QuestionError};
pub use score::{BestScore, BestScoreError, CORRECT_REWARD, WRONG_PENALTY, score_delta};
pub use subject::{Subject, SubjectError};
pub use summary::{ExamSummary, FinishReason, accuracy_percent};
