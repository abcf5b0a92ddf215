mod driver;
mod events;
mod plan;
mod workflow;

// Public API of the exam subsystem.
pub use crate::error::ExamServiceError;
pub use driver::{DriveError, DriveOutcome, ExamDriver};
pub use events::{
    AlwaysCorrect, AnswerInput, ExamCommand, ExamEvents, NoopEvents, PendingInput, QuestionView,
    ScriptedInput,
};
pub use plan::{ExamPlan, MockExamConfig, MockQuota, PlanBuilder};
pub use workflow::{AnswerResult, ExamAttempt, ExamLoopService, FinishedExam};
