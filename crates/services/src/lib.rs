#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod exam;
pub mod timer;

pub use exam_core::Clock;

pub use app_services::{AppServices, QuestionSourceConfig};
pub use error::{AppServicesError, ExamServiceError};
pub use exam::{
    AnswerInput, AnswerResult, DriveError, DriveOutcome, ExamAttempt, ExamCommand, ExamDriver,
    ExamEvents, ExamLoopService, FinishedExam, MockExamConfig, MockQuota, QuestionView,
};
pub use timer::{ExamTimer, TimeRemaining};
