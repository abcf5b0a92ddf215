#![forbid(unsafe_code)]

pub mod error;
pub mod exam;
pub mod model;
pub mod shuffle;
pub mod time;

pub use error::ExamError;
pub use exam::{ExamProgress, ExamSession, ExamState, SubmitOutcome};
pub use shuffle::Shuffler;
pub use time::Clock;
