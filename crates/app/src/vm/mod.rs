mod question_vm;
mod results_vm;
mod time_fmt;

pub use question_vm::{QuestionVm, option_letter, parse_command};
pub use results_vm::{ResultsVm, map_review_rows};
pub use time_fmt::{should_announce, timer_banner};
