//! Question source adapters: local bank file, remote document store, and a
//! fallback combinator joining the two.

mod fallback;
mod http;
mod json_file;

pub use fallback::FallbackSource;
pub use http::HttpQuestionSource;
pub use json_file::JsonFileSource;
