#![forbid(unsafe_code)]

pub mod bank;
pub mod repository;
pub mod sources;
pub mod sqlite;
