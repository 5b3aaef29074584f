//! Core data model shared by the homework watcher crates.
/// Poll cursor and the server-reported `current_date`
pub mod cursor;
/// Homework records and the review API response
pub mod homework;
/// Known review statuses and their verdicts
pub mod status;

pub use cursor::{CurrentDate, Cursor};
pub use homework::{HomeworkRecord, StatusesResponse};
pub use status::HomeworkStatus;
