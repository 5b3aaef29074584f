//! Watcher crate: the poll, classify, notify and backoff loop.
#![allow(clippy::uninlined_format_args)]
/// Mapping of homework records to notification text
pub mod classify;
/// Orchestrator loop and backoff state machine
pub mod orchestrator;
/// Injectable sleeping
pub mod sleeper;

pub use classify::{ClassifyError, classify};
pub use orchestrator::{LoopState, NO_RESPONSE_MESSAGE, Phase, Schedule, Watcher};
pub use sleeper::{Sleeper, TokioSleeper};
