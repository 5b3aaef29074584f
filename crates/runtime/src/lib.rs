//! Runtime utilities for the homework bot.
#![allow(clippy::uninlined_format_args)]

/// Console and rotating file logging
pub mod logging;
/// Shutdown signal handling
pub mod shutdown;

#[cfg(test)]
mod shutdown_test;
