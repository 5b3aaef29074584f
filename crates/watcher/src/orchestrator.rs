use std::{any::Any, panic::AssertUnwindSafe, time::Duration};

use eyre::{Report, Result, eyre};
use futures::FutureExt;
use primitives::Cursor;
use review::Poller;
use telegram::Notifier;
use tracing::{debug, error, info, warn};

use crate::{
    classify::classify,
    sleeper::{Sleeper, TokioSleeper},
};

/// Sent when a poll returned no homework updates.
pub const NO_RESPONSE_MESSAGE: &str = "Server response error.";

/// Fixed intervals driving the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Sleep after a successful iteration
    pub poll_interval: Duration,
    /// Sleep after every failed iteration
    pub error_backoff: Duration,
    /// Extra sleep once `max_consecutive_errors` failures have accumulated
    pub cooldown: Duration,
    /// Failed iterations that trigger the cooldown
    pub max_consecutive_errors: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            error_backoff: Duration::from_secs(5),
            cooldown: Duration::from_secs(600),
            max_consecutive_errors: 10,
        }
    }
}

/// State carried from one iteration to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    /// `from_date` for the next poll
    pub cursor: Cursor,
    /// Failed iterations since the last cooldown
    pub error_counter: u32,
}

impl LoopState {
    /// Fresh state polling from `cursor`.
    pub const fn new(cursor: Cursor) -> Self {
        Self { cursor, error_counter: 0 }
    }

    /// Fresh state polling from the current time.
    pub fn starting_now() -> Self {
        Self::new(Cursor::now())
    }
}

/// Phase the loop is in once an iteration completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Iteration succeeded; slept the poll interval.
    Polling,
    /// Iteration failed; slept the short backoff.
    BackoffShort,
    /// Failure streak hit the threshold; slept the short backoff and the cooldown.
    BackoffLong,
}

/// Polls for homework status changes and reports them.
///
/// Each iteration polls with the current cursor, notifies about the latest
/// record (or about an empty response), advances the cursor and sleeps. A
/// failing iteration leaves the cursor untouched, sends the error to the chat
/// and backs off; every `max_consecutive_errors` failures add a cooldown.
#[derive(Debug)]
pub struct Watcher<P, N, S = TokioSleeper> {
    poller: P,
    notifier: N,
    sleeper: S,
    schedule: Schedule,
}

impl<P: Poller, N: Notifier> Watcher<P, N> {
    /// Creates a watcher sleeping on the Tokio timer.
    pub const fn new(poller: P, notifier: N, schedule: Schedule) -> Self {
        Self::with_sleeper(poller, notifier, TokioSleeper, schedule)
    }
}

impl<P: Poller, N: Notifier, S: Sleeper> Watcher<P, N, S> {
    /// Creates a watcher with a custom [`Sleeper`].
    pub const fn with_sleeper(poller: P, notifier: N, sleeper: S, schedule: Schedule) -> Self {
        Self { poller, notifier, sleeper, schedule }
    }

    /// Runs one iteration, sleeps included, and returns the next state.
    pub async fn iterate(&self, state: LoopState) -> (LoopState, Phase) {
        let outcome = AssertUnwindSafe(self.check(state.cursor)).catch_unwind().await;
        let result = outcome.unwrap_or_else(|panic| {
            Err(eyre!("iteration panicked: {}", panic_message(panic.as_ref())))
        });

        match result {
            Ok(cursor) => {
                self.sleeper.sleep(self.schedule.poll_interval).await;
                (LoopState { cursor, ..state }, Phase::Polling)
            }
            Err(e) => self.back_off(state, &e).await,
        }
    }

    /// Runs the watcher until the task is dropped.
    pub async fn run(self, mut state: LoopState) -> Result<()> {
        info!(
            cursor = %state.cursor,
            poll_interval_secs = self.schedule.poll_interval.as_secs(),
            "Watching for homework status changes"
        );
        loop {
            let (next, phase) = self.iterate(state).await;
            debug!(?phase, cursor = %next.cursor, error_counter = next.error_counter, "Iteration finished");
            state = next;
        }
    }

    /// Poll, notify and return the advanced cursor.
    async fn check(&self, cursor: Cursor) -> Result<Cursor> {
        let response = self.poller.poll(cursor).await?;

        match response.latest() {
            Some(record) => {
                let message = classify(record).unwrap_or_else(|e| {
                    error!(error = %e, "Could not classify homework record");
                    e.message().to_owned()
                });
                let delivery = self.notifier.notify(&message).await;
                info!(%message, sent = delivery.is_sent(), "Sent homework status");
            }
            None => {
                warn!(%cursor, "No homework updates in review API response");
                self.notifier.notify(NO_RESPONSE_MESSAGE).await;
            }
        }

        let next = cursor.advance(&response.current_date);
        debug!(previous = %cursor, %next, "Advanced cursor");
        Ok(next)
    }

    /// Report the failure and sleep according to the backoff tier.
    async fn back_off(&self, state: LoopState, err: &Report) -> (LoopState, Phase) {
        let description = describe(err);
        let error_counter = state.error_counter + 1;
        error!(error = %description, error_counter, "Iteration failed");

        self.notifier.notify(&format!("Error: {}", description)).await;
        self.sleeper.sleep(self.schedule.error_backoff).await;

        if error_counter >= self.schedule.max_consecutive_errors {
            warn!(
                error_counter,
                cooldown_secs = self.schedule.cooldown.as_secs(),
                "Too many consecutive errors, cooling down"
            );
            self.sleeper.sleep(self.schedule.cooldown).await;
            (LoopState { error_counter: 0, ..state }, Phase::BackoffLong)
        } else {
            (LoopState { error_counter, ..state }, Phase::BackoffShort)
        }
    }
}

/// Full error chain on one line.
fn describe(err: &Report) -> String {
    err.chain().map(ToString::to_string).collect::<Vec<_>>().join(": ")
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
