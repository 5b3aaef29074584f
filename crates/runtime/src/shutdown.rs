use std::{
    future::Future,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use futures::FutureExt;
use tokio::signal::unix::{Signal, SignalKind};
use tracing::debug;

/// Resolves when the process receives SIGINT or SIGTERM.
pub struct ShutdownSignal {
    /// A future that resolves when a SIGINT signal is received.
    ctrl_c: Pin<Box<dyn Future<Output = io::Result<()>> + Send>>,
    /// A stream of SIGTERM signals.
    term_signal: Signal,
}

impl std::fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSignal").finish_non_exhaustive()
    }
}

impl ShutdownSignal {
    /// Install the signal handlers. Must be called inside a Tokio runtime.
    pub fn new() -> io::Result<Self> {
        let ctrl_c = Box::pin(tokio::signal::ctrl_c());
        let term_signal = tokio::signal::unix::signal(SignalKind::terminate())?;

        Ok(Self { ctrl_c, term_signal })
    }
}

impl Future for ShutdownSignal {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.ctrl_c.poll_unpin(cx).is_ready() {
            debug!("Received SIGINT signal");
            return Poll::Ready(());
        }

        if this.term_signal.poll_recv(cx).is_ready() {
            debug!("Received SIGTERM signal");
            return Poll::Ready(());
        }

        Poll::Pending
    }
}

/// Run a future until it completes or `shutdown` resolves.
///
/// Returns `None` when shutdown won, so the caller can still flush and clean up.
pub async fn run_until_shutdown<F, S, O>(fut: F, shutdown: S) -> Option<O>
where
    F: Future<Output = O>,
    S: Future<Output = ()>,
{
    tokio::select! {
        // NOTE: wrap with a `Box` so we don't allocate a
        // huge future state machine on the stack.
        result = Box::pin(fut) => Some(result),
        _ = shutdown => {
            debug!("Shutdown signal received");
            None
        }
    }
}
