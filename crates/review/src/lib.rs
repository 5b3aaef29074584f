//! Review crate: polling the homework review API.
#![allow(clippy::uninlined_format_args)]
use async_trait::async_trait;
use eyre::Result;
use primitives::{Cursor, StatusesResponse};

/// Review API client
pub mod client;

pub use client::ReviewClient;

/// Source of homework status updates.
///
/// Implementations absorb failures where the server answered but the answer is
/// unusable, returning [`StatusesResponse::default`]. An `Err` means the request
/// never produced a response and is left to the caller's backoff.
#[async_trait]
pub trait Poller: Send + Sync {
    /// Fetch the statuses that changed since `cursor`.
    async fn poll(&self, cursor: Cursor) -> Result<StatusesResponse>;
}

#[async_trait]
impl Poller for ReviewClient {
    async fn poll(&self, cursor: Cursor) -> Result<StatusesResponse> {
        self.homework_statuses(cursor).await
    }
}
