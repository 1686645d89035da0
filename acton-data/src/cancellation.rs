//! Cooperative cancellation for data source calls
//!
//! Every asynchronous operation in this crate takes a
//! [`CancellationToken`]. A token that is already cancelled stops the call
//! before it reaches the data source; a token cancelled while the call is in
//! flight drops the pending future and yields [`Error::Cancelled`].
//!
//! # Example
//!
//! ```rust
//! use acton_data::cancellation::cancellable;
//! use acton_data::Error;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let token = CancellationToken::new();
//! token.cancel();
//!
//! let result = cancellable(&token, async { Ok(42) }).await;
//! assert!(matches!(result, Err(Error::Cancelled)));
//! # }
//! ```

use std::future::Future;

pub use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Runs `work` unless `token` is or becomes cancelled
pub async fn cancellable<T, F>(token: &CancellationToken, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if token.is_cancelled() {
        tracing::debug!("Operation cancelled before start");
        return Err(Error::Cancelled);
    }

    tokio::select! {
        biased;

        () = token.cancelled() => {
            tracing::debug!("Operation cancelled while in flight");
            Err(Error::Cancelled)
        }
        result = work => result,
    }
}
