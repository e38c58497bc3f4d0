//! Cancellation shared by all calls of one endpoint client.

use std::sync::Arc;

use tokio::sync::watch;

/// A cancellation signal, cheap to clone.
///
/// Every [`Service`](crate::Service) owns one token and attaches it to each
/// request it sends. Cancelling it aborts every in-flight call of that
/// service, and every later call fails immediately with
/// [`Error::Cancelled`](crate::Error::Cancelled): a cancelled token never
/// resets. Callers that need to cancel requests independently should use
/// one service per request.
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Cancel all calls observing this token.
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Completes when the token is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.state.subscribe();
        // the sender lives as long as `self`, so this only returns on cancel
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
