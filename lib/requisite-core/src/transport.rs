//! The network primitive behind every endpoint client.
//!
//! Implement [`Transport`] to plug a custom HTTP stack, or to stub the
//! network in tests. The default implementation lives in the `requisite`
//! crate (`HyperClient`).

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Body, Request, Response, Result};

/// Executes an outgoing request.
///
/// Implementations return as soon as the status line and headers are
/// available; the body is handed back unread as a deferred [`Body`].
/// HTTP error statuses are not errors at this level.
pub trait Transport: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be completed:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Body>>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Body>>> + Send {
        (**self).execute(request)
    }
}
