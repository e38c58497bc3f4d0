//! Tower middleware for the hyper transport.
//!
//! Layers wrap the transport, so they see every request an endpoint client
//! sends, after composition and before the network call.
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Any other tower layer whose service speaks
//! `Request<Bytes> -> Response<Body>` can be added with
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer).

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
