//! Response bodies and JSON utilities.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::Result;

/// Future that yields the full body of a response once polled.
pub type BodyFuture = Pin<Box<dyn Future<Output = Result<Bytes>> + Send + 'static>>;

/// A response body that may not have been read from the wire yet.
///
/// Transports hand back a [`Body`] without consuming the payload; it is only
/// read when [`Body::collect`] is awaited. Dropping an uncollected body never
/// reads it.
pub struct Body {
    kind: Kind,
}

enum Kind {
    Empty,
    Buffered(Bytes),
    Deferred(BodyFuture),
}

impl Body {
    /// An empty body.
    #[must_use]
    pub const fn empty() -> Self {
        Self { kind: Kind::Empty }
    }

    /// A body whose bytes are already in memory.
    #[must_use]
    pub fn buffered(bytes: impl Into<Bytes>) -> Self {
        Self {
            kind: Kind::Buffered(bytes.into()),
        }
    }

    /// A body read lazily by the given future.
    #[must_use]
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<Bytes>> + Send + 'static,
    {
        Self {
            kind: Kind::Deferred(Box::pin(future)),
        }
    }

    /// Returns `true` until the body has been read from the transport.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self.kind, Kind::Deferred(_))
    }

    /// Read the whole body.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the underlying stream fails.
    pub async fn collect(self) -> Result<Bytes> {
        match self.kind {
            Kind::Empty => Ok(Bytes::new()),
            Kind::Buffered(bytes) => Ok(bytes),
            Kind::Deferred(future) => future.await,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::buffered(bytes)
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::buffered(Bytes::from_static(text.as_bytes()))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Empty => f.write_str("Body::Empty"),
            Kind::Buffered(bytes) => f.debug_tuple("Body::Buffered").field(&bytes.len()).finish(),
            Kind::Deferred(_) => f.write_str("Body::Deferred"),
        }
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use requisite_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Post { title: String }
///
/// let post = Post { title: "Hello".to_string() };
/// let bytes = to_json(&post).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"title":"Hello"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "data.address.city").
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
