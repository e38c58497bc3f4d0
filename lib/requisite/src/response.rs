//! Wrapped responses with a deferred `data` accessor.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;
use url::Url;

use crate::{Body, BodyFuture, Error, Response, Result, from_json};

/// Response envelope: APIs wrap their payload in `{ "data": ... }`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// What an endpoint client call resolves to.
///
/// Status and headers are available right away. The body is read only when
/// [`data`](Self::data) is first awaited, then decoded once and cached, so
/// callers that only look at the status never pay for the body.
///
/// When the transport failed and the failure policy is
/// [`FailurePolicy::Soft`](crate::FailurePolicy::Soft), the response has no
/// status, `ok()` is `false`, [`error`](Self::error) holds the failure and
/// `data()` is `None`.
pub struct ServiceResponse<T> {
    url: Url,
    status: Option<u16>,
    headers: HashMap<String, String>,
    error: Option<Error>,
    /// Pending body read, kept in place until it completes so a dropped
    /// `data()` call can be resumed.
    body: Mutex<Option<BodyFuture>>,
    data: OnceCell<Option<T>>,
}

impl<T> ServiceResponse<T> {
    /// Wrap a transport response.
    #[must_use]
    pub fn new(url: Url, response: Response<Body>) -> Self {
        let (status, headers, body) = response.into_parts();
        Self {
            url,
            status: Some(status),
            headers,
            error: None,
            body: Mutex::new(Some(Box::pin(body.collect()))),
            data: OnceCell::new(),
        }
    }

    /// A response for a call whose transport failed.
    #[must_use]
    pub fn failed(url: Url, error: Error) -> Self {
        Self {
            url,
            status: None,
            headers: HashMap::new(),
            error: Some(error),
            body: Mutex::new(None),
            data: OnceCell::new(),
        }
    }

    /// Requested URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP status code; `None` when the transport failed.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Status is 2xx.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.status.is_some_and(|status| (200..300).contains(&status))
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The transport failure, for softly failed calls.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns `true` when the transport failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

impl<T: DeserializeOwned> ServiceResponse<T> {
    /// The `data` field of the JSON body.
    ///
    /// The first call reads and decodes the body; later calls return the
    /// cached value. An empty body, a body that is not JSON, a JSON body
    /// without `data` or a failed read all yield `None`.
    ///
    /// Dropping the returned future before it completes (a timeout, a lost
    /// `select!` branch) keeps the partial read; the next call resumes it.
    pub async fn data(&self) -> Option<&T> {
        self.data
            .get_or_init(|| async {
                let mut pending = self.body.lock().await;
                let read = pending.as_mut()?.await;
                *pending = None;
                decode(read)
            })
            .await
            .as_ref()
    }

    /// Consume the response into its decoded `data` field.
    pub async fn into_data(self) -> Option<T> {
        self.data().await;
        self.data.into_inner().flatten()
    }
}

fn decode<T: DeserializeOwned>(read: Result<Bytes>) -> Option<T> {
    let bytes = match read {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(error = %err, "failed to read response body");
            return None;
        }
    };
    if bytes.is_empty() {
        return None;
    }

    match from_json::<Envelope<T>>(&bytes) {
        Ok(envelope) => envelope.data,
        Err(err) => {
            debug!(error = %err, "response body is not a data envelope");
            None
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ServiceResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceResponse")
            .field("url", &self.url.as_str())
            .field("status", &self.status)
            .field("error", &self.error)
            .field("data", &self.data.get())
            .finish_non_exhaustive()
    }
}
