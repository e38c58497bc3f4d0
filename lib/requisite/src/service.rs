//! Endpoint clients: one resource template bound to the shared configuration.

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use crate::compose::{AddressingMode, compose};
use crate::{
    Body, CancelToken, Error, FailurePolicy, HyperClient, Method, PatchOperation, PathSpec,
    ResourceTemplate, Result, ServiceResponse, SharedConfig, Transport, to_json,
};

/// HTTP client for one endpoint.
///
/// A service owns its resource template, an optional addressing mode
/// override and a [`CancelToken`] shared by all of its calls. Every call
/// reads a fresh snapshot of the shared configuration, so base URL and
/// header updates apply to later calls.
///
/// # Example
///
/// ```no_run
/// use requisite::{PathParts, Service, SharedConfig, Config};
/// use serde_json::Value;
///
/// # async fn run() -> requisite::Result<()> {
/// let config = SharedConfig::new(Config {
///     base_url: "https://jsonplaceholder.typicode.com".to_string(),
///     ..Config::default()
/// });
/// let posts = Service::new("/posts", config);
///
/// let response = posts
///     .get::<Value>(PathParts::new().path("/:id").param("id", 1))
///     .await?;
/// println!("{:?} {:?}", response.status(), response.data().await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Service<C = HyperClient> {
    template: ResourceTemplate,
    mode: Option<AddressingMode>,
    config: SharedConfig,
    cancel: CancelToken,
    client: C,
}

impl Service {
    /// Create an endpoint client using a default [`HyperClient`].
    #[must_use]
    pub fn new(template: impl Into<String>, config: SharedConfig) -> Self {
        Self::with_client(HyperClient::new(), template, config)
    }

    /// Create a bypass-mode client whose template is a fully qualified URL.
    #[must_use]
    pub fn raw(url: impl Into<String>, config: SharedConfig) -> Self {
        Self::new(url, config).use_base_url(false)
    }
}

impl<C> Service<C> {
    /// Create an endpoint client on top of the given transport.
    #[must_use]
    pub fn with_client(client: C, template: impl Into<String>, config: SharedConfig) -> Self {
        Self {
            template: ResourceTemplate::new(template),
            mode: None,
            config,
            cancel: CancelToken::new(),
            client,
        }
    }

    /// Override the configuration's `use_base_url` for this client.
    #[must_use]
    pub fn use_base_url(mut self, use_base_url: bool) -> Self {
        self.mode = Some(AddressingMode::from_use_base_url(use_base_url));
        self
    }

    /// The resource template.
    #[must_use]
    pub const fn template(&self) -> &ResourceTemplate {
        &self.template
    }

    /// The shared configuration.
    #[must_use]
    pub const fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The token attached to every request of this client.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Abort every in-flight call of this client.
    ///
    /// Later calls fail with [`Error::Cancelled`] too: the token never
    /// resets.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<C: Transport> Service<C> {
    /// Send a `GET` request.
    ///
    /// # Errors
    ///
    /// Fails before any I/O with [`Error::MissingParameters`],
    /// [`Error::MissingBaseUrl`] or [`Error::InvalidUrl`]. Transport
    /// failures are returned only under [`FailurePolicy::Strict`].
    pub async fn get<T>(&self, path: impl Into<PathSpec>) -> Result<ServiceResponse<T>> {
        self.send(Method::Get, path.into(), None).await
    }

    /// Send a `POST` request with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get); also fails if the payload cannot be
    /// serialized.
    pub async fn post<T, B>(&self, payload: &B, path: impl Into<PathSpec>) -> Result<ServiceResponse<T>>
    where
        B: Serialize + ?Sized,
    {
        let body = to_json(payload)?;
        self.send(Method::Post, path.into(), Some(body)).await
    }

    /// Send a `PUT` request with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`post`](Self::post).
    pub async fn put<T, B>(&self, payload: &B, path: impl Into<PathSpec>) -> Result<ServiceResponse<T>>
    where
        B: Serialize + ?Sized,
    {
        let body = to_json(payload)?;
        self.send(Method::Put, path.into(), Some(body)).await
    }

    /// Send a `DELETE` request.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn delete<T>(&self, path: impl Into<PathSpec>) -> Result<ServiceResponse<T>> {
        self.send(Method::Delete, path.into(), None).await
    }

    /// Send a `PATCH` request whose body is a JSON-Patch document.
    ///
    /// # Errors
    ///
    /// See [`post`](Self::post).
    pub async fn patch<T>(
        &self,
        operations: &[PatchOperation],
        path: impl Into<PathSpec>,
    ) -> Result<ServiceResponse<T>> {
        let body = to_json(operations)?;
        self.send(Method::Patch, path.into(), Some(body)).await
    }

    async fn send<T>(
        &self,
        method: Method,
        spec: PathSpec,
        body: Option<Bytes>,
    ) -> Result<ServiceResponse<T>> {
        let config = self.config.snapshot();
        let mode = self
            .mode
            .unwrap_or_else(|| AddressingMode::from_use_base_url(config.use_base_url));
        let request = compose(
            &self.template,
            Some(&spec),
            method,
            body,
            mode,
            &config,
            &self.cancel,
        )?;
        let url = request.url().clone();

        config.interceptors.request(&request);
        let outcome = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::Cancelled),
            result = self.client.execute(request) => result,
        };

        match outcome {
            Ok(response) => {
                debug!(%method, %url, status = response.status(), "received response");
                config.interceptors.response(&response);
                let cancel = self.cancel.clone();
                let response = response.map_body(|body| cancellable(body, cancel));
                Ok(ServiceResponse::new(url, response))
            }
            Err(err) => {
                warn!(%method, %url, error = %err, "request failed");
                config.interceptors.error(&err);
                match config.failure_policy {
                    FailurePolicy::Soft => Ok(ServiceResponse::failed(url, err)),
                    FailurePolicy::Strict => Err(err),
                }
            }
        }
    }
}

/// Tie an unread body to the client's token so cancelling also aborts
/// body reads.
fn cancellable(body: Body, cancel: CancelToken) -> Body {
    if !body.is_deferred() {
        return body;
    }
    Body::deferred(async move {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            bytes = body.collect() => bytes,
        }
    })
}
