//! Shared endpoint configuration.
//!
//! A [`SharedConfig`] is created once at bootstrap and handed to every
//! endpoint client. Fields may be updated in place afterwards; the instance
//! itself is never replaced. Writes are last-writer-wins and two separate
//! updates are not atomic together, but each call reads one consistent
//! [`Config`] snapshot.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;

use crate::{Body, Error, Request, Response};

type RequestHook = Arc<dyn Fn(&Request<Bytes>) + Send + Sync>;
type ResponseHook = Arc<dyn Fn(&Response<Body>) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&Error) + Send + Sync>;

/// Callbacks notified around each network call.
///
/// Interceptors observe; they cannot alter or replace requests and
/// responses. Use a tower layer on the transport for that.
#[derive(Clone, Default)]
pub struct Interceptors {
    on_request: Option<RequestHook>,
    on_response: Option<ResponseHook>,
    on_error: Option<ErrorHook>,
}

impl Interceptors {
    /// No callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with each composed request right before it is sent.
    #[must_use]
    pub fn on_request(mut self, hook: impl Fn(&Request<Bytes>) + Send + Sync + 'static) -> Self {
        self.on_request = Some(Arc::new(hook));
        self
    }

    /// Called with each raw response, before its body is read.
    #[must_use]
    pub fn on_response(mut self, hook: impl Fn(&Response<Body>) + Send + Sync + 'static) -> Self {
        self.on_response = Some(Arc::new(hook));
        self
    }

    /// Called when the transport fails (connection, TLS, timeout,
    /// cancellation). HTTP error statuses are responses, not errors.
    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    pub(crate) fn request(&self, request: &Request<Bytes>) {
        if let Some(hook) = &self.on_request {
            hook(request);
        }
    }

    pub(crate) fn response(&self, response: &Response<Body>) {
        if let Some(hook) = &self.on_response {
            hook(response);
        }
    }

    pub(crate) fn error(&self, error: &Error) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }
}

impl fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptors")
            .field("on_request", &self.on_request.is_some())
            .field("on_response", &self.on_response.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// What a call resolves to when the transport fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Resolve to a failed [`ServiceResponse`](crate::ServiceResponse) with
    /// no status and no data.
    #[default]
    Soft,
    /// Return the transport error as `Err`.
    Strict,
}

/// Endpoint configuration shared by every endpoint client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of every bound-mode URL.
    pub base_url: String,
    /// Headers sent with every request.
    pub headers: HashMap<String, String>,
    /// Default addressing mode for endpoint clients without an override.
    pub use_base_url: bool,
    /// Callbacks around each network call.
    pub interceptors: Interceptors,
    /// Transport failure handling.
    pub failure_policy: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            headers: HashMap::new(),
            use_base_url: true,
            interceptors: Interceptors::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Handle on the [`Config`] shared by a set of endpoint clients.
///
/// Clones point to the same configuration.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Config>>,
}

impl SharedConfig {
    /// Share a configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// A copy of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> Config {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current base URL.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base_url
            .clone()
    }

    /// Mutate the configuration in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut Config) -> R) -> R {
        let mut config = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut config)
    }

    /// Replace the base URL.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        let base_url = base_url.into();
        self.update(|config| config.base_url = base_url);
    }

    /// Add or replace a shared header.
    pub fn insert_header(&self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        self.update(|config| {
            config.headers.insert(name, value);
        });
    }

    /// Remove a shared header.
    pub fn remove_header(&self, name: &str) -> Option<String> {
        self.update(|config| config.headers.remove(name))
    }

    /// Replace the interceptors.
    pub fn set_interceptors(&self, interceptors: Interceptors) {
        self.update(|config| config.interceptors = interceptors);
    }

    /// Returns `true` if both handles share the same configuration.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
