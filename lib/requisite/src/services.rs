//! Named endpoint clients built from one bootstrap configuration.

use std::collections::{BTreeMap, HashMap};

use crate::{
    Config, Error, FailurePolicy, HyperClient, Interceptors, Result, Service, SharedConfig,
};

/// Bootstrap input: base URL, named endpoint templates and shared settings.
///
/// # Example
///
/// ```
/// use requisite::InitConfig;
///
/// let init = InitConfig::builder()
///     .base_url("https://jsonplaceholder.typicode.com")
///     .endpoint("posts", "/posts")
///     .endpoint("users", "/users")
///     .header("Accept", "application/json")
///     .build();
/// assert_eq!(init.endpoints().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InitConfig {
    config: Config,
    endpoints: BTreeMap<String, String>,
}

impl InitConfig {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> InitConfigBuilder {
        InitConfigBuilder::default()
    }

    /// Endpoint templates by name.
    #[must_use]
    pub const fn endpoints(&self) -> &BTreeMap<String, String> {
        &self.endpoints
    }

    /// Initial shared configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

/// Builder for [`InitConfig`].
#[derive(Debug, Clone, Default)]
pub struct InitConfigBuilder {
    inner: InitConfig,
}

impl InitConfigBuilder {
    /// Prefix of every bound-mode URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.inner.config.base_url = base_url.into();
        self
    }

    /// Declare a named endpoint. A later declaration with the same name
    /// replaces the earlier one.
    #[must_use]
    pub fn endpoint(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.inner.endpoints.insert(name.into(), template.into());
        self
    }

    /// Declare several named endpoints.
    #[must_use]
    pub fn endpoints<N, T>(mut self, endpoints: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        self.inner.endpoints.extend(
            endpoints
                .into_iter()
                .map(|(name, template)| (name.into(), template.into())),
        );
        self
    }

    /// Header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.config.headers.insert(name.into(), value.into());
        self
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.inner.config.headers.extend(headers);
        self
    }

    /// Callbacks around each network call.
    #[must_use]
    pub fn interceptors(mut self, interceptors: Interceptors) -> Self {
        self.inner.config.interceptors = interceptors;
        self
    }

    /// Default addressing mode; `true` (the default) prefixes the base URL.
    #[must_use]
    pub const fn use_base_url(mut self, use_base_url: bool) -> Self {
        self.inner.config.use_base_url = use_base_url;
        self
    }

    /// Transport failure handling.
    #[must_use]
    pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.inner.config.failure_policy = policy;
        self
    }

    /// Build the [`InitConfig`].
    #[must_use]
    pub fn build(self) -> InitConfig {
        self.inner
    }
}

/// Endpoint clients by name, all sharing one configuration and transport.
#[derive(Debug, Clone)]
pub struct Services<C = HyperClient> {
    endpoints: BTreeMap<String, Service<C>>,
    config: SharedConfig,
    client: C,
}

impl<C: Clone> Services<C> {
    /// Create one endpoint client per declared endpoint.
    #[must_use]
    pub fn new(client: C, init: InitConfig) -> Self {
        let config = SharedConfig::new(init.config);
        let endpoints = init
            .endpoints
            .into_iter()
            .map(|(name, template)| {
                let service = Service::with_client(client.clone(), template, config.clone());
                (name, service)
            })
            .collect();
        Self {
            endpoints,
            config,
            client,
        }
    }

    /// Endpoint client by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Service<C>> {
        self.endpoints.get(name)
    }

    /// Endpoint client by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEndpoint`] if no endpoint has that name.
    pub fn endpoint(&self, name: &str) -> Result<&Service<C>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownEndpoint(name.to_string()))
    }

    /// Declared endpoint names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    /// Number of endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns `true` if no endpoint was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The configuration shared by every endpoint.
    #[must_use]
    pub const fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// A bypass-mode client for a fully qualified URL, sharing this
    /// configuration and transport. Each call returns a client with its own
    /// cancellation token.
    #[must_use]
    pub fn raw(&self, url: impl Into<String>) -> Service<C> {
        Service::with_client(self.client.clone(), url, self.config.clone()).use_base_url(false)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn services() -> Services {
        Services::new(
            HyperClient::new(),
            InitConfig::builder()
                .base_url("https://api.example.com")
                .endpoints([("users", "/users/:id"), ("posts", "/posts")])
                .header("Accept", "application/json")
                .failure_policy(FailurePolicy::Strict)
                .build(),
        )
    }

    #[test]
    fn one_client_per_endpoint() {
        let services = services();
        check!(services.len() == 2);
        check!(services.names().collect::<Vec<_>>() == ["posts", "users"]);

        let_assert!(Some(users) = services.get("users"));
        check!(users.template().as_str() == "/users/:id");
        check!(users.config().ptr_eq(services.config()));
    }

    #[test]
    fn unknown_endpoint() {
        let services = services();
        let_assert!(Err(err) = services.endpoint("comments"));
        check!(err.to_string() == "unknown endpoint 'comments'");
    }

    #[test]
    fn configuration_is_shared() {
        let services = services();
        let config = services.config().snapshot();
        check!(config.base_url == "https://api.example.com");
        check!(config.failure_policy == FailurePolicy::Strict);
        check!(config.headers.get("Accept").map(String::as_str) == Some("application/json"));

        services.config().set_base_url("https://other.example.com");
        let_assert!(Ok(posts) = services.endpoint("posts"));
        check!(posts.config().base_url() == "https://other.example.com");
    }

    #[test]
    fn raw_clients_share_configuration_but_not_tokens() {
        let services = services();
        let first = services.raw("https://elsewhere.example.com/a");
        let second = services.raw("https://elsewhere.example.com/b");

        first.cancel();
        check!(first.cancel_token().is_cancelled());
        check!(!second.cancel_token().is_cancelled());
        check!(first.config().ptr_eq(services.config()));
    }
}
