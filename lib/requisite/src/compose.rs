//! Request composition: resolved path + base URL + shared headers.

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::{CancelToken, Config, Error, Method, PathSpec, Request, ResourceTemplate, Result};

/// How an endpoint client builds absolute URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// `base_url + resolved template`; fails without a base URL.
    Bound,
    /// The template already is an absolute URL; the base URL is ignored.
    Bypass,
}

impl AddressingMode {
    /// Bound when `use_base_url` is set, bypass otherwise.
    #[must_use]
    pub const fn from_use_base_url(use_base_url: bool) -> Self {
        if use_base_url { Self::Bound } else { Self::Bypass }
    }
}

/// Build the outgoing request for one call.
///
/// The request carries the shared headers, `Content-Type:
/// application/json` when a body is attached, and the resource template and
/// cancellation token as extensions.
///
/// # Errors
///
/// - [`Error::MissingBaseUrl`] in bound mode without a base URL
/// - [`Error::MissingParameters`] when template tokens stay unresolved
/// - [`Error::InvalidUrl`] when the result is not an absolute URL
pub fn compose(
    template: &ResourceTemplate,
    spec: Option<&PathSpec>,
    method: Method,
    body: Option<Bytes>,
    mode: AddressingMode,
    config: &Config,
    cancel: &CancelToken,
) -> Result<Request<Bytes>> {
    let base_url = match mode {
        AddressingMode::Bound if config.base_url.is_empty() => return Err(Error::MissingBaseUrl),
        AddressingMode::Bound => config.base_url.as_str(),
        AddressingMode::Bypass => "",
    };

    let path = template.resolve(spec)?;
    let url = Url::parse(&format!("{base_url}{path}"))?;
    debug!(%method, %url, endpoint = %template, "composed request");

    let mut builder = Request::builder(method, url)
        .headers(config.headers.clone())
        .extension(template.clone())
        .extension(cancel.clone());
    if let Some(body) = body {
        builder = builder
            .header("Content-Type", "application/json")
            .body(body);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::PathParts;

    fn config(base_url: &str) -> Config {
        let mut config = Config {
            base_url: base_url.to_string(),
            ..Config::default()
        };
        config
            .headers
            .insert("Authorization".to_string(), "Bearer token".to_string());
        config
    }

    fn compose_get(
        template: &str,
        spec: Option<&PathSpec>,
        mode: AddressingMode,
        config: &Config,
    ) -> Result<Request<Bytes>> {
        compose(
            &ResourceTemplate::new(template),
            spec,
            Method::Get,
            None,
            mode,
            config,
            &CancelToken::new(),
        )
    }

    #[test]
    fn bound_mode_prefixes_base_url() {
        let config = config("https://api.example.com");
        let spec = PathSpec::from("/hello");
        let_assert!(
            Ok(request) = compose_get("/resource", Some(&spec), AddressingMode::Bound, &config)
        );
        check!(request.url().as_str() == "https://api.example.com/resource/hello");
        check!(request.header("Authorization") == Some("Bearer token"));
        check!(request.body().is_none());
    }

    #[test]
    fn bound_mode_requires_base_url() {
        let config = config("");
        let_assert!(Err(err) = compose_get("/resource", None, AddressingMode::Bound, &config));
        check!(matches!(err, Error::MissingBaseUrl));
    }

    #[test]
    fn bypass_mode_ignores_missing_base_url() {
        let config = config("");
        let_assert!(
            Ok(request) = compose_get(
                "https://api.example.com/resource",
                None,
                AddressingMode::Bypass,
                &config
            )
        );
        check!(request.url().as_str() == "https://api.example.com/resource");
    }

    #[test]
    fn bypass_mode_resolves_parameters() {
        let config = Config::default();
        let spec = PathSpec::from(PathParts::new().path("/posts/:id").param("id", 1));
        let_assert!(
            Ok(request) = compose_get(
                "http://127.0.0.1:8080",
                Some(&spec),
                AddressingMode::Bypass,
                &config
            )
        );
        check!(request.url().as_str() == "http://127.0.0.1:8080/posts/1");
    }

    #[test]
    fn missing_parameters_fail_before_url_parsing() {
        let config = config("https://api.example.com");
        let_assert!(
            Err(err) = compose_get("/posts/:id", None, AddressingMode::Bound, &config)
        );
        check!(err.missing_parameter_names().is_some());
    }

    #[test]
    fn relative_url_is_invalid() {
        let config = Config::default();
        let_assert!(Err(err) = compose_get("/posts", None, AddressingMode::Bypass, &config));
        check!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn body_sets_json_content_type() {
        let config = config("https://api.example.com");
        let cancel = CancelToken::new();
        let_assert!(
            Ok(request) = compose(
                &ResourceTemplate::new("/posts"),
                None,
                Method::Post,
                Some(Bytes::from_static(b"{}")),
                AddressingMode::Bound,
                &config,
                &cancel,
            )
        );
        check!(request.header("Content-Type") == Some("application/json"));
        check!(request.body() == Some(&Bytes::from_static(b"{}")));
    }

    #[test]
    fn request_carries_template_and_token() {
        let config = config("https://api.example.com");
        let_assert!(
            Ok(request) = compose_get("/posts", None, AddressingMode::Bound, &config)
        );
        check!(
            request.extensions().get::<ResourceTemplate>()
                == Some(&ResourceTemplate::new("/posts"))
        );
        check!(request.extensions().get::<CancelToken>().is_some());
    }
}
