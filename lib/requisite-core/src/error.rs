//! Error types for requisite.
//!
//! Errors fall in two groups:
//! - configuration and path errors ([`Error::MissingParameters`],
//!   [`Error::MissingBaseUrl`], [`Error::Uninitialized`], ...) are raised
//!   before any I/O and always surface as `Err`;
//! - transport errors ([`Error::Connection`], [`Error::Tls`],
//!   [`Error::Timeout`], [`Error::Cancelled`]) happen after I/O started and
//!   are subject to the caller's failure policy.

use derive_more::{Display, Error, From};

/// Main error type for requisite operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// One or more `:name` tokens of a resource template were not supplied.
    #[display("missing path parameters {}", format_names(names))]
    #[from(skip)]
    MissingParameters {
        /// Unresolved token names, in template order.
        #[error(not(source))]
        names: Vec<String>,
    },

    /// A bound-mode call was attempted without a configured base URL.
    #[display("missing base URL in configuration")]
    #[from(skip)]
    MissingBaseUrl,

    /// The global endpoint registry was read before bootstrap.
    #[display("requisite must be bootstrapped before accessing services")]
    #[from(skip)]
    Uninitialized,

    /// The global endpoint registry was bootstrapped twice.
    #[display("requisite is already bootstrapped")]
    #[from(skip)]
    AlreadyInitialized,

    /// No endpoint registered under that name.
    #[display("unknown endpoint '{_0}'")]
    #[from(skip)]
    UnknownEndpoint(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The endpoint client's cancellation token fired.
    #[display("request cancelled")]
    #[from(skip)]
    Cancelled,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "data.user.name").
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!(":{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a missing parameters error.
    #[must_use]
    pub fn missing_parameters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParameters {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Names of the unresolved path parameters, if this is a
    /// [`Error::MissingParameters`] error.
    #[must_use]
    pub fn missing_parameter_names(&self) -> Option<&[String]> {
        match self {
            Self::MissingParameters { names } => Some(names),
            _ => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the request was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` for failures raised by the network call itself.
    ///
    /// These are the errors the failure policy may downgrade into a failed
    /// response instead of an `Err`.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Tls(_) | Self::Timeout | Self::Cancelled
        )
    }
}
