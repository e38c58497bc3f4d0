//! Named HTTP endpoint clients.
//!
//! Declare endpoints once with a base URL and shared headers, then call
//! `GET`/`POST`/`PUT`/`DELETE`/`PATCH` on them with path templates like
//! `/posts/:id`. Responses expose status and headers right away and decode
//! the JSON `data` envelope only when asked.
//!
//! # Example
//!
//! ```no_run
//! use requisite::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Post {
//!     id: u64,
//!     title: String,
//! }
//!
//! # async fn run() -> requisite::Result<()> {
//! requisite::bootstrap(
//!     InitConfig::builder()
//!         .base_url("https://api.example.com")
//!         .endpoint("posts", "/posts/:id")
//!         .header("Authorization", "Bearer token")
//!         .build(),
//! )?;
//!
//! let services = requisite::services()?;
//! let posts = services.endpoint("posts")?;
//! let response = posts.get::<Post>(PathParts::new().param("id", 1)).await?;
//! if response.ok() {
//!     println!("{:?}", response.data().await);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Failure handling
//!
//! Template and configuration problems (missing parameters, missing base
//! URL) are returned as `Err` before any I/O. Transport failures follow the
//! configured [`FailurePolicy`]: by default they resolve to a
//! [`ServiceResponse`] with no status and no data.

mod cancel;
mod client;
pub mod compose;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod registry;
mod response;
mod service;
mod services;
mod store;

pub use cancel::CancelToken;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use registry::{bootstrap, bootstrap_with, config, raw, reset, services};
pub use response::ServiceResponse;
pub use service::Service;
pub use services::{InitConfig, InitConfigBuilder, Services};
pub use store::{Config, FailurePolicy, Interceptors, SharedConfig};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use requisite_core::{
    Body, BodyFuture, Error, Method, PatchOp, PatchOperation, PathParts, PathSpec, Request,
    RequestBuilder, ResourceTemplate, Response, Result, Transport, from_json, resolve, to_json,
};

// Re-export http types for status codes and headers
pub use requisite_core::{StatusCode, header};
