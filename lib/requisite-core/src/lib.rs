//! Core types for the requisite endpoint client.
//!
//! This crate provides the transport-agnostic building blocks:
//! - [`resolve`], [`PathSpec`], [`PathParts`] - URL template resolution
//! - [`ResourceTemplate`] - The template an endpoint client is declared with
//! - [`Method`] - HTTP verbs exposed by endpoint clients
//! - [`Request`] and [`RequestBuilder`] - Outgoing request descriptors
//! - [`Response`] and [`Body`] - Raw responses with a deferred body
//! - [`Transport`] - The network primitive trait
//! - [`PatchOperation`] - JSON-Patch operations for PATCH bodies
//! - [`Error`] and [`Result`] - Error handling

mod body;
mod error;
mod method;
mod patch;
pub mod prelude;
mod request;
mod response;
mod template;
mod transport;

pub use body::{Body, BodyFuture, from_json, to_json};
pub use error::{Error, Result};
pub use method::Method;
pub use patch::{PatchOp, PatchOperation};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use template::{PathParts, PathSpec, ResourceTemplate, resolve};
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
