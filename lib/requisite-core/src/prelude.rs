//! Prelude module for convenient imports.
//!
//! ```ignore
//! use requisite_core::prelude::*;
//! ```

pub use crate::{
    Body, Error, Method, PatchOperation, PathParts, PathSpec, Request, RequestBuilder, Response,
    Result, Transport, from_json, resolve, to_json,
};
