//! Prelude module for convenient imports.
//!
//! ```ignore
//! use requisite::prelude::*;
//! ```

pub use crate::{
    Error, FailurePolicy, HyperClient, InitConfig, Interceptors, Method, PatchOperation,
    PathParts, PathSpec, Result, Service, ServiceResponse, Services, SharedConfig,
};
pub use serde::{Deserialize, Serialize};
