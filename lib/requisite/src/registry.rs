//! Process-wide endpoint registry.
//!
//! [`bootstrap`] installs the [`Services`] once; [`services`] and [`config`]
//! hand out the same instance afterwards. Code that does not want global
//! state can build a [`Services`] directly and pass it around.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::{Error, HyperClient, InitConfig, Result, Service, Services, SharedConfig};

static REGISTRY: RwLock<Option<Arc<Services>>> = RwLock::new(None);

/// Build the endpoint clients with a default [`HyperClient`] and install them
/// globally.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if called more than once.
pub fn bootstrap(init: InitConfig) -> Result<Arc<Services>> {
    bootstrap_with(HyperClient::new(), init)
}

/// Like [`bootstrap`], with a caller-provided transport (timeouts, logging
/// and other tower layers).
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if called more than once.
pub fn bootstrap_with(client: HyperClient, init: InitConfig) -> Result<Arc<Services>> {
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if registry.is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let services = Arc::new(Services::new(client, init));
    info!(endpoints = services.len(), "endpoint clients installed");
    *registry = Some(Arc::clone(&services));
    Ok(services)
}

/// The bootstrapped endpoint clients. Every call returns the same instance.
///
/// # Errors
///
/// Returns [`Error::Uninitialized`] before [`bootstrap`].
pub fn services() -> Result<Arc<Services>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(Error::Uninitialized)
}

/// The configuration shared by the bootstrapped endpoint clients.
///
/// # Errors
///
/// Returns [`Error::Uninitialized`] before [`bootstrap`].
pub fn config() -> Result<SharedConfig> {
    services().map(|services| services.config().clone())
}

/// A bypass-mode client for a fully qualified URL.
///
/// After [`bootstrap`] it shares the global configuration (headers,
/// interceptors, failure policy); before, it uses an empty one.
#[must_use]
pub fn raw(url: impl Into<String>) -> Service {
    match services() {
        Ok(services) => services.raw(url),
        Err(_) => Service::raw(url, SharedConfig::default()),
    }
}

/// Remove the installed endpoint clients. Clients handed out earlier keep
/// working.
#[doc(hidden)]
pub fn reset() {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}
