//! Configuration cache, loader contracts, and built-in loader/strategy implementations.

pub mod cache;
pub mod loader;
pub mod model;
pub mod strategy;

pub use cache::*;
pub use loader::*;
pub use model::*;
pub use strategy::*;

// self
use crate::_prelude::*;

/// Future type returned by [`ConfigLoader`] implementations.
pub type LoaderFuture<'a, C> = Pin<Box<dyn Future<Output = Option<C>> + 'a + Send>>;

/// Capability to produce a configuration from exactly one origin.
///
/// Loaders absorb their own failures: any transport, decode, or lookup problem
/// becomes `None`, which keeps the cache's fallback chain intact. A loader that
/// needs to report detail does so through the optional tracing hooks, never
/// through its return value.
pub trait ConfigLoader<C>
where
	Self: Send + Sync,
{
	/// Attempts to produce a configuration.
	fn load(&self) -> LoaderFuture<'_, C>;
}
