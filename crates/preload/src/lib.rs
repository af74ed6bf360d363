//! `shepherd-preload` — speculative warm-up of route loaders.
//!
//! A navigation link calls [`RoutePreloadCache::preload`] on hover/focus; the
//! matched loader runs at most once per normalized path and its shared result
//! stays cached for the life of the cache.

pub mod cache;
pub mod error;
pub mod path;
pub mod registry;

pub use cache::{PendingLoad, RoutePreloadCache};
pub use error::{LoadError, RegistryError};
pub use path::normalize;
pub use registry::{LoadFuture, Loader, RouteLoaderRegistry, RouteLoaderRegistryBuilder};
