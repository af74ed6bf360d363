//! Static path → loader table, assembled once at startup.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::RegistryError;
use crate::path::{normalize, parent};

/// Future produced by a loader.
pub type LoadFuture<T> = BoxFuture<'static, anyhow::Result<Arc<T>>>;

/// Zero-argument factory producing a load of a page unit.
pub type Loader<T> = Arc<dyn Fn() -> LoadFuture<T> + Send + Sync>;

/// Immutable registry of exact route paths to loaders.
///
/// Keys are compared verbatim against normalized paths, so detail routes are
/// registered in their normalized form (e.g. `/members/:id`).
pub struct RouteLoaderRegistry<T> {
    loaders: HashMap<String, Loader<T>>,
}

impl<T> RouteLoaderRegistry<T> {
    pub fn builder() -> RouteLoaderRegistryBuilder<T> {
        RouteLoaderRegistryBuilder::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.loaders.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Registered paths, sorted.
    pub fn routes(&self) -> Vec<&str> {
        let mut routes: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        routes.sort_unstable();
        routes
    }

    /// Find the loader for a normalized path.
    ///
    /// Tries an exact match, then each ancestor down to the single root
    /// segment. Returns the matched registry key alongside the loader.
    pub fn resolve(&self, normalized: &str) -> Option<(&str, Loader<T>)> {
        let mut candidate = Some(normalized);
        while let Some(path) = candidate {
            if let Some((key, loader)) = self.loaders.get_key_value(path) {
                return Some((key.as_str(), Arc::clone(loader)));
            }
            candidate = parent(path);
        }
        None
    }
}

impl<T> fmt::Debug for RouteLoaderRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteLoaderRegistry")
            .field("routes", &self.routes())
            .finish()
    }
}

/// Builder for [`RouteLoaderRegistry`].
pub struct RouteLoaderRegistryBuilder<T> {
    loaders: HashMap<String, Loader<T>>,
}

impl<T> Default for RouteLoaderRegistryBuilder<T> {
    fn default() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }
}

impl<T: Send + Sync + 'static> RouteLoaderRegistryBuilder<T> {
    /// Register an async loader for an exact path.
    pub fn register<F, Fut>(
        &mut self,
        path: impl Into<String>,
        loader: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<T>>> + Send + 'static,
    {
        self.register_loader(path, Arc::new(move || loader().boxed()))
    }

    /// Register an already type-erased loader.
    ///
    /// The path must already be normalized (no query, fragment, trailing `/`
    /// or literal identifier), or no lookup could ever reach it.
    pub fn register_loader(
        &mut self,
        path: impl Into<String>,
        loader: Loader<T>,
    ) -> Result<&mut Self, RegistryError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(RegistryError::InvalidPath(path));
        }
        let normalized = normalize(&path);
        if normalized != path {
            return Err(RegistryError::NotNormalized { path, normalized });
        }
        if self.loaders.contains_key(&path) {
            return Err(RegistryError::Duplicate(path));
        }
        self.loaders.insert(path, loader);
        Ok(self)
    }

    pub fn build(self) -> RouteLoaderRegistry<T> {
        tracing::info!(routes = self.loaders.len(), "route loader registry built");
        RouteLoaderRegistry { loaders: self.loaders }
    }
}
