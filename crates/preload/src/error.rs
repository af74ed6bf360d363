use thiserror::Error;

/// Registry construction failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("route '{0}' is registered twice")]
    Duplicate(String),

    #[error("route '{0}' must start with '/'")]
    InvalidPath(String),

    /// The key would never equal a normalized path.
    #[error("route '{path}' is not in normalized form (expected '{normalized}')")]
    NotNormalized { path: String, normalized: String },
}

/// A loader's failure as seen through the shared cache entry.
///
/// Cloneable so every holder of the shared load observes the same failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("loader for '{route}' failed: {message}")]
    Failed { route: String, message: String },

    /// The loader factory panicked before producing its future.
    #[error("loader for '{route}' panicked")]
    Panicked { route: String },
}

impl LoadError {
    pub(crate) fn failed(route: &str, err: &anyhow::Error) -> Self {
        Self::Failed {
            route: route.to_string(),
            message: format!("{err:#}"),
        }
    }

    pub(crate) fn panicked(route: &str) -> Self {
        Self::Panicked {
            route: route.to_string(),
        }
    }
}
