//! Memoized, fire-and-forget route preloading.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{self as fut, BoxFuture, Shared};

use crate::error::LoadError;
use crate::path::normalize;
use crate::registry::RouteLoaderRegistry;

/// Shared handle on a dispatched load. Every clone observes the same result.
pub type PendingLoad<T> = Shared<BoxFuture<'static, Result<Arc<T>, LoadError>>>;

struct State<T> {
    /// Normalized paths whose loader has been invoked, whatever the outcome.
    attempted: HashSet<String>,
    entries: HashMap<String, PendingLoad<T>>,
}

/// Per-application preload cache over a static [`RouteLoaderRegistry`].
///
/// - At most one loader invocation per normalized path
/// - Entries are never evicted, and failed loads are not retried
/// - Loader failures never reach the caller of [`preload`](Self::preload);
///   a panicking factory is recorded as [`LoadError::Panicked`]
///
/// Loader factories are invoked while the internal lock is held; they must
/// return their future without calling back into the cache.
pub struct RoutePreloadCache<T> {
    registry: Arc<RouteLoaderRegistry<T>>,
    state: Mutex<State<T>>,
}

impl<T: Send + Sync + 'static> RoutePreloadCache<T> {
    pub fn new(registry: Arc<RouteLoaderRegistry<T>>) -> Self {
        Self {
            registry,
            state: Mutex::new(State {
                attempted: HashSet::new(),
                entries: HashMap::new(),
            }),
        }
    }

    /// Start loading the unit behind `path` unless already attempted.
    ///
    /// Returns immediately. Inside a tokio runtime the load is spawned so it
    /// progresses unobserved; otherwise it runs when first awaited through
    /// [`get_cached`](Self::get_cached).
    pub fn preload(&self, path: &str) {
        let key = normalize(path);

        let pending = {
            let mut state = self.lock();
            if state.attempted.contains(&key) {
                tracing::trace!(path = %key, "preload already attempted");
                return;
            }

            let Some((route, loader)) = self.registry.resolve(&key) else {
                tracing::trace!(path = %key, "no loader matches path");
                return;
            };

            // Both sets are written only after the factory returns.
            let dispatched = panic::catch_unwind(AssertUnwindSafe(|| loader()));
            let pending: PendingLoad<T> = match dispatched {
                Ok(load) => {
                    let route_name = route.to_string();
                    load.map(move |result| {
                        result.map_err(|err| LoadError::failed(&route_name, &err))
                    })
                    .boxed()
                    .shared()
                }
                Err(_) => {
                    tracing::debug!(path = %key, route, "loader factory panicked");
                    fut::ready(Err(LoadError::panicked(route))).boxed().shared()
                }
            };
            state.attempted.insert(key.clone());
            state.entries.insert(key.clone(), pending.clone());

            tracing::debug!(path = %key, route, "preload dispatched");
            pending
        };

        drive(key, pending);
    }

    /// [`preload`](Self::preload) each path in order; loads run concurrently.
    pub fn preload_many<I, S>(&self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.preload(path.as_ref());
        }
    }

    /// Whether the normalized form of `path` has been dispatched.
    pub fn is_preloaded(&self, path: &str) -> bool {
        self.lock().attempted.contains(&normalize(path))
    }

    /// The shared load for `path`, if dispatched. Never triggers loading.
    pub fn get_cached(&self, path: &str) -> Option<PendingLoad<T>> {
        self.lock().entries.get(&normalize(path)).cloned()
    }

    /// Number of dispatched paths.
    pub fn len(&self) -> usize {
        self.lock().attempted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // State is append-only, so a poisoned lock still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for RoutePreloadCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attempted = self
            .state
            .lock()
            .map(|s| s.attempted.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().attempted.len());
        f.debug_struct("RoutePreloadCache")
            .field("registry", &self.registry)
            .field("attempted", &attempted)
            .finish()
    }
}

fn drive<T: Send + Sync + 'static>(key: String, pending: PendingLoad<T>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(err) = pending.await {
                    tracing::debug!(path = %key, error = %err, "speculative load failed");
                }
            });
        }
        Err(_) => {
            tracing::trace!(path = %key, "no runtime; load deferred to first await");
        }
    }
}
