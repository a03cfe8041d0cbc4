//! Entry point for commands: load manifests, inspect, submit.

use std::path::Path;

use crate::error::Result;
use crate::manifest::{decode_file, discover, KindRegistry};
use crate::store::ObjectStore;

/// Owns one [`ObjectStore`] for the lifetime of a command.
///
/// Typical use is `load_from_path` for each user path, a look at
/// `objects_staged`, then a single `submit_all`.
pub struct Provisioner {
    store: ObjectStore,
    registry: KindRegistry,
}

impl Provisioner {
    pub fn new(registry: KindRegistry) -> Result<Self> {
        Ok(Self::with_store(ObjectStore::new()?, registry))
    }

    pub fn with_store(store: ObjectStore, registry: KindRegistry) -> Self {
        Self { store, registry }
    }

    /// Decode every manifest under `path` and stage the results.
    ///
    /// Candidates are processed in order and the first error stops the
    /// load; objects from earlier files stay staged. Can be called repeatedly
    /// to accumulate several paths. Returns how many objects this call staged.
    ///
    /// Files are read with blocking `std::fs` calls on the current task.
    pub async fn load_from_path(&self, path: impl AsRef<Path>) -> Result<usize> {
        let mut staged = 0;
        for candidate in discover(path.as_ref())? {
            if let Some(object) = decode_file(&candidate, &self.registry)? {
                self.store.stage(object).await;
                staged += 1;
            }
        }
        Ok(staged)
    }

    pub async fn objects_staged(&self) -> usize {
        self.store.count().await
    }

    /// Submit everything staged so far. A no-op when nothing is staged.
    pub async fn submit_all(&self, backend: &str) -> Result<usize> {
        self.store.submit(backend).await
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }
}
