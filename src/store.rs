//! In-memory staging area for decoded objects awaiting submission.
//!
//! One [`ObjectStore`] lives for one command. A single lock guards the map
//! and is held for the whole submission pass, so staging that races with
//! [`ObjectStore::submit`] waits until the pass has finished or failed.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::submit::Submitter;

/// kind -> identifier -> JSON payload
pub(crate) type KindMap = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

/// A serialized record ready to be posted to `/{kind}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedObject {
    kind: String,
    identifier: String,
    payload: Vec<u8>,
}

impl StagedObject {
    pub fn new(kind: impl Into<String>, identifier: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            identifier: identifier.into(),
            payload,
        }
    }

    /// Backend path segment, e.g. `asset`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

pub struct ObjectStore {
    objects: Mutex<KindMap>,
    submitter: Submitter,
}

impl ObjectStore {
    /// An empty store with the default HTTP client settings.
    pub fn new() -> Result<Self> {
        Ok(Self::with_submitter(Submitter::new()?))
    }

    pub fn with_submitter(submitter: Submitter) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            submitter,
        }
    }

    /// Insert `object`, replacing any payload already staged under the same
    /// kind and identifier.
    pub async fn stage(&self, object: StagedObject) {
        let mut objects = self.objects.lock().await;
        let replaced = objects
            .entry(object.kind)
            .or_default()
            .insert(object.identifier, object.payload);

        if replaced.is_some() {
            tracing::debug!("Replaced previously staged object");
        }
    }

    /// Total number of staged objects across all kinds.
    pub async fn count(&self) -> usize {
        let objects = self.objects.lock().await;
        count_objects(&objects)
    }

    /// Copy of everything staged, in submission order.
    pub async fn staged(&self) -> Vec<StagedObject> {
        let objects = self.objects.lock().await;
        objects
            .iter()
            .flat_map(|(kind, by_id)| {
                by_id
                    .iter()
                    .map(move |(id, payload)| StagedObject::new(kind, id, payload.clone()))
            })
            .collect()
    }

    /// Post every staged object to `backend`. See [`ObjectStore::submit_with`].
    pub async fn submit(&self, backend: &str) -> Result<usize> {
        self.submit_with(backend, |_, _| {}).await
    }

    /// Post every staged object to `{backend}/{kind}`, kinds then identifiers
    /// in sorted order, calling `on_sent(kind, identifier)` after each
    /// accepted object.
    ///
    /// Stops at the first failure. Objects accepted before it stay accepted
    /// on the backend; they are not rolled back and the error only names the
    /// failing object. Returns how many objects were sent.
    pub async fn submit_with<F>(&self, backend: &str, on_sent: F) -> Result<usize>
    where
        F: FnMut(&str, &str),
    {
        let objects = self.objects.lock().await;
        if count_objects(&objects) == 0 {
            tracing::debug!("Nothing staged, skipping submission");
            return Ok(0);
        }

        self.submitter.send_all(backend, &objects, on_sent).await
    }
}

fn count_objects(objects: &KindMap) -> usize {
    objects.values().map(BTreeMap::len).sum()
}
