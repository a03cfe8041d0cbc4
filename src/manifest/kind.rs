//! Dispatch table from manifest `kind` tags to typed decoders.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::manifest::decoder::decode_typed;
use crate::models::{Account, Asset, Record, User};
use crate::store::StagedObject;

type DecodeFn = fn(&Path, &[u8]) -> Result<StagedObject>;

/// How one kind is decoded and where it is posted.
#[derive(Clone, Copy)]
pub struct KindHandler {
    pub kind: &'static str,
    pub segment: &'static str,
    decode: DecodeFn,
}

impl KindHandler {
    pub fn of<R: Record>() -> Self {
        Self {
            kind: R::KIND,
            segment: R::SEGMENT,
            decode: decode_typed::<R>,
        }
    }

    /// Decode a whole manifest document as this kind.
    pub fn decode(&self, path: &Path, bytes: &[u8]) -> Result<StagedObject> {
        (self.decode)(path, bytes)
    }
}

impl std::fmt::Debug for KindHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindHandler")
            .field("kind", &self.kind)
            .field("segment", &self.segment)
            .finish()
    }
}

/// What to do with a manifest whose kind has no handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKindPolicy {
    /// Skip the file without staging anything.
    #[default]
    Ignore,
    /// Fail the load with [`crate::ProvisionError::UnknownKind`].
    Reject,
}

#[derive(Debug, Clone)]
pub struct KindRegistry {
    handlers: BTreeMap<&'static str, KindHandler>,
    unknown: UnknownKindPolicy,
}

impl Default for KindRegistry {
    /// Asset, Account and User, ignoring anything else.
    fn default() -> Self {
        Self::empty()
            .register::<Asset>()
            .register::<Account>()
            .register::<User>()
    }
}

impl KindRegistry {
    /// A registry with no kinds; every manifest falls to the unknown policy.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
            unknown: UnknownKindPolicy::default(),
        }
    }

    /// Add or replace the handler for `R::KIND`.
    pub fn register<R: Record>(mut self) -> Self {
        let handler = KindHandler::of::<R>();
        self.handlers.insert(handler.kind, handler);
        self
    }

    pub fn with_unknown_policy(mut self, policy: UnknownKindPolicy) -> Self {
        self.unknown = policy;
        self
    }

    pub fn get(&self, kind: &str) -> Option<&KindHandler> {
        self.handlers.get(kind)
    }

    pub fn unknown_policy(&self) -> UnknownKindPolicy {
        self.unknown
    }

    /// Registered kind tags, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}
