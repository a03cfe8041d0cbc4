//! Provision records that manifests describe.
//!
//! # Kinds
//!
//! - [`Asset`]: something accounts are granted access to, posted to `/asset`.
//! - [`Account`]: a tenant, posted to `/account`.
//! - [`User`]: a login bound to accounts, posted to `/user`.
//!
//! Each manifest carries exactly one record under its `spec` key. The record
//! `id` is the staging identifier: loading two manifests with the same kind
//! and id keeps only the last one.

mod account;
mod asset;
mod user;

pub use account::*;
pub use asset::*;
pub use user::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record type that can be decoded from a manifest and staged for submission.
pub trait Record: Serialize + DeserializeOwned {
    /// Manifest `kind` tag, matched case-sensitively.
    const KIND: &'static str;
    /// Backend path segment the record is posted to.
    const SEGMENT: &'static str;

    fn identifier(&self) -> &str;
}
