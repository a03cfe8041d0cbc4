//! Provision object staging pipeline.
//!
//! Manifests are discovered on disk, decoded by kind, staged in an
//! [`store::ObjectStore`] keyed by `(kind, identifier)` and finally pushed to
//! the Provision backend one object at a time.

pub mod command;
pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod provisioner;
pub mod store;
pub mod submit;

pub use error::{Phase, ProvisionError, Result, SubmitFailure};
pub use provisioner::Provisioner;
