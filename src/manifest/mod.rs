//! Manifest files: finding them on disk and turning them into staged objects.
//!
//! A manifest is a YAML document with a `kind` tag and a kind specific `spec`:
//!
//! ```yaml
//! kind: Asset
//! spec:
//!   id: xrpl-ledger
//!   display_name: XRPL ledger feed
//! ```

pub mod decoder;
pub mod discovery;
pub mod kind;

pub use decoder::{decode, decode_file, Envelope};
pub use discovery::{discover, is_manifest_file};
pub use kind::{KindHandler, KindRegistry, UnknownKindPolicy};
