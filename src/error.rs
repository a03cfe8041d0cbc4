//! Errors raised while loading manifests and submitting staged objects.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = ProvisionError> = std::result::Result<T, E>;

/// Pipeline step an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Stat,
    Read,
    Parse,
    TypedDecode,
    Serialize,
    Submit,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Stat => "stat",
            Self::Read => "read",
            Self::Parse => "parse",
            Self::TypedDecode => "typed-decode",
            Self::Serialize => "serialize",
            Self::Submit => "submit",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("file {} stat error: {source}", .path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading directory {}: {source}", .path.display())]
    DirectoryReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file {} read error: {source}", .path.display())]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file {} unmarshal yaml error: {source}", .path.display())]
    ManifestMalformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("file {} unmarshal {kind} yaml error: {source}", .path.display())]
    TypedDecodeFailed {
        path: PathBuf,
        kind: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("file {} {kind} spec has an empty id", .path.display())]
    MissingIdentifier { path: PathBuf, kind: String },

    #[error("file {} has unknown kind {kind:?}", .path.display())]
    UnknownKind { path: PathBuf, kind: String },

    #[error("file {} marshal {kind} json error: {source}", .path.display())]
    SerializeFailed {
        path: PathBuf,
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot send {kind} object {identifier} to {url}: {reason}")]
    SubmissionFailed {
        kind: String,
        identifier: String,
        url: String,
        #[source]
        reason: SubmitFailure,
    },

    #[error("cannot build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Why a single object submission failed.
#[derive(Debug, Error)]
pub enum SubmitFailure {
    #[error("got status code {}", .0.as_u16())]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProvisionError {
    pub fn phase(&self) -> Phase {
        match self {
            Self::ClientBuild(_) => Phase::Setup,
            Self::PathNotFound { .. } => Phase::Stat,
            Self::DirectoryReadFailed { .. } | Self::FileReadFailed { .. } => Phase::Read,
            Self::ManifestMalformed { .. } | Self::UnknownKind { .. } => Phase::Parse,
            Self::TypedDecodeFailed { .. } | Self::MissingIdentifier { .. } => Phase::TypedDecode,
            Self::SerializeFailed { .. } => Phase::Serialize,
            Self::SubmissionFailed { .. } => Phase::Submit,
        }
    }

    /// File the error refers to, if it was raised before submission.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PathNotFound { path, .. }
            | Self::DirectoryReadFailed { path, .. }
            | Self::FileReadFailed { path, .. }
            | Self::ManifestMalformed { path, .. }
            | Self::TypedDecodeFailed { path, .. }
            | Self::MissingIdentifier { path, .. }
            | Self::UnknownKind { path, .. }
            | Self::SerializeFailed { path, .. } => Some(path),
            Self::SubmissionFailed { .. } | Self::ClientBuild(_) => None,
        }
    }
}
