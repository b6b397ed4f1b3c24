// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use storage_types::HumanSizeError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorKind {
    NotFound,
    InconsistentTopology,
    DiskFull,
    NoExtendedPartition,
    UnsupportedFilesystem,
    InvalidArgument,
    Io,
}

impl StorageErrorKind {
    pub fn code(self) -> u16 {
        match self {
            Self::InvalidArgument => 400,
            Self::NotFound => 404,
            Self::NoExtendedPartition => 409,
            Self::InconsistentTopology => 422,
            Self::Io => 500,
            Self::UnsupportedFilesystem => 501,
            Self::DiskFull => 507,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InconsistentTopology => "inconsistent_topology",
            Self::DiskFull => "disk_full",
            Self::NoExtendedPartition => "no_extended_partition",
            Self::UnsupportedFilesystem => "unsupported_filesystem",
            Self::InvalidArgument => "invalid_argument",
            Self::Io => "io",
        }
    }
}

/// Errors reported by every query of the engine
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("inconsistent topology: {0}")]
    InconsistentTopology(String),

    #[error("no free partition slot on {0}")]
    DiskFull(String),

    #[error("no extended partition on {0}")]
    NoExtendedPartition(String),

    #[error("unsupported filesystem: {0}")]
    UnsupportedFilesystem(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::NotFound(_) => StorageErrorKind::NotFound,
            Self::InconsistentTopology(_) => StorageErrorKind::InconsistentTopology,
            Self::DiskFull(_) => StorageErrorKind::DiskFull,
            Self::NoExtendedPartition(_) => StorageErrorKind::NoExtendedPartition,
            Self::UnsupportedFilesystem(_) => StorageErrorKind::UnsupportedFilesystem,
            Self::InvalidArgument(_) => StorageErrorKind::InvalidArgument,
            Self::Io(_) => StorageErrorKind::Io,
        }
    }

    pub fn not_found(what: &str, name: &str) -> Self {
        Self::NotFound(format!("{what} '{name}'"))
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::InconsistentTopology(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<HumanSizeError> for StorageError {
    fn from(err: HumanSizeError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Serializable form of an error, for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: StorageErrorKind,
    pub code: u16,
    pub message: String,
}

impl From<&StorageError> for ErrorReport {
    fn from(err: &StorageError) -> Self {
        let kind = err.kind();
        Self {
            kind,
            code: kind.code(),
            message: err.to_string(),
        }
    }
}
