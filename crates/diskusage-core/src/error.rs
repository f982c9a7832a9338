//! Fatal errors and recoverable warnings of a stat run.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that end a stat run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Access to a directory was denied. Recoverable: the subtree counts as empty.
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The path vanished or never existed.
    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// Any other filesystem failure.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A flag or config field was rejected before traversal.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A subdirectory walk ended without delivering its result.
    #[error("walk interrupted before every directory reported")]
    Interrupted,
}

impl ScanError {
    /// Attach `path` to an I/O error, keeping denial and absence distinct.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error only zeroes the affected subtree.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

/// Why a directory contributed nothing to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    PermissionDenied,
    /// Listing failed for a reason other than denial; counted as empty.
    ReadError,
    /// Pseudo filesystem the platform never descends into.
    ReservedPath,
}

/// A directory that was skipped or zeroed without failing the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
    pub kind: WarningKind,
}

impl ScanWarning {
    pub fn permission_denied(path: &Path) -> Self {
        Self::skipped(path, WarningKind::PermissionDenied, "permission denied".into())
    }

    pub fn read_error(path: &Path, error: &io::Error) -> Self {
        Self::skipped(path, WarningKind::ReadError, format!("unreadable ({error})"))
    }

    pub fn reserved(path: &Path) -> Self {
        Self::skipped(path, WarningKind::ReservedPath, "reserved path".into())
    }

    fn skipped(path: &Path, kind: WarningKind, reason: String) -> Self {
        Self {
            message: format!("skipped {}: {reason}", path.display()),
            path: path.to_path_buf(),
            kind,
        }
    }
}
