//! Platform-specific filesystem behavior used by the walker.

use std::fs::Metadata;
use std::io;
use std::path::Path;

use diskusage_core::Timestamps;

/// Filesystem quirks that differ between operating systems.
pub trait Platform: Send + Sync {
    /// Paths that are never descended into (pseudo filesystems).
    fn is_reserved(&self, path: &Path) -> bool;

    /// Whether a listing error means access was denied.
    fn is_access_denied(&self, err: &io::Error) -> bool;

    /// Extract timestamps from native metadata.
    fn timestamps(&self, metadata: &Metadata) -> Option<Timestamps>;
}

/// The platform the binary was compiled for.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePlatform;

impl Platform for NativePlatform {
    fn is_reserved(&self, path: &Path) -> bool {
        RESERVED_PATHS.iter().any(|reserved| path == Path::new(reserved))
    }

    fn is_access_denied(&self, err: &io::Error) -> bool {
        err.kind() == io::ErrorKind::PermissionDenied || access_denied_code(err)
    }

    fn timestamps(&self, metadata: &Metadata) -> Option<Timestamps> {
        let modified = metadata.modified().ok()?;
        // Birth time is missing on some filesystems and older kernels.
        Some(Timestamps::new(modified, metadata.created().ok()))
    }
}

#[cfg(target_os = "linux")]
const RESERVED_PATHS: &[&str] = &["/proc"];

#[cfg(not(target_os = "linux"))]
const RESERVED_PATHS: &[&str] = &[];

/// ERROR_ACCESS_DENIED
#[cfg(windows)]
fn access_denied_code(err: &io::Error) -> bool {
    err.raw_os_error() == Some(5)
}

#[cfg(not(windows))]
fn access_denied_code(_err: &io::Error) -> bool {
    false
}
