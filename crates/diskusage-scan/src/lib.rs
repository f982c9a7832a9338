//! Concurrent directory walker for diskusage.
//!
//! # Overview
//!
//! `diskusage-scan` walks a directory tree and aggregates sizes bottom-up:
//!
//! - **Bounded fan-out**: each subdirectory walk goes through a
//!   [`Dispatcher`]; [`BoundedDispatcher`] starts it on its own thread while
//!   capacity remains and runs it on the caller otherwise
//! - **Per-directory fan-in**: a directory collects every child result before
//!   it sums and sorts, so returned nodes are final
//! - **Leaf filtering** by extension and name pattern via [`LeafFilter`]
//! - **Graceful denial**: unreadable subdirectories count as empty
//!
//! # Example
//!
//! ```rust,no_run
//! use diskusage_scan::{Scanner, StatConfig};
//!
//! let config = StatConfig::new("/path/to/scan");
//! let tree = Scanner::new().scan(&config).unwrap();
//!
//! println!("Total size: {} bytes", tree.total_size());
//! ```

mod dispatch;
mod filter;
mod platform;
mod progress;
mod scanner;
mod walker;

pub use dispatch::{BoundedDispatcher, Dispatcher, InlineDispatcher, Task};
pub use filter::{EntryPredicate, IncludeAll, LeafFilter};
pub use platform::{NativePlatform, Platform};
pub use progress::ScanProgress;
pub use scanner::Scanner;
pub use walker::{DirectoryWalker, WalkOutput};

// Re-export core types for convenience
pub use diskusage_core::{
    FileNode, NodeKind, NodeSelector, ScanError, ScanWarning, StatConfig, StatTree, Timestamps,
    TreeStats, Unit, WarningKind,
};
