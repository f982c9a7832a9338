//! Core types for diskusage.
//!
//! This crate provides the data structures shared by the scanner and the
//! presenter: the aggregation tree, run configuration, size units, and the
//! selector that decides which nodes are displayed.

mod config;
mod error;
mod node;
mod select;
mod tree;
mod unit;

pub use config::{DEFAULT_WORKERS, StatConfig, StatConfigBuilder, StatConfigBuilderError};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use node::{FileNode, NodeKind, Timestamps};
pub use select::NodeSelector;
pub use tree::{StatTree, TreeStats};
pub use unit::Unit;
