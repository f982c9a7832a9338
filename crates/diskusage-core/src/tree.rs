//! Aggregation tree container and statistics.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::node::FileNode;

/// Summary statistics for a scanned tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total size in bytes.
    pub total_size: u64,
    /// Total number of counted files.
    pub total_files: u64,
    /// Total number of directories below the root.
    pub total_dirs: u64,
}

impl TreeStats {
    /// Read the totals off a finished root node.
    pub fn from_root(root: &FileNode) -> Self {
        Self {
            total_size: root.size,
            total_files: root.file_count(),
            total_dirs: root.dir_count(),
        }
    }
}

/// Complete scanned tree with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatTree {
    /// Root node of the tree.
    pub root: FileNode,

    /// Absolute root path that was scanned.
    pub root_path: PathBuf,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Recoverable problems encountered during the scan.
    pub warnings: Vec<ScanWarning>,
}

impl StatTree {
    /// Create a new tree, computing its statistics from the root.
    pub fn new(
        root: FileNode,
        root_path: PathBuf,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        let stats = TreeStats::from_root(&root);
        Self {
            root,
            root_path,
            scan_duration,
            stats,
            warnings,
        }
    }

    /// Get the total size of the tree.
    pub fn total_size(&self) -> u64 {
        self.root.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_stats_default() {
        let stats = TreeStats::default();
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_dirs, 0);
    }

    #[test]
    fn test_stats_from_root() {
        let sub = FileNode::from_children("sub", None, vec![FileNode::new_file("x", 10, None)]);
        let root = FileNode::from_children(
            "root",
            None,
            vec![sub, FileNode::new_file("y", 5, None)],
        );
        let tree = StatTree::new(root, PathBuf::from("/r"), Duration::ZERO, Vec::new());

        assert_eq!(tree.total_size(), 15);
        assert_eq!(tree.stats.total_files, 2);
        assert_eq!(tree.stats.total_dirs, 1);
        assert!(tree.warnings.is_empty());
    }
}
