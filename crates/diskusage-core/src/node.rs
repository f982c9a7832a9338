//! File and directory node types.

use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// File metadata timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Last modification time.
    pub modified: SystemTime,
    /// Creation time (if available, platform-dependent).
    pub created: Option<SystemTime>,
}

impl Timestamps {
    /// Create timestamps; `created` is unavailable on some filesystems.
    pub fn new(modified: SystemTime, created: Option<SystemTime>) -> Self {
        Self { modified, created }
    }
}

/// Type of file system node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Anything that is not a directory (regular files, symlinks, devices).
    File,
    /// Directory.
    Directory {
        /// Total number of files in this subtree.
        file_count: u64,
        /// Total number of directories in this subtree.
        dir_count: u64,
    },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A single file or directory in the aggregation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    /// File/directory name (not full path).
    pub name: CompactString,

    /// Node type and associated counters.
    pub kind: NodeKind,

    /// Size in bytes (aggregate for directories).
    pub size: u64,

    /// File metadata timestamps, when the platform could provide them.
    pub timestamps: Option<Timestamps>,

    /// Set by the selector when this node fits the display budget.
    #[serde(default)]
    pub eligible: bool,

    /// Children nodes (directories only), sorted by size descending.
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// Create a new file node.
    pub fn new_file(
        name: impl Into<CompactString>,
        size: u64,
        timestamps: Option<Timestamps>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            size,
            timestamps,
            eligible: false,
            children: Vec::new(),
        }
    }

    /// Create a new, empty directory node.
    pub fn new_directory(name: impl Into<CompactString>, timestamps: Option<Timestamps>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory {
                file_count: 0,
                dir_count: 0,
            },
            size: 0,
            timestamps,
            eligible: false,
            children: Vec::new(),
        }
    }

    /// Build a directory node from its fully collected children.
    ///
    /// Children must be complete: the size is summed and the children are
    /// sorted exactly once here, never incrementally.
    pub fn from_children(
        name: impl Into<CompactString>,
        timestamps: Option<Timestamps>,
        children: Vec<FileNode>,
    ) -> Self {
        let mut node = Self::new_directory(name, timestamps);
        node.children = children;
        node.size = node.children.iter().map(|c| c.size).sum();
        node.update_counts();
        node.sort_children_by_size();
        node
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// A directory whose subtree holds no bytes.
    pub fn is_empty_dir(&self) -> bool {
        self.is_dir() && self.size == 0
    }

    /// Get file count for directories, 1 for files.
    pub fn file_count(&self) -> u64 {
        match self.kind {
            NodeKind::Directory { file_count, .. } => file_count,
            NodeKind::File => 1,
        }
    }

    /// Get directory count for directories.
    pub fn dir_count(&self) -> u64 {
        match self.kind {
            NodeKind::Directory { dir_count, .. } => dir_count,
            NodeKind::File => 0,
        }
    }

    /// Sort direct children by size in descending order.
    ///
    /// The sort is stable, so entries of equal size keep the order in which
    /// they were collected.
    pub fn sort_children_by_size(&mut self) {
        self.children.sort_by(|a, b| b.size.cmp(&a.size));
    }

    /// Update directory counts based on children.
    pub fn update_counts(&mut self) {
        if let NodeKind::Directory {
            ref mut file_count,
            ref mut dir_count,
        } = self.kind
        {
            *file_count = 0;
            *dir_count = 0;

            for child in &self.children {
                match child.kind {
                    NodeKind::File => *file_count += 1,
                    NodeKind::Directory {
                        file_count: fc,
                        dir_count: dc,
                    } => {
                        *file_count += fc;
                        *dir_count += dc + 1;
                    }
                }
            }
        }
    }

    /// Count the eligible nodes below this one (the node itself excluded).
    pub fn eligible_descendants(&self) -> usize {
        self.children
            .iter()
            .map(|c| usize::from(c.eligible) + c.eligible_descendants())
            .sum()
    }
}
