//! Budgeted selection of the nodes to display.

use crate::config::StatConfig;
use crate::node::FileNode;

/// Marks which nodes of a finished tree are eligible for output.
///
/// Selection walks an explicit stack of directories. Popping a directory
/// considers its children in their sorted order: each child that passes the
/// filters is marked and costs one unit of budget, and marked directories are
/// pushed so their own children are considered later. Rejected directories
/// are pruned together with their whole subtree. Selection stops as soon as
/// the budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSelector {
    /// Maximum number of nodes to mark.
    pub max_count: usize,
    /// Keep directories whose size is zero.
    pub include_empty_dirs: bool,
    /// Mark directories only.
    pub directories_only: bool,
    /// Deepest level to consider; the root's children are level 1.
    pub max_depth: Option<usize>,
}

impl Default for NodeSelector {
    fn default() -> Self {
        Self {
            max_count: usize::MAX,
            include_empty_dirs: false,
            directories_only: false,
            max_depth: None,
        }
    }
}

impl NodeSelector {
    /// Create a selector with a node budget and no depth limit.
    pub fn new(max_count: usize, include_empty_dirs: bool, directories_only: bool) -> Self {
        Self {
            max_count,
            include_empty_dirs,
            directories_only,
            max_depth: None,
        }
    }

    /// Build the selector described by a run configuration.
    pub fn from_config(config: &StatConfig) -> Self {
        Self {
            max_count: config.limit.unwrap_or(usize::MAX),
            include_empty_dirs: config.include_empty_dirs,
            directories_only: config.directories_only,
            max_depth: config.depth,
        }
    }

    /// Limit selection to the first `depth` levels below the root.
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Whether a node passes the empty-directory and directory-only filters.
    pub fn accepts(&self, node: &FileNode) -> bool {
        if node.is_empty_dir() && !self.include_empty_dirs {
            return false;
        }
        if !node.is_dir() && self.directories_only {
            return false;
        }
        true
    }

    /// Mark eligible nodes below `root` and return how many were marked.
    ///
    /// The root itself is always marked and does not count against the budget.
    pub fn select(&self, root: &mut FileNode) -> usize {
        root.eligible = true;
        if self.max_count == 0 || self.max_depth == Some(0) {
            return 0;
        }

        let mut remaining = self.max_count;
        let mut stack: Vec<(&mut FileNode, usize)> = vec![(root, 0)];

        while let Some((dir, depth)) = stack.pop() {
            let level = depth + 1;
            for child in dir.children.iter_mut() {
                if !self.accepts(child) {
                    continue;
                }

                child.eligible = true;
                remaining -= 1;
                if remaining == 0 {
                    return self.max_count;
                }

                let descend = self.max_depth.is_none_or(|max| level < max);
                if child.is_dir() && descend {
                    stack.push((child, level));
                }
            }
        }

        self.max_count - remaining
    }
}
