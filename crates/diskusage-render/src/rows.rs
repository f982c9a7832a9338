//! Flattening the selected nodes into display rows.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use itertools::{Itertools, Position};
use serde::Serialize;

use diskusage_core::FileNode;

/// One printed line of the report.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    /// Entry name.
    pub name: String,
    /// Path relative to the scanned root.
    pub path: PathBuf,
    /// Level below the root, starting at 1.
    pub depth: usize,
    /// Size in bytes.
    pub size: u64,
    /// Share of the root's total size, in percent.
    pub percent: f64,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Last modification time, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Local>>,
    /// Box-drawing prefix placing the row in the tree.
    #[serde(skip)]
    pub branch: String,
}

/// Collect the eligible nodes below `root`, depth-first in child order.
///
/// Only eligible children are visited, and only eligible directories are
/// descended into, so the rows follow the shape the selector marked.
pub fn collect_rows(root: &FileNode) -> Vec<Row> {
    let mut rows = Vec::with_capacity(root.eligible_descendants());
    push_children(root, &PathBuf::new(), "", 1, root.size, &mut rows);
    rows
}

fn push_children(
    node: &FileNode,
    path: &PathBuf,
    indent: &str,
    depth: usize,
    total: u64,
    rows: &mut Vec<Row>,
) {
    let top_level = depth == 1;
    for (position, child) in node.children.iter().filter(|c| c.eligible).with_position() {
        let connector = match position {
            Position::Only if top_level => "──",
            Position::First if top_level => "┌─",
            Position::Only | Position::Last => "└─",
            Position::First | Position::Middle => "├─",
        };
        let last = matches!(position, Position::Only | Position::Last);
        let child_path = path.join(child.name.as_str());

        rows.push(Row {
            name: child.name.to_string(),
            path: child_path.clone(),
            depth,
            size: child.size,
            percent: percent(child.size, total),
            is_dir: child.is_dir(),
            modified: child.timestamps.map(|t| DateTime::from(t.modified)),
            branch: format!("{indent}{connector} "),
        });

        if child.is_dir() {
            let nested = format!("{indent}{}", if last { "   " } else { "│  " });
            push_children(child, &child_path, &nested, depth + 1, total, rows);
        }
    }
}

fn percent(size: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        size as f64 / total as f64 * 100.0
    }
}
