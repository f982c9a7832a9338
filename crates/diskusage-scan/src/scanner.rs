//! The complete stat operation: walk, then select.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tracing::{debug, info};

use diskusage_core::{NodeSelector, ScanError, StatConfig, StatTree};

use crate::dispatch::BoundedDispatcher;
use crate::filter::LeafFilter;
use crate::progress::ScanProgress;
use crate::walker::DirectoryWalker;

/// Scans a directory and marks the nodes to display.
pub struct Scanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan `config.root` and select the nodes to display.
    ///
    /// The configuration is validated before anything is read from disk.
    pub fn scan(&self, config: &StatConfig) -> Result<StatTree, ScanError> {
        config.validate()?;
        let filter = LeafFilter::from_config(config)?;

        let start = Instant::now();
        let root_path = std::path::absolute(&config.root)
            .map_err(|e| ScanError::io(&config.root, e))?;

        let dispatcher = BoundedDispatcher::new(config.workers);
        let walker = DirectoryWalker::new(Arc::new(dispatcher.clone()))
            .with_predicate(filter)
            .with_progress(self.progress_tx.clone());

        info!(path = %root_path.display(), workers = config.workers, "scanning");
        let walked = walker.walk(&root_path);
        dispatcher.close();
        let output = walked?;

        let mut tree = StatTree::new(output.root, root_path, start.elapsed(), output.warnings);
        let selected = NodeSelector::from_config(config).select(&mut tree.root);

        debug!(
            total_size = tree.stats.total_size,
            files = tree.stats.total_files,
            dirs = tree.stats.total_dirs,
            warnings = tree.warnings.len(),
            selected,
            "scan complete"
        );
        Ok(tree)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_config_fails_before_walk() {
        let mut config = StatConfig::new("/definitely/not/here");
        config.filter = Some("(".to_string());
        let err = Scanner::new().scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig { .. }));
    }

    #[test]
    fn test_scan_selects_nodes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), vec![0u8; 10]).unwrap();
        fs::create_dir(temp.path().join("d")).unwrap();

        let mut config = StatConfig::new(temp.path());
        config.depth = None;
        let tree = Scanner::new().scan(&config).unwrap();

        assert!(tree.root.eligible);
        assert!(tree.root.children[0].eligible);
        // zero-size directory is hidden by default
        assert!(!tree.root.children[1].eligible);
        assert!(tree.root_path.is_absolute());
    }
}
