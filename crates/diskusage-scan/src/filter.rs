//! Leaf inclusion predicates.

use std::fs::Metadata;

use regex::Regex;

use diskusage_core::{ScanError, StatConfig};

/// Decides whether a non-directory entry is counted.
///
/// Directories are always walked; the walker never consults the predicate
/// for them.
pub trait EntryPredicate: Send + Sync {
    /// Whether the entry named `name` is included.
    fn include(&self, name: &str, metadata: &Metadata) -> bool;
}

impl<F> EntryPredicate for F
where
    F: Fn(&str, &Metadata) -> bool + Send + Sync,
{
    fn include(&self, name: &str, metadata: &Metadata) -> bool {
        self(name, metadata)
    }
}

/// Includes every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeAll;

impl EntryPredicate for IncludeAll {
    fn include(&self, _name: &str, _metadata: &Metadata) -> bool {
        true
    }
}

/// Extension set AND name pattern.
#[derive(Debug, Clone, Default)]
pub struct LeafFilter {
    /// Dotted extensions (`.rs`); empty matches everything.
    extensions: Vec<String>,
    /// Unanchored name pattern; `None` matches everything.
    pattern: Option<Regex>,
}

impl LeafFilter {
    /// Create a filter from dotted extensions and an optional pattern.
    pub fn new(extensions: Vec<String>, pattern: Option<Regex>) -> Self {
        Self {
            extensions,
            pattern,
        }
    }

    /// Build the filter described by a run configuration.
    pub fn from_config(config: &StatConfig) -> Result<Self, ScanError> {
        Ok(Self::new(config.dotted_types(), config.filter_regex()?))
    }

    /// Whether a file name passes both the extension and pattern tests.
    pub fn matches_name(&self, name: &str) -> bool {
        let type_ok = self.extensions.is_empty()
            || self.extensions.iter().any(|ext| ext == extension(name));
        let pattern_ok = self.pattern.as_ref().is_none_or(|re| re.is_match(name));
        type_ok && pattern_ok
    }
}

impl EntryPredicate for LeafFilter {
    fn include(&self, name: &str, metadata: &Metadata) -> bool {
        metadata.is_dir() || self.matches_name(name)
    }
}

/// The suffix starting at the last dot, or "" when there is none.
///
/// Dotfiles count as all extension: `.bashrc` has extension `.bashrc`.
fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |i| &name[i..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("main.rs"), ".rs");
        assert_eq!(extension("archive.tar.gz"), ".gz");
        assert_eq!(extension(".bashrc"), ".bashrc");
        assert_eq!(extension("Makefile"), "");
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = LeafFilter::default();
        assert!(filter.matches_name("anything"));
        assert!(filter.matches_name(""));
    }

    #[test]
    fn test_types_and_pattern_combine() {
        let filter = LeafFilter::new(
            vec![".rs".to_string(), ".toml".to_string()],
            Some(Regex::new("^lib").unwrap()),
        );
        assert!(filter.matches_name("lib.rs"));
        assert!(filter.matches_name("library.toml"));
        assert!(!filter.matches_name("main.rs"));
        assert!(!filter.matches_name("lib.go"));
    }

    #[test]
    fn test_from_config() {
        let mut config = StatConfig::new("/tmp");
        config.types = vec!["txt".to_string()];
        config.filter = Some("a".to_string());
        let filter = LeafFilter::from_config(&config).unwrap();
        assert!(filter.matches_name("a.txt"));
        assert!(!filter.matches_name("b.txt"));
        assert!(!filter.matches_name("a.md"));
    }

    #[test]
    fn test_directories_always_included() {
        let temp = tempfile::TempDir::new().unwrap();
        let metadata = std::fs::metadata(temp.path()).unwrap();
        let filter = LeafFilter::new(vec![".rs".to_string()], None);
        assert!(filter.include("no_extension", &metadata));
    }
}
