//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::unit::Unit;

/// Default capacity of the directory dispatcher.
pub const DEFAULT_WORKERS: usize = 128;

/// Configuration for a disk usage run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct StatConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// File extensions to count, without the leading dot (empty = all).
    #[builder(default)]
    #[serde(default)]
    pub types: Vec<String>,

    /// Regular expression file names must match (None = all).
    #[builder(default)]
    #[serde(default)]
    pub filter: Option<String>,

    /// Maximum number of directory walks running concurrently.
    #[builder(default = "DEFAULT_WORKERS")]
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Show directories whose usage is zero.
    #[builder(default = "false")]
    #[serde(default)]
    pub include_empty_dirs: bool,

    /// Show directories only.
    #[builder(default = "false")]
    #[serde(default)]
    pub directories_only: bool,

    /// Maximum number of nodes to display (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub limit: Option<usize>,

    /// Number of tree levels to display (None = unlimited).
    #[builder(default = "Some(1)")]
    #[serde(default = "default_depth")]
    pub depth: Option<usize>,

    /// Largest unit used when displaying sizes.
    #[builder(default)]
    #[serde(default)]
    pub unit: Unit,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_depth() -> Option<usize> {
    Some(1)
}

impl StatConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            Some(_) => {}
        }
        if self.workers == Some(0) {
            return Err("Worker count must be at least 1".to_string());
        }
        if let Some(Some(ref pattern)) = self.filter {
            compile_filter(pattern).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl From<StatConfigBuilderError> for ScanError {
    fn from(err: StatConfigBuilderError) -> Self {
        ScanError::config(err.to_string())
    }
}

impl StatConfig {
    /// Create a new config builder.
    pub fn builder() -> StatConfigBuilder {
        StatConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            types: Vec::new(),
            filter: None,
            workers: DEFAULT_WORKERS,
            include_empty_dirs: false,
            directories_only: false,
            limit: None,
            depth: Some(1),
            unit: Unit::default(),
        }
    }

    /// Check a config that was not produced by the builder.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.root.as_os_str().is_empty() {
            return Err(ScanError::config("Root path cannot be empty"));
        }
        if self.workers == 0 {
            return Err(ScanError::config("Worker count must be at least 1"));
        }
        self.filter_regex()?;
        Ok(())
    }

    /// Compile the name filter, if one is set.
    pub fn filter_regex(&self) -> Result<Option<Regex>, ScanError> {
        self.filter.as_deref().map(compile_filter).transpose()
    }

    /// Extensions in the `.ext` form matched against file names.
    pub fn dotted_types(&self) -> Vec<String> {
        self.types
            .iter()
            .map(|t| t.trim_start_matches('.'))
            .filter(|t| !t.is_empty())
            .map(|t| format!(".{t}"))
            .collect()
    }
}

impl Default for StatConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

fn compile_filter(pattern: &str) -> Result<Regex, ScanError> {
    Regex::new(pattern)
        .map_err(|e| ScanError::config(format!("invalid filter '{pattern}': {e}")))
}
