//! Recursive directory walker with bounded fan-out.

use std::fs::{self, DirEntry};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use compact_str::CompactString;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use diskusage_core::{FileNode, ScanError, ScanWarning, Timestamps};

use crate::dispatch::{Dispatcher, WALK_STACK_SIZE};
use crate::filter::{EntryPredicate, IncludeAll};
use crate::platform::{NativePlatform, Platform};
use crate::progress::{ProgressTracker, ScanProgress};

/// Result of a successful walk.
#[derive(Debug)]
pub struct WalkOutput {
    /// Root directory node with its fully aggregated subtree.
    pub root: FileNode,
    /// Recoverable problems met along the way.
    pub warnings: Vec<ScanWarning>,
}

/// Walks a directory tree, fanning subdirectories out through a [`Dispatcher`].
///
/// Every directory waits for all of its subdirectory walks before summing and
/// sorting its children, so each node is final once it is returned. A denied
/// subdirectory contributes nothing; any other failure below the root fails
/// the whole walk.
pub struct DirectoryWalker {
    dispatcher: Arc<dyn Dispatcher>,
    predicate: Arc<dyn EntryPredicate>,
    platform: Arc<dyn Platform>,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl DirectoryWalker {
    /// Create a walker counting every file on the native platform.
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            dispatcher,
            predicate: Arc::new(IncludeAll),
            platform: Arc::new(NativePlatform),
            progress_tx,
        }
    }

    /// Only count files accepted by `predicate`.
    pub fn with_predicate(mut self, predicate: impl EntryPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Use a different platform capability.
    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    /// Publish progress on an existing channel.
    pub fn with_progress(mut self, progress_tx: broadcast::Sender<ScanProgress>) -> Self {
        self.progress_tx = progress_tx;
        self
    }

    /// Walk `path` and return its aggregated tree.
    ///
    /// The root is always a directory node, even when `path` names a file
    /// (it is then empty).
    ///
    /// The root directory is listed on its own walk thread, so nesting depth
    /// is bounded by that thread's stack rather than the caller's.
    pub fn walk(&self, path: &Path) -> Result<WalkOutput, ScanError> {
        thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name("diskusage-walk".into())
                .stack_size(WALK_STACK_SIZE)
                .spawn_scoped(scope, || self.walk_root(path));
            match spawned {
                Ok(handle) => handle.join().unwrap_or(Err(ScanError::Interrupted)),
                Err(err) => {
                    debug!(error = %err, "thread spawn failed, walking on the caller");
                    self.walk_root(path)
                }
            }
        })
    }

    fn walk_root(&self, path: &Path) -> Result<WalkOutput, ScanError> {
        let ctx = Arc::new(WalkContext {
            dispatcher: Arc::clone(&self.dispatcher),
            predicate: Arc::clone(&self.predicate),
            platform: Arc::clone(&self.platform),
            progress: ProgressTracker::new(self.progress_tx.clone()),
            failed: AtomicBool::new(false),
            failure: Mutex::new(None),
            warnings: Mutex::new(Vec::new()),
        });

        let timestamps = fs::metadata(path)
            .ok()
            .and_then(|m| ctx.platform.timestamps(&m));

        let children = match walk_dir(&ctx, path) {
            Ok(children) => children,
            Err(err) if err.is_recoverable() => {
                ctx.warn(ScanWarning::permission_denied(path));
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        if let Some(err) = ctx.failure.lock().take() {
            return Err(err);
        }

        let root = FileNode::from_children(root_name(path), timestamps, children);
        let progress = ctx.progress.snapshot(path);
        debug!(
            path = %path.display(),
            size = root.size,
            files = progress.files_scanned,
            dirs = progress.dirs_scanned,
            elapsed_ms = progress.elapsed.as_millis() as u64,
            "walk finished"
        );

        let warnings = std::mem::take(&mut *ctx.warnings.lock());
        Ok(WalkOutput { root, warnings })
    }
}

/// State shared by every task of one walk.
struct WalkContext {
    dispatcher: Arc<dyn Dispatcher>,
    predicate: Arc<dyn EntryPredicate>,
    platform: Arc<dyn Platform>,
    progress: ProgressTracker,
    failed: AtomicBool,
    /// First fatal error; later ones are dropped.
    failure: Mutex<Option<ScanError>>,
    warnings: Mutex<Vec<ScanWarning>>,
}

impl WalkContext {
    fn fail(&self, err: ScanError) {
        let mut failure = self.failure.lock();
        if failure.is_none() {
            warn!(error = %err, "scan failed");
            *failure = Some(err);
        }
        self.failed.store(true, Ordering::Release);
    }

    fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    fn warn(&self, warning: ScanWarning) {
        debug!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
        self.warnings.lock().push(warning);
    }
}

/// Walk the children of `dir`, blocking until every subdirectory is done.
fn walk_dir(ctx: &Arc<WalkContext>, dir: &Path) -> Result<Vec<FileNode>, ScanError> {
    // The whole tree is discarded once anything failed.
    if ctx.has_failed() {
        return Ok(Vec::new());
    }

    if ctx.platform.is_reserved(dir) {
        ctx.warn(ScanWarning::reserved(dir));
        return Ok(Vec::new());
    }

    let Some(entries) = list_dir(ctx, dir)? else {
        return Ok(Vec::new());
    };

    let (tx, rx) = crossbeam_channel::bounded(entries.len());
    let mut children = Vec::with_capacity(entries.len());
    let mut dispatched = 0usize;
    let mut outcome = Ok(());

    for entry in entries {
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                outcome = Err(ScanError::io(&path, err));
                break;
            }
        };
        let name = CompactString::new(entry.file_name().to_string_lossy());
        let timestamps = ctx.platform.timestamps(&metadata);

        if !metadata.is_dir() {
            if ctx.predicate.include(&name, &metadata) {
                ctx.progress.record_file(metadata.len(), &path);
                children.push(FileNode::new_file(name, metadata.len(), timestamps));
            }
            continue;
        }

        let tx = tx.clone();
        let task_ctx = Arc::clone(ctx);
        dispatched += 1;
        ctx.dispatcher.run(Box::new(move || {
            let node = walk_subdir(&task_ctx, &path, name, timestamps);
            // The receiver only goes away after every sender is dropped.
            let _ = tx.send(node);
        }));
    }

    // Fan-in barrier: the iterator ends once every task dropped its sender.
    drop(tx);
    let subdirs: Vec<FileNode> = rx.iter().collect();
    if subdirs.len() != dispatched {
        // A task died without reporting (panic); its subtree is missing.
        ctx.fail(ScanError::Interrupted);
    }

    outcome?;
    children.extend(subdirs);
    Ok(children)
}

/// Walk one subdirectory and wrap its children in a directory node.
fn walk_subdir(
    ctx: &Arc<WalkContext>,
    path: &Path,
    name: CompactString,
    timestamps: Option<Timestamps>,
) -> FileNode {
    match walk_dir(ctx, path) {
        Ok(children) => {
            ctx.progress.record_dir();
            FileNode::from_children(name, timestamps, children)
        }
        Err(err) if err.is_recoverable() => {
            ctx.warn(ScanWarning::permission_denied(path));
            FileNode::new_directory(name, timestamps)
        }
        Err(err) => {
            ctx.fail(err);
            FileNode::new_directory(name, timestamps)
        }
    }
}

/// List `dir`. `None` means the directory is counted as empty.
fn list_dir(ctx: &WalkContext, dir: &Path) -> Result<Option<Vec<DirEntry>>, ScanError> {
    let listing = fs::read_dir(dir).and_then(|entries| entries.collect::<io::Result<Vec<_>>>());
    match listing {
        Ok(entries) => Ok(Some(entries)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ScanError::io(dir, err)),
        Err(err) if ctx.platform.is_access_denied(&err) => Err(ScanError::PermissionDenied {
            path: dir.to_path_buf(),
        }),
        Err(err) => {
            ctx.warn(ScanWarning::read_error(dir, &err));
            Ok(None)
        }
    }
}

fn root_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}
