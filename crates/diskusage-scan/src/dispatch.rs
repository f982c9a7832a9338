//! Bounded task dispatch with synchronous fallback.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;
use tracing::debug;

/// A unit of work handed to a [`Dispatcher`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks, concurrently when the implementation allows it.
///
/// `run` may return before the task finishes. Callers that need the task's
/// result must collect it themselves (the walker uses a channel per directory).
pub trait Dispatcher: Send + Sync {
    /// Run `task`, either on a new thread or on the calling thread.
    fn run(&self, task: Task);
}

/// Runs every task on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn run(&self, task: Task) {
        task();
    }
}

/// Stack reserved for every walk thread.
///
/// A directory level costs a few frames and chains can run thousands of levels
/// deep before hitting `PATH_MAX`. Only touched pages are committed.
pub(crate) const WALK_STACK_SIZE: usize = 64 * 1024 * 1024;

/// High bit of the state word; the remaining bits count in-flight tasks.
const CLOSED: usize = 1 << (usize::BITS - 1);

/// Starts tasks on their own threads while fewer than `capacity` are in
/// flight, and runs them on the caller otherwise.
///
/// Saturation never queues work: the caller makes progress by doing the work
/// itself. Once [`close`](Self::close) returns, no task is admitted to a new
/// thread; tasks admitted earlier run to completion.
#[derive(Debug, Clone)]
pub struct BoundedDispatcher {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    state: AtomicUsize,
}

impl BoundedDispatcher {
    /// Create a dispatcher allowing up to `capacity` concurrent tasks.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                capacity: capacity.min(CLOSED - 1),
                state: AtomicUsize::new(0),
            }),
        }
    }

    /// Maximum number of tasks running on their own threads.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of tasks currently running on their own threads.
    pub fn in_flight(&self) -> usize {
        self.inner.state.load(Ordering::Acquire) & !CLOSED
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) & CLOSED != 0
    }

    /// Stop admitting tasks to new threads. Repeated calls are no-ops.
    pub fn close(&self) {
        let previous = self.inner.state.fetch_or(CLOSED, Ordering::AcqRel);
        if previous & CLOSED == 0 {
            debug!(in_flight = previous, "dispatcher closed");
        }
    }

    fn try_acquire(&self) -> Option<Permit> {
        let capacity = self.inner.capacity;
        self.inner
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                (state & CLOSED == 0 && state < capacity).then_some(state + 1)
            })
            .ok()
            .map(|_| Permit(Arc::clone(&self.inner)))
    }
}

impl Dispatcher for BoundedDispatcher {
    fn run(&self, task: Task) {
        let Some(permit) = self.try_acquire() else {
            task();
            return;
        };

        // Keep the task reachable from here so it can still run inline
        // if the thread cannot be created.
        let slot = Arc::new(Mutex::new(Some(task)));
        let thread_slot = Arc::clone(&slot);
        let spawned = thread::Builder::new()
            .name("diskusage-walk".into())
            .stack_size(WALK_STACK_SIZE)
            .spawn(move || {
                let _permit = permit;
                if let Some(task) = thread_slot.lock().take() {
                    task();
                }
            });

        if let Err(err) = spawned {
            debug!(error = %err, "thread spawn failed, running task inline");
            if let Some(task) = slot.lock().take() {
                task();
            }
        }
    }
}

/// Releases one in-flight slot when dropped, even if the task panics.
struct Permit(Arc<Inner>);

impl Drop for Permit {
    fn drop(&mut self) {
        self.0.state.fetch_sub(1, Ordering::AcqRel);
    }
}
