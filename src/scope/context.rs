//! # Per-task execution context.
//!
//! Every forked unit of work receives a [`TaskContext`]: a child
//! [`CancellationToken`] it must check at safe points, plus an optional
//! opaque context value supplied by the caller at group construction
//! (e.g. a tracing/transaction token). The group passes the value through
//! unchanged and never inspects it.
//!
//! ## Example
//! ```rust
//! use taskgroup::TaskContext;
//!
//! async fn work(ctx: TaskContext) {
//!     while !ctx.is_cancelled() {
//!         // do a slice of work, then re-check...
//!         break;
//!     }
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Opaque caller-supplied value propagated unchanged into every task.
pub(crate) type ContextValue = Arc<dyn Any + Send + Sync>;

/// Execution context handed to a forked unit of work.
///
/// Cheap to clone; holds a child token of the group's cancellation token,
/// so cancelling the group (first failure, close, or an external parent
/// token) is observable from here.
#[derive(Clone)]
pub struct TaskContext {
    cancel: CancellationToken,
    value: Option<ContextValue>,
}

impl TaskContext {
    pub(crate) fn new(cancel: CancellationToken, value: Option<ContextValue>) -> Self {
        Self { cancel, value }
    }

    /// `true` once the group has requested cancellation.
    ///
    /// Cooperative tasks should check this at safe points and return
    /// `Err(TaskError::Canceled)` promptly.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes when the group requests cancellation.
    ///
    /// Useful inside `tokio::select!` to race work against cancellation.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// The underlying cancellation token (for deriving further children).
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Downcasts the opaque context value, if one was supplied and its
    /// type matches.
    ///
    /// ## Example
    /// ```rust
    /// use taskgroup::{GroupBuilder, TaskGroup};
    ///
    /// struct TraceToken(u64);
    ///
    /// # async fn demo() {
    /// let mut group: TaskGroup<u64> = GroupBuilder::new()
    ///     .with_context(TraceToken(7))
    ///     .open();
    /// group
    ///     .fork(|ctx| async move {
    ///         let id = ctx.value::<TraceToken>().map(|t| t.0).unwrap_or(0);
    ///         Ok(id)
    ///     })
    ///     .unwrap();
    /// # }
    /// ```
    pub fn value<V: Any + Send + Sync>(&self) -> Option<&V> {
        self.value.as_ref().and_then(|v| v.downcast_ref::<V>())
    }
}
