//! # Run a single forked unit of work.
//!
//! Wraps one fork: executes the work, converts panics into
//! [`TaskError::Panicked`], publishes lifecycle events, and reports
//! exactly one completion message back to the group.
//!
//! ## Flow
//! ```text
//! token already cancelled → skip work          → publish TaskCancelled
//! work → Ok(value)                             → publish TaskCompleted
//! work → Err(Canceled)   (graceful exit)       → publish TaskCancelled
//! work → Err(other)                            → publish TaskFailed
//! work panics → Err(Panicked)                  → publish TaskFailed
//! ```
//!
//! ## Rules
//! - Publishes **exactly one** terminal event per fork.
//! - Sends **exactly one** completion message per fork, even on panic;
//!   the group's join loop counts on this.
//! - A fork whose token is cancelled before the work starts never runs
//!   the work at all.

use std::future::Future;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    scope::TaskContext,
    subscribers::panic_message,
};

/// One terminal report from a forked task back to its group.
pub(crate) struct Completion<T> {
    /// Fork-order index.
    pub index: usize,
    /// The task's terminal result.
    pub result: Result<T, TaskError>,
}

/// Spawns one unit of work onto the runtime.
///
/// The returned handle resolves once the completion message has been
/// sent; the group keeps it to bound shutdown in `close`.
pub(crate) fn spawn_forked<T, F, Fut>(
    index: usize,
    ctx: TaskContext,
    work: F,
    tx: mpsc::UnboundedSender<Completion<T>>,
    bus: Bus,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce(TaskContext) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = if ctx.is_cancelled() {
            // Cancellation fired before this fork got a chance to start.
            Err(TaskError::Canceled)
        } else {
            match std::panic::AssertUnwindSafe(work(ctx)).catch_unwind().await {
                Ok(res) => res,
                Err(panic_err) => Err(TaskError::Panicked {
                    info: panic_message(panic_err.as_ref()),
                }),
            }
        };

        match &result {
            Ok(_) => publish_completed(&bus, index),
            Err(TaskError::Canceled) => publish_cancelled(&bus, index),
            Err(err) => publish_failed(&bus, index, err),
        }

        // The group may already have stopped receiving (drain aborted).
        let _ = tx.send(Completion { index, result });
    })
}

/// Publishes `TaskCompleted` (successful fork).
fn publish_completed(bus: &Bus, index: usize) {
    bus.publish(Event::new(EventKind::TaskCompleted).with_index(index));
}

/// Publishes `TaskCancelled` (graceful exit, not a group failure cause
/// unless no other cause exists).
fn publish_cancelled(bus: &Bus, index: usize) {
    bus.publish(Event::new(EventKind::TaskCancelled).with_index(index));
}

/// Publishes `TaskFailed` with error details.
fn publish_failed(bus: &Bus, index: usize, err: &TaskError) {
    bus.publish(
        Event::new(EventKind::TaskFailed)
            .with_index(index)
            .with_reason(err.to_string()),
    );
}
