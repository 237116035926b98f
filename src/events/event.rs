//! # Lifecycle events emitted by the group and its forked tasks.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Task events**: per-fork flow (forked, completed, cancelled, failed)
//! - **Group events**: scope-level transitions (cancel requested, joined, closed)
//! - **Subscriber events**: delivery problems (overflow, panic)
//!
//! The [`Event`] struct carries metadata such as the timestamp, the fork
//! index, a human-readable reason, and the grace budget involved.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use taskgroup::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_index(1)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.index, Some(1));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of group lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task events ===
    /// A unit of work was forked into the group.
    ///
    /// Sets:
    /// - `index`: fork-order index
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskForked,

    /// A forked task finished successfully.
    ///
    /// Sets:
    /// - `index`: fork-order index
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskCompleted,

    /// A forked task observed cancellation and stopped (graceful exit).
    ///
    /// Sets:
    /// - `index`: fork-order index
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskCancelled,

    /// A forked task failed with an error.
    ///
    /// Sets:
    /// - `index`: fork-order index
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFailed,

    // === Group events ===
    /// The group requested cancellation of outstanding tasks
    /// (first failure observed, or explicit close).
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CancelRequested,

    /// A cancelled task did not stop within the grace period and was aborted.
    ///
    /// Sets:
    /// - `index`: fork-order index
    /// - `grace_ms`: the grace budget that was exceeded
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CancelLagged,

    /// The group joined: every forked task reached a terminal state.
    ///
    /// Sets:
    /// - `reason`: `"all_succeeded"` or the first failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    GroupJoined,

    /// The group closed; no forked work remains.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    GroupClosed,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Fork-order index of the task, if applicable.
    pub index: Option<usize>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Grace budget in milliseconds (compact), for `CancelLagged`.
    pub grace_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            index: None,
            reason: None,
            grace_ms: None,
        }
    }

    /// Attaches a fork-order index.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a grace duration (stored as milliseconds).
    #[inline]
    pub fn with_grace(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.grace_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}
