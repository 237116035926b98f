//! # TaskGroup: the fork-join scope.
//!
//! A [`TaskGroup`] forks a fixed set of subtasks, waits for all of them to
//! finish or for the first failure, and returns either all results (in
//! fork order) or the triggering error, with guaranteed cleanup of
//! unfinished work.
//!
//! ## Lifecycle
//! ```text
//! TaskGroup::open()  ──►  Open
//!   fork(work) *N           │   each fork runs on its own Tokio task
//!   join().await            ▼
//!                         Joined
//!   outcome()/into_outcome() │
//!   close().await            ▼
//!                         Closed
//! ```
//! The state machine never revisits a prior state; `fork` outside `Open`
//! and a second `join` fail fast with [`GroupError`].
//!
//! ## Join algorithm
//! ```text
//! loop until all forks reported:
//!   recv completion (index, result)
//!     ├─ Ok(value)  → store into fork-order slot
//!     └─ Err(first) → record failure
//!                     cancel group token        (cooperative signal)
//!                     drain remaining reports within grace
//!                       └─ grace exceeded → abort laggards, CancelLagged
//!                     stop waiting
//! ```
//!
//! ## Rules
//! - Results are returned in **fork order**, independent of completion order.
//! - The recorded failure is the **first** observed on the completion
//!   channel; simultaneous failures race and only "some failure wins" is
//!   guaranteed.
//! - On failure the outcome is all-or-nothing: earlier successes are
//!   discarded.
//! - `join` does not return until every fork is terminal (completed,
//!   failed, cancelled, or aborted) — no dangling work.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::mem;
use std::sync::Arc;

use futures::future::join_all;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::GroupConfig,
    error::{GroupError, TaskError},
    events::{Bus, Event, EventKind},
    scope::{
        context::{ContextValue, TaskContext},
        handle::TaskHandle,
        outcome::Outcome,
        runner::{spawn_forked, Completion},
    },
    subscribers::{Subscribe, SubscriberSet},
};

/// Lifecycle state of a [`TaskGroup`].
///
/// Transitions are one-way: `Open → Joined → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// Accepting forks; `join` has not run.
    Open,
    /// `join` completed; the outcome is available.
    Joined,
    /// `close` completed; no forked work remains.
    Closed,
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupState::Open => f.write_str("open"),
            GroupState::Joined => f.write_str("joined"),
            GroupState::Closed => f.write_str("closed"),
        }
    }
}

/// Builder for a [`TaskGroup`].
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use taskgroup::{GroupBuilder, GroupConfig, TaskGroup};
///
/// # async fn demo() {
/// let mut cfg = GroupConfig::default();
/// cfg.grace = Duration::from_secs(2);
///
/// let group: TaskGroup<u32> = GroupBuilder::new().config(cfg).open();
/// # drop(group);
/// # }
/// ```
#[derive(Default)]
pub struct GroupBuilder {
    cfg: GroupConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    context: Option<ContextValue>,
    parent: Option<CancellationToken>,
}

impl GroupBuilder {
    /// Creates a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the group configuration.
    #[must_use]
    pub fn config(mut self, cfg: GroupConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Attaches event subscribers (fan-out via [`SubscriberSet`]).
    #[must_use]
    pub fn with_subscribers(mut self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subs;
        self
    }

    /// Attaches a single event subscriber.
    #[must_use]
    pub fn with_subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Supplies an opaque context value passed unchanged into every
    /// forked task (see [`TaskContext::value`]).
    ///
    /// The group never inspects the value; typical uses are tracing or
    /// transaction tokens.
    #[must_use]
    pub fn with_context<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.context = Some(Arc::new(value));
        self
    }

    /// Derives the group's cancellation token from `parent`.
    ///
    /// This is the deadline extension point: the caller owns the parent
    /// token and may cancel it at any time (e.g. from a timeout), which
    /// cancels the whole group; `join` then resolves with
    /// `Failed(Canceled)`.
    #[must_use]
    pub fn child_of(mut self, parent: &CancellationToken) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Opens the group in the `Open` state.
    ///
    /// Must be called within a Tokio runtime when subscribers are
    /// attached (the fan-out listener is spawned here).
    #[must_use]
    pub fn open<T: Send + 'static>(self) -> TaskGroup<T> {
        TaskGroup::from_builder(self)
    }
}

/// Listener task fanning bus events out to the subscriber set.
struct Listener {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

/// Fork-join scope over `N` subtasks producing values of type `T`.
///
/// See the [module docs](self) for lifecycle and join semantics.
///
/// ## Example
/// ```rust
/// use taskgroup::TaskGroup;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let mut group: TaskGroup<(i32, i32)> = TaskGroup::open();
///
/// group.fork(|_ctx| async move { Ok((3, 4)) })?;
/// group.fork(|_ctx| async move { Ok((6, 8)) })?;
///
/// group.join().await?;
/// let results = group.into_outcome()?.into_results()?;
/// assert_eq!(results, vec![(3, 4), (6, 8)]);
/// # Ok(())
/// # }
/// ```
pub struct TaskGroup<T> {
    cfg: GroupConfig,
    state: GroupState,
    cancel: CancellationToken,
    bus: Bus,
    context: Option<ContextValue>,
    tasks: Vec<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Completion<T>>,
    rx: mpsc::UnboundedReceiver<Completion<T>>,
    outcome: Option<Outcome<T>>,
    listener: Option<Listener>,
}

impl<T: Send + 'static> TaskGroup<T> {
    /// Opens a group with default configuration and no subscribers.
    #[must_use]
    pub fn open() -> Self {
        GroupBuilder::new().open()
    }

    fn from_builder(builder: GroupBuilder) -> Self {
        let cancel = match &builder.parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let bus = Bus::new(builder.cfg.bus_capacity);
        let listener = if builder.subscribers.is_empty() {
            None
        } else {
            Some(Self::spawn_listener(builder.subscribers, &bus))
        };
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            cfg: builder.cfg,
            state: GroupState::Open,
            cancel,
            bus,
            context: builder.context,
            tasks: Vec::new(),
            tx,
            rx,
            outcome: None,
            listener,
        }
    }

    fn spawn_listener(subs: Vec<Arc<dyn Subscribe>>, bus: &Bus) -> Listener {
        let stop = CancellationToken::new();
        let set = SubscriberSet::new(subs, bus.clone());
        let mut rx = bus.subscribe();
        let bus_for_listener = bus.clone();
        let stop_for_listener = stop.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Pending events are drained before the stop signal
                    // is honored.
                    biased;
                    ev = rx.recv() => match ev {
                        Ok(ev) => set.emit(&Arc::new(ev), &bus_for_listener),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    () = stop_for_listener.cancelled() => break,
                }
            }
            set.close().await;
        });
        Listener { stop, handle }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Number of forked tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` if nothing has been forked yet.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Creates a new receiver observing subsequent lifecycle events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Forks one unit of work into the group.
    ///
    /// The work is spawned onto the Tokio runtime immediately and runs in
    /// parallel with the caller and with other forks. It receives a
    /// [`TaskContext`] carrying a child cancellation token (and the
    /// group's opaque context value, if any); cooperative tasks should
    /// check the token at safe points.
    ///
    /// Returns a [`TaskHandle`] addressing this task's result slot in the
    /// outcome.
    ///
    /// ## Errors
    /// [`GroupError::NotOpen`] if the group has already joined or closed.
    pub fn fork<F, Fut>(&mut self, work: F) -> Result<TaskHandle, GroupError>
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        if self.state != GroupState::Open {
            return Err(GroupError::NotOpen { state: self.state });
        }

        let index = self.tasks.len();
        let ctx = TaskContext::new(self.cancel.child_token(), self.context.clone());
        let handle = spawn_forked(index, ctx, work, self.tx.clone(), self.bus.clone());
        self.tasks.push(handle);
        self.bus.publish(Event::new(EventKind::TaskForked).with_index(index));
        Ok(TaskHandle::new(index))
    }

    /// Waits until every fork completed successfully or the first failure
    /// is observed.
    ///
    /// On the first failure the group token is cancelled and the
    /// remaining completion reports are drained within
    /// [`GroupConfig::grace`]; forks that do not acknowledge in time are
    /// aborted (reported as `CancelLagged`). Either way, when `join`
    /// returns every fork is in a terminal state.
    ///
    /// `join` itself returns `Ok(())` even when a task failed — the
    /// failure is carried by the [`Outcome`].
    ///
    /// ## Cancellation safety
    /// `join` is **not** cancellation-safe: dropping the future midway
    /// (e.g. racing it against `tokio::time::timeout`) may discard
    /// completion reports already consumed, so the group stays `Joined`
    /// with no outcome and rejects further joins instead of hanging.
    /// To put a deadline on a group, cancel a parent token supplied via
    /// [`GroupBuilder::child_of`] — `join` then completes normally with
    /// `Failed(Canceled)`.
    ///
    /// ## Errors
    /// [`GroupError::AlreadyJoined`] if called more than once or after
    /// `close`.
    pub async fn join(&mut self) -> Result<(), GroupError> {
        if self.state != GroupState::Open {
            return Err(GroupError::AlreadyJoined { state: self.state });
        }
        self.state = GroupState::Joined;

        let total = self.tasks.len();
        let mut slots: Vec<Option<T>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);
        let mut received = 0usize;
        let mut failure: Option<TaskError> = None;

        while received < total {
            // The group holds a sender for its whole lifetime, so the
            // channel cannot close here.
            let Some(done) = self.rx.recv().await else { break };
            received += 1;
            match done.result {
                Ok(value) => slots[done.index] = Some(value),
                Err(err) => {
                    // First failure wins; later ones are discarded in drain.
                    failure = Some(err);
                    break;
                }
            }
        }

        let outcome = match failure {
            Some(err) => {
                self.cancel.cancel();
                self.bus.publish(Event::new(EventKind::CancelRequested));
                self.drain(total - received).await;
                Outcome::Failed(err)
            }
            None => Outcome::AllSucceeded(slots.into_iter().flatten().collect()),
        };

        let joined = match &outcome {
            Outcome::AllSucceeded(_) => {
                Event::new(EventKind::GroupJoined).with_reason("all_succeeded")
            }
            Outcome::Failed(err) => Event::new(EventKind::GroupJoined).with_reason(err.to_string()),
        };
        self.bus.publish(joined);
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Waits for `remaining` outstanding forks to acknowledge
    /// cancellation, bounded by the grace period. Laggards are aborted.
    async fn drain(&mut self, mut remaining: usize) {
        if remaining == 0 {
            return;
        }
        let deadline = time::Instant::now() + self.cfg.grace;
        while remaining > 0 {
            match time::timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(_late)) => remaining -= 1,
                Ok(None) => break,
                Err(_elapsed) => {
                    for (index, handle) in self.tasks.iter().enumerate() {
                        if !handle.is_finished() {
                            self.bus.publish(
                                Event::new(EventKind::CancelLagged)
                                    .with_index(index)
                                    .with_grace(self.cfg.grace),
                            );
                            handle.abort();
                        }
                    }
                    break;
                }
            }
        }
    }

    /// The group's terminal outcome.
    ///
    /// Idempotent: repeated calls after one `join` return the same value.
    ///
    /// ## Errors
    /// [`GroupError::NotJoined`] before `join` has completed.
    pub fn outcome(&self) -> Result<&Outcome<T>, GroupError> {
        self.outcome.as_ref().ok_or(GroupError::NotJoined)
    }

    /// Transfers ownership of the outcome to the caller.
    ///
    /// ## Errors
    /// [`GroupError::NotJoined`] before `join` has completed.
    pub fn into_outcome(mut self) -> Result<Outcome<T>, GroupError> {
        self.outcome.take().ok_or(GroupError::NotJoined)
    }

    /// Releases the scope: cancels outstanding work, waits for every fork
    /// within [`GroupConfig::grace`], aborts laggards, and stops the
    /// subscriber listener.
    ///
    /// Cancellation is cooperative: a fork must observe its token at a
    /// safe point. Forks that keep running past the grace period are
    /// aborted at their next await point; fully non-cooperative CPU-bound
    /// work cannot be forced to stop and `close` reports it via
    /// [`GroupError::GraceExceeded`] (advisory — everything abortable was
    /// aborted).
    ///
    /// Dropping a group without calling `close` triggers a backstop that
    /// cancels the token and aborts all forks without waiting.
    pub async fn close(mut self) -> Result<(), GroupError> {
        let grace = self.cfg.grace;
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            self.bus.publish(Event::new(EventKind::CancelRequested));
        }

        let handles = mem::take(&mut self.tasks);
        let aborts: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();
        let all_joined = time::timeout(grace, join_all(handles)).await.is_ok();

        let mut lagged = 0usize;
        if !all_joined {
            for (index, abort) in aborts.iter().enumerate() {
                if !abort.is_finished() {
                    lagged += 1;
                    self.bus.publish(
                        Event::new(EventKind::CancelLagged)
                            .with_index(index)
                            .with_grace(grace),
                    );
                    abort.abort();
                }
            }
        }

        self.state = GroupState::Closed;
        self.bus.publish(Event::new(EventKind::GroupClosed));

        if let Some(listener) = self.listener.take() {
            listener.stop.cancel();
            let _ = listener.handle.await;
        }

        if lagged > 0 {
            Err(GroupError::GraceExceeded { grace, lagged })
        } else {
            Ok(())
        }
    }
}

impl<T> Drop for TaskGroup<T> {
    /// Backstop for early returns and panics: no forked work may outlive
    /// the group. Cannot await, so forks are aborted rather than drained.
    fn drop(&mut self) {
        self.cancel.cancel();
        for handle in &self.tasks {
            handle.abort();
        }
        if let Some(listener) = self.listener.take() {
            listener.stop.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use async_trait::async_trait;

    #[tokio::test]
    async fn results_follow_fork_order_not_completion_order() {
        let mut group: TaskGroup<usize> = TaskGroup::open();
        for i in 0..3usize {
            // Later forks finish sooner.
            let delay = Duration::from_millis(60 - (i as u64) * 25);
            group
                .fork(move |_ctx| async move {
                    time::sleep(delay).await;
                    Ok(i)
                })
                .expect("group is open");
        }
        group.join().await.expect("first join");
        let results = group
            .into_outcome()
            .expect("joined")
            .into_results()
            .expect("all succeeded");
        assert_eq!(results, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn two_position_tasks_form_a_path() {
        let mut group: TaskGroup<(i32, i32)> = TaskGroup::open();
        let p1 = group.fork(|_ctx| async move { Ok((3, 4)) }).expect("fork p1");
        let p2 = group.fork(|_ctx| async move { Ok((6, 8)) }).expect("fork p2");
        assert_eq!(group.len(), 2);

        group.join().await.expect("first join");
        let outcome = group.outcome().expect("joined");
        assert_eq!(outcome.get(&p1), Some(&(3, 4)));
        assert_eq!(outcome.get(&p2), Some(&(6, 8)));
        assert_eq!(outcome.results(), Some(&[(3, 4), (6, 8)][..]));
        group.close().await.expect("clean close");
    }

    #[tokio::test]
    async fn first_failure_cancels_cooperative_tasks_early() {
        let started = Instant::now();
        let mut group: TaskGroup<(i32, i32)> = TaskGroup::open();
        group
            .fork(|ctx| async move {
                tokio::select! {
                    () = ctx.cancelled() => Err(TaskError::Canceled),
                    () = time::sleep(Duration::from_secs(30)) => Ok((3, 4)),
                }
            })
            .expect("fork slow");
        group
            .fork(|_ctx| async move {
                time::sleep(Duration::from_millis(20)).await;
                Err(TaskError::fail("Expected error"))
            })
            .expect("fork failing");

        group.join().await.expect("first join");
        // Must not have waited the slow task's natural 30s.
        assert!(started.elapsed() < Duration::from_secs(5));

        let outcome = group.outcome().expect("joined");
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.error().map(TaskError::to_string).as_deref(),
            Some("Expected error")
        );
        group.close().await.expect("clean close");
    }

    #[tokio::test]
    async fn fork_after_join_fails_fast() {
        let mut group: TaskGroup<u8> = TaskGroup::open();
        group.fork(|_ctx| async move { Ok(1) }).expect("fork while open");
        group.join().await.expect("first join");

        let err = group
            .fork(|_ctx| async move { Ok(2) })
            .expect_err("fork after join must fail");
        assert!(matches!(err, GroupError::NotOpen { state: GroupState::Joined }));
    }

    #[tokio::test]
    async fn join_twice_fails_fast() {
        let mut group: TaskGroup<u8> = TaskGroup::open();
        group.fork(|_ctx| async move { Ok(1) }).expect("fork while open");
        group.join().await.expect("first join");

        let err = group.join().await.expect_err("second join must fail");
        assert!(matches!(err, GroupError::AlreadyJoined { state: GroupState::Joined }));
    }

    #[tokio::test]
    async fn outcome_before_join_fails_fast() {
        let group: TaskGroup<u8> = TaskGroup::open();
        assert!(matches!(group.outcome(), Err(GroupError::NotJoined)));
    }

    #[tokio::test]
    async fn outcome_is_idempotent() {
        let mut group: TaskGroup<u8> = TaskGroup::open();
        group.fork(|_ctx| async move { Ok(7) }).expect("fork while open");
        group.join().await.expect("first join");

        let first = format!("{:?}", group.outcome().expect("joined"));
        let second = format!("{:?}", group.outcome().expect("joined"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn expected_error_scenario() {
        let mut group: TaskGroup<(i32, i32)> = TaskGroup::open();
        group.fork(|_ctx| async move { Ok((3, 4)) }).expect("fork ok task");
        group
            .fork(|_ctx| async move { Err(TaskError::fail("Expected error")) })
            .expect("fork failing task");

        group.join().await.expect("first join");
        let outcome = group.into_outcome().expect("joined");
        match outcome.into_results() {
            Err(TaskError::Fail { error }) => assert_eq!(error, "Expected error"),
            other => panic!("expected the task's own error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_after_failure_is_bounded_by_grace() {
        let started = Instant::now();
        let mut cfg = GroupConfig::default();
        cfg.grace = Duration::from_millis(100);

        let mut group: TaskGroup<()> = GroupBuilder::new().config(cfg).open();
        group
            .fork(|_ctx| async move {
                // Ignores its token entirely.
                time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .expect("fork stuck task");
        group
            .fork(|_ctx| async move { Err(TaskError::fail("boom")) })
            .expect("fork failing task");

        group.join().await.expect("first join");
        assert_eq!(
            group.outcome().expect("joined").error().map(TaskError::as_label),
            Some("task_failed")
        );

        // Join already aborted the laggard; close finds nothing left.
        group.close().await.expect("laggard was aborted during join");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn close_reports_grace_exceeded_for_stuck_open_group() {
        let mut cfg = GroupConfig::default();
        cfg.grace = Duration::from_millis(50);

        let mut group: TaskGroup<()> = GroupBuilder::new().config(cfg).open();
        group
            .fork(|_ctx| async move {
                time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .expect("fork stuck task");

        let err = group.close().await.expect_err("stuck task exceeds grace");
        assert!(matches!(err, GroupError::GraceExceeded { lagged: 1, .. }));
    }

    #[tokio::test]
    async fn panicking_task_fails_the_group() {
        let mut group: TaskGroup<u8> = TaskGroup::open();
        group
            .fork(|_ctx| async move {
                if true {
                    panic!("kaboom");
                }
                Ok(0)
            })
            .expect("fork panicking task");

        group.join().await.expect("first join");
        match group.outcome().expect("joined").error() {
            Some(TaskError::Panicked { info }) => assert!(info.contains("kaboom")),
            other => panic!("expected panic failure, got {other:?}"),
        }
    }

    struct TraceToken(&'static str);

    #[tokio::test]
    async fn context_value_is_visible_unchanged() {
        let mut group: TaskGroup<String> = GroupBuilder::new()
            .with_context(TraceToken("txn-1"))
            .open();
        group
            .fork(|ctx| async move {
                let token = ctx.value::<TraceToken>().map(|t| t.0).unwrap_or("missing");
                Ok(token.to_string())
            })
            .expect("fork while open");

        group.join().await.expect("first join");
        assert_eq!(
            group.outcome().expect("joined").results(),
            Some(&["txn-1".to_string()][..])
        );
    }

    #[tokio::test]
    async fn cancelled_parent_prevents_work_from_starting() {
        let parent = CancellationToken::new();
        parent.cancel();

        let ran = Arc::new(AtomicBool::new(false));
        let mut group: TaskGroup<()> = GroupBuilder::new().child_of(&parent).open();
        let ran_flag = ran.clone();
        group
            .fork(move |_ctx| async move {
                ran_flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .expect("fork while open");

        group.join().await.expect("first join");
        assert!(matches!(
            group.outcome().expect("joined").error(),
            Some(TaskError::Canceled)
        ));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn abandoned_join_fails_fast_instead_of_hanging() {
        let mut group: TaskGroup<()> = TaskGroup::open();
        group
            .fork(|ctx| async move {
                ctx.cancelled().await;
                Err(TaskError::Canceled)
            })
            .expect("fork while open");

        // Wrapping join in a timeout drops the join future midway; the
        // supported way to put a deadline on a group is child_of.
        let timed_out = time::timeout(Duration::from_millis(20), group.join()).await;
        assert!(timed_out.is_err());

        // The group rejects further use rather than hanging.
        assert_eq!(group.state(), GroupState::Joined);
        assert!(matches!(group.outcome(), Err(GroupError::NotJoined)));
        let err = group.join().await.expect_err("join cannot be resumed");
        assert!(matches!(err, GroupError::AlreadyJoined { state: GroupState::Joined }));

        // close still reclaims the cooperative fork.
        group.close().await.expect("clean close");
    }

    #[tokio::test]
    async fn failure_events_are_published() {
        let mut group: TaskGroup<u8> = TaskGroup::open();
        let mut events = group.events();
        group
            .fork(|_ctx| async move { Err(TaskError::fail("boom")) })
            .expect("fork while open");
        group.join().await.expect("first join");

        let mut kinds = Vec::new();
        while let Ok(ev) = events.try_recv() {
            kinds.push(ev.kind);
        }
        assert!(kinds.contains(&EventKind::TaskForked));
        assert!(kinds.contains(&EventKind::TaskFailed));
        assert!(kinds.contains(&EventKind::CancelRequested));
        assert!(kinds.contains(&EventKind::GroupJoined));
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Counting {
        async fn on_event(&self, _ev: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn subscribers_observe_the_whole_lifecycle() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut group: TaskGroup<u8> = GroupBuilder::new()
            .with_subscriber(Arc::new(Counting(seen.clone())))
            .open();
        group.fork(|_ctx| async move { Ok(1) }).expect("fork while open");
        group.join().await.expect("first join");
        group.close().await.expect("clean close");

        // At least TaskForked, TaskCompleted, GroupJoined, GroupClosed.
        assert!(seen.load(Ordering::SeqCst) >= 4);
    }
}
