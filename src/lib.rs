//! # taskgroup
//!
//! **taskgroup** is a structured fork-join scope for Tokio.
//!
//! A [`TaskGroup`] forks a fixed set of subtasks, waits until either all of
//! them complete successfully or one fails, and returns either all results
//! (in fork order) or the first failure — with guaranteed cleanup of
//! unfinished work. It is a single-process, single-call-scope primitive:
//! no pooling, no retries, no distribution.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     fork(work #0)      fork(work #1)      fork(work #N-1)
//!          │                  │                  │
//!          ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  TaskGroup (fork-join scope)                                  │
//! │  - CancellationToken (group token; child token per fork)      │
//! │  - completion channel (one report per fork)                   │
//! │  - Bus (broadcast lifecycle events)                           │
//! │  - SubscriberSet (fans out to user subscribers)               │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!   tokio::spawn       tokio::spawn       tokio::spawn
//!   (one per fork, runs in parallel, reports exactly once)
//! ```
//!
//! ### Lifecycle
//! ```text
//! TaskGroup::open() ──► fork(work)* ──► join().await ──► outcome() ──► close().await
//!
//! join():
//!   ├─► recv completion reports
//!   │     ├─ all Ok           ─► Outcome::AllSucceeded (fork order)
//!   │     └─ first Err        ─► cancel group token
//!   │                            drain within grace (abort laggards)
//!   │                            Outcome::Failed (first error, verbatim)
//!   └─► every fork is terminal before join() returns
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits               |
//! |-------------------|--------------------------------------------------------------|----------------------------------|
//! | **Scope**         | Fork-join lifecycle with first-failure short-circuit.        | [`TaskGroup`], [`GroupBuilder`]  |
//! | **Outcome**       | All results in fork order, or the first failure.             | [`Outcome`], [`TaskHandle`]      |
//! | **Cancellation**  | Cooperative tokens, grace-bounded cleanup, abort fallback.   | [`TaskContext`]                  |
//! | **Errors**        | Typed errors for tasks and group misuse.                     | [`TaskError`], [`GroupError`]    |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom).       | [`Subscribe`], [`SubscriberSet`] |
//! | **Configuration** | Grace period and event bus capacity.                         | [`GroupConfig`]                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use taskgroup::{TaskError, TaskGroup};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut group: TaskGroup<(i32, i32)> = TaskGroup::open();
//!
//!     group.fork(|ctx| async move {
//!         if ctx.is_cancelled() {
//!             return Err(TaskError::Canceled);
//!         }
//!         Ok((3, 4))
//!     })?;
//!     group.fork(|_ctx| async move { Ok((6, 8)) })?;
//!
//!     group.join().await?;
//!     let results = group.into_outcome()?.into_results()?;
//!     assert_eq!(results, vec![(3, 4), (6, 8)]);
//!     Ok(())
//! }
//! ```
//!
//! On failure the group propagates the failing task's own error, not a
//! wrapper:
//! ```rust
//! use taskgroup::{Outcome, TaskError, TaskGroup};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut group: TaskGroup<(i32, i32)> = TaskGroup::open();
//!     group.fork(|_ctx| async move { Ok((3, 4)) })?;
//!     group.fork(|_ctx| async move { Err(TaskError::fail("Expected error")) })?;
//!
//!     group.join().await?;
//!     match group.into_outcome()? {
//!         Outcome::Failed(err) => assert_eq!(err.to_string(), "Expected error"),
//!         Outcome::AllSucceeded(_) => unreachable!(),
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod scope;
mod subscribers;

// ---- Public re-exports ----

pub use config::GroupConfig;
pub use error::{GroupError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use scope::{GroupBuilder, GroupState, Outcome, TaskContext, TaskGroup, TaskHandle};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
