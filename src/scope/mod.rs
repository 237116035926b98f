//! # Fork-join scope.
//!
//! The core of the crate:
//! - [`TaskGroup`] - the fork-join scope (open → fork* → join → outcome → close)
//! - [`GroupBuilder`] - configuration, subscribers, context, parent token
//! - [`TaskContext`] - cancellation token + opaque context value seen by tasks
//! - [`TaskHandle`] - fork-order handle addressing a slot in the outcome
//! - [`Outcome`] - all results in fork order, or the first failure

mod context;
mod group;
mod handle;
mod outcome;
mod runner;

pub use context::TaskContext;
pub use group::{GroupBuilder, GroupState, TaskGroup};
pub use handle::TaskHandle;
pub use outcome::Outcome;
