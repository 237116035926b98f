//! # Fork handles.
//!
//! [`fork`](crate::TaskGroup::fork) returns a [`TaskHandle`] identifying
//! the forked task by its fork-order index. After a successful join the
//! handle addresses that task's slot in
//! [`Outcome::AllSucceeded`](crate::Outcome) via
//! [`Outcome::get`](crate::Outcome::get).

/// Handle to one forked task, valid for the group that issued it.
///
/// Holds the fork-order index; results are always returned in fork order,
/// independent of completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    index: usize,
}

impl TaskHandle {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    /// Fork-order index of the task (0-based).
    pub fn index(&self) -> usize {
        self.index
    }
}
