//! # Terminal result of a group.
//!
//! [`Outcome`] is all-or-nothing: either every forked task succeeded and
//! all results are available in fork order, or the first observed failure
//! is carried and every partial result is discarded.

use crate::error::TaskError;
use crate::scope::TaskHandle;

/// Terminal result of a joined [`TaskGroup`](crate::TaskGroup).
///
/// ## Rules
/// - `AllSucceeded` holds exactly one result per forked task, in fork order.
/// - `Failed` holds the first failure observed by the group; results of
///   tasks that succeeded before the failure are discarded.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Every forked task succeeded; results in fork order.
    AllSucceeded(Vec<T>),
    /// At least one task failed; this is the first failure observed.
    Failed(TaskError),
}

impl<T> Outcome<T> {
    /// `true` if every forked task succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::AllSucceeded(_))
    }

    /// Results in fork order, or `None` on failure.
    pub fn results(&self) -> Option<&[T]> {
        match self {
            Outcome::AllSucceeded(results) => Some(results),
            Outcome::Failed(_) => None,
        }
    }

    /// The result slot addressed by `handle`, or `None` on failure.
    pub fn get(&self, handle: &TaskHandle) -> Option<&T> {
        self.results().and_then(|r| r.get(handle.index()))
    }

    /// The failure cause, or `None` on success.
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            Outcome::AllSucceeded(_) => None,
            Outcome::Failed(err) => Some(err),
        }
    }

    /// Converts into `Result`, transferring ownership of the results.
    pub fn into_results(self) -> Result<Vec<T>, TaskError> {
        match self {
            Outcome::AllSucceeded(results) => Ok(results),
            Outcome::Failed(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_exposes_results_by_handle() {
        let outcome = Outcome::AllSucceeded(vec![(3, 4), (6, 8)]);
        assert!(outcome.is_success());
        assert_eq!(outcome.get(&TaskHandle::new(1)), Some(&(6, 8)));
        assert_eq!(outcome.results().map(|r| r.len()), Some(2));
        assert!(outcome.error().is_none());
    }

    #[test]
    fn failure_discards_results() {
        let outcome: Outcome<i32> = Outcome::Failed(TaskError::fail("Expected error"));
        assert!(!outcome.is_success());
        assert!(outcome.results().is_none());
        assert_eq!(outcome.error().map(TaskError::to_string).as_deref(), Some("Expected error"));
        assert!(outcome.into_results().is_err());
    }
}
