//! Error types used by the task group and by forked tasks.
//!
//! This module defines two main error enums:
//!
//! - [`GroupError`] — errors raised by the group machinery itself
//!   (lifecycle misuse, grace-period overrun on close).
//! - [`TaskError`] — errors raised by individual forked tasks.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::scope::GroupState;

/// # Errors produced by the group machinery.
///
/// Lifecycle misuse (forking after join, reading the outcome before join)
/// is a programmer error and fails fast with a typed variant instead of
/// being silently ignored. [`GroupError::GraceExceeded`] is advisory: it
/// reports that some tasks did not acknowledge cancellation within the
/// grace period and had to be aborted.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum GroupError {
    /// `fork` was called after the group left the `Open` state.
    #[error("cannot fork: group is {state}, forking requires Open")]
    NotOpen {
        /// The state the group was in when `fork` was called.
        state: GroupState,
    },

    /// `join` was called more than once, or after `close`.
    #[error("cannot join: group is already {state}")]
    AlreadyJoined {
        /// The state the group was in when `join` was called.
        state: GroupState,
    },

    /// The outcome was requested before `join` completed.
    #[error("outcome is not available before join")]
    NotJoined,

    /// Close grace period was exceeded; lagging tasks were aborted.
    #[error("close grace {grace:?} exceeded; aborted {lagged} lagging task(s)")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Number of tasks that did not stop in time and were aborted.
        lagged: usize,
    },
}

impl GroupError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskgroup::GroupError;
    ///
    /// assert_eq!(GroupError::NotJoined.as_label(), "group_not_joined");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GroupError::NotOpen { .. } => "group_not_open",
            GroupError::AlreadyJoined { .. } => "group_already_joined",
            GroupError::NotJoined => "group_not_joined",
            GroupError::GraceExceeded { .. } => "group_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GroupError::NotOpen { state } => format!("fork rejected in state {state}"),
            GroupError::AlreadyJoined { state } => format!("join rejected in state {state}"),
            GroupError::NotJoined => "outcome requested before join".to_string(),
            GroupError::GraceExceeded { grace, lagged } => {
                format!("grace exceeded after {grace:?}; aborted tasks={lagged}")
            }
        }
    }

    /// Indicates whether the error is a lifecycle-misuse error
    /// (as opposed to the advisory [`GroupError::GraceExceeded`]).
    pub fn is_misuse(&self) -> bool {
        !matches!(self, GroupError::GraceExceeded { .. })
    }
}

/// # Errors produced by forked tasks.
///
/// A task terminates with exactly one of these when it does not succeed.
/// The group records the **first** failure it observes and propagates it
/// verbatim as the failure cause of the whole group.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed with an application error.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task observed cancellation and stopped cooperatively, or its token
    /// was already cancelled before the work started.
    #[error("task cancelled")]
    Canceled,

    /// Task panicked; the panic payload (if printable) is captured.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Convenience constructor for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use taskgroup::TaskError;
    ///
    /// let err = TaskError::fail("Expected error");
    /// assert_eq!(err.to_string(), "Expected error");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail { error: error.into() }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "task cancelled".to_string(),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// `true` if the task stopped because of cancellation rather than its
    /// own failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_error_labels_are_stable() {
        let err = GroupError::NotOpen { state: GroupState::Joined };
        assert_eq!(err.as_label(), "group_not_open");
        assert!(err.is_misuse());

        let err = GroupError::GraceExceeded { grace: Duration::from_secs(1), lagged: 2 };
        assert_eq!(err.as_label(), "group_grace_exceeded");
        assert!(!err.is_misuse());
    }

    #[test]
    fn task_error_preserves_message_verbatim() {
        let err = TaskError::fail("Expected error");
        assert_eq!(err.to_string(), "Expected error");
        assert_eq!(err.as_label(), "task_failed");
        assert!(!err.is_canceled());
    }

    #[test]
    fn canceled_is_marked_as_such() {
        assert!(TaskError::Canceled.is_canceled());
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    }
}
