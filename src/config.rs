//! # Group configuration.
//!
//! [`GroupConfig`] defines the group's runtime behavior: how long to wait
//! for cancelled tasks to acknowledge (grace period) and the capacity of
//! the event bus channel.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use taskgroup::GroupConfig;
//!
//! let mut cfg = GroupConfig::default();
//! cfg.grace = Duration::from_secs(2);
//! cfg.bus_capacity = 64;
//!
//! assert_eq!(cfg.bus_capacity, 64);
//! ```

use std::time::Duration;

/// Configuration for a [`TaskGroup`](crate::TaskGroup).
///
/// Controls the cancellation grace period and the event bus capacity.
#[derive(Clone, Debug)]
pub struct GroupConfig {
    /// Maximum time to wait for cancelled tasks to stop before aborting them.
    pub grace: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for GroupConfig {
    /// Provides a default configuration:
    /// - `grace = 5s`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(5),
            bus_capacity: 256,
        }
    }
}
