//! # Event subscribers.
//!
//! Subscribers observe group lifecycle events without participating in the
//! fork-join machinery:
//! - [`Subscribe`] - trait for custom event handlers
//! - [`SubscriberSet`] - per-subscriber queues and worker tasks
//! - `LogWriter` - built-in printer (feature `logging`, demo/reference only)

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

pub(crate) use set::panic_message;

#[cfg(feature = "logging")]
pub use log::LogWriter;
