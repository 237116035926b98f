//! # Group lifecycle events.
//!
//! This module provides the observability layer of the group:
//! - [`Event`] / [`EventKind`] - what happened and when
//! - [`Bus`] - broadcast channel carrying events to subscribers

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
