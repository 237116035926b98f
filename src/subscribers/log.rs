//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [forked] index=0
//! [completed] index=0
//! [failed] index=1 err="Expected error"
//! [cancel-requested]
//! [cancelled] index=2
//! [cancel-lagged] index=2 grace_ms=5000
//! [joined] reason="Expected error"
//! [closed]
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskForked => {
                println!("[forked] index={:?}", e.index);
            }
            EventKind::TaskCompleted => {
                println!("[completed] index={:?}", e.index);
            }
            EventKind::TaskCancelled => {
                println!("[cancelled] index={:?}", e.index);
            }
            EventKind::TaskFailed => {
                println!("[failed] index={:?} err={:?}", e.index, e.reason);
            }
            EventKind::CancelRequested => {
                println!("[cancel-requested]");
            }
            EventKind::CancelLagged => {
                println!("[cancel-lagged] index={:?} grace_ms={:?}", e.index, e.grace_ms);
            }
            EventKind::GroupJoined => {
                println!("[joined] reason={:?}", e.reason);
            }
            EventKind::GroupClosed => {
                println!("[closed]");
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] {:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] info={}",
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
