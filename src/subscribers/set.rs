//! # Fan-out delivery to subscribers.
//!
//! [`SubscriberSet`] owns one bounded queue and one worker task per
//! subscriber, so a slow or panicking subscriber never stalls the group
//! or its sibling subscribers.
//!
//! ## Rules
//! - **Isolation**: each subscriber has a dedicated queue and worker.
//! - **Overflow**: `try_send` only; a full queue drops the event and
//!   reports `SubscriberOverflow` on the bus.
//! - **Panic safety**: handler panics are caught via `catch_unwind` and
//!   reported as `SubscriberPanicked`; the worker keeps running.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Each worker drains its queue until the sender side is dropped
    /// (see [`SubscriberSet::close`]). The minimum queue capacity is 1.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_message(panic_err.as_ref());
                        bus_for_worker.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self { channels, workers }
    }

    /// `true` if the set holds no subscribers.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Delivers one event to every subscriber queue without awaiting.
    ///
    /// Events that do not fit are dropped; the drop is reported on `bus`
    /// as `SubscriberOverflow` (unless the event itself is an overflow
    /// report, to avoid feedback loops).
    pub fn emit(&self, ev: &Arc<Event>, bus: &Bus) {
        for ch in &self.channels {
            match ch.sender.try_send(Arc::clone(ev)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    if !ev.is_subscriber_overflow() {
                        bus.publish(Event::subscriber_overflow(ch.name, "full"));
                    }
                }
                Err(TrySendError::Closed(_)) => {
                    if !ev.is_subscriber_overflow() {
                        bus.publish(Event::subscriber_overflow(ch.name, "closed"));
                    }
                }
            }
        }
    }

    /// Closes all queues and waits for workers to drain and exit.
    pub async fn close(self) {
        drop(self.channels);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _ev: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[tokio::test]
    async fn events_reach_every_subscriber() {
        let bus = Bus::new(16);
        let seen = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(vec![Arc::new(Counter(seen.clone()))], bus.clone());

        for i in 0..3 {
            let ev = Arc::new(Event::new(EventKind::TaskForked).with_index(i));
            set.emit(&ev, &bus);
        }
        set.close().await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _ev: &Event) {
            panic!("boom in subscriber");
        }
        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    struct Stuck;

    #[async_trait]
    impl Subscribe for Stuck {
        async fn on_event(&self, _ev: &Event) {
            futures::future::pending::<()>().await;
        }
        fn name(&self) -> &'static str {
            "stuck"
        }
        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn full_queue_drops_event_and_reports_overflow() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Stuck)], bus.clone());

        // No await between emits: the worker cannot drain the capacity-1
        // queue, so the second event must be dropped.
        let first = Arc::new(Event::new(EventKind::TaskForked).with_index(0));
        let second = Arc::new(Event::new(EventKind::TaskForked).with_index(1));
        set.emit(&first, &bus);
        set.emit(&second, &bus);

        let reported = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("overflow report published")
            .expect("bus open");
        assert!(reported.is_subscriber_overflow());
        let reason = reported.reason.as_deref().unwrap_or("");
        assert!(reason.contains("stuck"));
        assert!(reason.contains("full"));

        // The worker is parked in on_event; drop the set instead of
        // closing so the test does not wait on it.
        drop(set);
    }

    #[tokio::test]
    async fn subscriber_panic_is_isolated_and_reported() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Panicker)], bus.clone());

        let ev = Arc::new(Event::new(EventKind::TaskCompleted));
        set.emit(&ev, &bus);
        set.close().await;

        let reported = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("panic report published")
            .expect("bus open");
        assert!(reported.is_subscriber_panic());
        assert!(reported.reason.as_deref().unwrap_or("").contains("boom"));
    }
}
