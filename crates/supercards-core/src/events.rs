//! Bookmark notifications and the in-process event bus
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  BookmarkEvent                                                  │
//! │  ├── Changed: a card widget toggled its bookmark (full snapshot) │
//! │  └── Unfavourited: the favourites list removed a card (id only) │
//! │                                                                 │
//! │  EventBus                                                       │
//! │  ├── subscribe(handler) -> Subscription (unsubscribes on drop)  │
//! │  └── publish(event): runs every handler before returning        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery is synchronous. Publishers write storage first and broadcast
//! second, so a handler always observes the state the event describes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::types::{CardId, CardSnapshot};

/// Notifications exchanged between card widgets and the favourites list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkEvent {
    /// A card's bookmark state changed; carries the snapshot with the new value
    Changed(CardSnapshot),
    /// A card was removed from the favourites list
    Unfavourited {
        /// The removed card
        card_id: CardId,
    },
}

impl BookmarkEvent {
    /// Id of the card this event is about
    pub fn card_id(&self) -> &CardId {
        match self {
            BookmarkEvent::Changed(snapshot) => &snapshot.id,
            BookmarkEvent::Unfavourited { card_id } => card_id,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            BookmarkEvent::Changed(_) => "bookmark-changed",
            BookmarkEvent::Unfavourited { .. } => "unfavourited",
        }
    }
}

type Handler = Arc<dyn Fn(&BookmarkEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, Handler)>>,
}

/// Synchronous publish/subscribe channel for [`BookmarkEvent`]s
///
/// Clones share the same subscriber registry.
///
/// # Example
///
/// ```
/// use supercards_core::{BookmarkEvent, CardId, EventBus};
///
/// let bus = EventBus::new();
/// let _subscription = bus.subscribe(|event| {
///     println!("{} for {}", event.name(), event.card_id());
/// });
///
/// let delivered = bus.publish(&BookmarkEvent::Unfavourited {
///     card_id: CardId::from("m1"),
/// });
/// assert_eq!(delivered, 1);
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&BookmarkEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.handlers.lock().push((id, Arc::new(handler)));
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every current subscriber, in subscription order.
    ///
    /// Handlers run after the registry lock is released, so they may publish,
    /// subscribe or unsubscribe themselves; such changes apply to the next
    /// publish. Returns the number of handlers invoked.
    pub fn publish(&self, event: &BookmarkEvent) -> usize {
        let handlers: Vec<Handler> = self
            .inner
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        tracing::debug!(
            event = event.name(),
            card_id = %event.card_id(),
            subscribers = handlers.len(),
            "Publishing bookmark event"
        );

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.lock().len()
    }
}

/// Handle for a registered handler; dropping it unsubscribes
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Unsubscribe now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.handlers.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn unfavourited(id: &str) -> BookmarkEvent {
        BookmarkEvent::Unfavourited {
            card_id: CardId::from(id),
        }
    }

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let subs: Vec<_> = (0..3)
            .map(|_| {
                let hits = hits.clone();
                bus.subscribe(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        assert_eq!(bus.publish(&unfavourited("m1")), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        drop(subs);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = EventBus::new();
        let sub = bus.subscribe(|_| {});
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&unfavourited("m1")), 0);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let bus = EventBus::new();
        let keep = bus.subscribe(|_| {});
        let gone = bus.subscribe(|_| {});

        gone.unsubscribe();
        assert_eq!(bus.subscriber_count(), 1);
        assert!(keep.id() < u64::MAX);
    }

    #[test]
    fn test_delivery_order_is_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _a = {
            let seen = seen.clone();
            bus.subscribe(move |_| seen.lock().push("a"))
        };
        let _b = {
            let seen = seen.clone();
            bus.subscribe(move |_| seen.lock().push("b"))
        };

        bus.publish(&unfavourited("m1"));
        assert_eq!(*seen.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_handler_may_publish_again() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _relay = {
            let bus = bus.clone();
            bus.clone().subscribe(move |event| {
                if event.card_id().as_str() == "m1" {
                    bus.publish(&unfavourited("m2"));
                }
            })
        };
        let _log = {
            let seen = seen.clone();
            bus.subscribe(move |event| seen.lock().push(event.card_id().clone()))
        };

        bus.publish(&unfavourited("m1"));
        assert_eq!(
            *seen.lock(),
            vec![CardId::from("m2"), CardId::from("m1")]
        );
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let sub = {
            let bus = EventBus::new();
            bus.subscribe(|_| {})
        };
        // bus is gone; dropping the handle must not panic
        drop(sub);
    }
}
