//! Widget event bus
//!
//! Thin broadcast bus for the events the mapping layer raises while a page
//! is alive. Widgets that need to react exactly once (the zoom clamp after
//! a viewport fit) take a `OnceSubscription`, which consumes itself on the
//! first matching event; there is no manual listener bookkeeping to forget.

use tokio::sync::broadcast;

/// Events raised by widgets during and after hydration
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The map canvas finished loading its style/tiles
    MapLoaded { widget: String },
    /// The map viewport bounds changed (fired after a fit)
    BoundsChanged { widget: String },
    /// The map zoom level changed
    ZoomChanged { widget: String, zoom: f64 },
}

/// Central event distribution for the widgets of one page
///
/// Backed by `tokio::sync::broadcast`: non-blocking emit, any number of
/// subscribers, automatic cleanup when receivers drop.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WidgetEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.tx.subscribe()
    }

    /// Single-invocation subscription
    ///
    /// The returned subscription resolves on the first event matching its
    /// predicate and is spent afterwards; dropping it unsubscribes.
    pub fn subscribe_once(&self) -> OnceSubscription {
        OnceSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the subscriber count; zero subscribers is not an error for
    /// widget events.
    pub fn emit(&self, event: WidgetEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        // A page hosts a handful of widgets; a small buffer is plenty.
        Self::new(64)
    }
}

/// A subscription that can observe at most one matching event
pub struct OnceSubscription {
    rx: broadcast::Receiver<WidgetEvent>,
}

impl OnceSubscription {
    /// Wait for the first event matching `pred`, then detach
    ///
    /// Returns `None` when the bus shuts down before a match arrives.
    pub async fn wait<F>(mut self, pred: F) -> Option<WidgetEvent>
    where
        F: Fn(&WidgetEvent) -> bool,
    {
        loop {
            match self.rx.recv().await {
                Ok(event) if pred(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
