//! Event fan-out
//!
//! A registry of listeners per event channel. Listeners are invoked in
//! registration order on the emitting task; removing a listener that is not
//! registered is a no-op. For async consumers, `watch` hands out a channel
//! receiving every emitted event.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::trace;

use crate::events::{EventDetails, EventKind, WebviewEvent};
use crate::id::ListenerId;

/// A registered event callback
pub type Listener = std::sync::Arc<dyn Fn(&WebviewEvent, &EventDetails) + Send + Sync>;

/// An owned copy of one emitted event, as delivered to watchers
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedEvent {
    pub kind: EventKind,
    pub event: WebviewEvent,
    pub details: EventDetails,
}

/// Per-channel listener registry with broadcast watchers
pub struct EventBus {
    /// Listeners per channel, in registration order
    channels: Mutex<HashMap<EventKind, Vec<(ListenerId, Listener)>>>,
    /// Watchers receiving every event regardless of channel
    watchers: Mutex<Vec<mpsc::UnboundedSender<EmittedEvent>>>,
    next_listener: AtomicU64,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            watchers: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Register a listener on a channel; returns its id for removal
    pub fn add_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&WebviewEvent, &EventDetails) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry(kind)
            .or_default()
            .push((id, std::sync::Arc::new(listener)));
        id
    }

    /// Unregister a listener. No-op when the id is not registered on `kind`.
    pub fn remove_listener(&self, kind: EventKind, id: ListenerId) {
        let mut channels = self.channels.lock().unwrap();
        if let Some(listeners) = channels.get_mut(&kind) {
            listeners.retain(|(lid, _)| *lid != id);
        }
    }

    /// How many listeners a channel currently has
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let channels = self.channels.lock().unwrap();
        channels.get(&kind).map_or(0, Vec::len)
    }

    /// Receive every emitted event over a channel
    ///
    /// The channel is unbounded; a receiver that stops polling only grows its
    /// own queue. Dropped receivers are pruned on the next emit.
    pub fn watch(&self) -> mpsc::UnboundedReceiver<EmittedEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers.lock().unwrap().push(tx);
        rx
    }

    /// Deliver an event to the channel's listeners and all watchers
    ///
    /// Listeners run synchronously in registration order, outside the
    /// registry lock, so a listener may add or remove listeners reentrantly.
    pub fn emit(&self, kind: EventKind, event: WebviewEvent, details: EventDetails) {
        trace!(?kind, webview = %event.id, "event emitted");

        let listeners: Vec<Listener> = {
            let channels = self.channels.lock().unwrap();
            channels
                .get(&kind)
                .map(|l| l.iter().map(|(_, f)| f.clone()).collect())
                .unwrap_or_default()
        };
        for listener in &listeners {
            listener(&event, &details);
        }

        let mut watchers = self.watchers.lock().unwrap();
        watchers.retain(|tx| {
            tx.send(EmittedEvent {
                kind,
                event: event.clone(),
                details: details.clone(),
            })
            .is_ok()
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
