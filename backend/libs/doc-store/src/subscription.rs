use tokio::sync::broadcast;

use crate::document::DocKey;

/// A committed write to one document. Carries no payload: consumers
/// re-fetch or re-derive, they never treat an event as a trusted diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: DocKey,
}

/// Fan-out bus for change events, one per store.
///
/// Built on a broadcast channel: slow consumers can lag and miss
/// events, which they must treat as "re-derive everything" rather than
/// assuming the stream was complete.
#[derive(Clone)]
pub struct SubscriptionRouter {
    tx: broadcast::Sender<ChangeEvent>,
}

impl SubscriptionRouter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish a change; a send with no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }
}
