use tokio::sync::broadcast;

use crate::NormalizedEvent;

/// Default number of events buffered per subscriber before it lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Outbound port for normalized events.
///
/// Producers never block: a send with no subscribers is dropped, and a
/// subscriber that falls more than the capacity behind loses the oldest
/// events. Nothing is retried or replayed.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: broadcast::Sender<NormalizedEvent>,
}

impl EventChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<NormalizedEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: NormalizedEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No subscribers, event dropped");
        }
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = NormalizedEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
