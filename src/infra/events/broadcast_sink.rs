use tokio::sync::broadcast;
use tracing::debug;
use crate::domain::{models::domain_event::DomainEvent, ports::EventSink};

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for calendar views. Lagging receivers drop old events;
/// the publisher never waits.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastEventSink {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for BroadcastEventSink {
    fn publish(&self, event: DomainEvent) {
        // Err only means nobody is listening
        if self.sender.send(event).is_err() {
            debug!("No event subscribers");
        }
    }
}
