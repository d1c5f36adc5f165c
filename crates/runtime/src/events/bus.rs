//! Topic-based event bus.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};

use super::types::{LedgerEvent, ProofEvent, TurnEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Shared-ledger changes (accepted and rejected transitions).
    Ledger,
    /// Proof generation lifecycle.
    Proof,
    /// Turn scheduling and view consumption.
    Turn,
}

/// Event wrapper that carries the topic and typed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Ledger(LedgerEvent),
    Proof(ProofEvent),
    Turn(TurnEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Ledger(_) => Topic::Ledger,
            Event::Proof(_) => Topic::Proof,
            Event::Turn(_) => Topic::Turn,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to specific topics and only receive events they care
/// about. Publishing is best-effort: no subscribers is normal, and a
/// contended lock skips the event rather than blocking the worker.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates an event bus with the given capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Ledger, broadcast::channel(capacity).0);
        channels.insert(Topic::Proof, broadcast::channel(capacity).0);
        channels.insert(Topic::Turn, broadcast::channel(capacity).0);

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publishes an event to its corresponding topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!("no subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("event bus lock contended, dropping event for {:?}", topic);
            }
        }
    }

    /// Subscribes to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        let channels = self
            .channels
            .try_read()
            .expect("event channel map is never write-locked at subscribe time");
        channels
            .get(&topic)
            .expect("channels for all topics are created up front")
            .subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
