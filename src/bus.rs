//! Message bus seam
//!
//! The gateway needs exactly one unit of work from its bus: connect,
//! publish one message to a topic/routing key, disconnect. Transport
//! internals (delivery guarantees, timeouts, reconnects) belong to the
//! implementation behind these traits, not to the core.
//!
//! [`InMemoryBus`] is a `tokio::sync::broadcast` implementation suitable
//! for single-node operation and tests; a broker-backed producer plugs in
//! behind the same traits.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered messages per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus unreachable: {0}")]
    Unreachable(String),

    #[error("publish rejected: {0}")]
    PublishRejected(String),
}

/// One message as it enters the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub routing_key: String,
    pub payload: Vec<u8>,
}

/// Hands out single-use channels to the bus.
#[async_trait]
pub trait BusProvider: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn BusChannel>, BusError>;
}

/// A live connection to the bus. Used for one publish, then released.
#[async_trait]
pub trait BusChannel: Send {
    async fn publish(
        &mut self,
        topic: &str,
        routing_key: &str,
        payload: Vec<u8>,
    ) -> Result<(), BusError>;

    async fn disconnect(self: Box<Self>) -> Result<(), BusError>;
}

/// In-process bus over `tokio::sync::broadcast`.
///
/// Downstream consumers (and tests) attach via [`InMemoryBus::subscribe`].
pub struct InMemoryBus {
    sender: broadcast::Sender<BusMessage>,
    published: Arc<AtomicU64>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Attach a consumer to the bus.
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.sender.subscribe()
    }

    /// Total messages published since construction.
    pub fn messages_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BusProvider for InMemoryBus {
    async fn connect(&self) -> Result<Box<dyn BusChannel>, BusError> {
        Ok(Box::new(InMemoryChannel {
            sender: self.sender.clone(),
            published: self.published.clone(),
        }))
    }
}

struct InMemoryChannel {
    sender: broadcast::Sender<BusMessage>,
    published: Arc<AtomicU64>,
}

#[async_trait]
impl BusChannel for InMemoryChannel {
    async fn publish(
        &mut self,
        topic: &str,
        routing_key: &str,
        payload: Vec<u8>,
    ) -> Result<(), BusError> {
        let message = BusMessage {
            topic: topic.to_string(),
            routing_key: routing_key.to_string(),
            payload,
        };

        // A topic with no live subscribers still accepts the message,
        // matching broker semantics; broadcast reports it as an error.
        let receivers = self.sender.send(message).unwrap_or(0);
        self.published.fetch_add(1, Ordering::Relaxed);
        debug!(topic, routing_key, receivers, "message published");
        Ok(())
    }

    async fn disconnect(self: Box<Self>) -> Result<(), BusError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = InMemoryBus::new();
        let mut rx = bus.subscribe();

        let mut chan = bus.connect().await.unwrap();
        chan.publish("analyze_stream", "socbox.analyze", b"{}".to_vec())
            .await
            .unwrap();
        chan.disconnect().await.unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.topic, "analyze_stream");
        assert_eq!(msg.routing_key, "socbox.analyze");
        assert_eq!(msg.payload, b"{}".to_vec());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let bus = InMemoryBus::new();
        let mut chan = bus.connect().await.unwrap();
        chan.publish("analyze_stream", "socbox.analyze", vec![1]).await.unwrap();
        assert_eq!(bus.messages_published(), 1);
    }

    #[tokio::test]
    async fn test_published_counter_tracks_each_message() {
        let bus = InMemoryBus::new();
        for _ in 0..3 {
            let mut chan = bus.connect().await.unwrap();
            chan.publish("t", "k", vec![]).await.unwrap();
            chan.disconnect().await.unwrap();
        }
        assert_eq!(bus.messages_published(), 3);
    }
}
