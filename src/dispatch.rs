//! Verdict dispatcher
//!
//! Hands a validated batch to the downstream analysis pipeline: one scoped
//! unit of work per batch (connect, one publish, disconnect). Teardown runs
//! whether or not the publish succeeded. No automatic retry, and no
//! idempotency at this layer; calling twice publishes twice.

use std::sync::Arc;
use tracing::{info, warn};

use crate::bus::BusProvider;
use crate::error::{GatewayError, GatewayResult};
use crate::models::PacketBatch;

pub struct VerdictDispatcher {
    bus: Arc<dyn BusProvider>,
    topic: String,
    routing_key: String,
}

impl VerdictDispatcher {
    pub fn new(bus: Arc<dyn BusProvider>, topic: &str, routing_key: &str) -> Self {
        Self {
            bus,
            topic: topic.to_string(),
            routing_key: routing_key.to_string(),
        }
    }

    /// Publish one validated batch to the analysis topic.
    ///
    /// Returns the record count for reporting to the submitter. Does not
    /// wait for downstream processing; the transport's publish boundary is
    /// as far as this call sees.
    pub async fn dispatch(&self, batch: &PacketBatch) -> GatewayResult<usize> {
        let payload = serde_json::to_vec(batch)
            .map_err(|e| GatewayError::DispatchFailed(format!("serialize batch: {e}")))?;

        let mut channel = self
            .bus
            .connect()
            .await
            .map_err(|e| GatewayError::DispatchFailed(e.to_string()))?;

        let published = channel
            .publish(&self.topic, &self.routing_key, payload)
            .await;

        // Release the connection on both outcomes before reporting
        if let Err(e) = channel.disconnect().await {
            warn!(error = %e, "bus disconnect failed after publish");
        }

        published.map_err(|e| GatewayError::DispatchFailed(e.to_string()))?;

        info!(
            topic = %self.topic,
            routing_key = %self.routing_key,
            packets = batch.len(),
            "batch dispatched"
        );
        Ok(batch.len())
    }
}
