//! Packet batch model
//!
//! Wire shape of a `POST /check` body. Field names are the capture
//! pipeline's wire names, hence the non-snake-case serde renames. A batch
//! is ephemeral: built from the request, validated, dispatched, dropped.

use serde::{Deserialize, Serialize};

/// One observed packet flow. No identity beyond its position in a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PacketRecord {
    #[serde(rename = "source_MAC")]
    pub source_mac: String,
    #[serde(rename = "dest_MAC")]
    pub dest_mac: String,
    #[serde(rename = "source_IP")]
    pub source_ip: String,
    #[serde(rename = "dest_IP")]
    pub dest_ip: String,
    pub source_port: u16,
    pub dest_port: u16,
}

/// An ordered batch of packet flows, always wrapped in the `packets` field.
///
/// An empty `packets` array is structurally valid; dispatching it is a
/// no-op for the analysis pipeline but still counts as an accepted batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PacketBatch {
    pub packets: Vec<PacketRecord>,
}

impl PacketBatch {
    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}
