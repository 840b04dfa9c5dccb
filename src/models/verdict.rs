//! Verdict model
//!
//! Classification verdicts are produced and persisted by the downstream
//! analysis pipeline; this gateway only reads them back out for pollers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Classification status of an IP address.
///
/// AMBER is reserved for the downstream pipeline (verdicts awaiting human
/// review); the gateway itself only ever emits GREEN or RED in a
/// `CheckResponse`, but will pass AMBER rules through from the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    #[serde(rename = "GREEN")]
    Green,
    #[serde(rename = "RED")]
    Red,
    #[serde(rename = "AMBER")]
    Amber,
}

impl Verdict {
    /// Wire/storage name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Green => "GREEN",
            Verdict::Red => "RED",
            Verdict::Amber => "AMBER",
        }
    }
}

/// One persisted classification rule, as returned to pollers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerdictRecord {
    pub ip: String,
    pub status: Verdict,
    /// Moment the verdict was persisted. Serialized as RFC 3339 UTC, so
    /// lexical order equals chronological order.
    pub timestamp: DateTime<Utc>,
}

/// Row shape in the verdict store: the domain fields plus the store's own
/// row id. The id never leaves the gateway; `into_record` strips it.
#[derive(Debug, Clone, FromRow)]
pub struct StoredVerdict {
    pub id: Uuid,
    pub ip: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredVerdict {
    /// Convert to the wire record, dropping the internal id.
    ///
    /// A status value outside the enumeration means the stored document is
    /// malformed; the caller reports it rather than guessing.
    pub fn into_record(self) -> Result<VerdictRecord, String> {
        let status = match self.status.as_str() {
            "GREEN" => Verdict::Green,
            "RED" => Verdict::Red,
            "AMBER" => Verdict::Amber,
            other => return Err(format!("unknown verdict status '{other}' for ip {}", self.ip)),
        };
        Ok(VerdictRecord {
            ip: self.ip,
            status,
            timestamp: self.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&Verdict::Green).unwrap(), "\"GREEN\"");
        assert_eq!(serde_json::to_string(&Verdict::Amber).unwrap(), "\"AMBER\"");
        let v: Verdict = serde_json::from_str("\"RED\"").unwrap();
        assert_eq!(v, Verdict::Red);
    }

    #[test]
    fn test_into_record_strips_id() {
        let stored = StoredVerdict {
            id: Uuid::new_v4(),
            ip: "234.234.234.234".to_string(),
            status: "RED".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };

        let record = stored.into_record().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["ip"], "234.234.234.234");
        assert_eq!(json["status"], "RED");
    }

    #[test]
    fn test_into_record_rejects_unknown_status() {
        let stored = StoredVerdict {
            id: Uuid::new_v4(),
            ip: "1.2.3.4".to_string(),
            status: "PURPLE".to_string(),
            timestamp: Utc::now(),
        };
        assert!(stored.into_record().is_err());
    }

    #[test]
    fn test_timestamp_serializes_rfc3339_utc() {
        let record = VerdictRecord {
            ip: "123.123.123.123".to_string(),
            status: Verdict::Green,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T09:30:00Z");
    }
}
