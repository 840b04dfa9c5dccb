//! Response envelopes
//!
//! The gateway answers every request with one of two fixed envelopes,
//! always HTTP 200. Callers use the `UpdateResponse` timestamp as the
//! watermark (lower bound) for their next poll.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::verdict::{Verdict, VerdictRecord};

/// Outcome of a `/check` submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: Verdict,
    pub message: String,
}

impl CheckResponse {
    /// Batch accepted and dispatched to the analysis pipeline.
    pub fn accepted(count: usize) -> Self {
        Self {
            status: Verdict::Green,
            message: format!("got {count} packets"),
        }
    }

    /// Batch rejected at validation or dispatch.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: Verdict::Red,
            message: message.into(),
        }
    }
}

/// Outcome of an `/update` poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Response-construction time, not the query's input bound.
    pub timestamp: String,
    pub rules: Vec<VerdictRecord>,
    pub message: String,
}

impl UpdateResponse {
    pub fn ok(rules: Vec<VerdictRecord>) -> Self {
        Self {
            timestamp: now_rfc3339(),
            rules,
            message: "ok".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            timestamp: now_rfc3339(),
            rules: Vec::new(),
            message: message.into(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_reports_count() {
        let resp = CheckResponse::accepted(2);
        assert_eq!(resp.status, Verdict::Green);
        assert_eq!(resp.message, "got 2 packets");
    }

    #[test]
    fn test_rejected_is_red() {
        let resp = CheckResponse::rejected("No data sent");
        assert_eq!(resp.status, Verdict::Red);
        assert_eq!(resp.message, "No data sent");
    }

    #[test]
    fn test_failed_update_has_watermark_and_empty_rules() {
        let resp = UpdateResponse::failed("Invalid date!");
        assert!(resp.rules.is_empty());
        assert_eq!(resp.message, "Invalid date!");
        // The watermark is always present, even on failure
        assert!(chrono::DateTime::parse_from_rfc3339(&resp.timestamp).is_ok());
    }
}
