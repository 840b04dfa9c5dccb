//! Error handling
//!
//! Every failure in the triage core is one of these variants. Handlers
//! convert them into the `CheckResponse`/`UpdateResponse` envelopes at the
//! HTTP boundary; nothing leaves as an unstructured fault.

use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required input was absent entirely (no request body, no timestamp
    /// parameter). Distinct from a present-but-invalid input.
    #[error("required input missing")]
    InputMissing,

    /// The batch did not conform to the packet schema. Carries every
    /// violation found, not just the first.
    #[error("{}", .errors.join("\n"))]
    ValidationFailed { errors: Vec<String> },

    /// The timestamp parameter was present but not a parseable date.
    /// Never silently coerced to "all records" or "now".
    #[error("unparseable timestamp")]
    ParseFailed,

    /// The bus could not be reached or refused the publish. Surfaced to
    /// the caller as RED; never retried here.
    #[error("dispatch failed: {0}")]
    DispatchFailed(String),

    /// The verdict store could not be reached or returned malformed data.
    #[error("{0}")]
    QueryFailed(String),
}

impl GatewayError {
    /// Failure kind label, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InputMissing => "input_missing",
            GatewayError::ValidationFailed { .. } => "validation_failed",
            GatewayError::ParseFailed => "parse_failed",
            GatewayError::DispatchFailed(_) => "dispatch_failed",
            GatewayError::QueryFailed(_) => "query_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_join_multiline() {
        let err = GatewayError::ValidationFailed {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "a\nb");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(GatewayError::InputMissing.kind(), "input_missing");
        assert_eq!(GatewayError::ParseFailed.kind(), "parse_failed");
    }
}
