//! Batch validator
//!
//! Structural check of a `/check` body against the fixed packet schema.
//! `schemas/new_packet.schema.json` is the wire-level contract this module
//! encodes; the schema is fixed, so it lives here as code rather than being
//! re-evaluated from the JSON document on every request.
//!
//! All violations are collected before a batch is rejected. A batch is
//! accepted whole or not at all; there is no partial acceptance of records.

use serde_json::Value;

use crate::error::GatewayError;
use crate::models::PacketBatch;

const STRING_FIELDS: [&str; 4] = ["source_MAC", "dest_MAC", "source_IP", "dest_IP"];
const PORT_FIELDS: [&str; 2] = ["source_port", "dest_port"];
const MAX_PORT: u64 = 65535;

/// Validate a decoded JSON value against the packet batch schema.
///
/// Pure function of its input. On success the value is deserialized into
/// the static [`PacketBatch`] type; on failure every violation found is
/// returned, in document order.
pub fn validate(raw: &Value) -> Result<PacketBatch, GatewayError> {
    let mut errors = Vec::new();

    match raw {
        Value::Object(root) => match root.get("packets") {
            None => errors.push("'packets' is a required property".to_string()),
            Some(Value::Array(items)) => {
                for (idx, item) in items.iter().enumerate() {
                    check_record(idx, item, &mut errors);
                }
            }
            Some(other) => {
                errors.push(format!("packets: {} is not of type 'array'", type_name(other)));
            }
        },
        other => errors.push(format!("root: {} is not of type 'object'", type_name(other))),
    }

    if !errors.is_empty() {
        return Err(GatewayError::ValidationFailed { errors });
    }

    // The walk above guarantees this succeeds for conforming input; any
    // residual serde failure is still reported as a rejection, not a fault.
    serde_json::from_value(raw.clone()).map_err(|e| GatewayError::ValidationFailed {
        errors: vec![format!("packets: {e}")],
    })
}

fn check_record(idx: usize, item: &Value, errors: &mut Vec<String>) {
    let record = match item {
        Value::Object(map) => map,
        other => {
            errors.push(format!("packets[{idx}]: {} is not of type 'object'", type_name(other)));
            return;
        }
    };

    for field in STRING_FIELDS {
        match record.get(field) {
            None => errors.push(format!("packets[{idx}]: '{field}' is a required property")),
            Some(Value::String(_)) => {}
            Some(other) => errors.push(format!(
                "packets[{idx}].{field}: {} is not of type 'string'",
                type_name(other)
            )),
        }
    }

    for field in PORT_FIELDS {
        match record.get(field) {
            None => errors.push(format!("packets[{idx}]: '{field}' is a required property")),
            Some(value) => match value.as_u64() {
                Some(port) if port <= MAX_PORT => {}
                _ => errors.push(format!(
                    "packets[{idx}].{field}: {value} is not a port in 0..=65535"
                )),
            },
        }
    }
}

/// JSON type name, for jsonschema-style violation messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good_packet() -> Value {
        json!({
            "source_MAC": "10:8c:cf:57:2e:00",
            "dest_MAC": "78:4f:43:6a:60:62",
            "source_IP": "35.160.31.12",
            "dest_IP": "10.202.8.115",
            "source_port": 443,
            "dest_port": 51168
        })
    }

    fn errors_of(raw: Value) -> Vec<String> {
        match validate(&raw) {
            Err(GatewayError::ValidationFailed { errors }) => errors,
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_valid_batch() {
        let batch = validate(&json!({ "packets": [good_packet()] })).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.packets[0].source_port, 443);
    }

    #[test]
    fn test_accepts_empty_packets_array() {
        let batch = validate(&json!({ "packets": [] })).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_rejects_missing_packets_field() {
        let errors = errors_of(json!({ "flows": [] }));
        assert_eq!(errors, vec!["'packets' is a required property"]);
    }

    #[test]
    fn test_rejects_non_object_root() {
        let errors = errors_of(json!([1, 2, 3]));
        assert_eq!(errors, vec!["root: array is not of type 'object'"]);
    }

    #[test]
    fn test_rejects_packets_not_an_array() {
        let errors = errors_of(json!({ "packets": {} }));
        assert_eq!(errors, vec!["packets: object is not of type 'array'"]);
    }

    #[test]
    fn test_collects_all_violations_not_just_first() {
        let mut bad = good_packet();
        bad["source_MAC"] = json!(42);
        bad.as_object_mut().unwrap().remove("dest_port");

        let errors = errors_of(json!({ "packets": [bad, { "source_port": -1 }] }));

        // First record: one type violation and one missing field
        assert!(errors.contains(&"packets[0].source_MAC: number is not of type 'string'".to_string()));
        assert!(errors.contains(&"packets[0]: 'dest_port' is a required property".to_string()));
        // Second record: everything else missing plus an out-of-range port
        assert!(errors.contains(&"packets[1]: 'source_MAC' is a required property".to_string()));
        assert!(errors.contains(&"packets[1].source_port: -1 is not a port in 0..=65535".to_string()));
        assert!(errors.len() >= 7);
    }

    #[test]
    fn test_rejects_port_above_range() {
        let mut bad = good_packet();
        bad["dest_port"] = json!(70000);
        let errors = errors_of(json!({ "packets": [bad] }));
        assert_eq!(errors, vec!["packets[0].dest_port: 70000 is not a port in 0..=65535"]);
    }

    #[test]
    fn test_rejects_non_object_record() {
        let errors = errors_of(json!({ "packets": ["not a record"] }));
        assert_eq!(errors, vec!["packets[0]: string is not of type 'object'"]);
    }

    #[test]
    fn test_whole_batch_rejected_when_one_record_bad() {
        let raw = json!({ "packets": [good_packet(), { "bad": true }] });
        assert!(validate(&raw).is_err());
    }
}
