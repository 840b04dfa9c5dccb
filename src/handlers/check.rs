//! Packet ingest handler
//!
//! `POST /check`: validate the submitted batch, dispatch it to the
//! analysis pipeline, report GREEN/RED. Every outcome is a well-formed
//! `CheckResponse` on HTTP 200; the envelope carries the verdict.

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::dispatch::VerdictDispatcher;
use crate::models::CheckResponse;
use crate::{validator, AppState};

/// Accept a batch of observed packets for analysis
pub async fn check(State(state): State<AppState>, body: Option<Json<Value>>) -> Json<CheckResponse> {
    // Absent, null or empty bodies are rejected before the validator
    // ever runs; there is nothing for it to evaluate.
    let raw = match body {
        Some(Json(value)) if has_content(&value) => value,
        _ => return Json(CheckResponse::rejected("No data sent")),
    };

    let batch = match validator::validate(&raw) {
        Ok(batch) => batch,
        Err(e) => {
            debug!(kind = e.kind(), "batch rejected");
            return Json(CheckResponse::rejected(e.to_string()));
        }
    };

    // One fresh bus channel per accepted batch, released inside dispatch
    let dispatcher = VerdictDispatcher::new(
        state.bus.clone(),
        &state.config.bus_topic,
        &state.config.bus_routing_key,
    );

    match dispatcher.dispatch(&batch).await {
        Ok(count) => Json(CheckResponse::accepted(count)),
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "dispatch failed");
            Json(CheckResponse::rejected(e.to_string()))
        }
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
