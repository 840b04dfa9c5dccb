//! Rule update handler
//!
//! `GET /update?timestamp=<RFC3339>`: return every verdict persisted at or
//! after the bound. The response timestamp is the caller's watermark for
//! its next poll. Every outcome, including store faults, is a well-formed
//! `UpdateResponse` on HTTP 200.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::GatewayError;
use crate::models::UpdateResponse;
use crate::store::VerdictQuery;
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct UpdateParams {
    pub timestamp: Option<String>,
}

/// Poll for classification rules at or after a timestamp
pub async fn update(
    State(state): State<AppState>,
    Query(params): Query<UpdateParams>,
) -> Json<UpdateResponse> {
    let query = VerdictQuery::new(state.store.clone());

    let response = match query.query(params.timestamp.as_deref()).await {
        Ok(rules) => UpdateResponse::ok(rules),
        Err(GatewayError::InputMissing) => {
            UpdateResponse::failed("Invalid params, provide 'timestamp'")
        }
        Err(GatewayError::ParseFailed) => UpdateResponse::failed("Invalid date!"),
        Err(e) => UpdateResponse::failed(format!("Error! {e}")),
    };

    Json(response)
}
