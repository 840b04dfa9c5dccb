//! Health check handler

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    environment: String,
    /// Same RFC 3339 form as the /update watermark
    timestamp: String,
}

/// Gateway liveness probe
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::InMemoryBus;
    use crate::config::Config;
    use crate::store::MemoryVerdictStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_reports_gateway_identity() {
        let state = AppState {
            config: Config {
                database_url: String::new(),
                port: 0,
                bus_topic: "analyze_stream".to_string(),
                bus_routing_key: "socbox.analyze".to_string(),
                environment: "test".to_string(),
            },
            bus: Arc::new(InMemoryBus::new()),
            store: Arc::new(MemoryVerdictStore::new()),
        };

        let resp = check(State(state)).await.0;

        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.service, "soc-gateway");
        assert_eq!(resp.environment, "test");
        assert!(chrono::DateTime::parse_from_rfc3339(&resp.timestamp).is_ok());
    }
}
