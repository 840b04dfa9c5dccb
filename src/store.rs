//! Verdict store and query
//!
//! The analysis pipeline persists verdicts; the gateway reads them back
//! for pollers. The contract with the store is a single operation: every
//! verdict at or after a bound, in ascending timestamp order, with the
//! store's own row id stripped before anything leaves the gateway.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::models::{StoredVerdict, Verdict, VerdictRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed stored verdict: {0}")]
    Malformed(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Read side of the verdict store.
#[async_trait]
pub trait VerdictStore: Send + Sync {
    /// All verdicts with `timestamp >= bound`, inclusive, ascending by
    /// timestamp. No upper bound, no pagination; pollers bound the result
    /// set themselves by polling with their last watermark.
    async fn find_since(&self, bound: DateTime<Utc>) -> Result<Vec<VerdictRecord>, StoreError>;
}

/// Postgres-backed verdict store.
pub struct PgVerdictStore {
    pool: PgPool,
}

impl PgVerdictStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerdictStore for PgVerdictStore {
    async fn find_since(&self, bound: DateTime<Utc>) -> Result<Vec<VerdictRecord>, StoreError> {
        let rows = sqlx::query_as::<_, StoredVerdict>(
            r#"
            SELECT id, ip, status, timestamp
            FROM verdicts
            WHERE timestamp >= $1
            ORDER BY timestamp
            "#,
        )
        .bind(bound)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.into_record().map_err(StoreError::Malformed))
            .collect()
    }
}

/// In-memory verdict store, for tests and broker-less local runs.
pub struct MemoryVerdictStore {
    rows: RwLock<Vec<StoredVerdict>>,
}

impl MemoryVerdictStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Insert one verdict, the way the analysis pipeline would.
    pub fn insert(&self, ip: &str, status: Verdict, timestamp: DateTime<Utc>) {
        let row = StoredVerdict {
            id: Uuid::new_v4(),
            ip: ip.to_string(),
            status: status.as_str().to_string(),
            timestamp,
        };
        if let Ok(mut rows) = self.rows.write() {
            rows.push(row);
        }
    }
}

impl Default for MemoryVerdictStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerdictStore for MemoryVerdictStore {
    async fn find_since(&self, bound: DateTime<Utc>) -> Result<Vec<VerdictRecord>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut matched: Vec<StoredVerdict> = rows
            .iter()
            .filter(|row| row.timestamp >= bound)
            .cloned()
            .collect();
        matched.sort_by_key(|row| row.timestamp);

        matched
            .into_iter()
            .map(|row| row.into_record().map_err(StoreError::Malformed))
            .collect()
    }
}

/// Timestamp-bounded verdict retrieval, with the spec'd error taxonomy:
/// absent bound, unparseable bound, and store faults are distinct kinds.
pub struct VerdictQuery {
    store: Arc<dyn VerdictStore>,
}

impl VerdictQuery {
    pub fn new(store: Arc<dyn VerdictStore>) -> Self {
        Self { store }
    }

    /// Retrieve every verdict at or after the given bound.
    ///
    /// The bound must be an RFC 3339 timestamp or a bare date; an absent
    /// or unparseable bound is never defaulted to "all records" or "now".
    pub async fn query(&self, raw_bound: Option<&str>) -> GatewayResult<Vec<VerdictRecord>> {
        let raw = raw_bound.ok_or(GatewayError::InputMissing)?;

        let bound = parse_bound(raw).ok_or(GatewayError::ParseFailed)?;

        self.store.find_since(bound).await.map_err(|e| {
            error!(error = %e, "verdict store query failed");
            GatewayError::QueryFailed(e.to_string())
        })
    }
}

/// Parse a poll bound. Full RFC 3339 timestamps are the primary form;
/// a bare `YYYY-MM-DD` date is read as midnight UTC of that day.
fn parse_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}
