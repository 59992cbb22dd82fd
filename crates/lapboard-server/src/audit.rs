// crates/lapboard-server/src/audit.rs
// ============================================================================
// Module: Score Audit Logging
// Description: Structured audit events for leaderboard request handling.
// Purpose: Emit one JSON line per handled request without a logging backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for request logging.
//! Sinks write JSON lines so deployments can route events to their preferred
//! pipeline. Storage error detail is always recorded here even when the HTTP
//! response hides it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOutcome {
    /// Request succeeded.
    Ok,
    /// Request was rejected as invalid.
    Rejected,
    /// Request failed inside the server or store.
    Error,
}

/// Request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// HTTP status code returned.
    pub status: u16,
    /// Request outcome.
    pub outcome: ScoreOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Full error text, never truncated or hidden.
    pub error_detail: Option<String>,
    /// Track filter or submitted track.
    pub track_id: Option<String>,
    /// Player filter or submitted player.
    pub player_id: Option<String>,
    /// Number of records returned by a query.
    pub result_count: Option<usize>,
    /// Number of records evicted by a submission.
    pub evicted: Option<u64>,
    /// Request body size in bytes.
    pub request_bytes: usize,
}

/// Inputs required to construct a request audit event.
#[derive(Debug, Clone)]
pub struct ScoreAuditEventParams {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Peer IP address if known.
    pub peer_ip: Option<String>,
    /// HTTP status code returned.
    pub status: u16,
    /// Request outcome.
    pub outcome: ScoreOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Full error text.
    pub error_detail: Option<String>,
    /// Track filter or submitted track.
    pub track_id: Option<String>,
    /// Player filter or submitted player.
    pub player_id: Option<String>,
    /// Number of records returned by a query.
    pub result_count: Option<usize>,
    /// Number of records evicted by a submission.
    pub evicted: Option<u64>,
    /// Request body size in bytes.
    pub request_bytes: usize,
}

/// Server startup audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStartedEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Bound socket address.
    pub bind: String,
    /// Store backend label.
    pub store_type: &'static str,
    /// Retention cap.
    pub max_records: u64,
}

impl ScoreAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ScoreAuditEventParams) -> Self {
        Self {
            event: "score_request",
            timestamp_ms: now_ms(),
            method: params.method,
            path: params.path,
            peer_ip: params.peer_ip,
            status: params.status,
            outcome: params.outcome,
            error_kind: params.error_kind,
            error_detail: params.error_detail,
            track_id: params.track_id,
            player_id: params.player_id,
            result_count: params.result_count,
            evicted: params.evicted,
            request_bytes: params.request_bytes,
        }
    }
}

impl ServerStartedEvent {
    /// Creates a new startup event.
    #[must_use]
    pub fn new(bind: String, store_type: &'static str, max_records: u64) -> Self {
        Self {
            event: "server_started",
            timestamp_ms: now_ms(),
            bind,
            store_type,
            max_records,
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for leaderboard request events.
pub trait ScoreAuditSink: Send + Sync {
    /// Record a request audit event.
    fn record(&self, event: &ScoreAuditEvent);

    /// Record a server startup event.
    fn record_started(&self, _event: &ServerStartedEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ScoreAuditSink for StderrAuditSink {
    fn record(&self, event: &ScoreAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_started(&self, event: &ServerStartedEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized line.
    fn write_line(&self, payload: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ScoreAuditSink for FileAuditSink {
    fn record(&self, event: &ScoreAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.write_line(&payload);
        }
    }

    fn record_started(&self, event: &ServerStartedEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.write_line(&payload);
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ScoreAuditSink for NoopAuditSink {
    fn record(&self, _event: &ScoreAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
