// crates/lapboard-server/src/server.rs
// ============================================================================
// Module: Leaderboard HTTP Server
// Description: axum transport for score submission and ranking.
// Purpose: Map HTTP requests onto the leaderboard service with audit logging.
// Dependencies: lapboard-core, lapboard-config, lapboard-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! Two routes share one [`Leaderboard`]: `PUT /scores` validates and stores a
//! submission, then enforces the retention cap; `GET /scores` returns the best
//! 100 records for optional `trackId`/`playerId` filters. Store calls are
//! blocking and run through `block_in_place` on multi-thread runtimes.
//! Validation failures answer 400, oversized bodies 413, and store failures
//! 500 with a generic message unless `expose_error_details` is set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::CONTENT_LENGTH;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::put;
use http_body_util::LengthLimitError;
use lapboard_config::AuditConfig;
use lapboard_config::LapboardConfig;
use lapboard_config::StoreType;
use lapboard_core::InMemoryScoreStore;
use lapboard_core::Leaderboard;
use lapboard_core::LeaderboardError;
use lapboard_core::PlayerId;
use lapboard_core::ScoreFilter;
use lapboard_core::ScoreSubmission;
use lapboard_core::SharedScoreStore;
use lapboard_core::TrackId;
use lapboard_store_sqlite::SqliteScoreStore;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::ScoreAuditEvent;
use crate::audit::ScoreAuditEventParams;
use crate::audit::ScoreAuditSink;
use crate::audit::ScoreOutcome;
use crate::audit::ServerStartedEvent;
use crate::audit::StderrAuditSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Route serving both score operations.
const SCORES_PATH: &str = "/scores";
/// Response body for hidden storage failures.
const STORAGE_FAILURE_MESSAGE: &str = "storage failure";

// ============================================================================
// SECTION: Server
// ============================================================================

/// Leaderboard HTTP server instance.
pub struct LapboardServer {
    /// Validated configuration.
    config: LapboardConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl LapboardServer {
    /// Builds a server from configuration, opening the store and audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the store or
    /// audit log cannot be opened.
    pub fn from_config(config: LapboardConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_score_store(&config)?;
        let leaderboard = Leaderboard::new(store, config.leaderboard())
            .map_err(|err| ServerError::Config(err.to_string()))?;
        leaderboard.enforce_capacity().map_err(|err| ServerError::Init(err.to_string()))?;
        let audit = build_audit_sink(&config.audit)?;
        let state = Arc::new(ServerState::new(
            leaderboard,
            audit,
            config.server.max_body_bytes,
            config.server.expose_error_details,
        ));
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the axum router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        let local = listener
            .local_addr()
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.state.audit.record_started(&ServerStartedEvent::new(
            local.to_string(),
            self.config.store.store_type.as_str(),
            self.config.store.max_records,
        ));
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Resolves when the process receives ctrl-c.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Builds the score store from configuration.
fn build_score_store(config: &LapboardConfig) -> Result<SharedScoreStore, ServerError> {
    let store = match config.store.store_type {
        StoreType::Memory => SharedScoreStore::from_store(InMemoryScoreStore::new()),
        StoreType::Sqlite => {
            let sqlite_config =
                config.store.sqlite().map_err(|err| ServerError::Config(err.to_string()))?;
            let store = SqliteScoreStore::new(&sqlite_config)
                .map_err(|err| ServerError::Init(err.to_string()))?;
            SharedScoreStore::from_store(store)
        }
    };
    Ok(store)
}

/// Builds the audit sink from configuration.
fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn ScoreAuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| ServerError::Init(format!("audit log: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Shared state for the score handlers.
pub struct ServerState {
    /// Leaderboard service.
    leaderboard: Leaderboard,
    /// Request audit sink.
    audit: Arc<dyn ScoreAuditSink>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Return raw storage error text to clients.
    expose_error_details: bool,
}

impl ServerState {
    /// Creates handler state.
    #[must_use]
    pub fn new(
        leaderboard: Leaderboard,
        audit: Arc<dyn ScoreAuditSink>,
        max_body_bytes: usize,
        expose_error_details: bool,
    ) -> Self {
        Self {
            leaderboard,
            audit,
            max_body_bytes,
            expose_error_details,
        }
    }

    /// Returns the leaderboard service.
    #[must_use]
    pub const fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }
}

/// Builds the `/scores` router over shared state.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(SCORES_PATH, put(handle_put_scores).get(handle_get_scores))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Query parameters accepted by `GET /scores`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoresQuery {
    /// Optional track filter.
    track_id: Option<String>,
    /// Optional player filter.
    player_id: Option<String>,
}

impl ScoresQuery {
    /// Converts the query into a filter, treating empty values as absent.
    fn into_filter(self) -> ScoreFilter {
        let mut filter = ScoreFilter::all();
        if let Some(track_id) = self.track_id.filter(|value| !value.is_empty()) {
            filter = filter.with_track(track_id);
        }
        if let Some(player_id) = self.player_id.filter(|value| !value.is_empty()) {
            filter = filter.with_player(player_id);
        }
        filter
    }
}

/// Handles `PUT /scores`.
async fn handle_put_scores(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    let peer_ip = peer_ip(&request);
    let declared_bytes = declared_length(&request);
    let handled = match axum::body::to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(bytes) => submit_score(&state, &bytes),
        Err(err) => body_read_failure(err.into_inner().is::<LengthLimitError>(), declared_bytes),
    };
    finish(&state, &Method::PUT, peer_ip, handled)
}

/// Handles `GET /scores`.
async fn handle_get_scores(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    let peer_ip = peer_ip(&request);
    let handled = match Query::<ScoresQuery>::try_from_uri(request.uri()) {
        Ok(Query(query)) => query_scores(&state, query.into_filter()),
        Err(rejection) => Handled::failure(
            StatusCode::BAD_REQUEST,
            ScoreOutcome::Rejected,
            "query",
            format!("invalid query: {}", rejection.body_text()),
            None,
        ),
    };
    finish(&state, &Method::GET, peer_ip, handled)
}

/// Decodes, validates, and stores a submission.
fn submit_score(state: &ServerState, bytes: &Bytes) -> Handled {
    let submission: ScoreSubmission = match serde_json::from_slice(bytes) {
        Ok(submission) => submission,
        Err(err) => {
            return Handled::failure(
                StatusCode::BAD_REQUEST,
                ScoreOutcome::Rejected,
                "validation",
                format!("invalid request body: {err}"),
                None,
            )
            .with_request_bytes(bytes.len());
        }
    };
    let result = run_blocking(|| state.leaderboard.submit(&submission));
    let handled = match result {
        Ok(outcome) => {
            Handled::json(StatusCode::CREATED, &outcome.record).with_evicted(outcome.evicted)
        }
        Err(err) => leaderboard_failure(state, err),
    };
    handled
        .with_request_bytes(bytes.len())
        .with_filters(Some(submission.track_id.as_str()), Some(submission.player_id.as_str()))
}

/// Runs a ranked query.
fn query_scores(state: &ServerState, filter: ScoreFilter) -> Handled {
    let handled = match run_blocking(|| state.leaderboard.query(&filter)) {
        Ok(records) => {
            let count = records.len();
            Handled::json(StatusCode::OK, &records).with_result_count(count)
        }
        Err(err) => leaderboard_failure(state, err),
    };
    handled.with_filters(
        filter.track_id.as_ref().map(TrackId::as_str),
        filter.player_id.as_ref().map(PlayerId::as_str),
    )
}

/// Records the audit event and returns the response.
fn finish(
    state: &ServerState,
    method: &Method,
    peer_ip: Option<String>,
    handled: Handled,
) -> Response {
    state.audit.record(&ScoreAuditEvent::new(ScoreAuditEventParams {
        method: method.as_str().to_string(),
        path: SCORES_PATH.to_string(),
        peer_ip,
        status: handled.status.as_u16(),
        outcome: handled.outcome,
        error_kind: handled.error_kind,
        error_detail: handled.error_detail,
        track_id: handled.track_id,
        player_id: handled.player_id,
        result_count: handled.result_count,
        evicted: handled.evicted,
        request_bytes: handled.request_bytes,
    }));
    handled.response
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Maps a leaderboard error onto a response.
fn leaderboard_failure(state: &ServerState, err: LeaderboardError) -> Handled {
    let kind = match &err {
        LeaderboardError::Validation(inner) => {
            return Handled::failure(
                StatusCode::BAD_REQUEST,
                ScoreOutcome::Rejected,
                "validation",
                inner.to_string(),
                None,
            );
        }
        LeaderboardError::Store(inner)
        | LeaderboardError::Capacity {
            source: inner,
            ..
        } => inner.kind(),
        LeaderboardError::Config(_) => "config",
    };
    storage_failure(state, kind, &err)
}

/// Builds a 500 response, hiding detail unless configured otherwise.
fn storage_failure(
    state: &ServerState,
    kind: &'static str,
    err: &dyn std::error::Error,
) -> Handled {
    let detail = err.to_string();
    let message = if state.expose_error_details {
        detail.clone()
    } else {
        STORAGE_FAILURE_MESSAGE.to_string()
    };
    Handled::failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        ScoreOutcome::Error,
        kind,
        detail,
        Some(message),
    )
}

/// Maps a body read failure onto a response.
fn body_read_failure(too_large: bool, declared_bytes: usize) -> Handled {
    let handled = if too_large {
        Handled::failure(
            StatusCode::PAYLOAD_TOO_LARGE,
            ScoreOutcome::Rejected,
            "body_too_large",
            "request body too large".to_string(),
            None,
        )
    } else {
        Handled::failure(
            StatusCode::BAD_REQUEST,
            ScoreOutcome::Rejected,
            "body",
            "unreadable request body".to_string(),
            None,
        )
    };
    handled.with_request_bytes(declared_bytes)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Response plus the facts recorded in its audit event.
struct Handled {
    /// Response returned to the client.
    response: Response,
    /// Response status.
    status: StatusCode,
    /// Outcome classification.
    outcome: ScoreOutcome,
    /// Error kind label.
    error_kind: Option<&'static str>,
    /// Full error text.
    error_detail: Option<String>,
    /// Track identifier involved.
    track_id: Option<String>,
    /// Player identifier involved.
    player_id: Option<String>,
    /// Records returned.
    result_count: Option<usize>,
    /// Records evicted.
    evicted: Option<u64>,
    /// Request body size.
    request_bytes: usize,
}

impl Handled {
    /// Successful JSON response.
    fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(
                status,
                ([(axum::http::header::CONTENT_TYPE, "application/json")], body).into_response(),
                ScoreOutcome::Ok,
            ),
            Err(err) => Self::failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                ScoreOutcome::Error,
                "serialization",
                err.to_string(),
                Some("serialization failure".to_string()),
            ),
        }
    }

    /// Plain-text failure; `message` defaults to `detail`.
    fn failure(
        status: StatusCode,
        outcome: ScoreOutcome,
        kind: &'static str,
        detail: String,
        message: Option<String>,
    ) -> Self {
        let body = message.unwrap_or_else(|| detail.clone());
        let mut handled = Self::new(status, body.into_response(), outcome);
        handled.error_kind = Some(kind);
        handled.error_detail = Some(detail);
        handled
    }

    /// Creates a record with no optional facts.
    fn new(status: StatusCode, mut response: Response, outcome: ScoreOutcome) -> Self {
        *response.status_mut() = status;
        Self {
            response,
            status,
            outcome,
            error_kind: None,
            error_detail: None,
            track_id: None,
            player_id: None,
            result_count: None,
            evicted: None,
            request_bytes: 0,
        }
    }

    /// Attaches the track and player involved.
    fn with_filters(mut self, track_id: Option<&str>, player_id: Option<&str>) -> Self {
        self.track_id = track_id.map(str::to_string);
        self.player_id = player_id.map(str::to_string);
        self
    }

    /// Attaches the query result count.
    const fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = Some(count);
        self
    }

    /// Attaches the eviction count.
    const fn with_evicted(mut self, evicted: u64) -> Self {
        self.evicted = Some(evicted);
        self
    }

    /// Attaches the request body size.
    const fn with_request_bytes(mut self, bytes: usize) -> Self {
        self.request_bytes = bytes;
        self
    }
}

/// Executes store work, shifting to a blocking context when available.
fn run_blocking<T>(work: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Peer IP recorded by `into_make_service_with_connect_info`.
fn peer_ip(request: &Request) -> Option<String> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// Declared `Content-Length`, or zero.
fn declared_length(request: &Request) -> usize {
    request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization failures.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
