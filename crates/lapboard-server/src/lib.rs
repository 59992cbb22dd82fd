// crates/lapboard-server/src/lib.rs
// ============================================================================
// Module: Lapboard Server
// Description: HTTP transport for the leaderboard service.
// Purpose: Expose score submission and ranking over axum.
// Dependencies: lapboard-core, lapboard-config, axum, tokio
// ============================================================================

//! ## Overview
//! The server exposes `PUT /scores` and `GET /scores` on top of
//! [`lapboard_core::Leaderboard`]. Every handled request produces one audit
//! event through a [`ScoreAuditSink`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ScoreAuditEvent;
pub use audit::ScoreAuditEventParams;
pub use audit::ScoreAuditSink;
pub use audit::ScoreOutcome;
pub use audit::ServerStartedEvent;
pub use audit::StderrAuditSink;
pub use server::LapboardServer;
pub use server::ServerError;
pub use server::ServerState;
pub use server::build_router;
