// crates/lapboard-config/src/lib.rs
// ============================================================================
// Module: Lapboard Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for lapboard.toml semantics.
// Dependencies: lapboard-core, lapboard-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `lapboard-config` defines the configuration model for the leaderboard
//! service. It provides strict, fail-closed validation and a canonical example
//! `lapboard.toml`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
