// crates/lapboard-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `lapboard.toml`. The example spells out every default so
//! it doubles as a reference for operators.

/// Returns a canonical example `lapboard.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "0.0.0.0:3000"
max_body_bytes = 65536
expose_error_details = false

[store]
type = "sqlite"
path = "lapboard.db"
busy_timeout_ms = 5000
journal_mode = "wal"
sync_mode = "full"
max_records = 5000

[validation]
max_player_name_chars = 64
max_identifier_chars = 128
allow_negative_chrono = false

[audit]
enabled = true
# path = "lapboard-audit.jsonl"
"#,
    )
}
