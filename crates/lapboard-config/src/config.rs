// crates/lapboard-config/src/config.rs
// ============================================================================
// Module: Lapboard Configuration
// Description: Configuration loading and validation for the leaderboard.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: lapboard-core, lapboard-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then `LAPBOARD_CONFIG`, then
//! `lapboard.toml` in the working directory. Only that last, implicit file may
//! be absent; every other failure is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use lapboard_core::DEFAULT_MAX_RECORDS;
use lapboard_core::LeaderboardConfig;
use lapboard_core::ValidationLimits;
use lapboard_store_sqlite::DEFAULT_BUSY_TIMEOUT_MS;
use lapboard_store_sqlite::SqliteStoreConfig;
use lapboard_store_sqlite::SqliteStoreMode;
use lapboard_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "lapboard.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LAPBOARD_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address.
const DEFAULT_BIND: &str = "0.0.0.0:3000";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Smallest accepted request body limit.
const MIN_MAX_BODY_BYTES: usize = 1024;
/// Largest accepted request body limit.
const MAX_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;
/// Default `SQLite` database path.
const DEFAULT_STORE_PATH: &str = "lapboard.db";
/// Largest accepted `SQLite` busy timeout in milliseconds.
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Largest accepted validation text limit.
const MAX_VALIDATION_LIMIT: usize = 4096;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level leaderboard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LapboardConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Score store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Submission validation limits.
    #[serde(default)]
    pub validation: ValidationLimits,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl LapboardConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, implicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if implicit && err.kind() == ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(err) => return Err(ConfigError::Io(err.to_string())),
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.store.validate()?;
        validate_limits(&self.validation)?;
        self.audit.validate()?;
        Ok(())
    }

    /// Replaces the port of the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address is invalid.
    pub fn apply_port_override(&mut self, port: u16) -> Result<(), ConfigError> {
        let mut addr = self.server.bind_addr()?;
        addr.set_port(port);
        self.server.bind = addr.to_string();
        Ok(())
    }

    /// Returns the leaderboard service settings.
    #[must_use]
    pub const fn leaderboard(&self) -> LeaderboardConfig {
        LeaderboardConfig {
            max_records: self.store.max_records,
            limits: self.validation,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the listener binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Include storage error detail in 500 responses.
    #[serde(default)]
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            expose_error_details: false,
        }
    }
}

impl ServerConfig {
    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.bind)))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if !(MIN_MAX_BODY_BYTES..=MAX_MAX_BODY_BYTES).contains(&self.max_body_bytes) {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between {MIN_MAX_BODY_BYTES} and \
                 {MAX_MAX_BODY_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Score store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Maximum number of records retained.
    #[serde(default = "default_max_records")]
    pub max_records: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: Some(PathBuf::from(DEFAULT_STORE_PATH)),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_records: default_max_records(),
        }
    }
}

impl StoreConfig {
    /// Builds the `SQLite` store configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no path is configured.
    pub fn sqlite(&self) -> Result<SqliteStoreConfig, ConfigError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| ConfigError::Invalid("sqlite store requires path".to_string()))?;
        Ok(SqliteStoreConfig {
            path,
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        })
    }

    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_records == 0 {
            return Err(ConfigError::Invalid(
                "store.max_records must be greater than zero".to_string(),
            ));
        }
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        match self.store_type {
            StoreType::Memory => Ok(()),
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path_string("store.path", &path.to_string_lossy())
            }
        }
    }
}

/// Store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory store.
    Memory,
    /// Use `SQLite`-backed durable store.
    #[default]
    Sqlite,
}

impl StoreType {
    /// Returns the config label for the store type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Audit logging configuration for HTTP requests.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines). Stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default retention cap.
const fn default_max_records() -> u64 {
    DEFAULT_MAX_RECORDS
}

/// Audit logging is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag is true for the implicit default.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), false));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), false));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), true))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates submission limits.
fn validate_limits(limits: &ValidationLimits) -> Result<(), ConfigError> {
    for (field, value) in [
        ("validation.max_player_name_chars", limits.max_player_name_chars),
        ("validation.max_identifier_chars", limits.max_identifier_chars),
    ] {
        if value == 0 || value > MAX_VALIDATION_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "{field} must be between 1 and {MAX_VALIDATION_LIMIT}"
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions and helpers are permitted."
    )]

    use super::*;

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        assert!(validate_path_string("test_path", "   ").is_err());
    }

    #[test]
    fn validate_path_string_error_includes_field_name() {
        let err = validate_path_string("my_custom_path", "").unwrap_err();
        assert!(err.to_string().contains("my_custom_path"));
    }

    #[test]
    fn validate_path_string_rejects_component_too_long() {
        let path = format!("./{}", "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        assert!(validate_path_string("test_path", &path).is_err());
    }

    #[test]
    fn resolve_path_prefers_explicit_path() {
        let (path, implicit) = resolve_path(Some(Path::new("custom.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("custom.toml"));
        assert!(!implicit);
    }
}
