//! Application settings loaded via OrthoConfig.
//!
//! Every field can come from `MUNCH_*` environment variables, a config file,
//! or command-line flags. Unset optional values fall back to the defaults
//! exposed by the accessors below.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    CadenceError, DEFAULT_CATALOGUE_TIMEOUT, RotationCadence, RotationSchedulerConfig,
    RotationServiceConfig,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Invalid combinations detected after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid rotation cadence: {0}")]
    Cadence(#[from] CadenceError),
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MUNCH")]
pub struct AppSettings {
    /// Socket address for the HTTP listener.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server runs on in-memory stores.
    pub database_url: Option<String>,
    /// JSON catalogue for in-memory runs.
    pub catalogue_file: Option<PathBuf>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Generate a throwaway key when the key file is missing.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// Mark session cookies `Secure`; on unless set to `false`.
    pub cookie_secure: Option<bool>,
    /// Run the weekly scheduler inside the server process; on unless set to
    /// `false`.
    pub scheduler_enabled: Option<bool>,
    /// Weekday of the rotation pass (`mon`..`sun`), UTC.
    pub rotation_weekday: Option<String>,
    pub rotation_hour: Option<u32>,
    pub rotation_minute: Option<u32>,
    /// Users refreshed concurrently within one pass.
    pub max_concurrent_users: Option<usize>,
    /// Attempts per user and pass, including the first.
    pub max_attempts: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub max_retry_backoff_ms: Option<u64>,
    /// Upper bound on one catalogue read.
    pub catalogue_timeout_ms: Option<u64>,
}

impl AppSettings {
    /// Parsed listener address.
    ///
    /// # Errors
    ///
    /// [`SettingsError::BindAddr`] when the value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn scheduler_enabled(&self) -> bool {
        self.scheduler_enabled.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Configured pass cadence; Monday 00:00 UTC unless overridden.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Cadence`] for unknown weekdays or out-of-range times.
    pub fn cadence(&self) -> Result<RotationCadence, SettingsError> {
        let default = RotationCadence::default();
        let weekday = self
            .rotation_weekday
            .clone()
            .unwrap_or_else(|| default.weekday().to_string());
        Ok(RotationCadence::parse(
            &weekday,
            self.rotation_hour.unwrap_or(0),
            self.rotation_minute.unwrap_or(0),
        )?)
    }

    /// Scheduler tunables with defaults filled in.
    ///
    /// # Errors
    ///
    /// Propagates [`AppSettings::cadence`] failures.
    pub fn scheduler_config(&self) -> Result<RotationSchedulerConfig, SettingsError> {
        let defaults = RotationSchedulerConfig::default();
        Ok(RotationSchedulerConfig {
            cadence: self.cadence()?,
            max_concurrent_users: self
                .max_concurrent_users
                .unwrap_or(defaults.max_concurrent_users),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_backoff: self
                .retry_backoff_ms
                .map_or(defaults.initial_backoff, Duration::from_millis),
            max_backoff: self
                .max_retry_backoff_ms
                .map_or(defaults.max_backoff, Duration::from_millis),
        })
    }

    pub fn service_config(&self) -> RotationServiceConfig {
        RotationServiceConfig {
            catalogue_timeout: self
                .catalogue_timeout_ms
                .map_or(DEFAULT_CATALOGUE_TIMEOUT, Duration::from_millis),
        }
    }
}
