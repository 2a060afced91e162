// src/config.rs

//! Manages engine configuration: loading, defaults, and validation.

use crate::core::errors::SecurityError;
use crate::core::manager::PERMISSION_SWITCH;
use crate::core::voter::GrantStrategy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Configuration of the security engine.
///
/// Unusable values (an empty salt, a zero timeout, an unknown strategy) are
/// rejected at setup time by [`SecurityConfig::validate`], never silently
/// coerced.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SecurityConfig {
    /// Salt mixed into session identifiers. Must not be empty.
    #[serde(default)]
    pub salt: String,

    /// Idle lifetime of a unique-mode session token.
    #[serde(with = "humantime_serde", default = "default_session_timeout")]
    pub session_timeout: Duration,

    /// Permit only one live session per user via server-rotated tokens.
    #[serde(default)]
    pub unique_session: bool,

    /// Aggregation strategy of the voter chain.
    #[serde(default)]
    pub strategy: GrantStrategy,

    /// Permission required to switch users.
    #[serde(default = "default_switch_permission")]
    pub switch_permission: String,
}

fn default_session_timeout() -> Duration {
    Duration::from_secs(1800) // half hour
}

fn default_switch_permission() -> String {
    PERMISSION_SWITCH.to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        SecurityConfig {
            salt: String::new(),
            session_timeout: default_session_timeout(),
            unique_session: false,
            strategy: GrantStrategy::default(),
            switch_permission: default_switch_permission(),
        }
    }
}

impl SecurityConfig {
    /// Creates a new `SecurityConfig` by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: SecurityConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects unusable values.
    pub fn validate(&self) -> Result<(), SecurityError> {
        if self.salt.is_empty() {
            return Err(SecurityError::InvalidConfiguration(
                "salt must not be empty".to_string(),
            ));
        }

        if self.session_timeout.as_secs() == 0 {
            return Err(SecurityError::InvalidConfiguration(
                "session timeout must be positive".to_string(),
            ));
        }

        if self.switch_permission.is_empty() {
            return Err(SecurityError::InvalidConfiguration(
                "switch permission must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
