//! Settlement domain errors
//!
//! Estimation itself never fails; these errors come from loading,
//! validating, and looking up multiplier tables.

use thiserror::Error;

/// Errors that can occur in the settlement domain
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid profile {code}: {}", .errors.join("; "))]
    InvalidProfile { code: String, errors: Vec<String> },

    #[error("Failed to parse profile: {0}")]
    Parse(String),

    #[error("Profile file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SettlementError {
    /// Creates an unknown profile error
    pub fn unknown_profile(code: impl Into<String>) -> Self {
        SettlementError::UnknownProfile(code.into())
    }

    /// Creates an invalid profile error from a list of validation failures
    pub fn invalid_profile(code: impl Into<String>, errors: Vec<String>) -> Self {
        SettlementError::InvalidProfile {
            code: code.into(),
            errors,
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        SettlementError::Configuration(message.into())
    }
}

impl From<config::ConfigError> for SettlementError {
    fn from(err: config::ConfigError) -> Self {
        SettlementError::Configuration(err.to_string())
    }
}
