//! Engine configuration

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::SettlementError;
use crate::normalize::InputLimits;

/// Environment variable prefix, e.g. `SETTLEMENT_PROFILES_DIR`
pub const ENV_PREFIX: &str = "SETTLEMENT";

/// Engine configuration
///
/// Loaded from defaults, then an optional file, then `SETTLEMENT_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory of `*.json` profiles registered on top of the built-ins
    pub profiles_dir: Option<PathBuf>,
    /// Largest accepted monetary amount per field
    #[validate(range(min = 1))]
    pub max_amount: u64,
    #[validate(range(min = 1, max = 1000))]
    pub max_duration_years: u32,
    #[validate(range(min = 1, max = 1000))]
    pub max_family_size: u32,
    /// Log unknown option values in debug builds
    pub warn_unknown_values: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profiles_dir: None,
            max_amount: 100_000_000,
            max_duration_years: 100,
            max_family_size: 50,
            warn_unknown_values: true,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, SettlementError> {
        Self::from_sources(None, ENV_PREFIX)
    }

    /// Loads configuration from an optional file and prefixed environment
    /// variables; the environment wins
    pub fn from_sources(file: Option<&Path>, env_prefix: &str) -> Result<Self, SettlementError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let config: Self = builder
            .add_source(config::Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Parses configuration from a TOML document
    pub fn from_toml(toml: &str) -> Result<Self, SettlementError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Validates field ranges
    pub fn check(&self) -> Result<(), SettlementError> {
        self.validate()
            .map_err(|e| SettlementError::configuration(e.to_string()))
    }

    /// Input limits implied by this configuration
    pub fn limits(&self) -> InputLimits {
        InputLimits {
            max_amount: Decimal::from(self.max_amount),
            max_duration_years: Decimal::from(self.max_duration_years),
            max_family_size: Decimal::from(self.max_family_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_limits() {
        assert_eq!(EngineConfig::default().limits(), InputLimits::default());
    }

    #[test]
    fn test_from_toml_overrides_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            profiles_dir = "/etc/settlement/profiles"
            max_amount = 5000000
            warn_unknown_values = false
            "#,
        )
        .unwrap();

        assert_eq!(config.profiles_dir, Some(PathBuf::from("/etc/settlement/profiles")));
        assert_eq!(config.limits().max_amount, dec!(5000000));
        assert_eq!(config.max_family_size, 50);
        assert!(!config.warn_unknown_values);
    }

    #[test]
    fn test_zero_max_amount_rejected() {
        let result = EngineConfig::from_toml("max_amount = 0");
        assert!(matches!(result, Err(SettlementError::Configuration(_))));
    }

    #[test]
    fn test_missing_file_is_optional() {
        let config = EngineConfig::from_sources(
            Some(Path::new("/nonexistent/settlement.toml")),
            "SETTLEMENT_TEST_UNSET",
        )
        .unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        std::env::set_var("SETTLEMENT_ENV_TEST_MAX_AMOUNT", "777");
        std::env::set_var("SETTLEMENT_ENV_TEST_PROFILES_DIR", "/srv/profiles");
        std::env::set_var("SETTLEMENT_ENV_TEST_WARN_UNKNOWN_VALUES", "false");

        let config = EngineConfig::from_sources(None, "SETTLEMENT_ENV_TEST").unwrap();
        assert_eq!(config.max_amount, 777);
        assert_eq!(config.profiles_dir, Some(PathBuf::from("/srv/profiles")));
        assert!(!config.warn_unknown_values);
        assert_eq!(config.max_family_size, 50);
    }

    #[test]
    fn test_file_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settlement.toml");
        std::fs::write(
            &path,
            "max_amount = 5000000\nmax_family_size = 20\nmax_duration_years = 60\n",
        )
        .unwrap();
        std::env::set_var("SETTLEMENT_FILE_TEST_MAX_DURATION_YEARS", "40");

        let config = EngineConfig::from_sources(Some(&path), "SETTLEMENT_FILE_TEST").unwrap();
        assert_eq!(config.max_amount, 5_000_000);
        assert_eq!(config.max_family_size, 20);
        assert_eq!(config.max_duration_years, 40);
    }

    #[test]
    fn test_invalid_environment_value_rejected() {
        std::env::set_var("SETTLEMENT_BAD_ENV_TEST_MAX_FAMILY_SIZE", "0");
        let result = EngineConfig::from_sources(None, "SETTLEMENT_BAD_ENV_TEST");
        assert!(matches!(result, Err(SettlementError::Configuration(_))));
    }
}
