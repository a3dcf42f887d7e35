//! Profile loading and registry
//!
//! Multiplier tables can be shipped as JSON documents so a deployment can
//! retune a calculator without a code change. Documents are validated on
//! load; a table that fails validation is never registered.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_settlement::registry::{ProfileLoader, ProfileRegistry};
//!
//! let mut registry = ProfileRegistry::with_builtins();
//! let table = ProfileLoader::from_file(Path::new("profiles/crane.json"))?;
//! registry.register(table)?;
//! ```

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::SettlementError;
use crate::profiles;
use crate::table::MultiplierTable;

/// Parses and validates profile documents
pub struct ProfileLoader;

impl ProfileLoader {
    /// Parses a profile from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON and `InvalidProfile` when the
    /// table fails validation
    pub fn from_str(json: &str) -> Result<MultiplierTable, SettlementError> {
        let table: MultiplierTable = serde_json::from_str(json)
            .map_err(|e| SettlementError::Parse(e.to_string()))?;
        Self::checked(table)
    }

    /// Loads a profile from a JSON file
    pub fn from_file(path: &Path) -> Result<MultiplierTable, SettlementError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettlementError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        Self::from_str(&content).map_err(|err| match err {
            SettlementError::Parse(message) => {
                SettlementError::Parse(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Loads every `*.json` profile in a directory, in file name order
    pub fn from_dir(dir: &Path) -> Result<Vec<MultiplierTable>, SettlementError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| SettlementError::FileNotFound(format!("{}: {}", dir.display(), e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| SettlementError::FileNotFound(format!("{}: {}", dir.display(), e)))?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| Self::from_file(path)).collect()
    }

    /// Validates a table, logging any warnings
    pub fn checked(table: MultiplierTable) -> Result<MultiplierTable, SettlementError> {
        let report = table.validate();
        if !report.is_valid() {
            return Err(SettlementError::invalid_profile(&table.code, report.errors));
        }
        for message in &report.warnings {
            warn!(profile = %table.code, warning = %message, "profile accepted with warning");
        }
        Ok(table)
    }
}

static BUILTIN: Lazy<ProfileRegistry> = Lazy::new(ProfileRegistry::with_builtins);

/// Profiles keyed by code
///
/// Tables are immutable once registered and shared through `Arc`, so a
/// registry can be cloned cheaply and read from any thread.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<MultiplierTable>>,
}

impl ProfileRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in profiles
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for table in profiles::builtin() {
            registry.profiles.insert(registry_key(&table.code), Arc::new(table));
        }
        registry
    }

    /// Shared registry of the built-in profiles
    pub fn builtin() -> &'static ProfileRegistry {
        &BUILTIN
    }

    /// Validates and registers a table, replacing any table with the same code
    ///
    /// # Returns
    ///
    /// The table previously registered under the code, if any
    pub fn register(
        &mut self,
        table: MultiplierTable,
    ) -> Result<Option<Arc<MultiplierTable>>, SettlementError> {
        let table = ProfileLoader::checked(table)?;
        let code = registry_key(&table.code);
        let previous = self.profiles.insert(code.clone(), Arc::new(table));

        if previous.is_some() {
            info!(profile = %code, "replaced profile");
        } else {
            info!(profile = %code, "registered profile");
        }
        Ok(previous)
    }

    /// Loads and registers every profile in a directory
    ///
    /// Either every file is registered or none is.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, SettlementError> {
        let tables = ProfileLoader::from_dir(dir)?;
        let count = tables.len();
        for table in tables {
            self.register(table)?;
        }
        info!(dir = %dir.display(), count, "loaded profiles");
        Ok(count)
    }

    /// Gets a profile by code (case-insensitive)
    pub fn get(&self, code: &str) -> Option<Arc<MultiplierTable>> {
        self.profiles.get(&registry_key(code)).cloned()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.profiles.contains_key(&registry_key(code))
    }

    /// Returns the registered codes, sorted
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.profiles.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn registry_key(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}
