//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! settlement estimator test suite.
//!
//! # Modules
//!
//! - `fixtures`: Known case scenarios and their expected ranges
//! - `builders`: Builder patterns for case inputs and profiles
//! - `logging`: One-time tracing subscriber for tests
//! - `assertions`: Custom assertion helpers for estimates
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod logging;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use logging::*;
pub use assertions::*;
pub use generators::*;
