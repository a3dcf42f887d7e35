//! Settlement Estimation Domain
//!
//! This crate turns a claimant's calculator answers into a low / average /
//! high compensation range. One engine serves every calculator; each
//! calculator is described by a `MultiplierTable` (profile).
//!
//! # Estimation Pipeline
//!
//! ```text
//! CaseInput -> normalize -> NormalizedCase -> factors -> EstimateResult
//! ```
//!
//! Estimation never fails. Malformed input is coerced during normalization
//! and reported as `InputWarning`s; errors only come from loading profiles,
//! configuration, and unknown profile codes.

pub mod input;
pub mod normalize;
pub mod table;
pub mod profiles;
pub mod estimate;
pub mod engine;
pub mod registry;
pub mod config;
pub mod error;

pub use input::{CaseField, CaseInput};
pub use normalize::{InputLimits, InputWarning, NormalizedCase};
pub use table::{FactorTable, MultiplierTable, RangePolicy, ValidationReport};
pub use estimate::{EstimateBreakdown, EstimateResult, TermContribution};
pub use engine::{estimate, estimate_with_breakdown, estimate_with_limits, EstimationEngine};
pub use registry::{ProfileLoader, ProfileRegistry};
pub use config::EngineConfig;
pub use error::SettlementError;
