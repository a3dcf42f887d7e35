//! Core Kernel - Foundational types shared by the settlement estimator
//!
//! Money amounts with exact decimal arithmetic, whole-unit and increment
//! rounding, and the grouped display format used for estimate ranges.

pub mod money;

pub use money::{Money, Currency, MoneyError};
