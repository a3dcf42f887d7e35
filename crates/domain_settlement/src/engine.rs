//! Estimation engine
//!
//! A single parameterized computation over a [`MultiplierTable`]. The free
//! functions take a table directly; [`EstimationEngine`] resolves tables by
//! profile code through a [`ProfileRegistry`].
//!
//! Estimation is a total function: every input, however malformed,
//! produces a well-formed [`EstimateResult`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_settlement::{CaseInput, EstimationEngine};
//!
//! let engine = EstimationEngine::with_builtins();
//! let input = CaseInput::from_form_fields([
//!     ("age", "35"),
//!     ("addictionSeverity", "moderate"),
//!     ("treatmentCosts", "10000"),
//! ]);
//! let estimate = engine.estimate("opioid", &input)?;
//! println!("{}", estimate.display_range());
//! ```

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use core_kernel::{Currency, Money};

use crate::config::EngineConfig;
use crate::error::SettlementError;
use crate::estimate::{EstimateBreakdown, EstimateResult, TermContribution};
use crate::input::CaseInput;
use crate::normalize::{normalize, InputLimits, NormalizedCase};
use crate::registry::ProfileRegistry;
use crate::table::{saturating_mul, BaseStrategy, MultiplierTable, MAX_ESTIMATE};

/// Computes the settlement range for an input
///
/// Uses the default [`InputLimits`].
pub fn estimate(table: &MultiplierTable, input: &CaseInput) -> EstimateResult {
    compute(table, input, &InputLimits::default(), true).result
}

/// Computes the settlement range with explicit input limits
pub fn estimate_with_limits(
    table: &MultiplierTable,
    input: &CaseInput,
    limits: &InputLimits,
) -> EstimateResult {
    compute(table, input, limits, true).result
}

/// Computes the settlement range along with every intermediate factor
pub fn estimate_with_breakdown(table: &MultiplierTable, input: &CaseInput) -> EstimateBreakdown {
    compute(table, input, &InputLimits::default(), true)
}

fn compute(
    table: &MultiplierTable,
    input: &CaseInput,
    limits: &InputLimits,
    warn_unknown: bool,
) -> EstimateBreakdown {
    let case = normalize(table, input, limits);

    if warn_unknown && cfg!(debug_assertions) {
        for warning in case.warnings.iter().filter(|w| w.is_unknown_option()) {
            warn!(profile = %table.code, %warning, "unknown option; using default factor");
        }
    }

    let base = base_amount(table, &case);
    let age_factor = table.age.factor_for(case.age);
    let severity_factor = table.severity.factor_for(case.severity.as_deref());
    let category_factor = table.category.factor_for(case.category.as_deref());
    let secondary_factor = table
        .secondary
        .iter()
        .map(|secondary| secondary.table.factor_for(case.selection(&secondary.field)))
        .fold(Decimal::ONE, saturating_mul);
    let aggravating_factor = if case.aggravating_factor {
        table.aggravating_factor
    } else {
        Decimal::ONE
    };

    let terms: Vec<TermContribution> = table
        .terms
        .iter()
        .map(|term| {
            let value = case.amount(term.field);
            let contribution = term.apply(value);
            let capped = term.divisor > Decimal::ZERO
                && value
                    .checked_div(term.divisor)
                    .map_or(true, |raw| raw > term.cap);
            TermContribution {
                field: term.field,
                value,
                contribution,
                capped,
            }
        })
        .collect();

    let additive_sum = terms.iter().fold(Decimal::ZERO, |acc, term| {
        acc.checked_add(term.contribution)
            .map_or(MAX_ESTIMATE, |sum| sum.min(MAX_ESTIMATE))
    });

    let multiplier = [
        age_factor,
        severity_factor,
        category_factor,
        secondary_factor,
        aggravating_factor,
        Decimal::ONE + additive_sum,
    ]
    .into_iter()
    .fold(Decimal::ONE, saturating_mul);

    let unrounded_average = saturating_mul(base, multiplier).max(Decimal::ZERO);
    let result = derive_range(table, unrounded_average);

    debug!(
        profile = %table.code,
        low = %result.low,
        average = %result.average,
        high = %result.high,
        "computed estimate"
    );

    EstimateBreakdown {
        profile: table.code.clone(),
        age: case.age,
        base,
        age_factor,
        severity_factor,
        category_factor,
        secondary_factor,
        aggravating_factor,
        terms,
        additive_sum,
        multiplier,
        unrounded_average,
        result,
        warnings: case.warnings,
    }
}

fn base_amount(table: &MultiplierTable, case: &NormalizedCase) -> Decimal {
    let base = match &table.base {
        BaseStrategy::Fixed { amount } => *amount,
        BaseStrategy::EconomicDamages { fields, floor } => {
            let cap = Money::new(MAX_ESTIMATE, table.currency);
            fields
                .iter()
                .map(|field| Money::new(case.amount(*field), table.currency))
                .fold(Money::new(Decimal::ZERO, table.currency), |acc, amount| {
                    match acc.checked_add(&amount) {
                        Ok(sum) if sum.amount() <= MAX_ESTIMATE => sum,
                        _ => cap,
                    }
                })
                .amount()
                .max(*floor)
        }
    };
    base.clamp(Decimal::ZERO, MAX_ESTIMATE)
}

/// Applies the average floor, rounding, range ratios, and the high floor
fn derive_range(table: &MultiplierTable, unrounded: Decimal) -> EstimateResult {
    let range = &table.range;
    let currency = table.currency;
    let increment = if range.rounding_increment >= Decimal::ONE {
        range.rounding_increment.trunc()
    } else {
        Decimal::ONE
    };

    let mut average = round_to(unrounded, increment, currency);
    if let Some(minimum) = range.minimum_average {
        let floor = ceil_to(minimum.max(Decimal::ZERO), increment);
        average = average.max(floor);
    }

    let low = round_to(saturating_mul(average, range.low_ratio), increment, currency)
        .clamp(Decimal::ZERO, average);
    let mut high = round_to(saturating_mul(average, range.high_ratio), increment, currency);
    if let Some(minimum) = range.minimum_high {
        high = high.max(ceil_to(minimum.clamp(Decimal::ZERO, MAX_ESTIMATE), increment));
    }
    let high = high.clamp(average, MAX_ESTIMATE.max(average));

    EstimateResult {
        low: Money::whole(low, currency),
        average: Money::whole(average, currency),
        high: Money::whole(high, currency),
    }
}

fn round_to(value: Decimal, increment: Decimal, currency: Currency) -> Decimal {
    Money::new(value.clamp(Decimal::ZERO, MAX_ESTIMATE), currency)
        .round_to_increment(increment)
        .map_or(MAX_ESTIMATE, |money| money.amount())
}

fn ceil_to(value: Decimal, increment: Decimal) -> Decimal {
    value
        .checked_div(increment)
        .map_or(MAX_ESTIMATE, |steps| saturating_mul(steps.ceil(), increment))
}

/// Estimates by profile code
///
/// Wraps a [`ProfileRegistry`] with the input limits and logging
/// preferences from [`EngineConfig`]. Cheap to clone and safe to share
/// across threads.
#[derive(Debug, Clone)]
pub struct EstimationEngine {
    registry: ProfileRegistry,
    limits: InputLimits,
    warn_unknown_values: bool,
}

impl Default for EstimationEngine {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl EstimationEngine {
    /// Creates an engine over an existing registry
    pub fn new(registry: ProfileRegistry) -> Self {
        Self {
            registry,
            limits: InputLimits::default(),
            warn_unknown_values: true,
        }
    }

    /// Creates an engine with the built-in profiles
    pub fn with_builtins() -> Self {
        Self::new(ProfileRegistry::with_builtins())
    }

    /// Builds an engine from configuration
    ///
    /// Registers the built-in profiles, then every `*.json` profile in
    /// `profiles_dir`. A file profile with a built-in code replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a profile file
    /// cannot be read, parsed, or validated
    pub fn from_config(config: &EngineConfig) -> Result<Self, SettlementError> {
        config.check()?;

        let mut registry = ProfileRegistry::with_builtins();
        if let Some(dir) = &config.profiles_dir {
            registry.load_dir(dir)?;
        }

        Ok(Self {
            registry,
            limits: config.limits(),
            warn_unknown_values: config.warn_unknown_values,
        })
    }

    /// Overrides the input limits
    pub fn with_limits(mut self, limits: InputLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    /// Computes the settlement range for a profile
    ///
    /// # Errors
    ///
    /// Returns `UnknownProfile` if no profile is registered under `code`
    pub fn estimate(&self, code: &str, input: &CaseInput) -> Result<EstimateResult, SettlementError> {
        Ok(self.breakdown(code, input)?.result)
    }

    /// Computes the settlement range and every intermediate factor
    pub fn breakdown(
        &self,
        code: &str,
        input: &CaseInput,
    ) -> Result<EstimateBreakdown, SettlementError> {
        let table = self.profile(code)?;
        Ok(compute(&table, input, &self.limits, self.warn_unknown_values))
    }

    /// Upper bound on the average for a profile under this engine's limits
    pub fn ceiling(&self, code: &str) -> Result<Decimal, SettlementError> {
        Ok(self.profile(code)?.ceiling(&self.limits))
    }

    fn profile(&self, code: &str) -> Result<Arc<MultiplierTable>, SettlementError> {
        self.registry
            .get(code)
            .ok_or_else(|| SettlementError::unknown_profile(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CaseField;
    use crate::profiles;
    use rust_decimal_macros::dec;

    fn worked_example() -> CaseInput {
        let mut input = CaseInput::new();
        input.age = Some(35.0);
        input.severity = Some("moderate".to_string());
        input.medical_expenses = Some(10000.0);
        input.lost_wages = Some(25000.0);
        input.duration_years = Some(1.0);
        input.family_size = Some(1.0);
        input
    }

    #[test]
    fn test_opioid_worked_example() {
        let result = estimate(&profiles::opioid(), &worked_example());
        assert_eq!(result.average.amount(), dec!(272250));
        assert_eq!(result.low.amount(), dec!(163350));
        assert_eq!(result.high.amount(), dec!(490050));
    }

    #[test]
    fn test_worked_example_breakdown() {
        let breakdown = estimate_with_breakdown(&profiles::opioid(), &worked_example());
        assert_eq!(breakdown.base, dec!(50000));
        assert_eq!(breakdown.age_factor, dec!(1.1));
        assert_eq!(breakdown.severity_factor, dec!(1.5));
        assert_eq!(breakdown.category_factor, dec!(1.0));
        assert_eq!(breakdown.additive_sum, dec!(2.3));
        assert_eq!(breakdown.multiplier, dec!(5.445));
        assert!(breakdown.terms.iter().all(|term| !term.capped));
    }

    #[test]
    fn test_empty_input_is_total() {
        for table in profiles::builtin() {
            let result = estimate(&table, &CaseInput::new());
            assert!(result.low.amount() <= result.average.amount());
            assert!(result.average.amount() <= result.high.amount());
            assert!(!result.low.is_negative());
        }
    }

    #[test]
    fn test_capped_terms_are_flagged() {
        let mut input = worked_example();
        input.medical_expenses = Some(10000000.0);
        let breakdown = estimate_with_breakdown(&profiles::opioid(), &input);
        let medical = breakdown
            .terms
            .iter()
            .find(|term| term.field == CaseField::MedicalExpenses)
            .map(|term| (term.contribution, term.capped));
        assert_eq!(medical, Some((dec!(10), true)));
    }

    #[test]
    fn test_crane_minimum_and_thousands() {
        let result = estimate(&profiles::crane(), &CaseInput::new());
        assert!(result.average.amount() >= dec!(100000));
        assert_eq!(result.average.amount() % dec!(1000), Decimal::ZERO);
        assert_eq!(result.low.amount() % dec!(1000), Decimal::ZERO);
        assert_eq!(result.high.amount() % dec!(1000), Decimal::ZERO);
    }

    #[test]
    fn test_crane_high_floor() {
        // 150,000 floor × 0.9 for age 79; 1.3× would give only 176,000
        let mut input = CaseInput::new();
        input.age = Some(79.0);
        let result = estimate(&profiles::crane(), &input);
        assert_eq!(result.average.amount(), dec!(135000));
        assert_eq!(result.low.amount(), dec!(95000));
        assert_eq!(result.high.amount(), dec!(250000));
    }

    #[test]
    fn test_economic_damages_base_sums_fields() {
        let mut input = CaseInput::new();
        input.medical_expenses = Some(200000.0);
        input.future_care_costs = Some(300000.0);
        input.lost_wages = Some(100000.0);
        let breakdown = estimate_with_breakdown(&profiles::crane(), &input);
        assert_eq!(breakdown.base, dec!(600000));
    }

    #[test]
    fn test_aggravating_factor_applies() {
        let mut input = worked_example();
        let plain = estimate_with_breakdown(&profiles::opioid(), &input);
        input.aggravating_factor = true;
        let aggravated = estimate_with_breakdown(&profiles::opioid(), &input);
        assert_eq!(aggravated.aggravating_factor, dec!(1.25));
        assert!(aggravated.result.average.amount() > plain.result.average.amount());
    }

    #[test]
    fn test_engine_unknown_profile() {
        let engine = EstimationEngine::with_builtins();
        let err = engine.estimate("asbestos", &CaseInput::new());
        assert!(matches!(err, Err(SettlementError::UnknownProfile(code)) if code == "asbestos"));
    }

    #[test]
    fn test_engine_matches_free_function() {
        let engine = EstimationEngine::with_builtins();
        let via_engine = engine.estimate(profiles::OPIOID, &worked_example()).ok();
        assert_eq!(via_engine, Some(estimate(&profiles::opioid(), &worked_example())));
    }

    #[test]
    fn test_unvalidated_table_stays_well_formed() {
        let mut table = profiles::opioid();
        table.range.low_ratio = dec!(-2);
        table.range.high_ratio = dec!(0.1);
        table.aggravating_factor = Decimal::MAX;
        let mut input = worked_example();
        input.aggravating_factor = true;

        let result = estimate(&table, &input);
        assert_eq!(result.low.amount(), Decimal::ZERO);
        assert!(result.average.amount() <= result.high.amount());
        assert!(result.high.amount() <= MAX_ESTIMATE);
    }
}
