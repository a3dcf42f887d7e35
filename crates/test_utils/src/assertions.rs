//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for estimates that give more
//! meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_settlement::{EstimateResult, MultiplierTable, ValidationReport};
use rust_decimal::Decimal;

use crate::fixtures::Scenario;

/// Asserts that a Money value is a non-negative whole amount
pub fn assert_money_whole(money: &Money) {
    assert!(
        money.is_whole() && !money.is_negative(),
        "Expected a non-negative whole amount, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts every invariant of a settlement range
///
/// # Panics
///
/// Panics if any amount is negative or fractional, if the amounts are out
/// of order, or if they mix currencies
pub fn assert_well_formed(result: &EstimateResult) {
    assert_money_whole(&result.low);
    assert_money_whole(&result.average);
    assert_money_whole(&result.high);

    assert!(
        result.low.currency() == result.average.currency()
            && result.average.currency() == result.high.currency(),
        "Estimate mixes currencies: {:?}",
        result
    );
    assert!(
        result.low.amount() <= result.average.amount()
            && result.average.amount() <= result.high.amount(),
        "Estimate out of order: low={}, average={}, high={}",
        result.low.amount(),
        result.average.amount(),
        result.high.amount()
    );
}

/// Asserts that every amount is a multiple of the profile's increment
pub fn assert_rounded_to(result: &EstimateResult, increment: Decimal) {
    for money in [&result.low, &result.average, &result.high] {
        assert!(
            (money.amount() % increment).is_zero(),
            "{} is not a multiple of {}",
            money.amount(),
            increment
        );
    }
}

/// Asserts that an estimate matches a scenario's hand-computed range
pub fn assert_matches_scenario(result: &EstimateResult, scenario: &Scenario) {
    assert_eq!(
        (result.low.amount(), result.average.amount(), result.high.amount()),
        (scenario.low, scenario.average, scenario.high),
        "Scenario '{}' produced {}",
        scenario.name,
        result.display_range()
    );
}

/// Asserts that an average does not exceed the table's ceiling
pub fn assert_within_ceiling(result: &EstimateResult, ceiling: Decimal) {
    assert!(
        result.average.amount() <= ceiling,
        "Average {} exceeds ceiling {}",
        result.average.amount(),
        ceiling
    );
}

/// Asserts that validation failed with an error mentioning `fragment`
pub fn assert_validation_error(report: &ValidationReport, fragment: &str) {
    assert!(
        report.errors.iter().any(|error| error.contains(fragment)),
        "Expected a validation error containing '{}', got {:?}",
        fragment,
        report.errors
    );
}

/// Asserts that a table passes validation without warnings
pub fn assert_table_clean(table: &MultiplierTable) {
    let report = table.validate();
    assert!(
        report.is_valid() && report.warnings.is_empty(),
        "Table {} errors={:?} warnings={:?}",
        table.code,
        report.errors,
        report.warnings
    );
}
