//! Estimate results

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::input::CaseField;
use crate::normalize::InputWarning;

/// Settlement range shown to the claimant
///
/// Amounts are whole currency units, never negative, and always ordered
/// `low <= average <= high`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub low: Money,
    pub average: Money,
    pub high: Money,
}

impl EstimateResult {
    /// Lower bound, for pages that show only two values
    pub fn min(&self) -> Money {
        self.low
    }

    /// Upper bound, for pages that show only two values
    pub fn max(&self) -> Money {
        self.high
    }

    /// True once the estimate is worth acting on
    pub fn is_actionable(&self) -> bool {
        self.average.is_positive()
    }

    /// Renders the range as `$163,350 - $490,050`
    pub fn display_range(&self) -> String {
        format!(
            "{} - {}",
            self.low.to_display_string(),
            self.high.to_display_string()
        )
    }
}

/// Contribution of one capped linear term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermContribution {
    pub field: CaseField,
    /// Normalized input value
    pub value: Decimal,
    /// `min(value / divisor, cap)`
    pub contribution: Decimal,
    /// True when the cap was hit
    pub capped: bool,
}

/// Every intermediate factor behind an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub profile: String,
    pub age: u32,
    pub base: Decimal,
    pub age_factor: Decimal,
    pub severity_factor: Decimal,
    pub category_factor: Decimal,
    /// Product of all secondary table factors
    pub secondary_factor: Decimal,
    pub aggravating_factor: Decimal,
    pub terms: Vec<TermContribution>,
    /// Sum of the capped terms
    pub additive_sum: Decimal,
    /// Product of every factor including `1 + additive_sum`
    pub multiplier: Decimal,
    /// Average before the minimum floor and rounding
    pub unrounded_average: Decimal,
    pub result: EstimateResult,
    pub warnings: Vec<InputWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn result(low: Decimal, average: Decimal, high: Decimal) -> EstimateResult {
        EstimateResult {
            low: Money::whole(low, Currency::USD),
            average: Money::whole(average, Currency::USD),
            high: Money::whole(high, Currency::USD),
        }
    }

    #[test]
    fn test_display_range() {
        let estimate = result(dec!(163350), dec!(272250), dec!(490050));
        assert_eq!(estimate.display_range(), "$163,350 - $490,050");
    }

    #[test]
    fn test_min_max_alias_bounds() {
        let estimate = result(dec!(70000), dec!(100000), dec!(130000));
        assert_eq!(estimate.min(), estimate.low);
        assert_eq!(estimate.max(), estimate.high);
    }

    #[test]
    fn test_zero_estimate_is_not_actionable() {
        assert!(!result(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO).is_actionable());
        assert!(result(dec!(1), dec!(2), dec!(3)).is_actionable());
    }
}
