//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! Tests specify only the answers they care about; everything else stays
//! unanswered, exactly as a fresh calculator form would send it.

use domain_settlement::profiles;
use domain_settlement::{CaseField, CaseInput, MultiplierTable};
use rust_decimal::Decimal;

/// Builder for calculator answers
#[derive(Debug, Clone, Default)]
pub struct CaseInputBuilder {
    input: CaseInput,
}

impl CaseInputBuilder {
    /// Creates a builder with every field unanswered
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the claimant's age
    pub fn age(mut self, age: f64) -> Self {
        self.input.age = Some(age);
        self
    }

    /// Sets the age as a band label (`over-60`)
    pub fn age_band(mut self, band: impl Into<String>) -> Self {
        self.input.age_band = Some(band.into());
        self
    }

    /// Sets the severity answer
    pub fn severity(mut self, severity: impl Into<String>) -> Self {
        self.input.severity = Some(severity.into());
        self
    }

    /// Sets the category answer (drug type, crane type, ...)
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.input.category = Some(category.into());
        self
    }

    /// Adds a secondary selection
    pub fn selection(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.input = self.input.with_selection(field, value);
        self
    }

    pub fn medical_expenses(self, amount: f64) -> Self {
        self.field(CaseField::MedicalExpenses, amount)
    }

    pub fn future_care_costs(self, amount: f64) -> Self {
        self.field(CaseField::FutureCareCosts, amount)
    }

    pub fn lost_wages(self, amount: f64) -> Self {
        self.field(CaseField::LostWages, amount)
    }

    pub fn duration_years(self, years: f64) -> Self {
        self.field(CaseField::DurationYears, years)
    }

    pub fn family_size(self, size: f64) -> Self {
        self.field(CaseField::FamilySize, size)
    }

    /// Sets any numeric field
    pub fn field(mut self, field: CaseField, value: f64) -> Self {
        self.input.set_value(field, Some(value));
        self
    }

    /// Sets the aggravating-factor flag
    pub fn aggravated(mut self) -> Self {
        self.input.aggravating_factor = true;
        self
    }

    pub fn build(self) -> CaseInput {
        self.input
    }
}

/// Builder for variations on a built-in profile
///
/// Starts from a valid table; tests break one constraint at a time to
/// exercise validation.
#[derive(Debug, Clone)]
pub struct MultiplierTableBuilder {
    table: MultiplierTable,
}

impl MultiplierTableBuilder {
    /// Starts from the built-in opioid profile
    pub fn opioid() -> Self {
        Self { table: profiles::opioid() }
    }

    /// Starts from the built-in pharmaceutical profile
    pub fn pharmaceutical() -> Self {
        Self { table: profiles::pharmaceutical() }
    }

    /// Starts from the built-in crane profile
    pub fn crane() -> Self {
        Self { table: profiles::crane() }
    }

    /// Sets the profile code
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.table.code = code.into();
        self
    }

    /// Sets the low and high range ratios
    pub fn ratios(mut self, low: Decimal, high: Decimal) -> Self {
        self.table.range.low_ratio = low;
        self.table.range.high_ratio = high;
        self
    }

    /// Sets the rounding increment
    pub fn rounding_increment(mut self, increment: Decimal) -> Self {
        self.table.range.rounding_increment = increment;
        self
    }

    /// Sets the aggravating factor
    pub fn aggravating_factor(mut self, factor: Decimal) -> Self {
        self.table.aggravating_factor = factor;
        self
    }

    /// Overwrites the factor of an existing severity level
    pub fn severity_factor(mut self, key: &str, factor: Decimal) -> Self {
        if let Some(entry) = self.table.severity.entries.iter_mut().find(|e| e.key == key) {
            entry.factor = factor;
        }
        self
    }

    /// Applies an arbitrary change
    pub fn with(mut self, change: impl FnOnce(&mut MultiplierTable)) -> Self {
        change(&mut self.table);
        self
    }

    pub fn build(self) -> MultiplierTable {
        self.table
    }
}
