//! Multiplier tables
//!
//! A `MultiplierTable` is the complete, constant configuration of one
//! calculator variant (opioid, pharmaceutical, crane, ...). The arithmetic
//! in [`crate::engine`] is written once and driven entirely by these tables.
//!
//! # Composition order
//!
//! ```text
//! average = round(base × age × severity × category × Π secondary
//!                 × aggravating × (1 + Σ min(value / divisor, cap)))
//! low     = round(average × low_ratio)
//! high    = max(round(average × high_ratio), minimum_high)
//! ```
//!
//! Caps are applied to each scaled term before the terms are summed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::Currency;

use crate::input::CaseField;
use crate::normalize::InputLimits;

/// Upper bound for any intermediate or final estimate amount
pub const MAX_ESTIMATE: Decimal = dec!(1000000000000000);

/// Largest factor a table entry may carry
pub const MAX_FACTOR: Decimal = dec!(1000);

/// Multiplies two factors, saturating at [`MAX_ESTIMATE`]
pub(crate) fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .map_or(MAX_ESTIMATE, |product| product.min(MAX_ESTIMATE))
}

/// Canonical form of an option key: lowercase kebab-case
///
/// `prescriptionDrug`, `prescription_drug` and `Prescription Drug` all map
/// to `prescription-drug`.
pub fn canonical_key(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if matches!(ch, '_' | ' ' | '-') {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if ch.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
            let starts_word = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if starts_word && !out.ends_with('-') {
                out.push('-');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }
    out.trim_end_matches('-').to_string()
}

/// One option of a closed enumeration and its multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorEntry {
    pub key: String,
    pub factor: Decimal,
}

/// Lookup table from an enumeration option to a multiplier
///
/// Entries keep their declared order; for severity tables that order is the
/// severity ordering. Unknown or unanswered keys resolve to the
/// `default_key` entry when one is declared, otherwise to 1.0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorTable {
    pub entries: Vec<FactorEntry>,
    #[serde(default)]
    pub default_key: Option<String>,
}

impl FactorTable {
    /// Creates a table from `(key, factor)` pairs
    pub fn new(entries: &[(&str, Decimal)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(key, factor)| FactorEntry {
                    key: canonical_key(key),
                    factor: *factor,
                })
                .collect(),
            default_key: None,
        }
    }

    /// Declares which entry stands in for unknown or missing answers
    pub fn with_default(mut self, key: &str) -> Self {
        self.default_key = Some(canonical_key(key));
        self
    }

    /// Returns the factor for an exact (canonicalized) key
    pub fn lookup(&self, key: &str) -> Option<Decimal> {
        let key = canonical_key(key);
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.factor)
    }

    /// Returns true if the key is one of the table's options
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Factor used for unknown or missing answers
    pub fn default_factor(&self) -> Decimal {
        self.default_key
            .as_deref()
            .and_then(|key| self.lookup(key))
            .unwrap_or(Decimal::ONE)
    }

    /// Resolves an answer to its factor, falling back to the default
    pub fn factor_for(&self, key: Option<&str>) -> Decimal {
        key.and_then(|k| self.lookup(k))
            .unwrap_or_else(|| self.default_factor())
    }

    /// Largest factor any answer can produce
    pub fn max_factor(&self) -> Decimal {
        self.entries
            .iter()
            .map(|entry| entry.factor)
            .fold(self.default_factor(), Decimal::max)
    }

    /// Returns the option keys in declared order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A secondary enumeration answered through `CaseInput::selections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryTable {
    /// Selection field name (snake_case), e.g. `accident_cause`
    pub field: String,
    pub table: FactorTable,
}

impl SecondaryTable {
    pub fn new(field: &str, table: FactorTable) -> Self {
        Self {
            field: field.to_string(),
            table,
        }
    }
}

/// Ages strictly below `below` receive `factor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub below: u32,
    pub factor: Decimal,
}

/// A band label the age field may carry, and the age it stands for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeAlias {
    pub key: String,
    pub age: u32,
}

/// Step function from age to multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeSchedule {
    pub min_age: u32,
    pub max_age: u32,
    /// Age assumed when the claimant leaves the field blank
    pub default_age: u32,
    /// Bands in increasing `below` order; the first match wins
    pub bands: Vec<AgeBand>,
    /// Factor for ages past the last band
    pub otherwise: Decimal,
    /// Band labels accepted in place of a number
    #[serde(default)]
    pub aliases: Vec<AgeAlias>,
}

impl AgeSchedule {
    /// Returns the factor for an age
    pub fn factor_for(&self, age: u32) -> Decimal {
        self.bands
            .iter()
            .find(|band| age < band.below)
            .map_or(self.otherwise, |band| band.factor)
    }

    /// Maps band labels such as `over-60` to representative ages
    pub fn with_aliases(mut self, aliases: &[(&str, u32)]) -> Self {
        self.aliases = aliases
            .iter()
            .map(|(key, age)| AgeAlias {
                key: canonical_key(key),
                age: *age,
            })
            .collect();
        self
    }

    /// Returns the representative age for a band label
    pub fn age_for_band(&self, band: &str) -> Option<u32> {
        let key = canonical_key(band);
        self.aliases
            .iter()
            .find(|alias| alias.key == key)
            .map(|alias| alias.age)
    }

    /// Clamps an age into the schedule's valid range
    pub fn clamp(&self, age: u32) -> u32 {
        age.clamp(self.min_age, self.max_age.max(self.min_age))
    }

    fn max_factor(&self) -> Decimal {
        self.bands
            .iter()
            .map(|band| band.factor)
            .fold(self.otherwise, Decimal::max)
    }
}

/// How the base amount of an estimate is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BaseStrategy {
    /// A constant base amount
    Fixed { amount: Decimal },
    /// Sum of the listed economic-damage fields, never below `floor`
    EconomicDamages { fields: Vec<CaseField>, floor: Decimal },
}

impl BaseStrategy {
    /// Fields summed into the base amount
    pub fn fields(&self) -> &[CaseField] {
        match self {
            BaseStrategy::Fixed { .. } => &[],
            BaseStrategy::EconomicDamages { fields, .. } => fields,
        }
    }
}

/// A capped linear term: `min(value / divisor, cap)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledTerm {
    pub field: CaseField,
    pub divisor: Decimal,
    pub cap: Decimal,
}

impl ScaledTerm {
    pub fn new(field: CaseField, divisor: Decimal, cap: Decimal) -> Self {
        Self { field, divisor, cap }
    }

    /// Evaluates the term for a normalized (non-negative) value
    pub fn apply(&self, value: Decimal) -> Decimal {
        if self.divisor <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        value
            .checked_div(self.divisor)
            .unwrap_or(self.cap)
            .min(self.cap)
            .max(Decimal::ZERO)
    }
}

/// How the displayed range is derived from the average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePolicy {
    pub low_ratio: Decimal,
    pub high_ratio: Decimal,
    /// Amounts are rounded to a multiple of this (1 = whole units)
    #[serde(default = "RangePolicy::whole_units")]
    pub rounding_increment: Decimal,
    /// Floor applied to the average before the range is derived
    #[serde(default)]
    pub minimum_average: Option<Decimal>,
    /// Floor applied to the high end after the range is derived
    #[serde(default)]
    pub minimum_high: Option<Decimal>,
}

impl RangePolicy {
    pub fn new(low_ratio: Decimal, high_ratio: Decimal) -> Self {
        Self {
            low_ratio,
            high_ratio,
            rounding_increment: Decimal::ONE,
            minimum_average: None,
            minimum_high: None,
        }
    }

    pub fn rounded_to(mut self, increment: Decimal) -> Self {
        self.rounding_increment = increment;
        self
    }

    pub fn with_minimum_average(mut self, minimum: Decimal) -> Self {
        self.minimum_average = Some(minimum);
        self
    }

    pub fn with_minimum_high(mut self, minimum: Decimal) -> Self {
        self.minimum_high = Some(minimum);
        self
    }

    fn whole_units() -> Decimal {
        Decimal::ONE
    }
}

/// Complete configuration of one calculator variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable {
    /// Registry key, e.g. `opioid`
    pub code: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub currency: Currency,
    pub age: AgeSchedule,
    pub base: BaseStrategy,
    pub severity: FactorTable,
    #[serde(default)]
    pub category: FactorTable,
    #[serde(default)]
    pub secondary: Vec<SecondaryTable>,
    #[serde(default)]
    pub terms: Vec<ScaledTerm>,
    /// Multiplier applied when the aggravating-factor flag is set
    #[serde(default = "MultiplierTable::neutral_factor")]
    pub aggravating_factor: Decimal,
    pub range: RangePolicy,
}

/// Outcome of validating a table
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems that make the table unusable
    pub errors: Vec<String>,
    /// Suspicious but usable settings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl MultiplierTable {
    fn neutral_factor() -> Decimal {
        Decimal::ONE
    }

    /// Returns the secondary table for a selection field
    pub fn secondary_table(&self, field: &str) -> Option<&FactorTable> {
        self.secondary
            .iter()
            .find(|secondary| secondary.field == field)
            .map(|secondary| &secondary.table)
    }

    /// Checks every constraint the engine relies on
    ///
    /// # Returns
    ///
    /// A report listing errors (the table must be rejected) and warnings
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.code.trim().is_empty() {
            report.error("code must not be empty");
        }

        self.validate_age(&mut report);
        self.validate_base(&mut report);

        if self.severity.is_empty() {
            report.error("severity table must have at least one level");
        }
        validate_factor_table("severity", &self.severity, &mut report);
        for pair in self.severity.entries.windows(2) {
            if pair[1].factor < pair[0].factor {
                report.error(format!(
                    "severity levels must be non-decreasing: {} ({}) follows {} ({})",
                    pair[1].key, pair[1].factor, pair[0].key, pair[0].factor
                ));
            }
        }

        validate_factor_table("category", &self.category, &mut report);

        let mut seen = BTreeSet::new();
        for secondary in &self.secondary {
            if !seen.insert(secondary.field.as_str()) {
                report.error(format!("secondary field {} declared twice", secondary.field));
            }
            validate_factor_table(&secondary.field, &secondary.table, &mut report);
        }

        for term in &self.terms {
            if term.divisor <= Decimal::ZERO {
                report.error(format!("term {} has non-positive divisor", term.field.name()));
            }
            if term.cap <= Decimal::ZERO || term.cap > MAX_FACTOR {
                report.error(format!("term {} cap must be in (0, {}]", term.field.name(), MAX_FACTOR));
            }
            if self.base.fields().contains(&term.field) {
                report.error(format!(
                    "{} is summed into the base and scaled by a term",
                    term.field.name()
                ));
            }
        }

        if self.aggravating_factor <= Decimal::ZERO || self.aggravating_factor > MAX_FACTOR {
            report.error("aggravating factor must be positive and bounded");
        } else if self.aggravating_factor < Decimal::ONE {
            report.warning("aggravating factor below 1.0 lowers the estimate");
        }

        self.validate_range(&mut report);

        report
    }

    fn validate_age(&self, report: &mut ValidationReport) {
        let age = &self.age;
        if age.min_age > age.max_age {
            report.error(format!("age range {}..={} is empty", age.min_age, age.max_age));
        }
        if age.default_age < age.min_age || age.default_age > age.max_age {
            report.error(format!("default age {} is outside the age range", age.default_age));
        }
        for pair in age.bands.windows(2) {
            if pair[1].below <= pair[0].below {
                report.error("age bands must be strictly increasing");
            }
        }
        let mut labels = BTreeSet::new();
        for alias in &age.aliases {
            if alias.key.is_empty() {
                report.error("age band label must not be empty");
            }
            if !labels.insert(alias.key.as_str()) {
                report.error(format!("age band {} declared twice", alias.key));
            }
            if alias.age < age.min_age || alias.age > age.max_age {
                report.error(format!(
                    "age band {} maps to {}, outside the age range",
                    alias.key, alias.age
                ));
            }
        }
        for factor in age.bands.iter().map(|band| band.factor).chain([age.otherwise]) {
            if factor <= Decimal::ZERO || factor > MAX_FACTOR {
                report.error(format!("age factor {} must be in (0, {}]", factor, MAX_FACTOR));
            }
        }
    }

    fn validate_base(&self, report: &mut ValidationReport) {
        match &self.base {
            BaseStrategy::Fixed { amount } => {
                if *amount <= Decimal::ZERO {
                    report.error("fixed base amount must be positive");
                }
            }
            BaseStrategy::EconomicDamages { fields, floor } => {
                if fields.is_empty() {
                    report.error("economic damages base needs at least one field");
                }
                if *floor < Decimal::ZERO {
                    report.error("economic damages floor must not be negative");
                }
                if fields.iter().any(|field| !field.is_monetary()) {
                    report.error("economic damages base may only sum monetary fields");
                }
            }
        }
    }

    fn validate_range(&self, report: &mut ValidationReport) {
        let range = &self.range;
        if range.low_ratio < Decimal::ZERO || range.low_ratio > Decimal::ONE {
            report.error(format!("low ratio {} must be within [0, 1]", range.low_ratio));
        }
        if range.high_ratio < Decimal::ONE || range.high_ratio > MAX_FACTOR {
            report.error(format!("high ratio {} must be within [1, {}]", range.high_ratio, MAX_FACTOR));
        }
        if range.rounding_increment < Decimal::ONE || !range.rounding_increment.fract().is_zero() {
            report.error("rounding increment must be a whole number of at least 1");
        }
        if let Some(minimum) = range.minimum_average {
            if minimum < Decimal::ZERO {
                report.error("minimum average must not be negative");
            }
        }
        if let Some(minimum) = range.minimum_high {
            if minimum < Decimal::ZERO || minimum > MAX_ESTIMATE {
                report.error(format!("minimum high {} must be within [0, {}]", minimum, MAX_ESTIMATE));
            }
        }
    }

    /// Upper bound on `average` for any input
    ///
    /// Computed from the largest base, the largest factor of every table,
    /// and every term at its cap, then rounded up to the rounding increment.
    pub fn ceiling(&self, limits: &InputLimits) -> Decimal {
        let base = match &self.base {
            BaseStrategy::Fixed { amount } => *amount,
            BaseStrategy::EconomicDamages { fields, floor } => {
                let summed = fields
                    .iter()
                    .map(|field| limits.max_for(*field))
                    .fold(Decimal::ZERO, |acc, max| (acc + max).min(MAX_ESTIMATE));
                summed.max(*floor)
            }
        };

        let additive: Decimal = self.terms.iter().map(|term| term.cap.max(Decimal::ZERO)).sum();

        let factors = [
            self.age.max_factor(),
            self.severity.max_factor(),
            self.category.max_factor(),
            self.aggravating_factor.max(Decimal::ONE),
            Decimal::ONE + additive,
        ];
        let product = factors
            .into_iter()
            .chain(self.secondary.iter().map(|secondary| secondary.table.max_factor()))
            .fold(base, saturating_mul);

        let bound = self
            .range
            .minimum_average
            .map_or(product, |minimum| product.max(minimum));

        let increment = self.range.rounding_increment.max(Decimal::ONE);
        bound
            .checked_div(increment)
            .map(|steps| saturating_mul(steps.ceil(), increment))
            .unwrap_or(MAX_ESTIMATE)
    }
}

fn validate_factor_table(name: &str, table: &FactorTable, report: &mut ValidationReport) {
    let mut keys = BTreeSet::new();
    for entry in &table.entries {
        if entry.key.is_empty() {
            report.error(format!("{} has an empty option key", name));
        }
        if !keys.insert(entry.key.as_str()) {
            report.error(format!("{} declares option {} twice", name, entry.key));
        }
        if entry.factor <= Decimal::ZERO || entry.factor > MAX_FACTOR {
            report.error(format!(
                "{} option {} factor {} must be in (0, {}]",
                name, entry.key, entry.factor, MAX_FACTOR
            ));
        }
    }

    if let Some(default_key) = &table.default_key {
        match table.lookup(default_key) {
            None => report.error(format!("{} default {} is not an option", name, default_key)),
            Some(factor) if factor != Decimal::ONE => report.error(format!(
                "{} default {} must have factor 1.0, found {}",
                name, default_key, factor
            )),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("prescriptionDrug"), "prescription-drug");
        assert_eq!(canonical_key("prescription_drug"), "prescription-drug");
        assert_eq!(canonical_key(" Overdose Survival "), "overdose-survival");
        assert_eq!(canonical_key("tower-crane"), "tower-crane");
        assert_eq!(canonical_key("classIRecall"), "class-i-recall");
        assert_eq!(canonical_key("blackBox"), "black-box");
        assert_eq!(canonical_key("FDA"), "fda");
        assert_eq!(canonical_key("6months-2years"), "6months-2years");
    }

    #[test]
    fn test_factor_table_default() {
        let table = FactorTable::new(&[("mild", dec!(1.0)), ("severe", dec!(2.5))]).with_default("mild");
        assert_eq!(table.factor_for(Some("severe")), dec!(2.5));
        assert_eq!(table.factor_for(Some("unheard-of")), dec!(1.0));
        assert_eq!(table.factor_for(None), dec!(1.0));
        assert_eq!(table.max_factor(), dec!(2.5));
    }

    #[test]
    fn test_factor_table_without_default_is_neutral() {
        let table = FactorTable::new(&[("vaccine", dec!(2.0))]);
        assert_eq!(table.factor_for(Some("other")), Decimal::ONE);
    }

    #[test]
    fn test_age_schedule_steps() {
        let schedule = AgeSchedule {
            min_age: 18,
            max_age: 80,
            default_age: 35,
            bands: vec![
                AgeBand { below: 30, factor: dec!(1.3) },
                AgeBand { below: 50, factor: dec!(1.1) },
            ],
            otherwise: dec!(0.8),
            aliases: Vec::new(),
        };
        assert_eq!(schedule.factor_for(29), dec!(1.3));
        assert_eq!(schedule.factor_for(30), dec!(1.1));
        assert_eq!(schedule.factor_for(50), dec!(0.8));
        assert_eq!(schedule.clamp(5), 18);
        assert_eq!(schedule.clamp(120), 80);
    }

    #[test]
    fn test_age_band_aliases() {
        let schedule = AgeSchedule {
            min_age: 18,
            max_age: 80,
            default_age: 40,
            bands: vec![AgeBand { below: 30, factor: dec!(1.7) }],
            otherwise: dec!(0.9),
            aliases: Vec::new(),
        }
        .with_aliases(&[("under-30", 25), ("over-60", 65)]);
        assert_eq!(schedule.age_for_band("over-60"), Some(65));
        assert_eq!(schedule.age_for_band("Under_30"), Some(25));
        assert_eq!(schedule.age_for_band("41-50"), None);
    }

    #[test]
    fn test_scaled_term_caps() {
        let term = ScaledTerm::new(CaseField::MedicalExpenses, dec!(10000), dec!(10));
        assert_eq!(term.apply(dec!(10000)), dec!(1));
        assert_eq!(term.apply(dec!(10000000)), dec!(10));
        assert_eq!(term.apply(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_saturating_mul() {
        assert_eq!(saturating_mul(dec!(2), dec!(3)), dec!(6));
        assert_eq!(saturating_mul(MAX_ESTIMATE, dec!(2)), MAX_ESTIMATE);
        assert_eq!(saturating_mul(Decimal::MAX, dec!(2)), MAX_ESTIMATE);
    }
}
