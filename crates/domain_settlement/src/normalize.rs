//! Input normalization
//!
//! Turns a raw `CaseInput` into a fully defaulted `NormalizedCase` before
//! any arithmetic runs:
//!
//! - NaN, infinities, and unparseable numbers become 0
//! - negative amounts are clamped to 0, oversized amounts to the limit
//! - an age band label maps to the table's representative age; a missing
//!   age takes the table's default age; all ages are clamped
//! - enumeration answers are matched against the table; unknown answers
//!   are dropped so the table default applies
//!
//! Every adjustment is recorded as an [`InputWarning`]. None of them is an
//! error: the engine always produces an estimate.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use core_kernel::{Currency, Money};

use crate::input::{parse_number, CaseField, CaseInput};
use crate::table::{canonical_key, FactorTable, MultiplierTable};

/// Bounds applied to numeric inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Largest accepted monetary amount per field
    pub max_amount: Decimal,
    pub max_duration_years: Decimal,
    pub max_family_size: Decimal,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_amount: dec!(100000000),
            max_duration_years: dec!(100),
            max_family_size: dec!(50),
        }
    }
}

impl InputLimits {
    /// Upper bound for a field
    pub fn max_for(&self, field: CaseField) -> Decimal {
        match field {
            CaseField::MedicalExpenses | CaseField::FutureCareCosts | CaseField::LostWages => {
                self.max_amount
            }
            CaseField::DurationYears => self.max_duration_years,
            CaseField::FamilySize => self.max_family_size,
        }
    }
}

/// A coercion applied while normalizing input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputWarning {
    /// NaN or infinite value replaced by zero
    NotANumber { field: String },
    /// Value clamped into its valid range
    Clamped { field: String },
    /// Age missing; the table default was used
    DefaultAge { age: u32 },
    /// Age band label the table does not know
    UnknownAgeBand { value: String },
    /// Severity answer not in the table
    UnknownSeverity { value: String },
    /// Category answer not in the table
    UnknownCategory { value: String },
    /// Secondary answer not in its table
    UnknownSelection { field: String, value: String },
    /// Selection field the table does not use
    UnusedSelection { field: String },
}

impl InputWarning {
    /// True for unknown enumeration answers
    pub fn is_unknown_option(&self) -> bool {
        matches!(
            self,
            InputWarning::UnknownAgeBand { .. }
                | InputWarning::UnknownSeverity { .. }
                | InputWarning::UnknownCategory { .. }
                | InputWarning::UnknownSelection { .. }
        )
    }
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::NotANumber { field } => write!(f, "{} is not a number; using 0", field),
            InputWarning::Clamped { field } => write!(f, "{} was clamped into range", field),
            InputWarning::DefaultAge { age } => write!(f, "age missing; assuming {}", age),
            InputWarning::UnknownAgeBand { value } => write!(f, "unknown age band {:?}", value),
            InputWarning::UnknownSeverity { value } => write!(f, "unknown severity {:?}", value),
            InputWarning::UnknownCategory { value } => write!(f, "unknown category {:?}", value),
            InputWarning::UnknownSelection { field, value } => {
                write!(f, "unknown {} option {:?}", field, value)
            }
            InputWarning::UnusedSelection { field } => write!(f, "selection {} is not used", field),
        }
    }
}

/// Fully defaulted input, ready for the arithmetic
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCase {
    pub age: u32,
    /// Canonical severity key, `None` when missing or unknown
    pub severity: Option<String>,
    /// Canonical category key, `None` when missing or unknown
    pub category: Option<String>,
    /// Canonical keys of recognized secondary answers
    pub selections: BTreeMap<String, String>,
    amounts: BTreeMap<CaseField, Decimal>,
    pub aggravating_factor: bool,
    pub warnings: Vec<InputWarning>,
}

impl NormalizedCase {
    /// Normalized value of a numeric field (0 when missing)
    pub fn amount(&self, field: CaseField) -> Decimal {
        self.amounts.get(&field).copied().unwrap_or(Decimal::ZERO)
    }

    /// Recognized answer for a secondary field
    pub fn selection(&self, field: &str) -> Option<&str> {
        self.selections.get(field).map(String::as_str)
    }
}

/// Normalizes raw input against a table and limits
pub fn normalize(table: &MultiplierTable, input: &CaseInput, limits: &InputLimits) -> NormalizedCase {
    let mut warnings = Vec::new();

    let age = normalize_age(table, input, &mut warnings);

    let mut amounts = BTreeMap::new();
    for field in CaseField::ALL {
        let value = coerce_amount(
            field,
            input.value(field),
            limits.max_for(field),
            table.currency,
            &mut warnings,
        );
        amounts.insert(field, value);
    }

    let severity = resolve_option(
        &table.severity,
        input.severity.as_deref(),
        |value| InputWarning::UnknownSeverity { value },
        &mut warnings,
    );

    let category = resolve_option(
        &table.category,
        input.category.as_deref(),
        |value| InputWarning::UnknownCategory { value },
        &mut warnings,
    );

    let mut selections = BTreeMap::new();
    for (field, value) in &input.selections {
        let Some(secondary) = table.secondary_table(field) else {
            warnings.push(InputWarning::UnusedSelection { field: field.clone() });
            continue;
        };
        let resolved = resolve_option(
            secondary,
            Some(value.as_str()),
            |value| InputWarning::UnknownSelection {
                field: field.clone(),
                value,
            },
            &mut warnings,
        );
        if let Some(key) = resolved {
            selections.insert(field.clone(), key);
        }
    }

    NormalizedCase {
        age,
        severity,
        category,
        selections,
        amounts,
        aggravating_factor: input.aggravating_factor,
        warnings,
    }
}

fn normalize_age(table: &MultiplierTable, input: &CaseInput, warnings: &mut Vec<InputWarning>) -> u32 {
    let schedule = &table.age;
    let raw = match (input.age, input.age_band.as_deref().map(str::trim)) {
        (Some(age), _) => Some(age),
        (None, Some(band)) if !band.is_empty() => {
            if let Some(age) = schedule.age_for_band(band) {
                return schedule.clamp(age);
            }
            let parsed = parse_number(band);
            if parsed.is_none() {
                warnings.push(InputWarning::UnknownAgeBand { value: band.to_string() });
            }
            parsed
        }
        _ => None,
    };

    match raw {
        Some(age) if age.is_finite() => {
            let whole = age.trunc().clamp(0.0, f64::from(u32::MAX)) as u32;
            let clamped = schedule.clamp(whole);
            if clamped != whole {
                warnings.push(InputWarning::Clamped { field: "age".to_string() });
            }
            clamped
        }
        Some(_) => {
            warnings.push(InputWarning::NotANumber { field: "age".to_string() });
            warnings.push(InputWarning::DefaultAge { age: schedule.default_age });
            schedule.clamp(schedule.default_age)
        }
        None => {
            warnings.push(InputWarning::DefaultAge { age: schedule.default_age });
            schedule.clamp(schedule.default_age)
        }
    }
}

fn coerce_amount(
    field: CaseField,
    raw: Option<f64>,
    max: Decimal,
    currency: Currency,
    warnings: &mut Vec<InputWarning>,
) -> Decimal {
    let Some(value) = raw else {
        return Decimal::ZERO;
    };

    if !value.is_finite() {
        warnings.push(InputWarning::NotANumber { field: field.name().to_string() });
        return Decimal::ZERO;
    }

    if value < 0.0 {
        warnings.push(InputWarning::Clamped { field: field.name().to_string() });
        return Decimal::ZERO;
    }

    let converted = if field.is_monetary() {
        Money::try_from_f64(value, currency).ok().map(|money| money.amount())
    } else {
        Decimal::try_from(value).ok()
    };

    let exceeds_max = max.to_f64().is_some_and(|max| value > max);
    match converted {
        Some(decimal) if !exceeds_max && decimal <= max => decimal,
        _ => {
            warnings.push(InputWarning::Clamped { field: field.name().to_string() });
            max
        }
    }
}

fn resolve_option<F>(
    table: &FactorTable,
    raw: Option<&str>,
    unknown: F,
    warnings: &mut Vec<InputWarning>,
) -> Option<String>
where
    F: FnOnce(String) -> InputWarning,
{
    let value = raw.map(str::trim).filter(|value| !value.is_empty())?;
    let key = canonical_key(value);
    if table.contains(&key) {
        Some(key)
    } else {
        warnings.push(unknown(value.to_string()));
        None
    }
}
