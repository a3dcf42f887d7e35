//! Case input record
//!
//! `CaseInput` is the snapshot of calculator answers that the presentation
//! layer builds on every change. Every field is optional and may carry
//! garbage (NaN, negative numbers, unknown option values); the engine's
//! normalization step is responsible for turning it into something safe.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Numeric case fields that multiplier tables can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseField {
    /// Past medical or treatment costs
    MedicalExpenses,
    /// Projected future care costs
    FutureCareCosts,
    /// Wages lost so far
    LostWages,
    /// Duration of exposure, addiction, or time off work, in years
    DurationYears,
    /// Number of dependent family members
    FamilySize,
}

impl CaseField {
    /// All numeric fields, in declaration order
    pub const ALL: [CaseField; 5] = [
        CaseField::MedicalExpenses,
        CaseField::FutureCareCosts,
        CaseField::LostWages,
        CaseField::DurationYears,
        CaseField::FamilySize,
    ];

    /// Returns true for fields denominated in currency
    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            CaseField::MedicalExpenses | CaseField::FutureCareCosts | CaseField::LostWages
        )
    }

    /// Returns the snake_case name of the field
    pub fn name(&self) -> &'static str {
        match self {
            CaseField::MedicalExpenses => "medical_expenses",
            CaseField::FutureCareCosts => "future_care_costs",
            CaseField::LostWages => "lost_wages",
            CaseField::DurationYears => "duration_years",
            CaseField::FamilySize => "family_size",
        }
    }
}

/// Selection field that carries a banded medical-cost answer (`over1m`)
pub const MEDICAL_COST_BAND: &str = "medical_costs";

/// Calculator answers for a single estimate request
///
/// Deserializes from the camelCase payloads the calculator forms emit,
/// including the per-page field names (`treatmentCosts`,
/// `addictionSeverity`, `craneType`, ...). Numbers may arrive as JSON
/// numbers or as strings such as `"$25,000"`. Band answers such as
/// `"age": "over-60"` or `"medicalCosts": "over1m"` are kept as text and
/// resolved against the profile during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CaseInputPayload")]
pub struct CaseInput {
    pub age: Option<f64>,
    /// Age given as a band label (`under-30`, `30-40`, `over-60`)
    pub age_band: Option<String>,
    pub severity: Option<String>,
    pub category: Option<String>,
    /// Answers looked up in a profile's secondary tables, keyed by field
    pub selections: BTreeMap<String, String>,
    pub medical_expenses: Option<f64>,
    pub future_care_costs: Option<f64>,
    pub lost_wages: Option<f64>,
    pub duration_years: Option<f64>,
    pub family_size: Option<f64>,
    pub aggravating_factor: bool,
}

impl CaseInput {
    /// Creates an empty input; every field takes its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of a numeric field
    pub fn value(&self, field: CaseField) -> Option<f64> {
        match field {
            CaseField::MedicalExpenses => self.medical_expenses,
            CaseField::FutureCareCosts => self.future_care_costs,
            CaseField::LostWages => self.lost_wages,
            CaseField::DurationYears => self.duration_years,
            CaseField::FamilySize => self.family_size,
        }
    }

    /// Sets the raw value of a numeric field
    pub fn set_value(&mut self, field: CaseField, value: Option<f64>) {
        let slot = match field {
            CaseField::MedicalExpenses => &mut self.medical_expenses,
            CaseField::FutureCareCosts => &mut self.future_care_costs,
            CaseField::LostWages => &mut self.lost_wages,
            CaseField::DurationYears => &mut self.duration_years,
            CaseField::FamilySize => &mut self.family_size,
        };
        *slot = value;
    }

    /// Adds a secondary selection (e.g. `accident_cause = crane-collapse`)
    pub fn with_selection(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.selections.insert(field.into(), value.into());
        self
    }

    /// Returns the selection for a secondary field, if answered
    pub fn selection(&self, field: &str) -> Option<&str> {
        self.selections.get(field).map(String::as_str)
    }

    /// Records an age answer that is either a number or a band label
    fn answer_age(&mut self, value: &str) {
        if is_band(value) {
            self.age = None;
            self.age_band = Some(value.to_string());
        } else {
            self.age = parse_number(value);
        }
    }

    /// Records a medical-cost answer that is either an amount or a band
    fn answer_medical_expenses(&mut self, value: &str) {
        if is_band(value) {
            self.medical_expenses = None;
            self.selections
                .insert(MEDICAL_COST_BAND.to_string(), value.to_string());
        } else {
            self.medical_expenses = parse_number(value);
        }
    }

    /// Builds an input from raw form fields
    ///
    /// Field names are matched case-insensitively in camelCase, snake_case
    /// or kebab-case. Unparseable numbers and blank answers are treated as
    /// missing. Names that are not core fields become secondary selections.
    /// Age and medical costs may be band labels; a named safety violation
    /// sets the aggravating factor.
    ///
    /// ```rust,ignore
    /// let input = CaseInput::from_form_fields([
    ///     ("age", "35"),
    ///     ("addictionSeverity", "moderate"),
    ///     ("treatmentCosts", "$10,000"),
    /// ]);
    /// ```
    pub fn from_form_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut input = CaseInput::default();

        for (name, raw) in fields {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }

            match compact_name(name).as_str() {
                "age" => input.answer_age(value),
                "ageband" | "agerange" | "agegroup" => input.age_band = Some(value.to_string()),
                "severity" | "severitylevel" | "addictionseverity" | "injuryseverity" => {
                    input.severity = Some(value.to_string())
                }
                "category" | "categorytype" | "drugtype" | "cranetype" | "addictiontype" => {
                    input.category = Some(value.to_string())
                }
                "medicalexpenses" | "medicalcosts" | "treatmentcosts" => {
                    input.answer_medical_expenses(value)
                }
                "futurecarecosts" => input.future_care_costs = parse_number(value),
                "lostwages" => input.lost_wages = parse_number(value),
                "durationyears" | "duration" | "addictionduration" | "exposureyears" => {
                    input.duration_years = parse_number(value)
                }
                "familysize" => input.family_size = parse_number(value),
                "aggravatingfactor"
                | "aggravatingfactorpresent"
                | "overdosehistory"
                | "safetyviolation" => input.aggravating_factor = parse_flag(value),
                "safetyviolations" => input.aggravating_factor = parse_violation(value),
                _ => {
                    input.selections.insert(snake_case(name), value.to_string());
                }
            }
        }

        input
    }
}

/// Parses a number the way a lenient form does
///
/// Leading currency symbols, thousands separators, and whitespace are
/// ignored; trailing garbage after the numeric prefix is dropped
/// (`"12 years"` parses as 12). Returns `None` when no digits are found.
pub fn parse_number(raw: &str) -> Option<f64> {
    split_number(raw).map(|(value, _)| value)
}

/// Returns true when an answer names a band rather than a quantity
///
/// `under50k`, `50k-200k`, `30-40` and `over-60` are bands; `$25,000`
/// and `12 years` are quantities.
pub fn is_band(raw: &str) -> bool {
    match split_number(raw) {
        Some((_, rest)) => rest.starts_with(['k', 'K', 'm', 'M', '-']),
        None => !raw.trim().is_empty(),
    }
}

/// Splits the numeric prefix from the rest of a cleaned answer
fn split_number(raw: &str) -> Option<(f64, String)> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['$', '€', '£'])
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, ch) in cleaned.char_indices() {
        match ch {
            '-' | '+' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + ch.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    let value = cleaned[..end].trim_end_matches('.').parse::<f64>().ok()?;
    Some((value, cleaned[end..].to_string()))
}

/// Parses a yes/no style answer
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "on" | "1"
    )
}

/// Parses a safety-violation answer
///
/// Any named violation (`willful-violations`, `load-capacity-exceeded`)
/// counts as present; `no-violations` and plain negatives do not.
pub fn parse_violation(raw: &str) -> bool {
    let answer = raw.trim().to_ascii_lowercase();
    if answer.is_empty() {
        return false;
    }
    if parse_flag(&answer) {
        return true;
    }
    let negative = matches!(answer.as_str(), "n" | "no" | "none" | "false" | "off" | "0")
        || ["no-", "no_", "no "].iter().any(|prefix| answer.starts_with(prefix));
    !negative
}

/// Lowercases and strips separators: `treatment_costs` -> `treatmentcosts`
fn compact_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Converts camelCase or kebab-case names to snake_case
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.trim().chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else if matches!(ch, '-' | ' ') {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        NumberOrText::Number(n) => Some(n),
        NumberOrText::Text(text) => parse_number(&text),
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FlagOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(FlagOrText::Flag(flag)) => flag,
        Some(FlagOrText::Text(text)) => parse_flag(&text),
        None => false,
    })
}

/// Wire form of [`CaseInput`]
///
/// Accepts every per-page field name. Page fields that are not core
/// answers (`accidentCause`, `usageDuration`, ...) land in `extra` and
/// become secondary selections.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct CaseInputPayload {
    age: Option<NumberOrText>,

    #[serde(alias = "ageRange", alias = "ageGroup")]
    age_band: Option<String>,

    #[serde(alias = "severityLevel", alias = "addictionSeverity", alias = "injurySeverity")]
    severity: Option<String>,

    #[serde(
        alias = "categoryType",
        alias = "drugType",
        alias = "craneType",
        alias = "addictionType"
    )]
    category: Option<String>,

    selections: BTreeMap<String, String>,

    #[serde(alias = "treatmentCosts", alias = "medicalCosts")]
    medical_expenses: Option<NumberOrText>,

    #[serde(deserialize_with = "lenient_number")]
    future_care_costs: Option<f64>,

    #[serde(deserialize_with = "lenient_number")]
    lost_wages: Option<f64>,

    #[serde(
        alias = "addictionDuration",
        alias = "exposureYears",
        deserialize_with = "lenient_number"
    )]
    duration_years: Option<f64>,

    #[serde(deserialize_with = "lenient_number")]
    family_size: Option<f64>,

    #[serde(
        alias = "aggravatingFactorPresent",
        alias = "overdoseHistory",
        alias = "safetyViolation",
        deserialize_with = "lenient_flag"
    )]
    aggravating_factor: bool,

    safety_violations: Option<FlagOrText>,

    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl From<CaseInputPayload> for CaseInput {
    fn from(payload: CaseInputPayload) -> Self {
        let mut input = CaseInput {
            age_band: payload.age_band,
            severity: payload.severity,
            category: payload.category,
            future_care_costs: payload.future_care_costs,
            lost_wages: payload.lost_wages,
            duration_years: payload.duration_years,
            family_size: payload.family_size,
            aggravating_factor: payload.aggravating_factor,
            ..CaseInput::default()
        };

        for (name, value) in payload.extra {
            if let serde_json::Value::String(text) = value {
                if !text.trim().is_empty() {
                    input.selections.insert(snake_case(&name), text.trim().to_string());
                }
            }
        }

        match payload.age {
            Some(NumberOrText::Number(age)) => input.age = Some(age),
            Some(NumberOrText::Text(text)) if !text.trim().is_empty() => {
                input.answer_age(text.trim())
            }
            _ => {}
        }

        match payload.medical_expenses {
            Some(NumberOrText::Number(amount)) => input.medical_expenses = Some(amount),
            Some(NumberOrText::Text(text)) if !text.trim().is_empty() => {
                input.answer_medical_expenses(text.trim())
            }
            _ => {}
        }

        match payload.safety_violations {
            Some(FlagOrText::Flag(flag)) => input.aggravating_factor |= flag,
            Some(FlagOrText::Text(text)) => input.aggravating_factor |= parse_violation(&text),
            None => {}
        }

        input.selections.extend(payload.selections);
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_plain() {
        assert_eq!(parse_number("25000"), Some(25000.0));
        assert_eq!(parse_number("  35 "), Some(35.0));
    }

    #[test]
    fn test_parse_number_currency_and_separators() {
        assert_eq!(parse_number("$10,000"), Some(10000.0));
        assert_eq!(parse_number("1 250 000"), Some(1250000.0));
        assert_eq!(parse_number("$1,234.50"), Some(1234.5));
    }

    #[test]
    fn test_parse_number_prefix_only() {
        assert_eq!(parse_number("12 years"), Some(12.0));
        assert_eq!(parse_number("3."), Some(3.0));
    }

    #[test]
    fn test_parse_number_rejects_text() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
    }

    #[test]
    fn test_parse_number_keeps_sign() {
        assert_eq!(parse_number("-500"), Some(-500.0));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("yes"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_parse_violation() {
        assert!(parse_violation("willful-violations"));
        assert!(parse_violation("load-capacity-exceeded"));
        assert!(parse_violation("yes"));
        assert!(!parse_violation("no-violations"));
        assert!(!parse_violation("No"));
        assert!(!parse_violation(" "));
    }

    #[test]
    fn test_is_band() {
        assert!(is_band("over-60"));
        assert!(is_band("under-30"));
        assert!(is_band("30-40"));
        assert!(is_band("under50k"));
        assert!(is_band("500k-1m"));
        assert!(!is_band("$25,000"));
        assert!(!is_band("12 years"));
        assert!(!is_band("-500"));
        assert!(!is_band(""));
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("accidentCause"), "accident_cause");
        assert_eq!(snake_case("fda-warning"), "fda_warning");
        assert_eq!(snake_case("recall_status"), "recall_status");
    }

    #[test]
    fn test_form_fields_map_page_names() {
        let input = CaseInput::from_form_fields([
            ("age", "35"),
            ("addictionSeverity", "moderate"),
            ("treatmentCosts", "10000"),
            ("lostWages", "25,000"),
            ("addictionDuration", "1"),
            ("familySize", "1"),
            ("overdoseHistory", "no"),
        ]);

        assert_eq!(input.age, Some(35.0));
        assert_eq!(input.severity.as_deref(), Some("moderate"));
        assert_eq!(input.medical_expenses, Some(10000.0));
        assert_eq!(input.lost_wages, Some(25000.0));
        assert_eq!(input.duration_years, Some(1.0));
        assert_eq!(input.family_size, Some(1.0));
        assert!(!input.aggravating_factor);
        assert!(input.selections.is_empty());
    }

    #[test]
    fn test_form_fields_unknown_names_become_selections() {
        let input = CaseInput::from_form_fields([
            ("craneType", "tower-crane"),
            ("accidentCause", "crane-collapse"),
            ("operatorCertified", "no"),
            ("injuryType", ""),
        ]);

        assert_eq!(input.category.as_deref(), Some("tower-crane"));
        assert_eq!(input.selection("accident_cause"), Some("crane-collapse"));
        assert_eq!(input.selection("operator_certified"), Some("no"));
        assert_eq!(input.selection("injury_type"), None);
    }

    #[test]
    fn test_form_fields_route_band_answers() {
        let input = CaseInput::from_form_fields([
            ("age", "over-60"),
            ("medicalCosts", "over1m"),
            ("usageDuration", "over5years"),
            ("safetyViolations", "willful-violations"),
        ]);

        assert_eq!(input.age, None);
        assert_eq!(input.age_band.as_deref(), Some("over-60"));
        assert_eq!(input.medical_expenses, None);
        assert_eq!(input.selection(MEDICAL_COST_BAND), Some("over1m"));
        assert_eq!(input.selection("usage_duration"), Some("over5years"));
        assert!(input.aggravating_factor);
    }

    #[test]
    fn test_form_fields_no_violations_is_not_aggravating() {
        let input = CaseInput::from_form_fields([("safetyViolations", "no-violations")]);
        assert!(!input.aggravating_factor);
        assert!(input.selections.is_empty());
    }

    #[test]
    fn test_form_fields_garbage_number_is_missing() {
        let input = CaseInput::from_form_fields([("lostWages", "lots")]);
        assert_eq!(input.lost_wages, None);
    }

    #[test]
    fn test_deserialize_page_payload() {
        let json = r#"{
            "age": "35",
            "addictionSeverity": "moderate",
            "treatmentCosts": 10000,
            "lostWages": "$25,000",
            "addictionDuration": 1,
            "familySize": 1,
            "overdoseHistory": "yes"
        }"#;

        let input: CaseInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.age, Some(35.0));
        assert_eq!(input.severity.as_deref(), Some("moderate"));
        assert_eq!(input.medical_expenses, Some(10000.0));
        assert_eq!(input.lost_wages, Some(25000.0));
        assert!(input.aggravating_factor);
    }

    #[test]
    fn test_deserialize_flat_crane_payload() {
        let json = r#"{
            "craneType": "tower-crane",
            "accidentCause": "crane-collapse",
            "injurySeverity": "severe",
            "injuryType": "paralysis",
            "safetyViolations": "willful-violations",
            "age": "over-60",
            "medicalCosts": "200000",
            "futureCareCosts": "",
            "lostWages": 100000
        }"#;

        let input: CaseInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.category.as_deref(), Some("tower-crane"));
        assert_eq!(input.severity.as_deref(), Some("severe"));
        assert_eq!(input.selection("accident_cause"), Some("crane-collapse"));
        assert_eq!(input.selection("injury_type"), Some("paralysis"));
        assert_eq!(input.age_band.as_deref(), Some("over-60"));
        assert_eq!(input.medical_expenses, Some(200000.0));
        assert_eq!(input.future_care_costs, None);
        assert!(input.aggravating_factor);
    }

    #[test]
    fn test_serialized_input_reads_back() {
        let input = CaseInput::from_form_fields([
            ("age", "30-40"),
            ("injurySeverity", "serious"),
            ("medicalCosts", "50k-200k"),
        ]);
        let json = serde_json::to_string(&input).unwrap();
        let back: CaseInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn test_deserialize_empty_object_is_default() {
        let input: CaseInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, CaseInput::default());
    }

    #[test]
    fn test_value_accessors() {
        let mut input = CaseInput::new();
        input.set_value(CaseField::FutureCareCosts, Some(42.0));
        assert_eq!(input.value(CaseField::FutureCareCosts), Some(42.0));
        assert_eq!(input.value(CaseField::LostWages), None);
    }
}
