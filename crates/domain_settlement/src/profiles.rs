//! Built-in multiplier tables
//!
//! One table per calculator page. Deployments may override any of them by
//! registering a table with the same code (see [`crate::registry`]).

use rust_decimal_macros::dec;

use core_kernel::Currency;

use crate::input::{CaseField, MEDICAL_COST_BAND};
use crate::table::{
    AgeBand, AgeSchedule, BaseStrategy, FactorTable, MultiplierTable, RangePolicy, ScaledTerm,
    SecondaryTable,
};

pub const OPIOID: &str = "opioid";
pub const PHARMACEUTICAL: &str = "pharmaceutical";
pub const CRANE: &str = "crane";

/// All built-in tables
pub fn builtin() -> Vec<MultiplierTable> {
    vec![opioid(), pharmaceutical(), crane()]
}

/// Opioid addiction calculator
///
/// Fixed base of 50,000. Treatment costs, lost wages, addiction duration
/// and family size contribute capped additive terms. Overdose history is
/// the aggravating factor. Range is 0.6× to 1.8× the average.
pub fn opioid() -> MultiplierTable {
    MultiplierTable {
        code: OPIOID.to_string(),
        name: "Opioid Addiction".to_string(),
        currency: Currency::USD,
        age: AgeSchedule {
            min_age: 18,
            max_age: 80,
            default_age: 35,
            bands: vec![
                AgeBand { below: 30, factor: dec!(1.3) },
                AgeBand { below: 50, factor: dec!(1.1) },
                AgeBand { below: 65, factor: dec!(1.0) },
            ],
            otherwise: dec!(0.8),
            aliases: Vec::new(),
        },
        base: BaseStrategy::Fixed { amount: dec!(50000) },
        severity: FactorTable::new(&[
            ("mild", dec!(1.0)),
            ("moderate", dec!(1.5)),
            ("severe", dec!(2.5)),
            ("overdose-survival", dec!(3.5)),
        ])
        .with_default("mild"),
        category: FactorTable::new(&[
            ("oxycontin", dec!(1.2)),
            ("fentanyl", dec!(1.3)),
            ("oxycodone", dec!(1.1)),
            ("hydrocodone", dec!(1.1)),
            ("morphine", dec!(1.0)),
            ("other", dec!(1.0)),
        ])
        .with_default("other"),
        secondary: Vec::new(),
        terms: vec![
            ScaledTerm::new(CaseField::MedicalExpenses, dec!(10000), dec!(10)),
            ScaledTerm::new(CaseField::LostWages, dec!(25000), dec!(8)),
            ScaledTerm::new(CaseField::DurationYears, dec!(5), dec!(2.0)),
            ScaledTerm::new(CaseField::FamilySize, dec!(10), dec!(0.5)),
        ],
        aggravating_factor: dec!(1.25),
        range: RangePolicy::new(dec!(0.6), dec!(1.8)),
    }
}

/// Pharmaceutical injury calculator
///
/// Fixed base of 100,000 scaled by drug type, adverse event, usage
/// duration, recall status and FDA warning. Medical costs and usage
/// duration given as numbers contribute capped terms; the page's banded
/// answers (`over5years`, `over1m`) select a multiplier instead. Range is
/// 0.5× to 1.5× the average.
pub fn pharmaceutical() -> MultiplierTable {
    MultiplierTable {
        code: PHARMACEUTICAL.to_string(),
        name: "Pharmaceutical Injury".to_string(),
        currency: Currency::USD,
        age: AgeSchedule {
            min_age: 18,
            max_age: 80,
            default_age: 45,
            bands: vec![
                AgeBand { below: 40, factor: dec!(1.3) },
                AgeBand { below: 65, factor: dec!(1.0) },
            ],
            otherwise: dec!(0.95),
            aliases: Vec::new(),
        },
        base: BaseStrategy::Fixed { amount: dec!(100000) },
        severity: FactorTable::new(&[
            ("minor", dec!(1.0)),
            ("moderate", dec!(2.0)),
            ("serious", dec!(3.5)),
            ("catastrophic", dec!(5.0)),
            ("fatal", dec!(6.0)),
        ])
        .with_default("minor"),
        category: FactorTable::new(&[
            ("prescription-drug", dec!(2.5)),
            ("over-the-counter", dec!(1.8)),
            ("vaccine", dec!(2.0)),
            ("medical-device", dec!(2.3)),
            ("supplement", dec!(1.5)),
        ]),
        secondary: vec![
            SecondaryTable::new(
                "adverse_event",
                FactorTable::new(&[
                    ("cancer", dec!(4.0)),
                    ("heart-attack", dec!(3.5)),
                    ("stroke", dec!(3.5)),
                    ("organ-damage", dec!(3.2)),
                    ("birth-defect", dec!(4.5)),
                    ("neurological-damage", dec!(3.8)),
                    ("death", dec!(5.0)),
                ]),
            ),
            SecondaryTable::new(
                "usage_duration",
                FactorTable::new(&[
                    ("under6months", dec!(1.0)),
                    ("6months-2years", dec!(1.3)),
                    ("2-5years", dec!(1.6)),
                    ("over5years", dec!(2.0)),
                ])
                .with_default("under6months"),
            ),
            SecondaryTable::new(
                MEDICAL_COST_BAND,
                FactorTable::new(&[
                    ("under50k", dec!(1.0)),
                    ("50k-200k", dec!(2.0)),
                    ("200k-500k", dec!(3.5)),
                    ("500k-1m", dec!(5.0)),
                    ("over1m", dec!(7.0)),
                ])
                .with_default("under50k"),
            ),
            SecondaryTable::new(
                "recall_status",
                FactorTable::new(&[
                    ("class-i-recall", dec!(2.0)),
                    ("class-ii-recall", dec!(1.5)),
                    ("class-iii-recall", dec!(1.2)),
                    ("no-recall", dec!(1.0)),
                ])
                .with_default("no-recall"),
            ),
            SecondaryTable::new(
                "fda_warning",
                FactorTable::new(&[
                    ("black-box", dec!(1.8)),
                    ("safety-alert", dec!(1.5)),
                    ("recall", dec!(1.7)),
                    ("none", dec!(1.0)),
                ])
                .with_default("none"),
            ),
        ],
        terms: vec![
            ScaledTerm::new(CaseField::MedicalExpenses, dec!(50000), dec!(6)),
            ScaledTerm::new(CaseField::DurationYears, dec!(2.5), dec!(1.0)),
        ],
        aggravating_factor: dec!(1.3),
        range: RangePolicy::new(dec!(0.5), dec!(1.5)),
    }
}

/// Crane accident calculator
///
/// Base is the claimant's economic damages (medical, future care, lost
/// wages) with a floor of 150,000; those fields are not reused as terms.
/// Any safety violation is the aggravating factor. The page asks for age
/// as a band, mapped here to a representative age. Amounts are rounded to
/// the nearest thousand, the range is 0.7× to 1.3× the average, and the
/// high end is never below 250,000.
pub fn crane() -> MultiplierTable {
    MultiplierTable {
        code: CRANE.to_string(),
        name: "Crane Accident".to_string(),
        currency: Currency::USD,
        age: AgeSchedule {
            min_age: 18,
            max_age: 80,
            default_age: 40,
            bands: vec![
                AgeBand { below: 30, factor: dec!(1.7) },
                AgeBand { below: 41, factor: dec!(1.5) },
                AgeBand { below: 51, factor: dec!(1.3) },
                AgeBand { below: 61, factor: dec!(1.1) },
            ],
            otherwise: dec!(0.9),
            aliases: Vec::new(),
        }
        .with_aliases(&[
            ("under-30", 25),
            ("30-40", 35),
            ("41-50", 45),
            ("51-60", 55),
            ("over-60", 65),
        ]),
        base: BaseStrategy::EconomicDamages {
            fields: vec![
                CaseField::MedicalExpenses,
                CaseField::FutureCareCosts,
                CaseField::LostWages,
            ],
            floor: dec!(150000),
        },
        severity: FactorTable::new(&[
            ("minor", dec!(1.0)),
            ("moderate", dec!(1.5)),
            ("serious", dec!(2.3)),
            ("severe", dec!(3.1)),
            ("catastrophic", dec!(4.0)),
            ("fatal", dec!(4.5)),
        ])
        .with_default("minor"),
        category: FactorTable::new(&[
            ("tower-crane", dec!(1.4)),
            ("mobile-crane", dec!(1.3)),
            ("crawler-crane", dec!(1.3)),
            ("all-terrain", dec!(1.25)),
            ("rough-terrain", dec!(1.2)),
            ("overhead-crane", dec!(1.15)),
            ("other", dec!(1.0)),
        ])
        .with_default("other"),
        secondary: vec![
            SecondaryTable::new(
                "accident_cause",
                FactorTable::new(&[
                    ("crane-collapse", dec!(1.5)),
                    ("boom-failure", dec!(1.4)),
                    ("load-dropped", dec!(1.35)),
                    ("caught-between", dec!(1.35)),
                    ("electrocution-contact", dec!(1.3)),
                    ("struck-by-load", dec!(1.25)),
                    ("overloading", dec!(1.2)),
                    ("operator-error", dec!(1.1)),
                    ("other", dec!(1.0)),
                ])
                .with_default("other"),
            ),
            SecondaryTable::new(
                "injury_type",
                FactorTable::new(&[
                    ("paralysis", dec!(1.75)),
                    ("spinal-cord-injury", dec!(1.6)),
                    ("traumatic-brain-injury", dec!(1.5)),
                    ("amputation", dec!(1.45)),
                    ("crush-injury", dec!(1.4)),
                    ("severe-burns", dec!(1.35)),
                    ("internal-injuries", dec!(1.3)),
                    ("multiple-fractures", dec!(1.25)),
                    ("other", dec!(1.0)),
                ])
                .with_default("other"),
            ),
            SecondaryTable::new(
                "operator_certified",
                FactorTable::new(&[("no", dec!(1.4)), ("expired", dec!(1.2)), ("yes", dec!(1.0))])
                    .with_default("yes"),
            ),
            SecondaryTable::new(
                "equipment_maintenance",
                FactorTable::new(&[
                    ("no-records", dec!(1.3)),
                    ("inadequate", dec!(1.25)),
                    ("adequate", dec!(1.0)),
                ])
                .with_default("adequate"),
            ),
            SecondaryTable::new(
                "permanent_disability",
                FactorTable::new(&[
                    ("total-permanent", dec!(1.8)),
                    ("partial-permanent", dec!(1.5)),
                    ("temporary-total", dec!(1.2)),
                    ("temporary-partial", dec!(1.1)),
                    ("none", dec!(1.0)),
                ])
                .with_default("none"),
            ),
        ],
        terms: vec![
            ScaledTerm::new(CaseField::DurationYears, dec!(4), dec!(1.5)),
            ScaledTerm::new(CaseField::FamilySize, dec!(10), dec!(0.5)),
        ],
        aggravating_factor: dec!(1.5),
        range: RangePolicy::new(dec!(0.7), dec!(1.3))
            .rounded_to(dec!(1000))
            .with_minimum_average(dec!(100000))
            .with_minimum_high(dec!(250000)),
    }
}
