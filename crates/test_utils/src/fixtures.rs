//! Pre-built Test Fixtures
//!
//! Known calculator answers with hand-computed ranges. Each expected value
//! is derived from the profile constants and checked in the integration
//! tests.

use domain_settlement::profiles::{CRANE, OPIOID, PHARMACEUTICAL};
use domain_settlement::CaseInput;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::builders::CaseInputBuilder;

/// A case with its expected low, average, and high amounts
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub profile: &'static str,
    pub input: CaseInput,
    pub low: Decimal,
    pub average: Decimal,
    pub high: Decimal,
}

/// Fixture for calculator scenarios
pub struct CaseFixtures;

impl CaseFixtures {
    /// Opioid: age 35, moderate, treatment 10,000, wages 25,000,
    /// duration 1, family 1
    ///
    /// 50,000 × 1.1 × 1.5 × (1 + 1 + 1 + 0.2 + 0.1) = 272,250
    pub fn opioid_moderate() -> Scenario {
        Scenario {
            name: "opioid moderate",
            profile: OPIOID,
            input: CaseInputBuilder::new()
                .age(35.0)
                .severity("moderate")
                .medical_expenses(10000.0)
                .lost_wages(25000.0)
                .duration_years(1.0)
                .family_size(1.0)
                .build(),
            low: dec!(163350),
            average: dec!(272250),
            high: dec!(490050),
        }
    }

    /// Opioid with nothing answered: default age 35, mild, other
    pub fn opioid_blank() -> Scenario {
        Scenario {
            name: "opioid blank form",
            profile: OPIOID,
            input: CaseInput::new(),
            low: dec!(33000),
            average: dec!(55000),
            high: dec!(99000),
        }
    }

    /// Pharmaceutical: age 30, serious, prescription drug, cancer,
    /// medical 100,000, two years of use
    ///
    /// 100,000 × 1.3 × 3.5 × 2.5 × 4.0 × (1 + 2 + 0.8) = 17,290,000
    pub fn pharmaceutical_cancer() -> Scenario {
        Scenario {
            name: "pharmaceutical cancer",
            profile: PHARMACEUTICAL,
            input: CaseInputBuilder::new()
                .age(30.0)
                .severity("serious")
                .category("prescriptionDrug")
                .selection("adverse_event", "cancer")
                .medical_expenses(100000.0)
                .duration_years(2.0)
                .build(),
            low: dec!(8645000),
            average: dec!(17290000),
            high: dec!(25935000),
        }
    }

    /// Crane: tower crane collapse, uncertified operator, safety violation
    ///
    /// 600,000 × 1.3 × 3.1 × 1.4 × 1.5 × 1.4 × 1.5 × 1.8 = 19,194,084,
    /// rounded to the nearest thousand
    pub fn crane_collapse() -> Scenario {
        Scenario {
            name: "crane collapse",
            profile: CRANE,
            input: CaseInputBuilder::new()
                .age(45.0)
                .severity("severe")
                .category("tower-crane")
                .selection("accident_cause", "crane-collapse")
                .selection("operator_certified", "no")
                .medical_expenses(200000.0)
                .future_care_costs(300000.0)
                .lost_wages(100000.0)
                .duration_years(2.0)
                .family_size(3.0)
                .aggravated()
                .build(),
            low: dec!(13436000),
            average: dec!(19194000),
            high: dec!(24952000),
        }
    }

    /// Crane page answers: tower crane, severe paralysis, willful safety
    /// violations, age band over-60, no amounts entered
    ///
    /// 150,000 floor × 0.9 × 3.1 × 1.4 × 1.75 × 1.5 = 1,537,987.5,
    /// rounded to the nearest thousand
    pub fn crane_page_bands() -> Scenario {
        Scenario {
            name: "crane page bands",
            profile: CRANE,
            input: CaseInput::from_form_fields([
                ("craneType", "tower-crane"),
                ("injurySeverity", "severe"),
                ("safetyViolations", "willful-violations"),
                ("injuryType", "paralysis"),
                ("age", "over-60"),
            ]),
            low: dec!(1077000),
            average: dec!(1538000),
            high: dec!(1999000),
        }
    }

    /// Pharmaceutical page answers with usage duration and medical costs
    /// given as bands
    ///
    /// 100,000 × 1.3 × 3.5 × 2.5 × (4.0 × 2.0 × 7.0 × 2.0 × 1.8) = 229,320,000
    pub fn pharmaceutical_page_bands() -> Scenario {
        Scenario {
            name: "pharmaceutical page bands",
            profile: PHARMACEUTICAL,
            input: CaseInput::from_form_fields([
                ("drugType", "prescriptionDrug"),
                ("adverseEvent", "cancer"),
                ("usageDuration", "over5years"),
                ("recallStatus", "classIRecall"),
                ("injurySeverity", "serious"),
                ("age", "30"),
                ("medicalCosts", "over1m"),
                ("fdaWarning", "blackBox"),
            ]),
            low: dec!(114660000),
            average: dec!(229320000),
            high: dec!(343980000),
        }
    }

    /// Every scenario with a hand-computed range
    pub fn all() -> Vec<Scenario> {
        vec![
            Self::opioid_moderate(),
            Self::opioid_blank(),
            Self::pharmaceutical_cancer(),
            Self::crane_collapse(),
            Self::crane_page_bands(),
            Self::pharmaceutical_page_bands(),
        ]
    }
}

/// Fixture for profile documents
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// A minimal valid profile document
    pub fn minimal_json() -> String {
        serde_json::json!({
            "code": "dog-bite",
            "name": "Dog Bite",
            "age": {
                "min_age": 0,
                "max_age": 100,
                "default_age": 30,
                "bands": [{ "below": 18, "factor": "1.2" }],
                "otherwise": "1.0"
            },
            "base": { "strategy": "fixed", "amount": "20000" },
            "severity": {
                "entries": [
                    { "key": "minor", "factor": "1.0" },
                    { "key": "major", "factor": "2.0" }
                ],
                "default_key": "minor"
            },
            "terms": [
                { "field": "medical_expenses", "divisor": "5000", "cap": "4" }
            ],
            "range": { "low_ratio": "0.75", "high_ratio": "1.25" }
        })
        .to_string()
    }

    /// A profile document whose severity levels decrease
    pub fn non_monotonic_json() -> String {
        Self::minimal_json().replace(r#""factor":"2.0""#, r#""factor":"0.5""#)
    }
}
