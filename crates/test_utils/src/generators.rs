//! Property-Based Test Generators
//!
//! Provides proptest strategies for calculator answers. Numeric strategies
//! deliberately include the garbage a browser form can produce: NaN,
//! infinities, negatives, and absurdly large values.

use domain_settlement::profiles;
use domain_settlement::{CaseInput, MultiplierTable};
use proptest::collection::btree_map;
use proptest::option;
use proptest::prelude::*;

/// Strategy for one of the built-in profiles
pub fn profile_strategy() -> impl Strategy<Value = MultiplierTable> {
    prop_oneof![
        Just(profiles::opioid()),
        Just(profiles::pharmaceutical()),
        Just(profiles::crane()),
    ]
}

/// Strategy for any f64 a form might send, including non-finite values
pub fn raw_number_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => 0.0f64..1_000_000.0,
        1 => -1_000_000.0f64..0.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(1e300),
        1 => Just(f64::MAX),
    ]
}

/// Strategy for a plausible non-negative amount
pub fn amount_strategy() -> impl Strategy<Value = f64> {
    0.0f64..5_000_000.0
}

/// Strategy for ages, including out-of-range and non-finite values
pub fn age_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => 18.0f64..80.0,
        1 => -50.0f64..18.0,
        1 => 80.0f64..500.0,
        1 => Just(f64::NAN),
    ]
}

/// Strategy for age band labels, known and unknown
pub fn age_band_strategy() -> impl Strategy<Value = String> {
    let mut known: Vec<String> = Vec::new();
    for table in profiles::builtin() {
        known.extend(table.age.aliases.iter().map(|alias| alias.key.clone()));
    }
    prop_oneof![
        3 => proptest::sample::select(known),
        1 => "[a-z0-9 -]{0,12}",
    ]
}

/// Strategy for option answers, mixing known keys of every profile with
/// unknown and oddly formatted text
pub fn option_strategy() -> impl Strategy<Value = String> {
    let mut known: Vec<String> = Vec::new();
    for table in profiles::builtin() {
        known.extend(table.severity.keys().map(str::to_string));
        known.extend(table.category.keys().map(str::to_string));
        for secondary in &table.secondary {
            known.extend(secondary.table.keys().map(str::to_string));
        }
    }
    prop_oneof![
        3 => proptest::sample::select(known),
        1 => "[a-zA-Z _-]{0,16}",
    ]
}

/// Strategy for secondary selection field names
pub fn selection_field_strategy() -> impl Strategy<Value = String> {
    let mut known: Vec<String> = Vec::new();
    for table in profiles::builtin() {
        known.extend(table.secondary.iter().map(|secondary| secondary.field.clone()));
    }
    prop_oneof![
        4 => proptest::sample::select(known),
        1 => "[a-z_]{1,12}",
    ]
}

/// Strategy for arbitrary calculator answers, including garbage
pub fn case_input_strategy() -> impl Strategy<Value = CaseInput> {
    (
        option::of(age_strategy()),
        option::of(age_band_strategy()),
        option::of(option_strategy()),
        option::of(option_strategy()),
        btree_map(selection_field_strategy(), option_strategy(), 0..4),
        [
            option::of(raw_number_strategy()),
            option::of(raw_number_strategy()),
            option::of(raw_number_strategy()),
            option::of(raw_number_strategy()),
            option::of(raw_number_strategy()),
        ],
        any::<bool>(),
    )
        .prop_map(
            |(age, age_band, severity, category, selections, numbers, aggravating_factor)| {
                let [medical_expenses, future_care_costs, lost_wages, duration_years, family_size] =
                    numbers;
                CaseInput {
                    age,
                    age_band,
                    severity,
                    category,
                    selections,
                    medical_expenses,
                    future_care_costs,
                    lost_wages,
                    duration_years,
                    family_size,
                    aggravating_factor,
                }
            },
        )
}

/// Strategy for well-formed answers (finite, non-negative, in range)
pub fn clean_case_input_strategy() -> impl Strategy<Value = CaseInput> {
    (
        18.0f64..80.0,
        option::of(option_strategy()),
        [amount_strategy(), amount_strategy(), amount_strategy()],
        0.0f64..40.0,
        0.0f64..10.0,
        any::<bool>(),
    )
        .prop_map(|(age, category, amounts, duration_years, family_size, aggravating_factor)| {
            let [medical_expenses, future_care_costs, lost_wages] = amounts;
            CaseInput {
                age: Some(age),
                category,
                medical_expenses: Some(medical_expenses),
                future_care_costs: Some(future_care_costs),
                lost_wages: Some(lost_wages),
                duration_years: Some(duration_years),
                family_size: Some(family_size),
                aggravating_factor,
                ..CaseInput::default()
            }
        })
}
