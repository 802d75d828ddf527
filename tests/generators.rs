//! Proptest strategies shared by the integration tests.
//!
//! Values cover every variant, with edge cases for integers, doubles and
//! strings, and containers nested a few levels deep.

#![allow(dead_code)]

use std::ops::RangeInclusive;

use buddyvault::{Buddy, BuddyList, BuddyListSettings, BuddyVariable, Object, Value};
use proptest::{collection::vec, prelude::*, string::string_regex};

const SMALL_SIZE: RangeInclusive<usize> = 0..=8;

/// Owner names, including characters that are unsafe in file names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        string_regex("[a-zA-Z0-9_]{1,16}").unwrap(),
        string_regex(r"[/\\:*?<>|. ]{1,8}").unwrap(),
        Just("\0".to_string()),
        Just("..".to_string()),
        any::<String>().prop_filter("non-empty", |s| !s.is_empty()),
    ]
}

pub fn string_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        string_regex("[a-zA-Z0-9]{1,10}").unwrap(),
        string_regex("[a-z]{120,300}").unwrap(),
        any::<String>(),
    ]
}

pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        prop_oneof![
            Just(i64::MIN),
            Just(-1i64),
            Just(0i64),
            Just(i64::MAX),
            any::<i64>(),
        ]
        .prop_map(Value::Int),
        prop_oneof![
            Just(0.0f64),
            Just(-0.0f64),
            Just(f64::INFINITY),
            Just(f64::MIN_POSITIVE),
            Just(f64::NAN),
            any::<f64>(),
        ]
        .prop_map(Value::Double),
        string_strategy().prop_map(Value::Str),
    ]
}

/// Any value, up to four container levels deep.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            vec(inner.clone(), SMALL_SIZE).prop_map(Value::Array),
            vec((string_strategy(), inner), SMALL_SIZE)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Object>())),
        ]
    })
}

pub fn variable_strategy() -> impl Strategy<Value = BuddyVariable> {
    (
        any::<bool>(),
        string_regex("[a-z]{1,8}").unwrap(),
        value_strategy(),
    )
        .prop_map(|(offline, name, value)| {
            let name = if offline { format!("${name}") } else { name };
            BuddyVariable::new(name, value)
        })
}

/// A live list whose buddies have unique names; some are transient or
/// blocked.
pub fn buddy_list_strategy() -> impl Strategy<Value = BuddyList> {
    (
        name_strategy(),
        proptest::collection::btree_map(
            string_regex("[a-z]{1,6}").unwrap(),
            (any::<bool>(), any::<bool>()),
            0..20,
        ),
        vec(variable_strategy(), 0..5),
    )
        .prop_map(|(owner, buddies, variables)| {
            let policy = BuddyListSettings {
                allow_offline_variables: true,
                max_buddy_list_size: usize::MAX,
            };
            let mut list = BuddyList::new(owner);
            for (name, (blocked, temp)) in buddies {
                let buddy = if temp {
                    Buddy::temporary(name)
                } else {
                    Buddy::new(name)
                };
                list.add_buddy(buddy.blocked(blocked), &policy)
                    .expect("unique names below capacity");
            }
            for var in variables {
                list.set_variable(var);
            }
            list
        })
}

/// Structural equality that treats NaN as equal to itself.
pub fn value_eq(
    a: &Value,
    b: &Value,
) -> bool {
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => x.to_bits() == y.to_bits() || x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| value_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && value_eq(va, vb))
        }
        _ => a == b,
    }
}
