//! Proptest strategies for generating logical values.

#![allow(dead_code)]

use proptest::prelude::*;
use qjs_bridge::Tag;
use serde_json::{json, Value as JsonValue};

/// Tags whose payload is an i32.
pub fn arb_immediate_tag() -> impl Strategy<Value = Tag> {
    prop::sample::select(vec![
        Tag::Int32,
        Tag::Null,
        Tag::Undefined,
        Tag::Uninitialized,
        Tag::CatchOffset,
        Tag::Exception,
    ])
}

/// Tags whose payload is a heap pointer.
pub fn arb_refcounted_tag() -> impl Strategy<Value = Tag> {
    prop::sample::select(
        Tag::ALL
            .into_iter()
            .filter(|t| t.is_refcounted())
            .collect::<Vec<_>>(),
    )
}

/// Aligned addresses every layout can carry.
pub fn arb_low_pointer() -> impl Strategy<Value = usize> {
    (1u32..u32::MAX / 16).prop_map(|n| (n as usize) * 16)
}

/// Doubles with the edge cases weighted in.
pub fn arb_double() -> impl Strategy<Value = f64> {
    prop_oneof![
        10 => prop::num::f64::NORMAL,
        3 => prop::num::f64::SUBNORMAL,
        3 => any::<i32>().prop_map(|n| n as f64),
        1 => Just(0.0),
        1 => Just(-0.0),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(f64::MAX),
        1 => Just(f64::MIN),
        1 => Just(2147483647.5),
        1 => Just(-2147483648.0),
    ]
}

/// Any bit pattern that is a NaN.
pub fn arb_nan_bits() -> impl Strategy<Value = u64> {
    (any::<bool>(), 1u64..(1u64 << 52))
        .prop_map(|(sign, mantissa)| ((sign as u64) << 63) | 0x7FF0_0000_0000_0000 | mantissa)
}

/// Small JSON documents.
pub fn arb_json() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9_ ]{0,12}".prop_map(JsonValue::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| JsonValue::Object(m.into_iter().collect())),
        ]
    })
}
