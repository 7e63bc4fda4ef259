// Host values into the engine and back out again.

use crate::common::MockEngine;
use qjs_bridge::{from_dynamic, to_dynamic_consuming, Dynamic, Tag};
use serde_json::json;

fn round_trip(engine: &MockEngine, value: Dynamic) -> Dynamic {
    let v = from_dynamic(engine, &value).unwrap();
    to_dynamic_consuming(v).unwrap()
}

#[test]
fn test_scalars() {
    let engine = MockEngine::new();
    for value in [
        Dynamic::Null,
        Dynamic::Bool(false),
        Dynamic::Int(-2147483648),
        Dynamic::Float(0.5),
        Dynamic::Float(-0.0),
        Dynamic::Text("text".into()),
    ] {
        let back = round_trip(&engine, value.clone());
        match (&value, &back) {
            (Dynamic::Float(a), Dynamic::Float(b)) => assert_eq!(a.to_bits(), b.to_bits()),
            _ => assert_eq!(back, value),
        }
    }
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_wide_int_becomes_float() {
    let engine = MockEngine::new();
    let v = from_dynamic(&engine, &Dynamic::Int(1 << 33)).unwrap();
    assert_eq!(v.tag(), Some(Tag::Float64));
    assert_eq!(to_dynamic_consuming(v).unwrap(), Dynamic::Float((1u64 << 33) as f64));
}

#[test]
fn test_integral_float_becomes_int() {
    let engine = MockEngine::new();
    let v = from_dynamic(&engine, &Dynamic::Float(7.0)).unwrap();
    assert_eq!(v.tag(), Some(Tag::Int32));
}

#[test]
fn test_json_document() {
    let engine = MockEngine::new();
    let doc = json!({"a": 1, "b": [true, null]});
    let back = round_trip(&engine, Dynamic::Json(doc.clone()));
    assert_eq!(back, Dynamic::Json(doc));
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_serializes_like_json() {
    let engine = MockEngine::new();
    let back = round_trip(&engine, Dynamic::Json(json!({"k": "v"})));
    assert_eq!(serde_json::to_value(&back).unwrap(), json!({"k": "v"}));
}
