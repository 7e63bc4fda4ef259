// Integration tests for projecting engine values into host values.

use crate::common::{HeapPayload, MockEngine};
use qjs_bridge::{
    to_dynamic, to_dynamic_consuming, to_text, ActiveCodec, Codec, Dynamic, ProjectionError, Tag,
};
use serde_json::json;

#[test]
fn test_string_projects_to_text() {
    let engine = MockEngine::new();
    let s = engine.string("hello");
    assert_eq!(to_dynamic(&engine, s.as_raw()).unwrap(), Dynamic::Text("hello".into()));
    assert_eq!(engine.outstanding_cstrings(), 0);
}

#[test]
fn test_int_projects_to_int() {
    let engine = MockEngine::new();
    let v = ActiveCodec::encode_int32(42);
    assert_eq!(to_dynamic(&engine, v).unwrap(), Dynamic::Int(42));
}

#[test]
fn test_object_projects_to_json() {
    let engine = MockEngine::new();
    let obj = engine.object(json!({"a": 1}));
    let projected = to_dynamic(&engine, obj.as_raw()).unwrap();
    assert_eq!(projected, Dynamic::Json(json!({"a": 1})));
    drop(obj);
    // The intermediate JSON string was released along with the object.
    assert_eq!(engine.live(), 0);
    assert_eq!(engine.outstanding_cstrings(), 0);
}

#[test]
fn test_nested_object() {
    let engine = MockEngine::new();
    let value = json!({"list": [1, 2.5, "x", null], "nested": {"ok": true}});
    let obj = engine.object(value.clone());
    assert_eq!(
        to_dynamic_consuming(obj).unwrap(),
        Dynamic::Json(value)
    );
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_symbol_is_unsupported() {
    let engine = MockEngine::new();
    let sym = engine.symbol("tag");
    let err = to_dynamic(&engine, sym.as_raw()).unwrap_err();
    assert!(matches!(err, ProjectionError::Unsupported(Tag::Symbol)));
    assert_eq!(err.to_string(), "values tagged symbol have no host representation");
}

#[test]
fn test_internal_tags_are_unsupported() {
    let engine = MockEngine::new();
    for tag in [Tag::CatchOffset, Tag::Exception] {
        let v = ActiveCodec::mkval(tag, 0);
        let err = to_dynamic(&engine, v).unwrap_err();
        assert!(matches!(err, ProjectionError::Unsupported(t) if t == tag), "{tag}");
    }
}

#[test]
fn test_null_like_values() {
    let engine = MockEngine::new();
    let s = qjs_bridge::sentinels();
    for v in [s.null, s.undefined, s.uninitialized] {
        assert_eq!(to_dynamic(&engine, v).unwrap(), Dynamic::Null);
    }
}

#[test]
fn test_raw_null_word() {
    let engine = MockEngine::new();
    let v = ActiveCodec::mkval(Tag::Null, 0);
    assert_eq!(ActiveCodec::tag_of(v), Some(Tag::Null));
    assert!(to_dynamic(&engine, v).unwrap().is_null());
}

#[test]
fn test_bools_and_floats() {
    let engine = MockEngine::new();
    assert_eq!(
        to_dynamic(&engine, ActiveCodec::encode_bool(true)).unwrap(),
        Dynamic::Bool(true)
    );
    assert_eq!(
        to_dynamic(&engine, ActiveCodec::encode_float(3.5)).unwrap(),
        Dynamic::Float(3.5)
    );
    let nan = to_dynamic(&engine, ActiveCodec::encode_float(f64::NAN)).unwrap();
    assert!(nan.as_f64().unwrap().is_nan());
}

#[test]
fn test_bigint_uses_engine_coercion() {
    let engine = MockEngine::new();
    let big = engine.owned(HeapPayload::BigInt(1 << 40));
    assert_eq!(to_dynamic(&engine, big.as_raw()).unwrap(), Dynamic::Int(1 << 40));
}

#[test]
fn test_bigfloat_uses_engine_coercion() {
    let engine = MockEngine::new();
    let big = engine.owned(HeapPayload::BigFloat(0.125));
    assert_eq!(to_dynamic(&engine, big.as_raw()).unwrap(), Dynamic::Float(0.125));
}

#[test]
fn test_stringify_exception_is_cleared() {
    let engine = MockEngine::new();
    let obj = engine.object(json!({"self": "cycle"}));
    engine.throw_on_stringify(true);
    let err = to_dynamic(&engine, obj.as_raw()).unwrap_err();
    assert!(matches!(err, ProjectionError::Exception("JSON.stringify")));
    assert!(!engine.has_pending_exception());
    drop(obj);
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_to_text_coerces_numbers() {
    let engine = MockEngine::new();
    assert_eq!(to_text(&engine, ActiveCodec::encode_int32(-7)).unwrap(), "-7");
    assert_eq!(engine.outstanding_cstrings(), 0);
}

#[test]
fn test_to_text_failure_clears_exception() {
    let engine = MockEngine::new();
    let sym = engine.symbol("s");
    let err = to_text(&engine, sym.as_raw()).unwrap_err();
    assert!(matches!(err, ProjectionError::StringConversion));
    assert!(!engine.has_pending_exception());
    assert_eq!(engine.outstanding_cstrings(), 0);
}

#[test]
fn test_utf16_text() {
    let engine = MockEngine::new();
    let s = engine.string("h\u{e9}\u{1F600}");
    let units = qjs_bridge::project::to_text_utf16(&engine, s.as_raw()).unwrap();
    assert_eq!(units, "h\u{e9}\u{1F600}".encode_utf16().collect::<Vec<_>>());

    let lone = [0xD800u16];
    let err = qjs_bridge::project::new_string_utf16(&engine, &lone).unwrap_err();
    assert!(matches!(err, ProjectionError::Utf16(_)));
}

#[test]
fn test_wide_bigint_is_out_of_range() {
    let engine = MockEngine::new();
    // 2^64 + 5 must not wrap to 5.
    let big = engine.owned(HeapPayload::BigInt((1i128 << 64) + 5));
    let err = to_dynamic(&engine, big.as_raw()).unwrap_err();
    assert!(matches!(err, ProjectionError::OutOfRange(Tag::BigInt)));
    assert!(!engine.has_pending_exception());
    drop(big);
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_bigint_at_i64_bounds() {
    let engine = MockEngine::new();
    for n in [i64::MIN, i64::MAX] {
        let big = engine.owned(HeapPayload::BigInt(n as i128));
        assert_eq!(to_dynamic(&engine, big.as_raw()).unwrap(), Dynamic::Int(n));
    }
    let past = engine.owned(HeapPayload::BigInt(i64::MAX as i128 + 1));
    assert!(matches!(
        to_dynamic(&engine, past.as_raw()),
        Err(ProjectionError::OutOfRange(Tag::BigInt))
    ));
}
