//! Projection between engine values and host values.
//!
//! | tag                                   | host                              |
//! |---------------------------------------|-----------------------------------|
//! | STRING                                | `Text`                            |
//! | INT32                                 | `Int`                             |
//! | BOOL                                  | `Bool`                            |
//! | NULL, UNDEFINED, UNINITIALIZED        | `Null`                            |
//! | FLOAT64                               | `Float`                           |
//! | BIG_FLOAT, BIG_DECIMAL                | `Float` (engine numeric coercion) |
//! | BIG_INT                               | `Int`, or `OutOfRange` past `i64` |
//! | OBJECT                                | `Json` via `JSON.stringify`       |
//! | SYMBOL, CATCH_OFFSET, EXCEPTION, ...  | [`ProjectionError::Unsupported`]  |
//!
//! When the engine throws while serving a projection, the pending exception is
//! cleared and logged, and the projection fails. Exceptions never escape as
//! panics.

mod dynamic;
mod text;

use log::warn;

use crate::error::{ProjectionError, ProjectionResult};
use crate::ffi::{self, take_exception, Engine, Int64Coercion};
use crate::value::repr::{ActiveCodec, Codec, JSValue};
use crate::value::{OwnedValue, Tag};

pub use dynamic::Dynamic;
pub use text::{new_string, new_string_utf16, to_text, to_text_utf16};

/// Project a borrowed engine value. `value` is not released.
///
/// Every engine call made here runs with floating-point traps masked. The
/// result never holds an `EXCEPTION` value: an exception thrown by coercion or
/// `JSON.stringify` is taken, logged and released, and the projection fails.
/// Projecting a value that is itself tagged `EXCEPTION` fails with
/// [`ProjectionError::Unsupported`] and leaves any pending exception alone.
pub fn to_dynamic<E: Engine + ?Sized>(engine: &E, value: JSValue) -> ProjectionResult<Dynamic> {
    let tag = ActiveCodec::tag_of(value)
        .ok_or_else(|| ProjectionError::UnknownTag(ActiveCodec::decode_norm_tag(value)))?;
    match tag {
        Tag::String => to_text(engine, value).map(Dynamic::Text),
        Tag::Int32 => Ok(Dynamic::Int(ActiveCodec::decode_int32(value) as i64)),
        Tag::Bool => Ok(Dynamic::Bool(ActiveCodec::decode_bool(value))),
        Tag::Null | Tag::Undefined | Tag::Uninitialized => Ok(Dynamic::Null),
        Tag::Float64 => Ok(Dynamic::Float(ActiveCodec::decode_double(value))),
        Tag::BigFloat | Tag::BigDecimal => match ffi::to_float64(engine, value) {
            Some(d) => Ok(Dynamic::Float(d)),
            None => {
                discard_exception(engine, "numeric coercion");
                Err(ProjectionError::Coercion(tag))
            }
        },
        Tag::BigInt => match ffi::to_bigint64(engine, value) {
            Int64Coercion::Exact(n) => Ok(Dynamic::Int(n)),
            Int64Coercion::OutOfRange => Err(ProjectionError::OutOfRange(tag)),
            Int64Coercion::Threw => {
                discard_exception(engine, "numeric coercion");
                Err(ProjectionError::Coercion(tag))
            }
        },
        Tag::Object => object_to_dynamic(engine, value),
        Tag::Symbol | Tag::CatchOffset | Tag::Exception | Tag::FunctionBytecode | Tag::Module => {
            Err(ProjectionError::Unsupported(tag))
        }
    }
}

/// Project an owned engine value, releasing it exactly once whatever the outcome.
///
/// Exceptions are handled as in [`to_dynamic`].
pub fn to_dynamic_consuming<E: Engine + ?Sized>(value: OwnedValue<'_, E>) -> ProjectionResult<Dynamic> {
    to_dynamic(value.engine(), value.as_raw())
}

fn object_to_dynamic<E: Engine + ?Sized>(engine: &E, value: JSValue) -> ProjectionResult<Dynamic> {
    let json = ffi::json_stringify(engine, value);
    if json.is_exception() {
        discard_exception(engine, "JSON.stringify");
        return Err(ProjectionError::Exception("JSON.stringify"));
    }
    // Objects without a JSON form (functions, `toJSON` returning undefined)
    // come back as UNDEFINED and project to null.
    match to_dynamic_consuming(json)? {
        Dynamic::Text(s) => Ok(Dynamic::Json(serde_json::from_str(&s)?)),
        other => Ok(other),
    }
}

/// Build an engine value from a host value.
///
/// Integers that fit become INT32 and other numbers FLOAT64, with the same
/// selection rule as the codec. Fails if the engine throws while building a
/// string or parsing JSON.
pub fn from_dynamic<'e, E: Engine + ?Sized>(
    engine: &'e E,
    value: &Dynamic,
) -> ProjectionResult<OwnedValue<'e, E>> {
    let raw = match value {
        Dynamic::Null => crate::sentinels().null,
        Dynamic::Bool(b) => ActiveCodec::encode_bool(*b),
        Dynamic::Int(n) => ActiveCodec::encode_i64(*n),
        Dynamic::Float(d) => ActiveCodec::encode_number(*d),
        Dynamic::Text(s) => return checked(engine, new_string(engine, s), "string construction"),
        Dynamic::Json(v) => {
            let text = serde_json::to_string(v)?;
            return checked(engine, ffi::json_parse(engine, &text), "JSON.parse");
        }
    };
    // SAFETY: immediates and doubles own nothing.
    Ok(unsafe { OwnedValue::from_raw(engine, raw) })
}

fn checked<'e, E: Engine + ?Sized>(
    engine: &'e E,
    value: OwnedValue<'e, E>,
    during: &'static str,
) -> ProjectionResult<OwnedValue<'e, E>> {
    if value.is_exception() {
        discard_exception(engine, during);
        Err(ProjectionError::Exception(during))
    } else {
        Ok(value)
    }
}

/// Clear the pending exception, logging what it said.
pub(crate) fn discard_exception<E: Engine + ?Sized>(engine: &E, during: &str) {
    let exception = take_exception(engine);
    let message = text::coerce_to_string(engine, exception.as_raw());
    if message.is_none() {
        // Printing the exception threw in turn.
        drop(take_exception(engine));
    }
    warn!(
        "engine raised an exception during {}: {}",
        during,
        message.as_deref().unwrap_or("<unprintable>")
    );
}
