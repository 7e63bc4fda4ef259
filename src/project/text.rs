//! Text exchange with the engine.
//!
//! The engine hands out NUL-terminated UTF-8 buffers it owns; they are copied
//! into a `String` and released before returning, on every path.

use std::ffi::c_char;
use std::ptr::NonNull;
use std::slice;

use crate::error::{ProjectionError, ProjectionResult};
use crate::ffi::{with_masked_fpu, Engine};
use crate::project::discard_exception;
use crate::value::repr::JSValue;
use crate::value::OwnedValue;

struct EngineCString<'e, E: Engine + ?Sized> {
    engine: &'e E,
    buf: NonNull<c_char>,
    len: usize,
}

impl<E: Engine + ?Sized> EngineCString<'_, E> {
    fn to_string_lossy(&self) -> String {
        // SAFETY: the engine guarantees `len` readable bytes until the buffer is freed.
        let bytes = unsafe { slice::from_raw_parts(self.buf.as_ptr() as *const u8, self.len) };
        String::from_utf8_lossy(bytes).into_owned()
    }
}

impl<E: Engine + ?Sized> Drop for EngineCString<'_, E> {
    fn drop(&mut self) {
        // SAFETY: the buffer came from `to_cstring` on this engine and is freed once.
        unsafe { self.engine.free_cstring(self.buf) }
    }
}

/// String coercion without touching the pending exception.
///
/// Coercing an object runs its `toString`, so the call is guarded.
pub(crate) fn coerce_to_string<E: Engine + ?Sized>(engine: &E, value: JSValue) -> Option<String> {
    let (buf, len) = with_masked_fpu(|| engine.to_cstring(value))?;
    let cstr = EngineCString { engine, buf, len };
    Some(cstr.to_string_lossy())
}

/// Copy the engine's string coercion of `value` into an owned `String`.
///
/// Invalid UTF-8 (lone surrogates) is replaced with U+FFFD. Objects run their
/// own `toString` with floating-point traps masked. No `EXCEPTION` value is ever
/// returned: if coercion throws, the pending exception is taken, logged and
/// released, and the call fails with [`ProjectionError::StringConversion`].
pub fn to_text<E: Engine + ?Sized>(engine: &E, value: JSValue) -> ProjectionResult<String> {
    match coerce_to_string(engine, value) {
        Some(s) => Ok(s),
        None => {
            discard_exception(engine, "string coercion");
            Err(ProjectionError::StringConversion)
        }
    }
}

/// [`to_text`] as UTF-16 code units.
pub fn to_text_utf16<E: Engine + ?Sized>(engine: &E, value: JSValue) -> ProjectionResult<Vec<u16>> {
    Ok(to_text(engine, value)?.encode_utf16().collect())
}

/// A new string value. The result may be tagged `EXCEPTION` (out of memory).
pub fn new_string<'e, E: Engine + ?Sized>(engine: &'e E, text: &str) -> OwnedValue<'e, E> {
    let raw = engine.new_string(text);
    // SAFETY: new_string returns a new reference.
    unsafe { OwnedValue::from_raw(engine, raw) }
}

/// A new string value from UTF-16 code units. Fails on unpaired surrogates.
pub fn new_string_utf16<'e, E: Engine + ?Sized>(
    engine: &'e E,
    units: &[u16],
) -> ProjectionResult<OwnedValue<'e, E>> {
    let text = String::from_utf16(units)?;
    Ok(new_string(engine, &text))
}
