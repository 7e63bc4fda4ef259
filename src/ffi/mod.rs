//! The engine boundary.
//!
//! The bridge consumes a small fixed set of engine entry points, collected in
//! the [`Engine`] trait. [`bindings`] implements it against the native library
//! (feature `quickjs-ffi`); tests implement it in Rust.
//!
//! Ownership follows the engine's conventions: methods that return a
//! [`JSValue`] return a new reference the caller must release, and methods
//! taking a [`JSValue`] only borrow it.

#[cfg(feature = "quickjs-ffi")]
pub mod bindings;
pub mod fpu;
pub mod interrupt;

use std::ffi::c_char;
use std::ptr::NonNull;

use crate::value::repr::JSValue;
use crate::value::OwnedValue;

pub use fpu::{with_masked_fpu, FpState, FpuGuard};
pub use interrupt::{poll_interrupt, InterruptHandle};

/// Entry points of one engine context.
///
/// Calls may run script code (getters, `toJSON`, `toString`) and must happen on
/// the thread that owns the context. Any value returned may be tagged
/// `EXCEPTION`; the exception itself is then pending and retrieved with
/// [`Engine::exception`].
pub trait Engine {
    /// Free a heap block whose reference count reached zero.
    ///
    /// # Safety
    ///
    /// `value` must be ref-counted with a count of zero, and must not be used
    /// afterwards.
    unsafe fn free_value(&self, value: JSValue);

    /// String coercion. Returns a NUL-terminated UTF-8 buffer and its length in
    /// bytes, or `None` if coercion threw.
    fn to_cstring(&self, value: JSValue) -> Option<(NonNull<c_char>, usize)>;

    /// Release a buffer from [`Engine::to_cstring`].
    ///
    /// # Safety
    ///
    /// `buf` must come from `to_cstring` on this engine and not be freed twice.
    unsafe fn free_cstring(&self, buf: NonNull<c_char>);

    /// `JSON.stringify(value)`. May be `UNDEFINED` or `EXCEPTION`.
    fn json_stringify(&self, value: JSValue) -> JSValue;

    /// `JSON.parse(text)`. May be `EXCEPTION`.
    fn json_parse(&self, text: &str) -> JSValue;

    /// Take the pending exception, leaving none pending.
    fn exception(&self) -> JSValue;

    /// Numeric coercion to a double, or `None` if coercion threw.
    fn to_float64(&self, value: JSValue) -> Option<f64>;

    /// Coercion of a big integer to `i64`.
    ///
    /// Must report [`Int64Coercion::OutOfRange`] for integers outside the `i64`
    /// range rather than wrapping them modulo 2^64.
    fn to_bigint64(&self, value: JSValue) -> Int64Coercion;

    /// A new string value holding `text`.
    fn new_string(&self, text: &str) -> JSValue;

    /// Evaluate `source` as a global script.
    fn eval(&self, source: &str, filename: &str) -> JSValue;
}

/// Outcome of [`Engine::to_bigint64`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Int64Coercion {
    Exact(i64),
    /// The integer needs more than 64 bits. No exception is pending.
    OutOfRange,
    /// Coercion threw and the exception is pending.
    Threw,
}

impl Int64Coercion {
    /// Classify the decimal digits of a big integer.
    pub fn from_decimal(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(n) => Int64Coercion::Exact(n),
            Err(_) => Int64Coercion::OutOfRange,
        }
    }
}

/// Evaluate a script with floating-point traps masked.
///
/// The result may be tagged `EXCEPTION`; see [`take_exception`].
pub fn eval<'e, E: Engine + ?Sized>(engine: &'e E, source: &str, filename: &str) -> OwnedValue<'e, E> {
    let raw = with_masked_fpu(|| engine.eval(source, filename));
    // SAFETY: eval returns a new reference.
    unsafe { OwnedValue::from_raw(engine, raw) }
}

/// Parse JSON text into an engine value with floating-point traps masked.
///
/// The result may be tagged `EXCEPTION`.
pub fn json_parse<'e, E: Engine + ?Sized>(engine: &'e E, text: &str) -> OwnedValue<'e, E> {
    let raw = with_masked_fpu(|| engine.json_parse(text));
    // SAFETY: json_parse returns a new reference.
    unsafe { OwnedValue::from_raw(engine, raw) }
}

/// Serialize an engine value to JSON with floating-point traps masked.
///
/// The result may be tagged `EXCEPTION` or `UNDEFINED`.
pub fn json_stringify<'e, E: Engine + ?Sized>(engine: &'e E, value: JSValue) -> OwnedValue<'e, E> {
    let raw = with_masked_fpu(|| engine.json_stringify(value));
    // SAFETY: json_stringify returns a new reference.
    unsafe { OwnedValue::from_raw(engine, raw) }
}

/// Numeric coercion with floating-point traps masked.
///
/// `None` means coercion threw and the exception is pending.
pub fn to_float64<E: Engine + ?Sized>(engine: &E, value: JSValue) -> Option<f64> {
    with_masked_fpu(|| engine.to_float64(value))
}

/// Big integer coercion with floating-point traps masked.
pub fn to_bigint64<E: Engine + ?Sized>(engine: &E, value: JSValue) -> Int64Coercion {
    with_masked_fpu(|| engine.to_bigint64(value))
}

/// Take the pending exception out of the engine.
pub fn take_exception<E: Engine + ?Sized>(engine: &E) -> OwnedValue<'_, E> {
    let raw = engine.exception();
    // SAFETY: the engine hands over its reference to the pending exception.
    unsafe { OwnedValue::from_raw(engine, raw) }
}
