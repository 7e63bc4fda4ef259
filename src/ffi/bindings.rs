//! Native QuickJS entry points.
//!
//! Only the functions the bridge consumes are declared. Values are passed in
//! the active [`JSValue`] layout, which must match the one `libquickjs` was
//! compiled with (see [`crate::config`]).

use std::ffi::{c_char, c_void, CString};
use std::ptr::NonNull;
use std::slice;

use libc::c_int;

use crate::error::InitError;
use crate::ffi::{poll_interrupt, Engine, Int64Coercion, InterruptHandle};
use crate::value::repr::JSValue;

/// Opaque engine runtime.
#[repr(C)]
pub struct JSRuntime {
    _private: [u8; 0],
}

/// Opaque engine context.
#[repr(C)]
pub struct JSContext {
    _private: [u8; 0],
}

pub type JSInterruptHandler = unsafe extern "C" fn(rt: *mut c_void, opaque: *mut c_void) -> c_int;

pub const JS_EVAL_TYPE_GLOBAL: c_int = 0;

#[link(name = "quickjs")]
extern "C" {
    pub fn JS_NewRuntime() -> *mut JSRuntime;
    pub fn JS_FreeRuntime(rt: *mut JSRuntime);
    pub fn JS_NewContext(rt: *mut JSRuntime) -> *mut JSContext;
    pub fn JS_FreeContext(ctx: *mut JSContext);
    pub fn JS_GetRuntime(ctx: *mut JSContext) -> *mut JSRuntime;
    pub fn __JS_FreeValueRT(rt: *mut JSRuntime, v: JSValue);
    pub fn JS_ToCStringLen2(
        ctx: *mut JSContext,
        plen: *mut usize,
        val: JSValue,
        cesu8: c_int,
    ) -> *const c_char;
    pub fn JS_FreeCString(ctx: *mut JSContext, ptr: *const c_char);
    pub fn JS_JSONStringify(
        ctx: *mut JSContext,
        obj: JSValue,
        replacer: JSValue,
        space0: JSValue,
    ) -> JSValue;
    pub fn JS_ParseJSON(
        ctx: *mut JSContext,
        buf: *const c_char,
        buf_len: usize,
        filename: *const c_char,
    ) -> JSValue;
    pub fn JS_GetException(ctx: *mut JSContext) -> JSValue;
    pub fn JS_ToFloat64(ctx: *mut JSContext, pres: *mut f64, val: JSValue) -> c_int;
    pub fn JS_ToBigInt64(ctx: *mut JSContext, pres: *mut i64, val: JSValue) -> c_int;
    pub fn JS_NewStringLen(ctx: *mut JSContext, str1: *const c_char, len1: usize) -> JSValue;
    pub fn JS_Eval(
        ctx: *mut JSContext,
        input: *const c_char,
        input_len: usize,
        filename: *const c_char,
        eval_flags: c_int,
    ) -> JSValue;
    pub fn JS_SetInterruptHandler(
        rt: *mut JSRuntime,
        cb: Option<JSInterruptHandler>,
        opaque: *mut c_void,
    );
}

/// NUL-terminated copy; the engine reads one byte past `len`.
fn nul_terminated(text: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(text.len() + 1);
    buf.extend_from_slice(text.as_bytes());
    buf.push(0);
    buf
}

fn c_filename(name: &str) -> CString {
    CString::new(name).unwrap_or_else(|_| CString::from(c"<input>"))
}

/// A runtime with a single context.
pub struct QuickJs {
    rt: NonNull<JSRuntime>,
    ctx: NonNull<JSContext>,
    interrupt: Option<InterruptHandle>,
}

impl QuickJs {
    /// Initialize the bridge and create a runtime and context.
    pub fn new() -> Result<Self, InitError> {
        crate::init()?;
        // SAFETY: plain constructors; failures are null.
        unsafe {
            let rt = NonNull::new(JS_NewRuntime()).ok_or(InitError::Engine("runtime"))?;
            let ctx = match NonNull::new(JS_NewContext(rt.as_ptr())) {
                Some(ctx) => ctx,
                None => {
                    JS_FreeRuntime(rt.as_ptr());
                    return Err(InitError::Engine("context"));
                }
            };
            Ok(QuickJs {
                rt,
                ctx,
                interrupt: None,
            })
        }
    }

    /// Let `handle` abort evaluation on this runtime.
    pub fn set_interrupt_handle(&mut self, handle: InterruptHandle) {
        // SAFETY: the handle is stored in `self`, outliving every poll.
        unsafe {
            JS_SetInterruptHandler(self.rt.as_ptr(), Some(poll_interrupt), handle.as_opaque());
        }
        self.interrupt = Some(handle);
    }

    pub fn interrupt_handle(&self) -> Option<&InterruptHandle> {
        self.interrupt.as_ref()
    }

    pub fn context_ptr(&self) -> *mut JSContext {
        self.ctx.as_ptr()
    }

    pub fn runtime_ptr(&self) -> *mut JSRuntime {
        self.rt.as_ptr()
    }
}

impl Drop for QuickJs {
    fn drop(&mut self) {
        // SAFETY: created in `new`, freed once, context before runtime.
        unsafe {
            JS_FreeContext(self.ctx.as_ptr());
            JS_FreeRuntime(self.rt.as_ptr());
        }
    }
}

impl Engine for QuickJs {
    unsafe fn free_value(&self, value: JSValue) {
        __JS_FreeValueRT(JS_GetRuntime(self.ctx.as_ptr()), value);
    }

    fn to_cstring(&self, value: JSValue) -> Option<(NonNull<c_char>, usize)> {
        let mut len = 0usize;
        // SAFETY: value is borrowed; the buffer is released through free_cstring.
        let ptr = unsafe { JS_ToCStringLen2(self.ctx.as_ptr(), &mut len, value, 0) };
        NonNull::new(ptr as *mut c_char).map(|p| (p, len))
    }

    unsafe fn free_cstring(&self, buf: NonNull<c_char>) {
        JS_FreeCString(self.ctx.as_ptr(), buf.as_ptr());
    }

    fn json_stringify(&self, value: JSValue) -> JSValue {
        let undefined = crate::sentinels().undefined;
        // SAFETY: all arguments are borrowed.
        unsafe { JS_JSONStringify(self.ctx.as_ptr(), value, undefined, undefined) }
    }

    fn json_parse(&self, text: &str) -> JSValue {
        let buf = nul_terminated(text);
        let filename = c_filename("<json>");
        // SAFETY: buf holds text.len() bytes plus a terminator.
        unsafe {
            JS_ParseJSON(
                self.ctx.as_ptr(),
                buf.as_ptr() as *const c_char,
                text.len(),
                filename.as_ptr(),
            )
        }
    }

    fn exception(&self) -> JSValue {
        // SAFETY: transfers the pending exception to the caller.
        unsafe { JS_GetException(self.ctx.as_ptr()) }
    }

    fn to_float64(&self, value: JSValue) -> Option<f64> {
        let mut d = 0.0;
        // SAFETY: value is borrowed.
        let rc = unsafe { JS_ToFloat64(self.ctx.as_ptr(), &mut d, value) };
        (rc == 0).then_some(d)
    }

    fn to_bigint64(&self, value: JSValue) -> Int64Coercion {
        let mut wrapped = 0i64;
        // SAFETY: value is borrowed.
        let rc = unsafe { JS_ToBigInt64(self.ctx.as_ptr(), &mut wrapped, value) };
        if rc != 0 {
            return Int64Coercion::Threw;
        }
        // JS_ToBigInt64 reduces modulo 2^64, so the range comes from the digits.
        let Some((buf, len)) = self.to_cstring(value) else {
            return Int64Coercion::Threw;
        };
        // SAFETY: the engine guarantees `len` readable bytes until the buffer is freed.
        let digits = unsafe { slice::from_raw_parts(buf.as_ptr() as *const u8, len) };
        let coerced = match std::str::from_utf8(digits) {
            Ok(text) => Int64Coercion::from_decimal(text),
            Err(_) => Int64Coercion::OutOfRange,
        };
        // SAFETY: buf came from to_cstring above.
        unsafe { self.free_cstring(buf) };
        coerced
    }

    fn new_string(&self, text: &str) -> JSValue {
        // SAFETY: the engine copies `len` bytes.
        unsafe { JS_NewStringLen(self.ctx.as_ptr(), text.as_ptr() as *const c_char, text.len()) }
    }

    fn eval(&self, source: &str, filename: &str) -> JSValue {
        let buf = nul_terminated(source);
        let filename = c_filename(filename);
        // SAFETY: buf holds source.len() bytes plus a terminator.
        unsafe {
            JS_Eval(
                self.ctx.as_ptr(),
                buf.as_ptr() as *const c_char,
                source.len(),
                filename.as_ptr(),
                JS_EVAL_TYPE_GLOBAL,
            )
        }
    }
}
