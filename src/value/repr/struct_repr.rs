//! Struct layout: a payload union followed by a 64-bit tag.
//!
//! Used on wide-pointer targets where a pointer cannot be boxed into a double.
//! Encoding and decoding are plain field accesses.

use std::ffi::c_void;
use std::fmt;
use std::mem::size_of;

use super::{Codec, CANONICAL_NAN_BITS};
use crate::config::EncodingScheme;
use crate::error::CodecError;
use crate::value::tag::{Tag, TagScheme};

/// Payload field of [`StructValue`].
///
/// Every member is plain data, so reading any member is defined; reading the
/// one the tag does not select just yields meaningless bits.
#[repr(C)]
#[derive(Clone, Copy)]
pub union ValueUnion {
    pub int32: i32,
    pub float64: f64,
    pub ptr: *mut c_void,
    pub raw: u64,
}

/// The engine's `JSValue` when it is built without NaN-boxing.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct StructValue {
    pub u: ValueUnion,
    pub tag: i64,
}

impl StructValue {
    #[inline]
    fn zeroed(tag: i32) -> Self {
        StructValue {
            u: ValueUnion { raw: 0 },
            tag: tag as i64,
        }
    }

    /// All eight payload bytes.
    #[inline]
    pub fn payload_bits(&self) -> u64 {
        // SAFETY: every constructor in this module initializes the full word.
        unsafe { self.u.raw }
    }
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.payload_bits() == other.payload_bits()
    }
}

impl fmt::Debug for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StructValue {{ tag: {}, payload: {:#018x} }}",
            self.tag,
            self.payload_bits()
        )
    }
}

/// Codec for [`StructValue`].
#[derive(Debug, Clone, Copy)]
pub struct StructCodec;

impl Codec for StructCodec {
    type Raw = StructValue;

    const ENCODING: EncodingScheme = EncodingScheme::Struct;
    const SCHEME: TagScheme = TagScheme::Negative;
    const PAYLOAD_BITS: u32 = usize::BITS;
    const EXPECTED_SIZE: usize = 2 * size_of::<usize>();
    const EXPECTED_SIZE_OF: &'static str = "JSValue (two pointer widths)";

    #[inline]
    fn mkval(tag: Tag, value: i32) -> StructValue {
        let mut v = StructValue::zeroed(Self::SCHEME.number(tag));
        v.u.int32 = value;
        v
    }

    #[inline]
    fn mkptr(tag: Tag, ptr: *mut c_void) -> Result<StructValue, CodecError> {
        let mut v = StructValue::zeroed(Self::SCHEME.number(tag));
        v.u.ptr = ptr;
        Ok(v)
    }

    #[inline]
    fn mkraw(tag: Tag, word: u64) -> Result<StructValue, CodecError> {
        let mut v = StructValue::zeroed(Self::SCHEME.number(tag));
        v.u.raw = word;
        Ok(v)
    }

    #[inline]
    fn encode_float(d: f64) -> StructValue {
        let mut v = StructValue::zeroed(Self::SCHEME.number(Tag::Float64));
        v.u.float64 = if d.is_nan() {
            f64::from_bits(CANONICAL_NAN_BITS)
        } else {
            d
        };
        v
    }

    #[inline]
    fn decode_tag(v: StructValue) -> i32 {
        v.tag as i32
    }

    #[inline]
    fn decode_norm_tag(v: StructValue) -> i32 {
        v.tag as i32
    }

    #[inline]
    fn decode_int32(v: StructValue) -> i32 {
        // SAFETY: plain-data union member.
        unsafe { v.u.int32 }
    }

    #[inline]
    fn decode_pointer(v: StructValue) -> *mut c_void {
        // SAFETY: plain-data union member.
        unsafe { v.u.ptr }
    }

    #[inline]
    fn decode_double(v: StructValue) -> f64 {
        // SAFETY: plain-data union member.
        unsafe { v.u.float64 }
    }

    #[inline]
    fn decode_raw(v: StructValue) -> u64 {
        v.payload_bits()
    }
}
