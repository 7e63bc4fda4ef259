//! Physical value layouts.
//!
//! The engine and the host must agree bit for bit on how a tagged value is laid
//! out in memory. Three layouts exist and the engine is compiled with exactly one:
//!
//! ```text
//! Struct (wide pointers, 16 bytes):
//!   [ union { i32 | f64 | ptr | u64 } ][ i64 tag ]
//!
//! NaN-boxing (narrow pointers, 8 bytes):
//!   tttttttt tttttttt tttttttt tttttttt|pppppppp pppppppp pppppppp pppppppp
//!   upper 32 bits: negative-scheme tag, lower 32 bits: i32 / bool / pointer.
//!   Doubles are stored with (0x7FF8000C << 32) subtracted.
//!
//! Strict NaN-boxing (8 bytes):
//!   s0000000 0000tttt|vvvvvvvv ... 48-bit payload
//!   Doubles are stored bit-inverted and always compare above 0x000F_FFFF_FFFF_FFFF.
//! ```
//!
//! All three codecs are compiled into every build so each can be exercised, but
//! only [`ActiveCodec`] (and the [`JSValue`] it produces) crosses the boundary.

mod nanbox;
mod numeric;
mod strict;
mod struct_repr;


use std::ffi::c_void;
use std::fmt;
use std::mem::size_of;

use crate::config::EncodingScheme;
use crate::error::{CodecError, InitError};
use crate::value::tag::{Tag, TagScheme};

pub use nanbox::{NanBoxCodec, FLOAT64_TAG_ADDEND};
pub use numeric::{exact_int32, exact_int32_from_i64};
pub use strict::{StrictNanBoxCodec, STRICT_FLOAT_THRESHOLD, STRICT_PAYLOAD_MASK};
pub use struct_repr::{StructCodec, StructValue, ValueUnion};

/// The single bit pattern every NaN is stored and read back as.
pub const CANONICAL_NAN_BITS: u64 = 0x7FF8_0000_0000_0000;

#[cfg(all(feature = "nan-boxing", feature = "strict-nan-boxing"))]
compile_error!("features `nan-boxing` and `strict-nan-boxing` are mutually exclusive");

/// The layout this build exchanges with the engine.
#[cfg(feature = "strict-nan-boxing")]
pub type ActiveCodec = StrictNanBoxCodec;

/// The layout this build exchanges with the engine.
#[cfg(all(
    not(feature = "strict-nan-boxing"),
    any(feature = "nan-boxing", not(target_pointer_width = "64"))
))]
pub type ActiveCodec = NanBoxCodec;

/// The layout this build exchanges with the engine.
#[cfg(all(
    not(feature = "strict-nan-boxing"),
    not(feature = "nan-boxing"),
    target_pointer_width = "64"
))]
pub type ActiveCodec = StructCodec;

/// A physical value in the active layout.
pub type JSValue = <ActiveCodec as Codec>::Raw;

/// Logical payload of a tagged value.
///
/// Only the variant matching the tag is meaningful.
#[derive(Debug, Clone, Copy)]
pub enum Payload {
    Int32(i32),
    Bool(bool),
    Pointer(*mut c_void),
    Float64(f64),
    Raw(u64),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Int32(_) => "int32",
            Payload::Bool(_) => "bool",
            Payload::Pointer(_) => "pointer",
            Payload::Float64(_) => "float64",
            Payload::Raw(_) => "raw",
        }
    }
}

// Floats compare by bit pattern so that NaN payloads are comparable and -0.0 != 0.0.
impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Int32(a), Payload::Int32(b)) => a == b,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Pointer(a), Payload::Pointer(b)) => a == b,
            (Payload::Float64(a), Payload::Float64(b)) => a.to_bits() == b.to_bits(),
            (Payload::Raw(a), Payload::Raw(b)) => a == b,
            _ => false,
        }
    }
}

/// One physical layout.
///
/// Implementors supply the primitive bit operations; the encode/decode contract
/// shared by every layout is built on top of them as provided methods.
/// Decoding with the accessor for the wrong tag is caller error and is not
/// detected.
pub trait Codec {
    /// The physical word(s) exchanged with the engine.
    type Raw: Copy + PartialEq + fmt::Debug;

    const ENCODING: EncodingScheme;
    const SCHEME: TagScheme;
    /// Width of the integer/pointer payload field.
    const PAYLOAD_BITS: u32;
    /// Expected `size_of::<Raw>()` on this target, and what it is measured against.
    const EXPECTED_SIZE: usize;
    const EXPECTED_SIZE_OF: &'static str;

    /// Immediate value (int, bool, null, ...). `tag` must not be FLOAT64 or ref-counted.
    fn mkval(tag: Tag, value: i32) -> Self::Raw;

    /// Pointer-carrying value. Fails if the address does not fit the payload field.
    fn mkptr(tag: Tag, ptr: *mut c_void) -> Result<Self::Raw, CodecError>;

    /// Raw payload word. Fails if the word does not fit the payload field.
    fn mkraw(tag: Tag, word: u64) -> Result<Self::Raw, CodecError>;

    /// FLOAT64 value. NaN is canonicalized.
    fn encode_float(d: f64) -> Self::Raw;

    /// Raw tag number as stored. Under NaN-boxing this is meaningless for doubles.
    fn decode_tag(v: Self::Raw) -> i32;

    /// Raw tag number with every float bit pattern folded to FLOAT64.
    fn decode_norm_tag(v: Self::Raw) -> i32;

    fn decode_int32(v: Self::Raw) -> i32;
    fn decode_pointer(v: Self::Raw) -> *mut c_void;
    fn decode_double(v: Self::Raw) -> f64;
    fn decode_raw(v: Self::Raw) -> u64;

    // =========================================================================
    // Provided
    // =========================================================================

    #[inline]
    fn decode_bool(v: Self::Raw) -> bool {
        Self::decode_int32(v) != 0
    }

    /// Logical tag, or `None` for a raw number the scheme does not assign.
    #[inline]
    fn tag_of(v: Self::Raw) -> Option<Tag> {
        Self::SCHEME.tag(Self::decode_norm_tag(v))
    }

    /// True if the payload points at a ref-counted heap block.
    #[inline]
    fn has_ref_count(v: Self::Raw) -> bool {
        Self::SCHEME.is_refcounted(Self::decode_tag(v))
    }

    #[inline]
    fn is_float(v: Self::Raw) -> bool {
        Self::decode_norm_tag(v) == Self::SCHEME.number(Tag::Float64)
    }

    #[inline]
    fn is_exception(v: Self::Raw) -> bool {
        Self::decode_tag(v) == Self::SCHEME.number(Tag::Exception)
    }

    #[inline]
    fn encode_bool(b: bool) -> Self::Raw {
        Self::mkval(Tag::Bool, b as i32)
    }

    #[inline]
    fn encode_int32(n: i32) -> Self::Raw {
        Self::mkval(Tag::Int32, n)
    }

    /// INT32 when `n` fits exactly, FLOAT64 otherwise.
    #[inline]
    fn encode_i64(n: i64) -> Self::Raw {
        match exact_int32_from_i64(n) {
            Some(i) => Self::encode_int32(i),
            None => Self::encode_float(n as f64),
        }
    }

    /// INT32 when `d` is bit-for-bit an i32, FLOAT64 otherwise (so `-0.0` stays a double).
    #[inline]
    fn encode_number(d: f64) -> Self::Raw {
        match exact_int32(d) {
            Some(i) => Self::encode_int32(i),
            None => Self::encode_float(d),
        }
    }

    /// Build a value from a logical pair.
    ///
    /// Never yields an EXCEPTION-tagged value unless asked to.
    fn encode(tag: Tag, payload: Payload) -> Result<Self::Raw, CodecError> {
        let immediate = !tag.is_refcounted() && tag != Tag::Float64;
        match payload {
            Payload::Float64(d) if tag == Tag::Float64 => Ok(Self::encode_float(d)),
            Payload::Pointer(p) if tag.is_refcounted() => Self::mkptr(tag, p),
            Payload::Int32(n) if immediate => Ok(Self::mkval(tag, n)),
            Payload::Bool(b) if immediate => Ok(Self::mkval(tag, b as i32)),
            Payload::Raw(w) if tag != Tag::Float64 => Self::mkraw(tag, w),
            _ => Err(CodecError::PayloadMismatch {
                tag,
                payload: payload.kind(),
            }),
        }
    }

    /// Split a value into its logical pair, reading the payload the tag selects.
    fn decode(v: Self::Raw) -> Option<(Tag, Payload)> {
        let tag = Self::tag_of(v)?;
        let payload = match tag {
            Tag::Float64 => Payload::Float64(Self::decode_double(v)),
            Tag::Bool => Payload::Bool(Self::decode_bool(v)),
            t if t.is_refcounted() => Payload::Pointer(Self::decode_pointer(v)),
            _ => Payload::Int32(Self::decode_int32(v)),
        };
        Some((tag, payload))
    }

    /// Compare the physical size against what the engine ABI expects.
    fn check_layout() -> Result<(), InitError> {
        let actual = size_of::<Self::Raw>();
        if actual == Self::EXPECTED_SIZE {
            Ok(())
        } else {
            Err(InitError::Layout {
                scheme: Self::ENCODING.name(),
                what: Self::EXPECTED_SIZE_OF,
                expected: Self::EXPECTED_SIZE,
                actual,
            })
        }
    }
}

/// Shared overflow check for boxed layouts.
#[inline]
pub(crate) fn check_payload_width(
    value: u64,
    bits: u32,
    scheme: EncodingScheme,
) -> Result<u64, CodecError> {
    if bits >= 64 || value >> bits == 0 {
        Ok(value)
    } else {
        Err(CodecError::PointerOverflow {
            value,
            bits,
            scheme: scheme.name(),
        })
    }
}
