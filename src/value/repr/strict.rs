//! Strict NaN-boxing: one 64-bit word for every target.
//!
//! ```text
//! s0000000 0000tttt vvvvvvvv vvvvvvvv vvvvvvvv vvvvvvvv vvvvvvvv vvvvvvvv
//!  NaN marker  |tag|            48-bit payload
//! ```
//!
//! Non-float values keep the NaN marker at zero, so they are all at most
//! [`STRICT_FLOAT_THRESHOLD`]. Finite doubles are stored bit-inverted, which puts
//! every one of them above it. NaN and the infinities cannot be inverted into
//! that space and get dedicated FLOAT64-tagged sentinels instead.

use std::ffi::c_void;
use std::mem::size_of;

use super::{check_payload_width, Codec, CANONICAL_NAN_BITS};
use crate::config::EncodingScheme;
use crate::error::CodecError;
use crate::value::tag::{Tag, TagScheme, STRICT_TAG_FLOAT64};

/// Words above this are inverted doubles.
pub const STRICT_FLOAT_THRESHOLD: u64 = 0x000F_FFFF_FFFF_FFFF;

/// Low 48 bits: pointer / integer payload.
pub const STRICT_PAYLOAD_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;

const fn make(tag: i32, payload: u64) -> u64 {
    (((tag & 0xF) as u64) << 48) | payload
}

pub const NAN_WORD: u64 = make(STRICT_TAG_FLOAT64, 1);
pub const NEG_INFINITY_WORD: u64 = make(STRICT_TAG_FLOAT64, 2);
pub const POS_INFINITY_WORD: u64 = make(STRICT_TAG_FLOAT64, 3);

/// Codec for strict NaN-boxed words.
#[derive(Debug, Clone, Copy)]
pub struct StrictNanBoxCodec;

impl Codec for StrictNanBoxCodec {
    type Raw = u64;

    const ENCODING: EncodingScheme = EncodingScheme::StrictNanBoxing;
    const SCHEME: TagScheme = TagScheme::Strict;
    const PAYLOAD_BITS: u32 = 48;
    const EXPECTED_SIZE: usize = size_of::<f64>();
    const EXPECTED_SIZE_OF: &'static str = "JSValue (one double)";

    #[inline]
    fn mkval(tag: Tag, value: i32) -> u64 {
        make(Self::SCHEME.number(tag), value as u32 as u64)
    }

    #[inline]
    fn mkptr(tag: Tag, ptr: *mut c_void) -> Result<u64, CodecError> {
        let addr = check_payload_width(ptr as usize as u64, Self::PAYLOAD_BITS, Self::ENCODING)?;
        Ok(make(Self::SCHEME.number(tag), addr))
    }

    #[inline]
    fn mkraw(tag: Tag, word: u64) -> Result<u64, CodecError> {
        let word = check_payload_width(word, Self::PAYLOAD_BITS, Self::ENCODING)?;
        Ok(make(Self::SCHEME.number(tag), word))
    }

    #[inline]
    fn encode_float(d: f64) -> u64 {
        let bits = d.to_bits();
        if bits & EXPONENT_MASK == EXPONENT_MASK {
            if d.is_nan() {
                NAN_WORD
            } else if d < 0.0 {
                NEG_INFINITY_WORD
            } else {
                POS_INFINITY_WORD
            }
        } else {
            !bits
        }
    }

    #[inline]
    fn decode_tag(v: u64) -> i32 {
        if v > STRICT_FLOAT_THRESHOLD {
            STRICT_TAG_FLOAT64
        } else {
            (v >> 48) as i32
        }
    }

    #[inline]
    fn decode_norm_tag(v: u64) -> i32 {
        Self::decode_tag(v)
    }

    #[inline]
    fn decode_int32(v: u64) -> i32 {
        v as i32
    }

    /// The upper 16 bits are layout overhead, never address bits.
    #[inline]
    fn decode_pointer(v: u64) -> *mut c_void {
        (v & STRICT_PAYLOAD_MASK) as usize as *mut c_void
    }

    #[inline]
    fn decode_double(v: u64) -> f64 {
        match v {
            v if v > STRICT_FLOAT_THRESHOLD => f64::from_bits(!v),
            NEG_INFINITY_WORD => f64::NEG_INFINITY,
            POS_INFINITY_WORD => f64::INFINITY,
            _ => f64::from_bits(CANONICAL_NAN_BITS),
        }
    }

    #[inline]
    fn decode_raw(v: u64) -> u64 {
        v & STRICT_PAYLOAD_MASK
    }
}
