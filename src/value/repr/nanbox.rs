//! NaN-boxing for narrow-pointer targets.
//!
//! The upper 32 bits hold a negative-scheme tag and the lower 32 bits the
//! payload. Tags occupy `[-11, 7)`; adding [`FLOAT64_TAG_ADDEND`] maps that
//! range onto quiet NaNs, so a double is stored as its bits minus the addend
//! (shifted into the upper half) and every real NaN must first be collapsed
//! onto one canonical word that lands outside the tag range.

use std::ffi::c_void;
use std::mem::size_of;

use super::{check_payload_width, Codec, CANONICAL_NAN_BITS};
use crate::config::EncodingScheme;
use crate::error::CodecError;
use crate::value::tag::{Tag, TagScheme, NEG_TAG_FIRST, NEG_TAG_FLOAT64};

/// Offset between a tag and the quiet-NaN exponent space.
pub const FLOAT64_TAG_ADDEND: u32 = (0x7FF8_0000_i64 - NEG_TAG_FIRST as i64 + 1) as u32;

const ADDEND_HIGH: u64 = (FLOAT64_TAG_ADDEND as u64) << 32;

/// The canonical NaN as stored.
pub const NAN_WORD: u64 = CANONICAL_NAN_BITS.wrapping_sub(ADDEND_HIGH);

const ABS_MASK: u64 = 0x7FFF_FFFF_FFFF_FFFF;
const INFINITY_BITS: u64 = 0x7FF0_0000_0000_0000;

/// Codec for 64-bit NaN-boxed words.
#[derive(Debug, Clone, Copy)]
pub struct NanBoxCodec;

impl NanBoxCodec {
    /// True if the raw upper-half tag actually belongs to a double.
    #[inline]
    pub const fn is_float_tag(tag: i32) -> bool {
        (tag.wrapping_sub(NEG_TAG_FIRST) as u32) >= (NEG_TAG_FLOAT64 - NEG_TAG_FIRST) as u32
    }

    #[inline]
    fn make(tag: Tag, low: u32) -> u64 {
        ((Self::SCHEME.number(tag) as u32 as u64) << 32) | low as u64
    }
}

impl Codec for NanBoxCodec {
    type Raw = u64;

    const ENCODING: EncodingScheme = EncodingScheme::NanBoxing;
    const SCHEME: TagScheme = TagScheme::Negative;
    const PAYLOAD_BITS: u32 = 32;
    const EXPECTED_SIZE: usize = size_of::<f64>();
    const EXPECTED_SIZE_OF: &'static str = "JSValue (one double)";

    #[inline]
    fn mkval(tag: Tag, value: i32) -> u64 {
        Self::make(tag, value as u32)
    }

    #[inline]
    fn mkptr(tag: Tag, ptr: *mut c_void) -> Result<u64, CodecError> {
        let addr = check_payload_width(ptr as usize as u64, Self::PAYLOAD_BITS, Self::ENCODING)?;
        Ok(Self::make(tag, addr as u32))
    }

    #[inline]
    fn mkraw(tag: Tag, word: u64) -> Result<u64, CodecError> {
        let word = check_payload_width(word, Self::PAYLOAD_BITS, Self::ENCODING)?;
        Ok(Self::make(tag, word as u32))
    }

    #[inline]
    fn encode_float(d: f64) -> u64 {
        let bits = d.to_bits();
        if (bits & ABS_MASK) > INFINITY_BITS {
            NAN_WORD
        } else {
            bits.wrapping_sub(ADDEND_HIGH)
        }
    }

    #[inline]
    fn decode_tag(v: u64) -> i32 {
        (v >> 32) as i32
    }

    #[inline]
    fn decode_norm_tag(v: u64) -> i32 {
        let tag = Self::decode_tag(v);
        if Self::is_float_tag(tag) {
            NEG_TAG_FLOAT64
        } else {
            tag
        }
    }

    #[inline]
    fn decode_int32(v: u64) -> i32 {
        v as i32
    }

    #[inline]
    fn decode_pointer(v: u64) -> *mut c_void {
        (v as u32) as usize as *mut c_void
    }

    #[inline]
    fn decode_double(v: u64) -> f64 {
        f64::from_bits(v.wrapping_add(ADDEND_HIGH))
    }

    #[inline]
    fn decode_raw(v: u64) -> u64 {
        v & 0xFFFF_FFFF
    }
}
