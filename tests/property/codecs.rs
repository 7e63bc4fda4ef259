// Property tests for the three value layouts.
//
// Every codec must round-trip each (tag, payload) pair it accepts, collapse all
// NaNs onto one word, and never let a double pose as a ref-counted value.

use super::strategies::{arb_double, arb_immediate_tag, arb_low_pointer, arb_nan_bits, arb_refcounted_tag};
use proptest::prelude::*;
use qjs_bridge::value::repr::{NanBoxCodec, StrictNanBoxCodec, StructCodec, CANONICAL_NAN_BITS};
use qjs_bridge::{Codec, Payload, Tag};
use std::ffi::c_void;

macro_rules! codec_properties {
    ($name:ident, $codec:ty) => {
        mod $name {
            use super::*;

            type C = $codec;

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(1000))]

                #[test]
                fn immediate_roundtrip(tag in arb_immediate_tag(), n in any::<i32>()) {
                    let v = C::encode(tag, Payload::Int32(n)).unwrap();
                    prop_assert_eq!(C::decode(v), Some((tag, Payload::Int32(n))));
                    prop_assert!(!C::has_ref_count(v));
                }

                #[test]
                fn pointer_roundtrip(tag in arb_refcounted_tag(), addr in arb_low_pointer()) {
                    let ptr = addr as *mut c_void;
                    let v = C::encode(tag, Payload::Pointer(ptr)).unwrap();
                    prop_assert_eq!(C::decode(v), Some((tag, Payload::Pointer(ptr))));
                    prop_assert!(C::has_ref_count(v));
                }

                #[test]
                fn double_roundtrip(d in arb_double()) {
                    let v = C::encode_float(d);
                    prop_assert_eq!(C::tag_of(v), Some(Tag::Float64));
                    prop_assert!(!C::has_ref_count(v));
                    prop_assert_eq!(C::decode_double(v).to_bits(), d.to_bits());
                }

                #[test]
                fn nan_canonical(bits in arb_nan_bits()) {
                    let v = C::encode_float(f64::from_bits(bits));
                    prop_assert_eq!(v, C::encode_float(f64::NAN));
                    prop_assert_eq!(C::tag_of(v), Some(Tag::Float64));
                    prop_assert_eq!(C::decode_double(v).to_bits(), CANONICAL_NAN_BITS);
                }

                #[test]
                fn number_selection(d in arb_double()) {
                    let v = C::encode_number(d);
                    match C::tag_of(v) {
                        Some(Tag::Int32) => {
                            prop_assert_eq!((C::decode_int32(v) as f64).to_bits(), d.to_bits());
                        }
                        Some(Tag::Float64) => {
                            prop_assert_eq!(C::decode_double(v).to_bits(), d.to_bits());
                            let n = d.round() as i32;
                            prop_assert_ne!((n as f64).to_bits(), d.to_bits());
                        }
                        other => prop_assert!(false, "unexpected tag {:?}", other),
                    }
                }

                #[test]
                fn i64_selection(n in any::<i64>()) {
                    let v = C::encode_i64(n);
                    if i32::try_from(n).is_ok() {
                        prop_assert_eq!(C::tag_of(v), Some(Tag::Int32));
                        prop_assert_eq!(C::decode_int32(v) as i64, n);
                    } else {
                        prop_assert_eq!(C::tag_of(v), Some(Tag::Float64));
                        prop_assert_eq!(C::decode_double(v), n as f64);
                    }
                }
            }
        }
    };
}

codec_properties!(struct_codec, StructCodec);
codec_properties!(nanbox_codec, NanBoxCodec);
codec_properties!(strict_codec, StrictNanBoxCodec);

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn nanbox_wide_pointer_overflows(high in 1u64..0xFFFF, low in any::<u32>(), tag in arb_refcounted_tag()) {
        let word = (high << 32) | low as u64;
        prop_assert!(NanBoxCodec::mkraw(tag, word).is_err());
        let ok = NanBoxCodec::mkraw(tag, low as u64).unwrap();
        prop_assert_eq!(NanBoxCodec::tag_of(ok), Some(tag));
    }

    #[test]
    fn strict_wide_pointer_overflows(high in 1u64..0xFFFF, low in 0u64..(1u64 << 48), tag in arb_refcounted_tag()) {
        let word = (high << 48) | low;
        prop_assert!(StrictNanBoxCodec::mkraw(tag, word).is_err());
        let ok = StrictNanBoxCodec::mkraw(tag, low).unwrap();
        prop_assert_eq!(StrictNanBoxCodec::tag_of(ok), Some(tag));
        prop_assert_eq!(StrictNanBoxCodec::decode_raw(ok), low);
    }
}
