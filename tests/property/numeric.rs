// Property tests for host number selection and JSON conversion.

use super::strategies::{arb_double, arb_json};
use proptest::prelude::*;
use qjs_bridge::value::repr::{exact_int32, exact_int32_from_i64};
use qjs_bridge::Dynamic;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn every_i32_is_exact(n in any::<i32>()) {
        prop_assert_eq!(exact_int32(n as f64), Some(n));
        prop_assert_eq!(exact_int32_from_i64(n as i64), Some(n));
    }

    #[test]
    fn exact_means_bit_identical(d in arb_double()) {
        if let Some(n) = exact_int32(d) {
            prop_assert_eq!((n as f64).to_bits(), d.to_bits());
        } else {
            let negative_zero = d == 0.0 && d.is_sign_negative();
            prop_assert!(d.fract() != 0.0 || negative_zero || d.abs() > 2147483647.0 || !d.is_finite());
        }
    }

    #[test]
    fn fractional_values_are_not_ints(n in any::<i32>(), frac in 0.001f64..0.999) {
        let d = n as f64 + frac;
        prop_assume!(d.fract() != 0.0);
        prop_assert_eq!(exact_int32(d), None);
    }

    #[test]
    fn json_conversion_is_lossless(doc in arb_json()) {
        let dynamic = Dynamic::from(doc.clone());
        prop_assert_eq!(dynamic.to_json(), doc);
    }
}
