//! Integer / double selection for host numbers.
//!
//! A host number becomes INT32 only when the i32 reproduces it bit for bit.
//! Comparing bits instead of values keeps `-0.0` a double (it equals `0`
//! numerically), and rounding then saturating the narrowing cast keeps values
//! just below 2^31 (`2147483647.5`) from sneaking through as integers.

/// The i32 that is bit-identical to `d` once widened back, if any.
#[inline]
pub fn exact_int32(d: f64) -> Option<i32> {
    let n = d.round() as i32;
    if (n as f64).to_bits() == d.to_bits() {
        Some(n)
    } else {
        None
    }
}

/// The i32 equal to `n`, if `n` fits.
#[inline]
pub fn exact_int32_from_i64(n: i64) -> Option<i32> {
    let narrowed = n as i32;
    if narrowed as i64 == n {
        Some(narrowed)
    } else {
        None
    }
}
