//! Immutable sentinel values.
//!
//! Built once per codec by [`crate::init`] and shared read-only afterwards.

use crate::error::InitError;
use crate::value::repr::{Codec, CANONICAL_NAN_BITS};
use crate::value::tag::Tag;

/// The fixed values every layout needs.
#[derive(Debug, Clone, Copy)]
pub struct Sentinels<C: Codec> {
    pub null: C::Raw,
    pub undefined: C::Raw,
    pub true_value: C::Raw,
    pub false_value: C::Raw,
    pub exception: C::Raw,
    pub uninitialized: C::Raw,
    pub nan: C::Raw,
}

// SAFETY: no sentinel carries a heap pointer; the struct layout merely has a
// pointer-typed union member that is never set here.
unsafe impl<C: Codec> Send for Sentinels<C> {}
unsafe impl<C: Codec> Sync for Sentinels<C> {}

impl<C: Codec> Sentinels<C> {
    pub fn build() -> Self {
        Sentinels {
            null: C::mkval(Tag::Null, 0),
            undefined: C::mkval(Tag::Undefined, 0),
            true_value: C::encode_bool(true),
            false_value: C::encode_bool(false),
            exception: C::mkval(Tag::Exception, 0),
            uninitialized: C::mkval(Tag::Uninitialized, 0),
            nan: C::encode_float(f64::NAN),
        }
    }

    /// Check that every sentinel decodes back to its own tag.
    pub fn verify(&self) -> Result<(), InitError> {
        let expect = [
            ("null", self.null, Tag::Null),
            ("undefined", self.undefined, Tag::Undefined),
            ("true", self.true_value, Tag::Bool),
            ("false", self.false_value, Tag::Bool),
            ("exception", self.exception, Tag::Exception),
            ("uninitialized", self.uninitialized, Tag::Uninitialized),
            ("nan", self.nan, Tag::Float64),
        ];
        for (name, value, tag) in expect {
            if C::tag_of(value) != Some(tag) || C::has_ref_count(value) {
                return Err(InitError::Sentinel(name));
            }
        }
        if !C::decode_bool(self.true_value) || C::decode_bool(self.false_value) {
            return Err(InitError::Sentinel("bool"));
        }
        if C::decode_double(self.nan).to_bits() != CANONICAL_NAN_BITS {
            return Err(InitError::Sentinel("nan"));
        }
        Ok(())
    }
}
