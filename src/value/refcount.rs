//! Reference counting on engine heap blocks.
//!
//! Every ref-counted payload points at a block whose first field is an `i32`
//! count. The count is not atomic: values never leave the thread that owns the
//! engine context. These functions only move the count; freeing a block is the
//! engine's job (see [`crate::value::OwnedValue`]).

use crate::value::repr::{ActiveCodec, Codec};

/// Leading field of every ref-counted heap block.
#[repr(C)]
#[derive(Debug)]
pub struct RefHeader {
    pub ref_count: i32,
}

/// Ref-count classification of a raw tag number in the active scheme.
#[inline]
pub fn is_refcounted(raw_tag: i32) -> bool {
    ActiveCodec::SCHEME.is_refcounted(raw_tag)
}

#[inline]
fn header<C: Codec>(v: C::Raw) -> *mut RefHeader {
    C::decode_pointer(v) as *mut RefHeader
}

/// Take another reference to `v` and return it.
///
/// Immediates and doubles are returned unchanged.
///
/// # Safety
///
/// If `v` is ref-counted its payload must point at a live heap block.
#[inline]
pub unsafe fn duplicate<C: Codec>(v: C::Raw) -> C::Raw {
    if C::has_ref_count(v) {
        let h = header::<C>(v);
        (*h).ref_count += 1;
    }
    v
}

/// Drop one reference to `v`.
///
/// Returns `true` exactly when this call brought the count to zero; the caller
/// must then free the block through the engine. Immediates always return `false`.
///
/// # Safety
///
/// If `v` is ref-counted its payload must point at a live heap block on which
/// the caller holds a reference.
#[inline]
pub unsafe fn release<C: Codec>(v: C::Raw) -> bool {
    if !C::has_ref_count(v) {
        return false;
    }
    let h = header::<C>(v);
    (*h).ref_count -= 1;
    (*h).ref_count == 0
}

/// Current count, or `None` for values without one.
///
/// # Safety
///
/// Same as [`duplicate`].
#[inline]
pub unsafe fn ref_count<C: Codec>(v: C::Raw) -> Option<i32> {
    if C::has_ref_count(v) {
        Some((*header::<C>(v)).ref_count)
    } else {
        None
    }
}
