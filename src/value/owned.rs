//! Owning handle for engine values.

use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;

use log::trace;

use crate::ffi::Engine;
use crate::value::refcount;
use crate::value::repr::{ActiveCodec, Codec, JSValue};
use crate::value::tag::Tag;

/// One reference to an engine value.
///
/// Cloning takes another reference; dropping releases this one and frees the
/// block through the engine when it was the last. Immediates and doubles carry
/// no count and are simply copied. Engine values belong to the context's
/// thread, so the handle is neither `Send` nor `Sync`.
pub struct OwnedValue<'e, E: Engine + ?Sized> {
    engine: &'e E,
    raw: JSValue,
    _thread: PhantomData<*mut ()>,
}

impl<'e, E: Engine + ?Sized> OwnedValue<'e, E> {
    /// Take ownership of a reference returned by the engine.
    ///
    /// # Safety
    ///
    /// `raw` must be a value produced by `engine` on which the caller holds one
    /// reference, which is transferred to the handle.
    pub unsafe fn from_raw(engine: &'e E, raw: JSValue) -> Self {
        OwnedValue {
            engine,
            raw,
            _thread: PhantomData,
        }
    }

    /// Wrap a value that carries no reference count.
    ///
    /// Returns `None` for ref-counted values.
    pub fn immediate(engine: &'e E, raw: JSValue) -> Option<Self> {
        if ActiveCodec::has_ref_count(raw) {
            None
        } else {
            // SAFETY: nothing to own.
            Some(unsafe { Self::from_raw(engine, raw) })
        }
    }

    /// The raw word, still owned by the handle.
    #[inline]
    pub fn as_raw(&self) -> JSValue {
        self.raw
    }

    /// Give up ownership without releasing; the caller now owns the reference.
    #[inline]
    pub fn into_raw(self) -> JSValue {
        let this = ManuallyDrop::new(self);
        this.raw
    }

    #[inline]
    pub fn engine(&self) -> &'e E {
        self.engine
    }

    /// Logical tag, or `None` for a raw number the active scheme does not assign.
    #[inline]
    pub fn tag(&self) -> Option<Tag> {
        ActiveCodec::tag_of(self.raw)
    }

    /// Raw tag number as the engine stores it.
    #[inline]
    pub fn raw_tag(&self) -> i32 {
        ActiveCodec::decode_norm_tag(self.raw)
    }

    #[inline]
    pub fn is_exception(&self) -> bool {
        ActiveCodec::is_exception(self.raw)
    }

    #[inline]
    pub fn has_ref_count(&self) -> bool {
        ActiveCodec::has_ref_count(self.raw)
    }

    /// Current reference count, or `None` for immediates.
    pub fn ref_count(&self) -> Option<i32> {
        // SAFETY: the handle keeps the block alive.
        unsafe { refcount::ref_count::<ActiveCodec>(self.raw) }
    }
}

impl<'e, E: Engine + ?Sized> Clone for OwnedValue<'e, E> {
    fn clone(&self) -> Self {
        // SAFETY: the handle keeps the block alive.
        let raw = unsafe { refcount::duplicate::<ActiveCodec>(self.raw) };
        OwnedValue {
            engine: self.engine,
            raw,
            _thread: PhantomData,
        }
    }
}

impl<'e, E: Engine + ?Sized> Drop for OwnedValue<'e, E> {
    fn drop(&mut self) {
        // SAFETY: the handle owns exactly one reference.
        unsafe {
            if refcount::release::<ActiveCodec>(self.raw) {
                trace!(
                    "freeing {} value at {:p}",
                    self.tag().map_or("unknown", Tag::name),
                    ActiveCodec::decode_pointer(self.raw)
                );
                self.engine.free_value(self.raw);
            }
        }
    }
}

impl<'e, E: Engine + ?Sized> fmt::Debug for OwnedValue<'e, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedValue")
            .field("tag", &self.tag())
            .field("raw", &self.raw)
            .finish()
    }
}
