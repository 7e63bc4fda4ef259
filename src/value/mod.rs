//! Tagged engine values.
//!
//! A value is a logical (tag, payload) pair; [`repr`] maps it onto the physical
//! layout the engine was built with, [`refcount`] and [`OwnedValue`] manage the
//! lifetime of heap-backed payloads.

pub mod owned;
pub mod refcount;
pub mod repr;
pub mod sentinel;
pub mod tag;

pub use owned::OwnedValue;
pub use refcount::RefHeader;
pub use repr::{ActiveCodec, Codec, JSValue, Payload};
pub use sentinel::Sentinels;
pub use tag::{Tag, TagScheme};
