//! Error types for the value bridge.
//!
//! Only layout mismatches discovered at initialization are fatal. Everything
//! else (overflowing pointers, unprojectable tags, failed coercions) is an
//! ordinary return value, and script exceptions are not errors at all: they are
//! values tagged `EXCEPTION`.

use thiserror::Error;

use crate::value::Tag;

/// Failure to build a physical value from a logical (tag, payload) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A pointer or raw word does not fit the layout's payload field.
    #[error("payload {value:#x} exceeds the {bits}-bit payload range of the {scheme} layout")]
    PointerOverflow {
        value: u64,
        bits: u32,
        scheme: &'static str,
    },

    /// The payload variant cannot be carried by the tag (e.g. a pointer tagged INT32).
    #[error("{payload} payload cannot be stored under tag {tag}")]
    PayloadMismatch { tag: Tag, payload: &'static str },
}

/// Failure to project an engine value into a host value (or back).
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The tag has no host representation (symbols, exceptions, internal tags).
    #[error("values tagged {0} have no host representation")]
    Unsupported(Tag),

    /// The engine refused to coerce the value to a host number.
    #[error("engine could not coerce a {0} value to a host number")]
    Coercion(Tag),

    /// A big integer does not fit in `i64`.
    #[error("{0} value does not fit in a 64-bit integer")]
    OutOfRange(Tag),

    /// The raw tag number is not assigned in the active scheme.
    #[error("unknown raw tag {0}")]
    UnknownTag(i32),

    /// The engine returned an exception value instead of a result.
    #[error("engine raised an exception during {0}")]
    Exception(&'static str),

    /// String coercion returned no buffer.
    #[error("engine could not convert the value to a string")]
    StringConversion,

    #[error("engine produced invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("text is not valid UTF-16: {0}")]
    Utf16(#[from] std::string::FromUtf16Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Fatal initialization failure: the compiled layout does not match the target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("{scheme} layout expects {what} to be {expected} bytes, found {actual}")]
    Layout {
        scheme: &'static str,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A sentinel did not survive its own round trip.
    #[error("sentinel {0} does not decode to its own tag")]
    Sentinel(&'static str),

    /// The engine library could not allocate a runtime or context.
    #[error("engine failed to create a {0}")]
    Engine(&'static str),
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;
