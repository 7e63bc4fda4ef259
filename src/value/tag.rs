//! Value tags and the two tag numbering schemes.
//!
//! The engine discriminates values by a small integer tag. Two incompatible
//! numberings exist and a build uses exactly one of them:
//!
//! - **Negative** (struct and NaN-boxed layouts): ref-counted tags are the
//!   negative integers, immediates are `0..=7`.
//! - **Strict** (strict NaN-boxed layout): every tag fits in four bits and the
//!   ref-counted ones are exactly those with bit `0b1000` set.

use std::fmt;

/// Logical tag, independent of any physical numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Int32,
    Bool,
    Null,
    Undefined,
    Uninitialized,
    CatchOffset,
    Exception,
    Float64,
    Object,
    FunctionBytecode,
    Module,
    String,
    Symbol,
    BigFloat,
    BigInt,
    BigDecimal,
}

impl Tag {
    /// Every tag, immediates first.
    pub const ALL: [Tag; 16] = [
        Tag::Int32,
        Tag::Bool,
        Tag::Null,
        Tag::Undefined,
        Tag::Uninitialized,
        Tag::CatchOffset,
        Tag::Exception,
        Tag::Float64,
        Tag::Object,
        Tag::FunctionBytecode,
        Tag::Module,
        Tag::String,
        Tag::Symbol,
        Tag::BigFloat,
        Tag::BigInt,
        Tag::BigDecimal,
    ];

    /// True for tags whose payload points at a ref-counted heap block.
    #[inline]
    pub fn is_refcounted(self) -> bool {
        matches!(
            self,
            Tag::Object
                | Tag::FunctionBytecode
                | Tag::Module
                | Tag::String
                | Tag::Symbol
                | Tag::BigFloat
                | Tag::BigInt
                | Tag::BigDecimal
        )
    }

    /// Lower-case name as the engine's own diagnostics spell it.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Int32 => "int",
            Tag::Bool => "bool",
            Tag::Null => "null",
            Tag::Undefined => "undefined",
            Tag::Uninitialized => "uninitialized",
            Tag::CatchOffset => "catch_offset",
            Tag::Exception => "exception",
            Tag::Float64 => "float64",
            Tag::Object => "object",
            Tag::FunctionBytecode => "function_bytecode",
            Tag::Module => "module",
            Tag::String => "string",
            Tag::Symbol => "symbol",
            Tag::BigFloat => "big_float",
            Tag::BigInt => "big_int",
            Tag::BigDecimal => "big_decimal",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Negative numbering
// =============================================================================

pub const NEG_TAG_FIRST: i32 = -11;
pub const NEG_TAG_BIG_DECIMAL: i32 = -11;
pub const NEG_TAG_BIG_INT: i32 = -10;
pub const NEG_TAG_BIG_FLOAT: i32 = -9;
pub const NEG_TAG_SYMBOL: i32 = -8;
pub const NEG_TAG_STRING: i32 = -7;
pub const NEG_TAG_MODULE: i32 = -3;
pub const NEG_TAG_FUNCTION_BYTECODE: i32 = -2;
pub const NEG_TAG_OBJECT: i32 = -1;
pub const NEG_TAG_INT: i32 = 0;
pub const NEG_TAG_BOOL: i32 = 1;
pub const NEG_TAG_NULL: i32 = 2;
pub const NEG_TAG_UNDEFINED: i32 = 3;
pub const NEG_TAG_UNINITIALIZED: i32 = 4;
pub const NEG_TAG_CATCH_OFFSET: i32 = 5;
pub const NEG_TAG_EXCEPTION: i32 = 6;
pub const NEG_TAG_FLOAT64: i32 = 7;

// =============================================================================
// Strict numbering
// =============================================================================

pub const STRICT_TAG_UNINITIALIZED: i32 = 0;
pub const STRICT_TAG_INT: i32 = 1;
pub const STRICT_TAG_BOOL: i32 = 2;
pub const STRICT_TAG_NULL: i32 = 3;
pub const STRICT_TAG_UNDEFINED: i32 = 4;
pub const STRICT_TAG_CATCH_OFFSET: i32 = 5;
pub const STRICT_TAG_EXCEPTION: i32 = 6;
pub const STRICT_TAG_FLOAT64: i32 = 7;
pub const STRICT_TAG_OBJECT: i32 = 8;
pub const STRICT_TAG_FUNCTION_BYTECODE: i32 = 9;
pub const STRICT_TAG_MODULE: i32 = 10;
pub const STRICT_TAG_STRING: i32 = 11;
pub const STRICT_TAG_SYMBOL: i32 = 12;
pub const STRICT_TAG_BIG_FLOAT: i32 = 13;
pub const STRICT_TAG_BIG_INT: i32 = 14;
pub const STRICT_TAG_BIG_DECIMAL: i32 = 15;

/// Ref-counted strict tags are exactly those matching this mask.
pub const STRICT_REFCOUNT_MASK: i32 = 0xFFF8;
pub const STRICT_REFCOUNT_BITS: i32 = 0x8;

/// A physical tag numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScheme {
    Negative,
    Strict,
}

impl TagScheme {
    /// Raw tag number for `tag` in this scheme.
    pub const fn number(self, tag: Tag) -> i32 {
        match self {
            TagScheme::Negative => match tag {
                Tag::Int32 => NEG_TAG_INT,
                Tag::Bool => NEG_TAG_BOOL,
                Tag::Null => NEG_TAG_NULL,
                Tag::Undefined => NEG_TAG_UNDEFINED,
                Tag::Uninitialized => NEG_TAG_UNINITIALIZED,
                Tag::CatchOffset => NEG_TAG_CATCH_OFFSET,
                Tag::Exception => NEG_TAG_EXCEPTION,
                Tag::Float64 => NEG_TAG_FLOAT64,
                Tag::Object => NEG_TAG_OBJECT,
                Tag::FunctionBytecode => NEG_TAG_FUNCTION_BYTECODE,
                Tag::Module => NEG_TAG_MODULE,
                Tag::String => NEG_TAG_STRING,
                Tag::Symbol => NEG_TAG_SYMBOL,
                Tag::BigFloat => NEG_TAG_BIG_FLOAT,
                Tag::BigInt => NEG_TAG_BIG_INT,
                Tag::BigDecimal => NEG_TAG_BIG_DECIMAL,
            },
            TagScheme::Strict => match tag {
                Tag::Uninitialized => STRICT_TAG_UNINITIALIZED,
                Tag::Int32 => STRICT_TAG_INT,
                Tag::Bool => STRICT_TAG_BOOL,
                Tag::Null => STRICT_TAG_NULL,
                Tag::Undefined => STRICT_TAG_UNDEFINED,
                Tag::CatchOffset => STRICT_TAG_CATCH_OFFSET,
                Tag::Exception => STRICT_TAG_EXCEPTION,
                Tag::Float64 => STRICT_TAG_FLOAT64,
                Tag::Object => STRICT_TAG_OBJECT,
                Tag::FunctionBytecode => STRICT_TAG_FUNCTION_BYTECODE,
                Tag::Module => STRICT_TAG_MODULE,
                Tag::String => STRICT_TAG_STRING,
                Tag::Symbol => STRICT_TAG_SYMBOL,
                Tag::BigFloat => STRICT_TAG_BIG_FLOAT,
                Tag::BigInt => STRICT_TAG_BIG_INT,
                Tag::BigDecimal => STRICT_TAG_BIG_DECIMAL,
            },
        }
    }

    /// Logical tag for a raw number, or `None` if the number is unassigned.
    pub fn tag(self, raw: i32) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|&t| self.number(t) == raw)
    }

    /// Ref-count classification on the raw number, the way the engine does it.
    #[inline]
    pub const fn is_refcounted(self, raw: i32) -> bool {
        match self {
            TagScheme::Negative => (raw as u32) >= (NEG_TAG_FIRST as u32),
            TagScheme::Strict => (raw & STRICT_REFCOUNT_MASK) == STRICT_REFCOUNT_BITS,
        }
    }
}
