//! # qjs-bridge
//!
//! The tagged-value layer between a Rust host and an embedded QuickJS engine.
//!
//! Script values cross the boundary as raw `JSValue` words whose physical
//! layout depends on how the engine was built. This crate encodes and decodes
//! them bit-exactly, manages the reference counts of heap-backed values and
//! projects values into host types.
//!
//! ## Layers
//!
//! 1. **Codec** ([`value::repr`]) - three layouts behind one [`Codec`] trait;
//!    the one matching the engine build is [`ActiveCodec`].
//! 2. **Reference counting** ([`value::refcount`], [`OwnedValue`]) - shared
//!    ownership of heap payloads.
//! 3. **Projection** ([`project`]) - engine values to [`Dynamic`] and back.
//! 4. **Call boundary** ([`ffi`]) - the engine entry points and the
//!    floating-point guard wrapped around them.
//!
//! ## Example
//!
//! ```
//! use qjs_bridge::{ActiveCodec, Codec, Tag};
//!
//! qjs_bridge::init().unwrap();
//! let v = ActiveCodec::encode_number(-2147483648.0);
//! assert_eq!(ActiveCodec::tag_of(v), Some(Tag::Int32));
//! let z = ActiveCodec::encode_number(-0.0);
//! assert_eq!(ActiveCodec::tag_of(z), Some(Tag::Float64));
//! ```

pub mod config;
pub mod error;
pub mod ffi;
pub mod init;
pub mod project;
pub mod value;

pub use config::{BridgeConfig, EncodingScheme, ACTIVE_SCHEME};
pub use error::{CodecError, InitError, ProjectionError, ProjectionResult};
pub use ffi::{with_masked_fpu, Engine, FpuGuard, Int64Coercion, InterruptHandle};
pub use init::{config, init, init_with, sentinels};
pub use project::{from_dynamic, to_dynamic, to_dynamic_consuming, to_text, Dynamic};
pub use value::{ActiveCodec, Codec, JSValue, OwnedValue, Payload, Tag};
