//! Build-time layout selection and run-time bridge settings.
//!
//! The physical layout is fixed when the crate is compiled:
//!
//! | features              | 64-bit target | narrower target |
//! |-----------------------|---------------|-----------------|
//! | (none)                | struct        | nan-boxing      |
//! | `nan-boxing`          | nan-boxing    | nan-boxing      |
//! | `strict-nan-boxing`   | strict        | strict          |
//!
//! It must match the layout the engine library was built with. Everything else
//! is a [`BridgeConfig`] installed once by [`crate::init_with`].

use std::fmt;

use crate::value::repr::{ActiveCodec, Codec};

/// Environment variable read by [`BridgeConfig::from_env`].
pub const FPU_GUARD_ENV: &str = "QJS_BRIDGE_FPU_GUARD";

/// Physical layout of a tagged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingScheme {
    Struct,
    NanBoxing,
    StrictNanBoxing,
}

impl EncodingScheme {
    pub const fn name(self) -> &'static str {
        match self {
            EncodingScheme::Struct => "struct",
            EncodingScheme::NanBoxing => "nan-boxing",
            EncodingScheme::StrictNanBoxing => "strict-nan-boxing",
        }
    }
}

impl fmt::Display for EncodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The layout this build exchanges with the engine.
pub const ACTIVE_SCHEME: EncodingScheme = <ActiveCodec as Codec>::ENCODING;

/// Run-time settings for the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Mask floating-point traps around foreign calls.
    pub fpu_guard: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig { fpu_guard: true }
    }
}

impl BridgeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(FPU_GUARD_ENV).ok().as_deref())
    }

    /// Same as [`BridgeConfig::from_env`], reading the guard switch from `value`.
    ///
    /// `0`, `false`, `off` and `no` (any case) disable the guard; anything else,
    /// or no value at all, leaves it on.
    pub fn from_env_value(value: Option<&str>) -> Self {
        let fpu_guard = match value.map(str::trim) {
            Some(v) => !matches!(
                v.to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            ),
            None => true,
        };
        BridgeConfig { fpu_guard }
    }

    pub fn with_fpu_guard(mut self, enabled: bool) -> Self {
        self.fpu_guard = enabled;
        self
    }
}
