//! One-time initialization barrier.
//!
//! The first successful call to [`init`] or [`init_with`] checks the compiled
//! layout against the target, builds the sentinels and installs the
//! [`BridgeConfig`]. Later calls return the installed state unchanged.

use std::mem::size_of;

use log::{debug, warn};
use once_cell::sync::OnceCell;

use crate::config::{BridgeConfig, ACTIVE_SCHEME};
use crate::error::InitError;
use crate::value::repr::{ActiveCodec, Codec, JSValue};
use crate::value::sentinel::Sentinels;

struct State {
    config: BridgeConfig,
    sentinels: Sentinels<ActiveCodec>,
}

static STATE: OnceCell<State> = OnceCell::new();

/// Initialize with settings read from the environment.
pub fn init() -> Result<(), InitError> {
    init_with(BridgeConfig::from_env())
}

/// Initialize with explicit settings.
///
/// Fails if the physical layout selected at build time does not have the size
/// the engine ABI requires; nothing is installed in that case and the bridge
/// must not be used. A second call with different settings keeps the first ones.
pub fn init_with(config: BridgeConfig) -> Result<(), InitError> {
    let state = STATE.get_or_try_init(|| build_state(config))?;
    if state.config != config {
        warn!(
            "bridge already initialized with {:?}; ignoring {:?}",
            state.config, config
        );
    }
    Ok(())
}

fn build_state(config: BridgeConfig) -> Result<State, InitError> {
    ActiveCodec::check_layout()?;
    let sentinels = Sentinels::<ActiveCodec>::build();
    sentinels.verify()?;
    debug!(
        "qjs-bridge initialized: scheme={} value_size={} pointer_size={} fpu_guard={}",
        ACTIVE_SCHEME,
        size_of::<JSValue>(),
        size_of::<usize>(),
        config.fpu_guard
    );
    Ok(State { config, sentinels })
}

fn state() -> &'static State {
    match STATE.get_or_try_init(|| build_state(BridgeConfig::from_env())) {
        Ok(state) => state,
        Err(e) => panic!("qjs-bridge used after failed initialization: {e}"),
    }
}

/// Sentinel values of the active layout.
///
/// Initializes on first use if [`init`] was not called.
///
/// # Panics
///
/// Panics if the compiled layout does not match the target. Call [`init`]
/// first to receive that failure as an error instead.
pub fn sentinels() -> &'static Sentinels<ActiveCodec> {
    &state().sentinels
}

/// The installed settings, initializing on first use like [`sentinels`].
///
/// # Panics
///
/// Same as [`sentinels`].
pub fn config() -> BridgeConfig {
    state().config
}

/// True once initialization has completed.
pub fn is_initialized() -> bool {
    STATE.get().is_some()
}
