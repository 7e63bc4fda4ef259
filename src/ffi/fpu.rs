//! Floating-point trap masking around foreign calls.
//!
//! The engine performs float arithmetic that may divide by zero or overflow and
//! expects those to produce IEEE results, not signals. A host that runs with
//! some traps unmasked must mask them for the duration of the call and get its
//! own state back afterwards, however the call returns.
//!
//! - x86 / x86_64: MXCSR bits `0x1F80` and the x87 control word bits `0x3F`.
//! - aarch64: FPCR trap-enable bits `0x9F00` cleared.
//! - elsewhere: nothing to do.

use std::marker::PhantomData;

#[cfg(any(
    target_arch = "x86_64",
    all(target_arch = "x86", target_feature = "sse")
))]
mod arch {
    use std::arch::asm;
    use std::ptr;

    pub const MXCSR_TRAP_MASK: u32 = 0x1F80;
    pub const X87_TRAP_MASK: u16 = 0x3F;
    const MXCSR_STATUS_FLAGS: u32 = 0x3F;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RawState {
        pub mxcsr: u32,
        pub x87: u16,
    }

    pub fn read() -> RawState {
        let mut mxcsr: u32 = 0;
        let mut x87: u16 = 0;
        // SAFETY: both instructions only store the control registers to the
        // given stack slots.
        unsafe {
            asm!(
                "stmxcsr [{}]",
                in(reg) ptr::addr_of_mut!(mxcsr),
                options(nostack, preserves_flags)
            );
            asm!(
                "fnstcw [{}]",
                in(reg) ptr::addr_of_mut!(x87),
                options(nostack, preserves_flags)
            );
        }
        // Sticky status flags are results, not control.
        RawState {
            mxcsr: mxcsr & !MXCSR_STATUS_FLAGS,
            x87,
        }
    }

    /// # Safety
    ///
    /// Unmasking traps makes later float operations on this thread able to fault.
    pub unsafe fn write(state: RawState) {
        asm!(
            "ldmxcsr [{}]",
            in(reg) ptr::addr_of!(state.mxcsr),
            options(nostack, readonly, preserves_flags)
        );
        // Pending x87 exceptions would fire as soon as their trap is unmasked.
        asm!(
            "fnclex",
            "fldcw [{}]",
            in(reg) ptr::addr_of!(state.x87),
            options(nostack, preserves_flags)
        );
    }

    pub fn masked(state: RawState) -> RawState {
        RawState {
            mxcsr: state.mxcsr | MXCSR_TRAP_MASK,
            x87: state.x87 | X87_TRAP_MASK,
        }
    }

    pub fn all_masked(state: RawState) -> bool {
        state.mxcsr & MXCSR_TRAP_MASK == MXCSR_TRAP_MASK
            && state.x87 & X87_TRAP_MASK == X87_TRAP_MASK
    }
}

#[cfg(target_arch = "aarch64")]
mod arch {
    use std::arch::asm;

    pub const FPCR_TRAP_BITS: u64 = 0x9F00;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RawState {
        pub fpcr: u64,
    }

    pub fn read() -> RawState {
        let fpcr: u64;
        // SAFETY: reading FPCR has no side effects.
        unsafe {
            asm!("mrs {}, fpcr", out(reg) fpcr, options(nomem, nostack, preserves_flags));
        }
        RawState { fpcr }
    }

    /// # Safety
    ///
    /// Enabling traps makes later float operations on this thread able to fault.
    pub unsafe fn write(state: RawState) {
        asm!("msr fpcr, {}", in(reg) state.fpcr, options(nomem, nostack, preserves_flags));
    }

    pub fn masked(state: RawState) -> RawState {
        RawState {
            fpcr: state.fpcr & !FPCR_TRAP_BITS,
        }
    }

    pub fn all_masked(state: RawState) -> bool {
        state.fpcr & FPCR_TRAP_BITS == 0
    }
}

#[cfg(not(any(
    target_arch = "x86_64",
    all(target_arch = "x86", target_feature = "sse"),
    target_arch = "aarch64"
)))]
mod arch {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RawState;

    pub fn read() -> RawState {
        RawState
    }

    pub unsafe fn write(_state: RawState) {}

    pub fn masked(state: RawState) -> RawState {
        state
    }

    pub fn all_masked(_state: RawState) -> bool {
        true
    }
}

/// Snapshot of the calling thread's floating-point control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpState(arch::RawState);

impl FpState {
    pub fn current() -> Self {
        FpState(arch::read())
    }

    /// This state with every trap masked.
    pub fn masked(self) -> Self {
        FpState(arch::masked(self.0))
    }

    pub fn all_traps_masked(self) -> bool {
        arch::all_masked(self.0)
    }

    /// Load this state into the control registers.
    ///
    /// # Safety
    ///
    /// If the state unmasks traps, float exceptions on this thread will fault
    /// until it is replaced.
    pub unsafe fn install(self) {
        arch::write(self.0)
    }
}

/// Masks every floating-point trap until dropped, then restores the saved state.
///
/// Control state is per thread, so the guard is neither `Send` nor `Sync`.
#[must_use = "the previous state is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FpuGuard {
    saved: Option<FpState>,
    _thread: PhantomData<*mut ()>,
}

impl FpuGuard {
    /// Mask traps unless the installed configuration disables the guard.
    ///
    /// # Panics
    ///
    /// Reads [`crate::config`], so panics if initialization failed.
    pub fn new() -> Self {
        if crate::init::config().fpu_guard {
            Self::masking()
        } else {
            FpuGuard {
                saved: None,
                _thread: PhantomData,
            }
        }
    }

    /// Mask traps regardless of configuration.
    pub fn masking() -> Self {
        let saved = FpState::current();
        // SAFETY: masking traps cannot introduce faults.
        unsafe { saved.masked().install() };
        FpuGuard {
            saved: Some(saved),
            _thread: PhantomData,
        }
    }

    /// The state restored on drop, if the guard changed anything.
    pub fn saved(&self) -> Option<FpState> {
        self.saved
    }
}

impl Default for FpuGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FpuGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            // SAFETY: this is the state the thread had before the guard existed.
            unsafe { saved.install() };
        }
    }
}

/// Run `f` with floating-point traps masked.
///
/// # Panics
///
/// Same as [`FpuGuard::new`].
pub fn with_masked_fpu<R>(f: impl FnOnce() -> R) -> R {
    let _guard = FpuGuard::new();
    f()
}
