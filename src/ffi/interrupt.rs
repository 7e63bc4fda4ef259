//! Cooperative abort of long-running evaluation.
//!
//! The engine polls a registered callback between bytecode operations; a
//! non-zero return makes it throw an uncatchable "interrupted" error. The
//! handle is shared with whatever thread wants to stop the script.

use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use libc::c_int;

/// Abort flag shared between the engine thread and any number of requesters.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    flag: Arc<AtomicBool>,
}

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running script to stop at its next poll.
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Re-arm after an interrupted evaluation.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Opaque pointer for [`poll_interrupt`].
    ///
    /// Valid as long as this handle (or a clone) is alive.
    pub fn as_opaque(&self) -> *mut c_void {
        Arc::as_ptr(&self.flag) as *mut c_void
    }
}

/// Interrupt callback in the engine's calling convention.
///
/// Returns 1 when an abort was requested on the handle behind `opaque`, 0
/// otherwise. A null `opaque` never interrupts.
///
/// # Safety
///
/// `opaque` must be null or come from [`InterruptHandle::as_opaque`] on a
/// handle that is still alive.
pub unsafe extern "C" fn poll_interrupt(_runtime: *mut c_void, opaque: *mut c_void) -> c_int {
    if opaque.is_null() {
        return 0;
    }
    let flag = &*(opaque as *const AtomicBool);
    flag.load(Ordering::SeqCst) as c_int
}
