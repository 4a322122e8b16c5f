//! Mode-change request flag shared with the button context.

use core::sync::atomic::{
    AtomicBool,
    Ordering,
};

/// A single "switch mode" bit.
///
/// The button side only ever calls [`raise`](Self::raise). The frame loop
/// polls it with [`is_raised`](Self::is_raised) and consumes it with
/// [`take`](Self::take).
pub struct ModeSignal(AtomicBool);

impl Default for ModeSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeSignal {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Request a mode change.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
