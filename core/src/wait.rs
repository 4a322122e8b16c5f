//! Cancellable waiting.

use core::cmp::min;

use embassy_time::{
    Duration,
    Instant,
    Timer,
};

use crate::ModeSignal;

/// How a [`wait_until`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    Elapsed,
    /// The mode-change signal was raised first. It is left raised.
    Cancelled,
}

impl Wait {
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Sleep until `deadline`, checking `signal` at least every `quantum`.
///
/// The signal is checked before the clock, so a raised signal wins even
/// when the deadline has already passed.
pub async fn wait_until(deadline: Instant, signal: &ModeSignal, quantum: Duration) -> Wait {
    loop {
        if signal.is_raised() {
            return Wait::Cancelled;
        }
        let now = Instant::now();
        if now >= deadline {
            return Wait::Elapsed;
        }
        Timer::after(min(deadline - now, quantum)).await;
    }
}
