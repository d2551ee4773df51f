//! Blocking delay on the millisecond tick

use embedded_hal::delay::DelayNs;
use saw_core::MillisCounter;

/// Busy-waits on a [`MillisCounter`] advanced by the 1 kHz tick interrupt.
///
/// Resolution is one millisecond. Every non-zero delay is rounded up and
/// waits one extra tick, since the tick in progress may already be almost
/// over.
#[derive(Debug, Clone, Copy)]
pub struct TickDelay<'a> {
    millis: &'a MillisCounter,
}

impl<'a> TickDelay<'a> {
    pub const fn new(millis: &'a MillisCounter) -> Self {
        Self { millis }
    }

    fn wait_ms(&self, ms: u32) {
        if ms == 0 {
            return;
        }
        let start = self.millis.now();
        while !self.millis.has_elapsed(start, ms.saturating_add(1)) {
            core::hint::spin_loop();
        }
    }
}

impl DelayNs for TickDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.wait_ms(ns.div_ceil(1_000_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.wait_ms(us.div_ceil(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait_ms(ms);
    }
}
