//! Rotating LED demo

use embedded_hal::delay::DelayNs;
use saw_core::LedRing;
use saw_hal::OutputBank;

/// Lights one LED of a ring at a time, moving it one position per period.
#[derive(Debug)]
pub struct LedRingDemo<O, D> {
    ring: LedRing,
    bank: O,
    delay: D,
    period_ms: u32,
}

impl<O: OutputBank, D: DelayNs> LedRingDemo<O, D> {
    /// Time each LED stays lit by default
    pub const DEFAULT_PERIOD_MS: u32 = 500;

    pub fn new(ring: LedRing, bank: O, delay: D, period_ms: u32) -> Self {
        Self {
            ring,
            bank,
            delay,
            period_ms,
        }
    }

    /// Show the current pattern, rotate it and wait one period
    pub fn step(&mut self) {
        self.bank.write_set_reset(self.ring.set_reset_word());
        self.ring.rotate();
        self.delay.delay_ms(self.period_ms);
    }

    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    pub fn ring(&self) -> &LedRing {
        &self.ring
    }

    pub fn bank(&self) -> &O {
        &self.bank
    }
}
