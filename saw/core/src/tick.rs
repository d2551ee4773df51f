//! Millisecond tick counter and its timebase

use core::cell::Cell;

use critical_section::Mutex;

use crate::{SawError, SawResult};

/// Tick frequency of the millisecond timebase
pub const TICK_HZ: u32 = 1_000;

/// Largest SysTick reload value (24-bit counter)
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Millisecond counter incremented from a 1 kHz interrupt.
///
/// The counter wraps after about 49.7 days; [`has_elapsed`](Self::has_elapsed)
/// compares with wrapping arithmetic so delays spanning the wrap still end.
#[derive(Debug)]
pub struct MillisCounter {
    ticks: Mutex<Cell<u32>>,
}

impl MillisCounter {
    pub const fn new() -> Self {
        Self {
            ticks: Mutex::new(Cell::new(0)),
        }
    }

    /// Advance by one millisecond. Called from the tick interrupt.
    pub fn increment(&self) {
        critical_section::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().wrapping_add(1));
        });
    }

    /// Milliseconds since start, wrapping
    pub fn now(&self) -> u32 {
        critical_section::with(|cs| self.ticks.borrow(cs).get())
    }

    /// True once at least `ms` milliseconds have passed since `start`
    pub fn has_elapsed(&self, start: u32, ms: u32) -> bool {
        self.now().wrapping_sub(start) >= ms
    }
}

impl Default for MillisCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// SysTick reload producing a 1 kHz tick from the core clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timebase {
    reload: u32,
}

impl Timebase {
    pub fn systick(core_hz: u32) -> SawResult<Self> {
        let counts = core_hz / TICK_HZ;
        if counts == 0 || counts - 1 > SYSTICK_MAX_RELOAD {
            return Err(SawError::TimebaseOutOfRange);
        }
        Ok(Self { reload: counts - 1 })
    }

    /// Value for the SysTick reload register
    pub const fn reload(&self) -> u32 {
        self.reload
    }
}
