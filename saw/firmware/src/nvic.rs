//! NVIC access by raw interrupt number

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;
use saw_hal::InterruptController;

/// Device interrupt line by position in the vector table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqNumber(pub u16);

// SAFETY: only built from positions of the STM32F303 vector table
unsafe impl InterruptNumber for IrqNumber {
    fn number(self) -> u16 {
        self.0
    }
}

/// Owns the NVIC so only one place unmasks lines
pub struct Nvic {
    _nvic: NVIC,
}

impl Nvic {
    pub fn new(nvic: NVIC) -> Self {
        Self { _nvic: nvic }
    }

    /// Mask a line. Usable from any context.
    pub fn mask(irq: u16) {
        NVIC::mask(IrqNumber(irq));
    }
}

impl InterruptController for Nvic {
    fn enable_interrupt(&mut self, irq: u16) {
        // SAFETY: the handler state is installed before the line is unmasked
        unsafe { NVIC::unmask(IrqNumber(irq)) }
    }

    fn is_enabled(&self, irq: u16) -> bool {
        NVIC::is_enabled(IrqNumber(irq))
    }
}
