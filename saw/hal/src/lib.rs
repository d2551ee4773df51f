//! Register-level interfaces for the sawtooth PWM generator
//!
//! Each trait names the register operations one peripheral role needs, with
//! no vendor types in the signatures. Chip backends implement them over a
//! peripheral access crate; [`mock`] implements them as a simulation so the
//! bring-up sequence and the interrupt handler run on the host.

#![no_std]
#![forbid(unsafe_code)]

pub mod mock;
pub mod timer;

pub use saw_core::Channel;
pub use timer::{PwmMode, PwmTimer, TickerTimer};

/// Clock gating and pin routing done once before any timer is touched
pub trait Board {
    /// Enable clocks for the GPIO port and both timers
    fn enable_peripheral_clocks(&mut self);

    /// Route the pin of `channel` to the PWM timer's alternate function
    fn route_pwm_output(&mut self, channel: Channel);
}

/// Interrupt controller abstraction
pub trait InterruptController {
    /// Unmask an interrupt line
    fn enable_interrupt(&mut self, irq: u16);

    /// Check whether an interrupt line is unmasked
    fn is_enabled(&self, irq: u16) -> bool;
}

/// A bank of output pins driven through an atomic set/reset register
pub trait OutputBank {
    /// Write a set/reset word: low half sets pins, high half clears them
    fn write_set_reset(&mut self, word: u32);
}
