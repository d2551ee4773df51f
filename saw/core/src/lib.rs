#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # Sawtooth Core
//!
//! Hardware-independent building blocks for the interrupt-driven sawtooth PWM
//! generator: validated configuration, timer period math, the sample counter
//! owned by the ticker interrupt, the rotating LED pattern and the
//! millisecond tick counter.
//!
//! Nothing in this crate touches a register. A [`SawConfig`] is turned into a
//! [`SawPlan`] once, before any timer is enabled; every later stage works
//! from the plan.

use core::fmt;

#[macro_use]
mod fmt_log;

pub mod clock;
pub mod config;
pub mod generator;
pub mod leds;
pub mod tick;

pub use clock::{ApbPrescaler, ClockTree};
pub use config::{
    Channel, OverrunPolicy, Prescaler, SampleRate, SawConfig, SawPlan, TickerPlan,
    MAX_AUTO_RELOAD,
};
pub use generator::Sawtooth;
pub use leds::LedRing;
pub use tick::{MillisCounter, Timebase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the sawtooth crates
pub type SawResult<T> = Result<T, SawError>;

/// Configuration and runtime faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SawError {
    /// Timer input clock is zero
    ZeroTimerClock,
    /// Requested sample rate is zero
    ZeroSampleRate,
    /// Sample rate needs a period shorter than two timer counts
    SampleRateTooHigh,
    /// Ticker period does not fit the auto-reload register
    PeriodOutOfRange { period: u32 },
    /// Resolution cannot be used as a PWM auto-reload value
    ResolutionOutOfRange { resolution: u32 },
    /// Ramp step must be at least one and below the resolution
    StepOutOfRange { step: u16 },
    /// Tick clock cannot be divided down to 1 kHz
    TimebaseOutOfRange,
    /// LED bank does not fit in a 16-pin port
    LedBaseOutOfRange { base: u8 },
    /// Sample periods elapsed while the ticker handler was still running
    Overrun { missed: u32 },
}

impl fmt::Display for SawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SawError::ZeroTimerClock => write!(f, "timer input clock is zero"),
            SawError::ZeroSampleRate => write!(f, "sample rate is zero"),
            SawError::SampleRateTooHigh => {
                write!(f, "sample rate too high for the timer input clock")
            }
            SawError::PeriodOutOfRange { period } => {
                write!(f, "ticker period {} exceeds the auto-reload range", period)
            }
            SawError::ResolutionOutOfRange { resolution } => {
                write!(f, "resolution {} outside 2..=65535", resolution)
            }
            SawError::StepOutOfRange { step } => write!(f, "ramp step {} out of range", step),
            SawError::TimebaseOutOfRange => write!(f, "tick clock cannot produce 1 kHz"),
            SawError::LedBaseOutOfRange { base } => {
                write!(f, "LED bank base pin {} leaves the port", base)
            }
            SawError::Overrun { missed } => {
                write!(f, "ticker handler overran {} sample period(s)", missed)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SawError {}

#[cfg(feature = "defmt")]
impl defmt::Format for SawError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SawError::ZeroTimerClock => defmt::write!(fmt, "ZeroTimerClock"),
            SawError::ZeroSampleRate => defmt::write!(fmt, "ZeroSampleRate"),
            SawError::SampleRateTooHigh => defmt::write!(fmt, "SampleRateTooHigh"),
            SawError::PeriodOutOfRange { period } => {
                defmt::write!(fmt, "PeriodOutOfRange({})", period)
            }
            SawError::ResolutionOutOfRange { resolution } => {
                defmt::write!(fmt, "ResolutionOutOfRange({})", resolution)
            }
            SawError::StepOutOfRange { step } => defmt::write!(fmt, "StepOutOfRange({})", step),
            SawError::TimebaseOutOfRange => defmt::write!(fmt, "TimebaseOutOfRange"),
            SawError::LedBaseOutOfRange { base } => {
                defmt::write!(fmt, "LedBaseOutOfRange({})", base)
            }
            SawError::Overrun { missed } => defmt::write!(fmt, "Overrun({})", missed),
        }
    }
}
