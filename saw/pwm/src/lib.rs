#![no_std]
#![forbid(unsafe_code)]

//! # Sawtooth PWM
//!
//! Brings up the sample-rate ticker and the PWM timer from a validated plan
//! and provides the ticker interrupt body.
//!
//! ```text
//! ticker overflow ──▶ TickerIsr::on_update ──▶ PWM compare (preloaded)
//!                        │                          │
//!                        └─ Sawtooth::advance       └─ latched at period end
//! ```
//!
//! [`bring_up`] hands the [`TickerIsr`] to an installer closure before the
//! interrupt line is unmasked, so the sample counter is owned by the
//! interrupt context from the first interrupt on and nothing else can reach
//! it.

#[macro_use]
mod fmt_log;

pub mod delay;
pub mod isr;
pub mod ring;
pub mod startup;

pub use delay::TickDelay;
pub use isr::TickerIsr;
pub use ring::LedRingDemo;
pub use startup::bring_up;

pub use saw_core::{SawConfig, SawError, SawPlan, SawResult};
