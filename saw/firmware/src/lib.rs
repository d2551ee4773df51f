#![no_std]

//! STM32F303 backends for the sawtooth generator
//!
//! TIM3 is the sample-rate ticker, TIM2 drives the PWM output on port A and
//! the Discovery board's LED ring sits on PE8..PE15. Registers are written
//! through the peripheral access crate with raw bit values.

pub use stm32f3::stm32f303 as pac;

pub mod board;
pub mod nvic;
pub mod timers;

pub use board::{F3Board, LedBank};
pub use nvic::{IrqNumber, Nvic};
pub use timers::{PwmOut, Ticker};
