//! Simulated peripherals
//!
//! The mocks behave like the general-purpose timers they stand in for, at
//! the level the generator depends on:
//!
//! - compare, auto-reload and prescaler writes land in a preload register and
//!   reach the active (shadow) register only on an update event when preload
//!   is enabled, see [`PreloadRegister`]
//! - [`MockPwm::tick`] advances the counter one input clock and produces the
//!   update event on overflow
//! - [`MockTicker`] raises its update flag when told an overflow happened and
//!   only requests an interrupt while that flag and its enable bit are set
//!
//! Every register operation can be recorded in a shared [`Journal`] to check
//! bring-up ordering.

mod board;
mod journal;
mod pwm;
mod register;
mod ticker;

pub use board::{MockBoard, MockNvic, MockOutputBank};
pub use journal::{Journal, Op, PwmOp, TickerOp, JOURNAL_CAPACITY};
pub use pwm::{MockPwm, PwmPeriod};
pub use register::PreloadRegister;
pub use ticker::MockTicker;
