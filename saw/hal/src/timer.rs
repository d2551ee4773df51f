//! Timer and PWM register interfaces

use saw_core::Channel;

/// Output compare mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmMode {
    /// Output high while the counter is below the compare value
    Mode1,
    /// Output low while the counter is below the compare value
    Mode2,
}

/// Free-running timer raising an update interrupt on every overflow
pub trait TickerTimer {
    /// Write the PSC register (divider minus one)
    fn set_prescaler(&mut self, prescaler: u16);

    /// Write the ARR register (period minus one)
    fn set_auto_reload(&mut self, period: u16);

    /// Set the update interrupt enable bit
    fn enable_update_interrupt(&mut self);

    /// Set the counter enable bit
    fn start(&mut self);

    /// Read the update interrupt flag
    fn is_update_pending(&self) -> bool;

    /// Clear the update interrupt flag; clearing a clear flag is a no-op
    fn clear_update_pending(&mut self);
}

/// Timer configured for edge-aligned PWM output
pub trait PwmTimer {
    /// Write the PSC register (divider minus one)
    fn set_prescaler(&mut self, prescaler: u16);

    /// Write the ARR register
    fn set_auto_reload(&mut self, value: u16);

    /// Enable or disable buffering of ARR writes until the next update event
    fn set_auto_reload_preload(&mut self, enable: bool);

    /// Select the output compare mode of a channel
    fn set_output_compare_mode(&mut self, channel: Channel, mode: PwmMode);

    /// Enable or disable buffering of compare writes until the next update event
    fn set_output_compare_preload(&mut self, channel: Channel, enable: bool);

    /// Write a channel's compare register
    fn set_compare(&mut self, channel: Channel, value: u16);

    /// Enable a channel's output
    fn enable_channel(&mut self, channel: Channel);

    /// Force an update event, latching preloaded registers
    fn generate_update(&mut self);

    /// Set the counter enable bit
    fn start(&mut self);
}
