//! Generator configuration and its validated plan
//!
//! A [`SawConfig`] describes what the integrator wants: an input clock, a
//! sample rate (or a raw ticker period), the PWM resolution and so on.
//! [`SawConfig::validate`] turns it into a [`SawPlan`] holding the exact
//! register values, or rejects it. Values are never clamped.

use crate::{SawError, SawResult};

/// Largest value a 16-bit auto-reload register accepts
pub const MAX_AUTO_RELOAD: u32 = 0xFFFF;

/// How the ticker period is specified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleRate {
    /// Desired sample rate; the period is derived from the timer clock
    Hertz(u32),
    /// Raw auto-reload value, programmed as given
    Period(u32),
}

/// Ticker prescaler selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    /// Program this divider minus one, as the PSC register expects
    Fixed(u16),
    /// Pick the smallest divider that brings the period into range
    Auto,
}

/// What the ticker handler does when it finds its own flag raised again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverrunPolicy {
    /// Never look at the flag after the update
    Ignore,
    /// Count the overrun and keep running
    #[default]
    Count,
    /// Report the overrun as an error
    Fatal,
}

/// PWM timer output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Ch1,
    Ch2,
    Ch3,
    Ch4,
}

impl Channel {
    /// All channels in register order
    pub const ALL: [Channel; 4] = [Channel::Ch1, Channel::Ch2, Channel::Ch3, Channel::Ch4];

    /// Zero-based channel index
    pub const fn index(self) -> usize {
        match self {
            Channel::Ch1 => 0,
            Channel::Ch2 => 1,
            Channel::Ch3 => 2,
            Channel::Ch4 => 3,
        }
    }
}

/// Integrator-facing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SawConfig {
    timer_clock_hz: u32,
    sample_rate: SampleRate,
    prescaler: Prescaler,
    resolution: u32,
    step: u16,
    channel: Channel,
    ticker_irq: u16,
    overrun: OverrunPolicy,
}

impl SawConfig {
    /// Default number of duty levels per ramp
    pub const DEFAULT_RESOLUTION: u32 = 180;

    /// Create a configuration with an unprescaled ticker, 180 duty levels,
    /// a ramp step of one on channel 1 and overruns counted.
    pub const fn new(timer_clock_hz: u32, sample_rate: SampleRate, ticker_irq: u16) -> Self {
        Self {
            timer_clock_hz,
            sample_rate,
            prescaler: Prescaler::Fixed(0),
            resolution: Self::DEFAULT_RESOLUTION,
            step: 1,
            channel: Channel::Ch1,
            ticker_irq,
            overrun: OverrunPolicy::Count,
        }
    }

    pub const fn with_prescaler(mut self, prescaler: Prescaler) -> Self {
        self.prescaler = prescaler;
        self
    }

    pub const fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub const fn with_step(mut self, step: u16) -> Self {
        self.step = step;
        self
    }

    pub const fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub const fn with_overrun_policy(mut self, overrun: OverrunPolicy) -> Self {
        self.overrun = overrun;
        self
    }

    pub const fn channel(&self) -> Channel {
        self.channel
    }

    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Check every parameter and compute the register values.
    pub fn validate(&self) -> SawResult<SawPlan> {
        match self.plan() {
            Ok(plan) => {
                debug!(
                    "sawtooth plan: psc={} arr={} resolution={} step={}",
                    plan.ticker.prescaler,
                    plan.ticker.period,
                    plan.resolution,
                    plan.step
                );
                Ok(plan)
            }
            Err(err) => {
                error!("sawtooth config rejected: {}", err);
                Err(err)
            }
        }
    }

    fn plan(&self) -> SawResult<SawPlan> {
        if self.timer_clock_hz == 0 {
            return Err(SawError::ZeroTimerClock);
        }

        let ticker = TickerPlan::solve(self.timer_clock_hz, self.sample_rate, self.prescaler)?;

        if self.resolution < 2 || self.resolution > MAX_AUTO_RELOAD {
            return Err(SawError::ResolutionOutOfRange {
                resolution: self.resolution,
            });
        }
        let resolution = self.resolution as u16;

        if self.step == 0 || self.step >= resolution {
            return Err(SawError::StepOutOfRange { step: self.step });
        }

        Ok(SawPlan {
            timer_clock_hz: self.timer_clock_hz,
            ticker,
            resolution,
            step: self.step,
            channel: self.channel,
            ticker_irq: self.ticker_irq,
            overrun: self.overrun,
        })
    }
}

/// Ticker register values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickerPlan {
    /// PSC register value (divider minus one)
    pub prescaler: u16,
    /// ARR register value (period in counts minus one)
    pub period: u16,
}

impl TickerPlan {
    fn solve(clock_hz: u32, rate: SampleRate, prescaler: Prescaler) -> SawResult<Self> {
        let hz = match rate {
            SampleRate::Period(period) => {
                let psc = match prescaler {
                    Prescaler::Fixed(psc) => psc,
                    Prescaler::Auto => 0,
                };
                return Self::checked(psc, period);
            }
            SampleRate::Hertz(0) => return Err(SawError::ZeroSampleRate),
            SampleRate::Hertz(hz) => u64::from(hz),
        };
        let clock = u64::from(clock_hz);

        let psc = match prescaler {
            Prescaler::Fixed(psc) => psc,
            Prescaler::Auto => {
                let total = div_round(clock, hz);
                if total < 2 {
                    return Err(SawError::SampleRateTooHigh);
                }
                // A u32 clock never needs more than 16 + 16 bits of division.
                ((total - 1) / (u64::from(MAX_AUTO_RELOAD) + 1)) as u16
            }
        };

        let ticks = div_round(clock, hz * (u64::from(psc) + 1));
        if ticks < 2 {
            return Err(SawError::SampleRateTooHigh);
        }
        Self::checked(psc, (ticks - 1) as u32)
    }

    fn checked(prescaler: u16, period: u32) -> SawResult<Self> {
        if period == 0 || period > MAX_AUTO_RELOAD {
            return Err(SawError::PeriodOutOfRange { period });
        }
        Ok(Self {
            prescaler,
            period: period as u16,
        })
    }

    /// Timer input clocks per sample; up to 2^32 with both registers at 0xFFFF
    pub const fn clocks_per_sample(&self) -> u64 {
        (self.prescaler as u64 + 1) * (self.period as u64 + 1)
    }
}

/// Round-half-up integer division
const fn div_round(num: u64, den: u64) -> u64 {
    (num + den / 2) / den
}

/// Validated configuration. Only [`SawConfig::validate`] produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SawPlan {
    timer_clock_hz: u32,
    ticker: TickerPlan,
    resolution: u16,
    step: u16,
    channel: Channel,
    ticker_irq: u16,
    overrun: OverrunPolicy,
}

impl SawPlan {
    pub const fn ticker(&self) -> TickerPlan {
        self.ticker
    }

    /// Number of duty levels; also the PWM timer's auto-reload value
    pub const fn resolution(&self) -> u16 {
        self.resolution
    }

    pub const fn pwm_auto_reload(&self) -> u16 {
        self.resolution
    }

    pub const fn step(&self) -> u16 {
        self.step
    }

    pub const fn channel(&self) -> Channel {
        self.channel
    }

    pub const fn ticker_irq(&self) -> u16 {
        self.ticker_irq
    }

    pub const fn overrun_policy(&self) -> OverrunPolicy {
        self.overrun
    }

    /// Sample rate the ticker actually produces, truncated to whole hertz
    pub const fn sample_rate_hz(&self) -> u32 {
        (self.timer_clock_hz as u64 / self.ticker.clocks_per_sample()) as u32
    }

    /// PWM carrier frequency with an unprescaled PWM timer
    pub const fn pwm_frequency_hz(&self) -> u32 {
        self.timer_clock_hz / (self.resolution as u32 + 1)
    }

    /// Samples in one full ramp, including the zero sample
    pub const fn ramp_length(&self) -> u16 {
        self.resolution.div_ceil(self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIM3_IRQ: u16 = 29;

    #[test]
    fn audio_rate_at_8mhz_uses_period_180() {
        let plan = SawConfig::new(8_000_000, SampleRate::Hertz(44_100), TIM3_IRQ)
            .validate()
            .unwrap();
        assert_eq!(plan.ticker(), TickerPlan { prescaler: 0, period: 180 });
        assert_eq!(plan.sample_rate_hz(), 44_198);
        assert_eq!(plan.pwm_auto_reload(), 180);
    }

    #[test]
    fn raw_period_is_taken_verbatim() {
        let plan = SawConfig::new(8_000_000, SampleRate::Period(181 - 1), TIM3_IRQ)
            .validate()
            .unwrap();
        assert_eq!(plan.ticker().period, 180);
        assert_eq!(plan.ticker().prescaler, 0);
    }

    #[test]
    fn auto_prescaler_extends_range() {
        let plan = SawConfig::new(72_000_000, SampleRate::Hertz(10), TIM3_IRQ)
            .with_prescaler(Prescaler::Auto)
            .validate()
            .unwrap();
        assert_eq!(plan.ticker(), TickerPlan { prescaler: 109, period: 65_454 });
    }

    #[test]
    fn auto_prescaler_stays_zero_when_not_needed() {
        let plan = SawConfig::new(8_000_000, SampleRate::Hertz(44_100), TIM3_IRQ)
            .with_prescaler(Prescaler::Auto)
            .validate()
            .unwrap();
        assert_eq!(plan.ticker().prescaler, 0);
    }

    #[test]
    fn unprescaled_low_rate_is_rejected_not_clamped() {
        let err = SawConfig::new(72_000_000, SampleRate::Hertz(10), TIM3_IRQ)
            .validate()
            .unwrap_err();
        assert_eq!(err, SawError::PeriodOutOfRange { period: 7_199_999 });
    }

    #[test]
    fn out_of_range_raw_period_is_rejected() {
        let cfg = SawConfig::new(8_000_000, SampleRate::Period(70_000), TIM3_IRQ);
        assert_eq!(
            cfg.validate(),
            Err(SawError::PeriodOutOfRange { period: 70_000 })
        );
        let cfg = SawConfig::new(8_000_000, SampleRate::Period(0), TIM3_IRQ);
        assert_eq!(cfg.validate(), Err(SawError::PeriodOutOfRange { period: 0 }));
    }

    #[test]
    fn rates_near_the_clock_are_rejected() {
        let cfg = SawConfig::new(8_000_000, SampleRate::Hertz(6_000_000), TIM3_IRQ);
        assert_eq!(cfg.validate(), Err(SawError::SampleRateTooHigh));
        let cfg = SawConfig::new(8_000_000, SampleRate::Hertz(0), TIM3_IRQ);
        assert_eq!(cfg.validate(), Err(SawError::ZeroSampleRate));
        let cfg = SawConfig::new(0, SampleRate::Hertz(1), TIM3_IRQ);
        assert_eq!(cfg.validate(), Err(SawError::ZeroTimerClock));
    }

    #[test]
    fn resolution_and_step_bounds() {
        let base = SawConfig::new(8_000_000, SampleRate::Period(180), TIM3_IRQ);
        assert_eq!(
            base.with_resolution(1).validate(),
            Err(SawError::ResolutionOutOfRange { resolution: 1 })
        );
        assert_eq!(
            base.with_resolution(65_536).validate(),
            Err(SawError::ResolutionOutOfRange { resolution: 65_536 })
        );
        assert_eq!(
            base.with_step(0).validate(),
            Err(SawError::StepOutOfRange { step: 0 })
        );
        assert_eq!(
            base.with_step(180).validate(),
            Err(SawError::StepOutOfRange { step: 180 })
        );
        assert!(base.with_resolution(65_535).with_step(3).validate().is_ok());
    }

    #[test]
    fn slowest_ticker_rate_does_not_overflow() {
        let plan = SawConfig::new(8_000_000, SampleRate::Period(0xFFFF), TIM3_IRQ)
            .with_prescaler(Prescaler::Fixed(0xFFFF))
            .validate()
            .unwrap();
        assert_eq!(plan.ticker().clocks_per_sample(), 1 << 32);
        assert_eq!(plan.sample_rate_hz(), 0);

        let plan = SawConfig::new(u32::MAX, SampleRate::Period(0xFFFF), TIM3_IRQ)
            .with_prescaler(Prescaler::Fixed(0xFFFF))
            .validate()
            .unwrap();
        assert_eq!(plan.sample_rate_hz(), 0);
    }

    #[test]
    fn ramp_length_rounds_up() {
        let base = SawConfig::new(8_000_000, SampleRate::Period(180), TIM3_IRQ);
        assert_eq!(base.validate().unwrap().ramp_length(), 180);
        assert_eq!(base.with_step(7).validate().unwrap().ramp_length(), 26);
    }
}
