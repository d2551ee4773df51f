use saw_core::Channel;

use crate::mock::{Journal, Op, PreloadRegister, PwmOp};
use crate::{PwmMode, PwmTimer};

/// Output measured over one PWM period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmPeriod {
    /// Input clocks with the output high
    pub high: u32,
    /// Input clocks in the period
    pub total: u32,
}

/// Simulated up-counting PWM timer.
///
/// Each [`tick`](Self::tick) is one timer input clock. The counter counts
/// from zero to the active auto-reload value inclusive; the overflow back to
/// zero is the update event that latches every preloaded register.
#[derive(Debug)]
pub struct MockPwm<'j> {
    prescaler: PreloadRegister,
    auto_reload: PreloadRegister,
    compare: [PreloadRegister; 4],
    modes: [Option<PwmMode>; 4],
    enabled: [bool; 4],
    counting: bool,
    counter: u16,
    prescale_counter: u16,
    update_events: u32,
    journal: Option<&'j Journal>,
}

impl<'j> MockPwm<'j> {
    /// Timer in its reset state. The prescaler is always preloaded.
    pub const fn new() -> Self {
        Self {
            prescaler: PreloadRegister::new(0, true),
            auto_reload: PreloadRegister::new(0xFFFF, false),
            compare: [PreloadRegister::new(0, false); 4],
            modes: [None; 4],
            enabled: [false; 4],
            counting: false,
            counter: 0,
            prescale_counter: 0,
            update_events: 0,
            journal: None,
        }
    }

    /// Timer recording its register operations in `journal`
    pub const fn with_journal(journal: &'j Journal) -> Self {
        let mut pwm = Self::new();
        pwm.journal = Some(journal);
        pwm
    }

    fn record(&self, op: PwmOp) {
        if let Some(journal) = self.journal {
            journal.record(Op::Pwm(op));
        }
    }

    fn update_event(&mut self) {
        self.prescaler.latch();
        self.auto_reload.latch();
        for compare in self.compare.iter_mut() {
            compare.latch();
        }
        self.counter = 0;
        self.prescale_counter = 0;
        self.update_events += 1;
    }

    /// Advance one input clock. Returns true when the clock produced an
    /// update event.
    pub fn tick(&mut self) -> bool {
        if !self.counting {
            return false;
        }
        if self.prescale_counter < self.prescaler.active() {
            self.prescale_counter += 1;
            return false;
        }
        self.prescale_counter = 0;
        if self.counter >= self.auto_reload.active() {
            self.update_event();
            true
        } else {
            self.counter += 1;
            false
        }
    }

    /// Output level of a channel at the current counter value
    pub fn output_high(&self, channel: Channel) -> bool {
        let idx = channel.index();
        if !self.enabled[idx] {
            return false;
        }
        let below = self.counter < self.compare[idx].active();
        match self.modes[idx] {
            Some(PwmMode::Mode1) => below,
            Some(PwmMode::Mode2) => !below,
            None => false,
        }
    }

    /// Run to the next update event, then measure the full period after it.
    ///
    /// Returns an empty period when the counter is stopped.
    pub fn measure_next_period(&mut self, channel: Channel) -> PwmPeriod {
        let mut period = PwmPeriod { high: 0, total: 0 };
        if !self.counting {
            return period;
        }
        while !self.tick() {}
        loop {
            period.total += 1;
            if self.output_high(channel) {
                period.high += 1;
            }
            if self.tick() {
                return period;
            }
        }
    }

    /// Compare value as software reads it back
    pub fn compare(&self, channel: Channel) -> u16 {
        self.compare[channel.index()].read()
    }

    /// Compare value the output stage currently uses
    pub fn active_compare(&self, channel: Channel) -> u16 {
        self.compare[channel.index()].active()
    }

    pub fn is_compare_preloaded(&self, channel: Channel) -> bool {
        self.compare[channel.index()].is_preloaded()
    }

    pub fn mode(&self, channel: Channel) -> Option<PwmMode> {
        self.modes[channel.index()]
    }

    pub fn is_channel_enabled(&self, channel: Channel) -> bool {
        self.enabled[channel.index()]
    }

    pub const fn auto_reload(&self) -> u16 {
        self.auto_reload.read()
    }

    pub const fn active_auto_reload(&self) -> u16 {
        self.auto_reload.active()
    }

    pub const fn is_auto_reload_preloaded(&self) -> bool {
        self.auto_reload.is_preloaded()
    }

    pub const fn prescaler(&self) -> u16 {
        self.prescaler.read()
    }

    pub const fn is_counting(&self) -> bool {
        self.counting
    }

    pub const fn counter(&self) -> u16 {
        self.counter
    }

    pub const fn update_events(&self) -> u32 {
        self.update_events
    }
}

impl Default for MockPwm<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmTimer for MockPwm<'_> {
    fn set_prescaler(&mut self, prescaler: u16) {
        self.prescaler.write(prescaler);
        self.record(PwmOp::Prescaler(prescaler));
    }

    fn set_auto_reload(&mut self, value: u16) {
        self.auto_reload.write(value);
        self.record(PwmOp::AutoReload(value));
    }

    fn set_auto_reload_preload(&mut self, enable: bool) {
        self.auto_reload.set_preload(enable);
        self.record(PwmOp::AutoReloadPreload(enable));
    }

    fn set_output_compare_mode(&mut self, channel: Channel, mode: PwmMode) {
        self.modes[channel.index()] = Some(mode);
        self.record(PwmOp::Mode(channel, mode));
    }

    fn set_output_compare_preload(&mut self, channel: Channel, enable: bool) {
        self.compare[channel.index()].set_preload(enable);
        self.record(PwmOp::ComparePreload(channel, enable));
    }

    fn set_compare(&mut self, channel: Channel, value: u16) {
        self.compare[channel.index()].write(value);
        self.record(PwmOp::Compare(channel, value));
    }

    fn enable_channel(&mut self, channel: Channel) {
        self.enabled[channel.index()] = true;
        self.record(PwmOp::ChannelEnabled(channel));
    }

    fn generate_update(&mut self) {
        self.update_event();
        self.record(PwmOp::UpdateGenerated);
    }

    fn start(&mut self) {
        self.counting = true;
        self.record(PwmOp::Started);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(arr: u16, compare: u16, preload: bool) -> MockPwm<'static> {
        let mut pwm = MockPwm::new();
        pwm.set_auto_reload(arr);
        pwm.set_output_compare_mode(Channel::Ch1, PwmMode::Mode1);
        pwm.set_output_compare_preload(Channel::Ch1, preload);
        pwm.set_compare(Channel::Ch1, compare);
        pwm.enable_channel(Channel::Ch1);
        pwm.generate_update();
        pwm.start();
        pwm
    }

    #[test]
    fn period_spans_auto_reload_plus_one_clocks() {
        let mut pwm = running(9, 3, true);
        let period = pwm.measure_next_period(Channel::Ch1);
        assert_eq!(period, PwmPeriod { high: 3, total: 10 });
    }

    #[test]
    fn preloaded_compare_waits_for_period_boundary() {
        let mut pwm = running(9, 3, true);
        for _ in 0..5 {
            pwm.tick();
        }
        pwm.set_compare(Channel::Ch1, 8);
        assert_eq!(pwm.active_compare(Channel::Ch1), 3);
        assert!(!pwm.output_high(Channel::Ch1));

        let period = pwm.measure_next_period(Channel::Ch1);
        assert_eq!(period.high, 8);
    }

    #[test]
    fn unbuffered_compare_glitches_mid_period() {
        let mut pwm = running(9, 3, false);
        for _ in 0..5 {
            pwm.tick();
        }
        assert!(!pwm.output_high(Channel::Ch1));
        pwm.set_compare(Channel::Ch1, 8);
        assert!(pwm.output_high(Channel::Ch1));
    }

    #[test]
    fn prescaler_stretches_each_count() {
        let mut pwm = running(9, 3, true);
        pwm.set_prescaler(1);
        pwm.measure_next_period(Channel::Ch1);
        let period = pwm.measure_next_period(Channel::Ch1);
        assert_eq!(period, PwmPeriod { high: 6, total: 20 });
    }

    #[test]
    fn stopped_timer_measures_nothing() {
        let mut pwm = MockPwm::new();
        assert_eq!(
            pwm.measure_next_period(Channel::Ch1),
            PwmPeriod { high: 0, total: 0 }
        );
        assert!(!pwm.tick());
    }
}
