//! Ticker interrupt body

use saw_core::{Channel, OverrunPolicy, SawError, SawPlan, SawResult, Sawtooth};
use saw_hal::{PwmTimer, TickerTimer};

/// State and peripherals owned by the ticker interrupt.
///
/// Holds the sample counter together with the two timers it touches. A
/// single instance exists per generator and it is moved into the interrupt
/// context during [`bring_up`](crate::bring_up), so the counter needs no
/// lock.
#[derive(Debug)]
pub struct TickerIsr<T, P> {
    ticker: T,
    pwm: P,
    saw: Sawtooth,
    channel: Channel,
    overrun: OverrunPolicy,
    overruns: u32,
}

impl<T: TickerTimer, P: PwmTimer> TickerIsr<T, P> {
    pub(crate) fn new(ticker: T, pwm: P, plan: &SawPlan) -> Self {
        Self {
            ticker,
            pwm,
            saw: Sawtooth::from_plan(plan),
            channel: plan.channel(),
            overrun: plan.overrun_policy(),
            overruns: 0,
        }
    }

    /// Service one ticker update.
    ///
    /// Clears the update flag, advances the sawtooth and writes the new
    /// sample to the preloaded compare register, which the PWM timer picks
    /// up at its next period boundary. Returns the sample written.
    ///
    /// Unless the overrun policy is [`OverrunPolicy::Ignore`], the update flag
    /// is read once more afterwards; finding it set means the next sample
    /// period ended before this one was serviced.
    #[inline]
    pub fn on_update(&mut self) -> SawResult<u16> {
        self.ticker.clear_update_pending();
        let sample = self.saw.advance();
        self.pwm.set_compare(self.channel, sample);

        match self.overrun {
            OverrunPolicy::Ignore => {}
            OverrunPolicy::Count => {
                if self.ticker.is_update_pending() {
                    self.overruns = self.overruns.saturating_add(1);
                    warn!("ticker overrun #{}", self.overruns);
                }
            }
            OverrunPolicy::Fatal => {
                if self.ticker.is_update_pending() {
                    self.overruns = self.overruns.saturating_add(1);
                    error!("ticker overrun #{}", self.overruns);
                    return Err(SawError::Overrun {
                        missed: self.overruns,
                    });
                }
            }
        }
        Ok(sample)
    }

    /// Sample most recently written to the compare register
    pub fn sample(&self) -> u16 {
        self.saw.value()
    }

    /// Overruns seen so far, saturating at `u32::MAX`
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    pub fn pwm_mut(&mut self) -> &mut P {
        &mut self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saw_core::{SampleRate, SawConfig};
    use saw_hal::mock::{MockPwm, MockTicker};

    fn isr(policy: OverrunPolicy) -> TickerIsr<MockTicker<'static>, MockPwm<'static>> {
        let plan = SawConfig::new(8_000_000, SampleRate::Period(180), 29)
            .with_overrun_policy(policy)
            .validate()
            .unwrap();
        let mut ticker = MockTicker::new();
        ticker.enable_update_interrupt();
        ticker.start();
        TickerIsr::new(ticker, MockPwm::new(), &plan)
    }

    #[test]
    fn handler_clears_flag_and_writes_sample() {
        let mut isr = isr(OverrunPolicy::Count);
        isr.ticker_mut().overflow();
        assert_eq!(isr.on_update(), Ok(1));
        assert!(!isr.ticker().is_update_pending());
        assert_eq!(isr.pwm().compare(Channel::Ch1), 1);
    }

    #[test]
    fn ignore_policy_never_rereads_the_flag() {
        let mut isr = isr(OverrunPolicy::Ignore);
        isr.ticker_mut().overflow();
        isr.ticker_mut().overflow_during_next_handler();
        assert_eq!(isr.on_update(), Ok(1));
        assert_eq!(isr.overruns(), 0);
        assert!(isr.ticker().is_update_pending());
    }

    #[test]
    fn count_policy_tallies_and_continues() {
        let mut isr = isr(OverrunPolicy::Count);
        isr.ticker_mut().overflow();
        isr.ticker_mut().overflow_during_next_handler();
        assert_eq!(isr.on_update(), Ok(1));
        assert_eq!(isr.overruns(), 1);

        // The late update is still serviced normally.
        assert_eq!(isr.on_update(), Ok(2));
        assert_eq!(isr.overruns(), 1);
    }

    #[test]
    fn fatal_policy_reports_overrun() {
        let mut isr = isr(OverrunPolicy::Fatal);
        isr.ticker_mut().overflow();
        isr.ticker_mut().overflow_during_next_handler();
        assert_eq!(isr.on_update(), Err(SawError::Overrun { missed: 1 }));
        // The sample was still written before the check.
        assert_eq!(isr.pwm().compare(Channel::Ch1), 1);
    }

    #[test]
    fn overrun_tally_saturates_under_both_policies() {
        for policy in [OverrunPolicy::Count, OverrunPolicy::Fatal] {
            let mut isr = isr(policy);
            isr.overruns = u32::MAX;
            isr.ticker_mut().overflow();
            isr.ticker_mut().overflow_during_next_handler();
            let _ = isr.on_update();
            assert_eq!(isr.overruns(), u32::MAX);
        }
    }
}
