//! Output waveform as seen on the simulated PWM pin

use saw_core::{Channel, OverrunPolicy, SampleRate, SawConfig};
use saw_hal::mock::{MockBoard, MockNvic, MockPwm, MockTicker, PwmPeriod};
use saw_hal::InterruptController;
use saw_pwm::{bring_up, TickerIsr};

const TIM3_IRQ: u16 = 29;
const RESOLUTION: u16 = 180;

type Isr = TickerIsr<MockTicker<'static>, MockPwm<'static>>;

struct Rig {
    isr: Isr,
    nvic: MockNvic<'static>,
}

impl Rig {
    fn new(config: SawConfig) -> Self {
        let mut nvic = MockNvic::new();
        let mut slot = None;
        bring_up(
            &config,
            &mut MockBoard::new(),
            MockTicker::new(),
            MockPwm::new(),
            &mut nvic,
            |isr| slot = Some(isr),
        )
        .unwrap();
        Self {
            isr: slot.unwrap(),
            nvic,
        }
    }

    fn audio() -> Self {
        Self::new(SawConfig::new(8_000_000, SampleRate::Period(180), TIM3_IRQ))
    }

    /// Run the handler for as long as the ticker keeps requesting it,
    /// the way the NVIC would. Returns the number of handler entries.
    fn service(&mut self) -> u32 {
        let mut entries = 0;
        while self.isr.ticker().interrupt_requested() && self.nvic.is_enabled(TIM3_IRQ) {
            self.isr.on_update().unwrap();
            entries += 1;
            assert!(entries < 4, "handler does not clear its flag");
        }
        entries
    }

    /// One ticker overflow followed by its interrupt
    fn sample(&mut self) {
        self.isr.ticker_mut().overflow();
        assert_eq!(self.service(), 1);
    }

    fn measure(&mut self) -> PwmPeriod {
        self.isr.pwm_mut().measure_next_period(Channel::Ch1)
    }
}

#[test]
fn idle_output_is_low_until_first_sample() {
    let mut rig = Rig::audio();
    assert_eq!(rig.isr.sample(), 0);
    assert_eq!(rig.measure(), PwmPeriod { high: 0, total: 181 });
}

#[test]
fn duty_tracks_interrupt_count() {
    let mut rig = Rig::audio();
    for k in 1..RESOLUTION {
        rig.sample();
        assert_eq!(rig.isr.pwm().compare(Channel::Ch1), k);
        let period = rig.measure();
        assert_eq!(period.high, u32::from(k));
        assert_eq!(period.total, u32::from(RESOLUTION) + 1);
    }
}

#[test]
fn ramp_wraps_after_full_resolution() {
    let mut rig = Rig::audio();
    for _ in 0..RESOLUTION - 1 {
        rig.sample();
    }
    assert_eq!(rig.isr.sample(), RESOLUTION - 1);

    rig.sample();
    assert_eq!(rig.isr.sample(), 0);
    assert_eq!(rig.isr.pwm().compare(Channel::Ch1), 0);
    assert_eq!(rig.measure().high, 0);
}

#[test]
fn samples_stay_in_range_and_rise_between_wraps() {
    let mut rig = Rig::audio();
    let mut previous = rig.isr.sample();
    for _ in 0..5 * u32::from(RESOLUTION) + 17 {
        rig.sample();
        let current = rig.isr.sample();
        assert!(current < RESOLUTION);
        assert!(current == previous + 1 || (current == 0 && previous == RESOLUTION - 1));
        previous = current;
    }
}

#[test]
fn whole_ramps_return_to_zero_without_drift() {
    let mut rig = Rig::audio();
    for cycle in 1..=4u32 {
        for _ in 0..RESOLUTION {
            rig.sample();
        }
        assert_eq!(rig.isr.sample(), 0, "drift after {} ramps", cycle);
    }
    assert_eq!(rig.isr.ticker().clears(), 4 * u32::from(RESOLUTION));
}

#[test]
fn new_duty_never_lands_mid_period() {
    let mut rig = Rig::audio();
    rig.sample();
    let first = rig.measure();

    // Write the next sample partway into a period; the period in flight
    // keeps the old duty.
    for _ in 0..90 {
        rig.isr.pwm_mut().tick();
    }
    rig.sample();
    let mut high = 0;
    loop {
        if rig.isr.pwm().output_high(Channel::Ch1) {
            high += 1;
        }
        if rig.isr.pwm_mut().tick() {
            break;
        }
    }
    assert_eq!(first.high, 1);
    assert_eq!(high, 0);
    assert_eq!(rig.isr.pwm().active_compare(Channel::Ch1), 2);
}

#[test]
fn output_follows_ramp_period_by_period() {
    let mut rig = Rig::audio();
    let mut highs = Vec::new();
    for _ in 0..2 * u32::from(RESOLUTION) {
        rig.sample();
        highs.push(rig.measure().high);
    }
    for (i, high) in highs.iter().enumerate() {
        assert_eq!(*high, (i as u32 + 1) % u32::from(RESOLUTION));
    }
}

#[test]
fn clearing_twice_is_harmless() {
    use saw_hal::TickerTimer;

    let mut rig = Rig::audio();
    rig.sample();
    rig.isr.ticker_mut().clear_update_pending();
    assert!(!rig.isr.ticker().is_update_pending());
    assert_eq!(rig.service(), 0);
    assert_eq!(rig.isr.sample(), 1);
}

#[test]
fn late_handler_is_counted_and_reentered() {
    let mut rig = Rig::new(
        SawConfig::new(8_000_000, SampleRate::Period(180), TIM3_IRQ)
            .with_overrun_policy(OverrunPolicy::Count),
    );
    rig.isr.ticker_mut().overflow();
    rig.isr.ticker_mut().overflow_during_next_handler();
    assert_eq!(rig.service(), 2);
    assert_eq!(rig.isr.overruns(), 1);
    assert_eq!(rig.isr.sample(), 2);
}

#[test]
fn larger_step_wraps_to_zero() {
    let mut rig = Rig::new(
        SawConfig::new(8_000_000, SampleRate::Period(180), TIM3_IRQ).with_step(7),
    );
    let mut seen = Vec::new();
    for _ in 0..27 {
        rig.sample();
        seen.push(rig.isr.sample());
    }
    assert_eq!(seen[24], 175);
    assert_eq!(seen[25], 0);
    assert_eq!(seen[26], 7);
}
