//! Startup sequence

use saw_core::{SawConfig, SawPlan, SawResult};
use saw_hal::{Board, InterruptController, PwmMode, PwmTimer, TickerTimer};

use crate::TickerIsr;

/// Validate `config` and bring the generator up.
///
/// Order of operations:
///
/// 1. validate the configuration; on failure nothing below runs
/// 2. enable peripheral clocks
/// 3. route the PWM pin to its alternate function
/// 4. configure and start the sample-rate ticker
/// 5. configure and start the PWM timer
/// 6. hand the [`TickerIsr`] to `install`
/// 7. unmask the ticker interrupt
///
/// `install` must place the handler state where the interrupt vector finds
/// it. It runs while the line is still masked, so the first interrupt always
/// sees an installed handler.
pub fn bring_up<B, T, P, I, F>(
    config: &SawConfig,
    board: &mut B,
    mut ticker: T,
    mut pwm: P,
    nvic: &mut I,
    install: F,
) -> SawResult<SawPlan>
where
    B: Board,
    T: TickerTimer,
    P: PwmTimer,
    I: InterruptController,
    F: FnOnce(TickerIsr<T, P>),
{
    let plan = config.validate()?;
    info!(
        "sawtooth: {} Hz sample rate, {} levels, {} Hz carrier",
        plan.sample_rate_hz(),
        plan.resolution(),
        plan.pwm_frequency_hz()
    );

    board.enable_peripheral_clocks();
    board.route_pwm_output(plan.channel());
    debug!("clocks on, output routed");

    configure_ticker(&mut ticker, &plan);
    ticker.start();
    debug!("ticker started");

    configure_pwm(&mut pwm, &plan);
    pwm.start();
    debug!("pwm started");

    install(TickerIsr::new(ticker, pwm, &plan));
    nvic.enable_interrupt(plan.ticker_irq());
    info!("ticker interrupt {} unmasked", plan.ticker_irq());

    Ok(plan)
}

/// Program the ticker period and enable its update interrupt
pub fn configure_ticker<T: TickerTimer>(ticker: &mut T, plan: &SawPlan) {
    let timing = plan.ticker();
    ticker.set_prescaler(timing.prescaler);
    ticker.set_auto_reload(timing.period);
    ticker.enable_update_interrupt();
}

/// Program edge-aligned PWM with buffered compare and auto-reload registers.
///
/// Ends with a forced update event so the preloaded values are active before
/// the counter starts.
pub fn configure_pwm<P: PwmTimer>(pwm: &mut P, plan: &SawPlan) {
    let channel = plan.channel();
    pwm.set_prescaler(0);
    pwm.set_auto_reload(plan.pwm_auto_reload());
    pwm.set_compare(channel, 0);
    pwm.set_output_compare_mode(channel, PwmMode::Mode1);
    pwm.set_output_compare_preload(channel, true);
    pwm.enable_channel(channel);
    pwm.set_auto_reload_preload(true);
    pwm.generate_update();
}
