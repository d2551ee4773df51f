//! LED ring on PE8..PE15, advanced every 500 ms from the SysTick timebase

#![no_std]
#![no_main]

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
#[cfg(feature = "defmt")]
use defmt_rtt as _;
use panic_halt as _;

use saw_core::{ClockTree, LedRing, MillisCounter, Timebase};
use saw_firmware::{pac, LedBank};
use saw_pwm::{LedRingDemo, TickDelay};

/// First ring pin on port E
const LED_BASE: u8 = 8;

static MILLIS: MillisCounter = MillisCounter::new();

#[entry]
fn main() -> ! {
    let (Some(dp), Some(cp)) = (pac::Peripherals::take(), cortex_m::Peripherals::take()) else {
        panic!("peripherals already taken");
    };

    let timebase = match Timebase::systick(ClockTree::RESET.hclk_hz()) {
        Ok(timebase) => timebase,
        Err(err) => panic!("{}", err),
    };
    let mut syst = cp.SYST;
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(timebase.reload());
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();

    let ring = match LedRing::new(LED_BASE) {
        Ok(ring) => ring,
        Err(err) => panic!("{}", err),
    };
    let bank = LedBank::new(dp.GPIOE, &dp.RCC, ring.pin_mask());

    #[cfg(feature = "defmt")]
    defmt::info!("led ring on PE{}..PE{}", LED_BASE, LED_BASE + 7);

    LedRingDemo::new(
        ring,
        bank,
        TickDelay::new(&MILLIS),
        LedRingDemo::<LedBank, TickDelay<'static>>::DEFAULT_PERIOD_MS,
    )
    .run()
}

#[exception]
fn SysTick() {
    MILLIS.increment();
}
