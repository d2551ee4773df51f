//! Sawtooth on PA5 (TIM2_CH1), stepped by the TIM3 update interrupt
//!
//! Runs from the 8 MHz reset clock: a ticker period of 180 gives roughly a
//! 44.2 kHz sample rate and a 180-level ramp repeats about 245 times a second.

#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::interrupt::InterruptNumber;
use cortex_m_rt::entry;
use critical_section::Mutex;
#[cfg(feature = "defmt")]
use defmt_rtt as _;
use panic_halt as _;

use saw_core::{ClockTree, SampleRate, SawConfig};
use saw_firmware::pac::{self, interrupt, Interrupt};
use saw_firmware::{F3Board, Nvic, PwmOut, Ticker};
use saw_pwm::{bring_up, TickerIsr};

type Driver = TickerIsr<Ticker, PwmOut>;

const RESOLUTION: u32 = 180;
const TICKER_PERIOD: u32 = 180;

/// Handed from `main` to the first TIM3 interrupt
static DRIVER: Mutex<RefCell<Option<Driver>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let (Some(dp), Some(cp)) = (pac::Peripherals::take(), cortex_m::Peripherals::take()) else {
        panic!("peripherals already taken");
    };

    #[cfg(feature = "defmt")]
    defmt::info!("saw-firmware {}", saw_core::VERSION);

    let config = SawConfig::new(
        ClockTree::RESET.timer_clock_hz(),
        SampleRate::Period(TICKER_PERIOD),
        Interrupt::TIM3.number(),
    )
    .with_resolution(RESOLUTION);

    let mut board = F3Board::new(dp.RCC, dp.GPIOA);
    let mut nvic = Nvic::new(cp.NVIC);
    let started = bring_up(
        &config,
        &mut board,
        Ticker::new(dp.TIM3),
        PwmOut::new(dp.TIM2),
        &mut nvic,
        |driver| {
            critical_section::with(|cs| DRIVER.replace(cs, Some(driver)));
        },
    );
    if let Err(err) = started {
        panic!("sawtooth bring-up failed: {}", err);
    }

    loop {
        cortex_m::asm::wfi();
    }
}

#[interrupt]
fn TIM3() {
    static mut SLOT: Option<Driver> = None;

    if SLOT.is_none() {
        *SLOT = critical_section::with(|cs| DRIVER.borrow(cs).take());
    }
    let Some(driver) = SLOT.as_mut() else {
        // Nothing to service the flag; keep the line quiet.
        Nvic::mask(Interrupt::TIM3.number());
        return;
    };

    if let Err(err) = driver.on_update() {
        panic!("{}", err);
    }
}
