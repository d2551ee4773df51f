//! Clock gating and GPIO for the STM32F3 Discovery

use saw_core::Channel;
use saw_hal::{Board, OutputBank};

use crate::pac;

const AHBENR_IOPAEN: u32 = 1 << 17;
const AHBENR_IOPEEN: u32 = 1 << 21;
const APB1ENR_TIM2EN: u32 = 1 << 0;
const APB1ENR_TIM3EN: u32 = 1 << 1;

const MODER_OUTPUT: u32 = 0b01;
const MODER_ALTERNATE: u32 = 0b10;
const AF1: u32 = 1;

/// Port A pin carrying each TIM2 channel on AF1
const fn tim2_pin(channel: Channel) -> u32 {
    match channel {
        Channel::Ch1 => 5,
        Channel::Ch2 => 1,
        Channel::Ch3 => 2,
        Channel::Ch4 => 3,
    }
}

/// Clock and pin setup for the sawtooth timers
pub struct F3Board {
    rcc: pac::RCC,
    gpioa: pac::GPIOA,
}

impl F3Board {
    pub fn new(rcc: pac::RCC, gpioa: pac::GPIOA) -> Self {
        Self { rcc, gpioa }
    }
}

impl Board for F3Board {
    fn enable_peripheral_clocks(&mut self) {
        self.rcc
            .ahbenr
            .modify(|r, w| unsafe { w.bits(r.bits() | AHBENR_IOPAEN) });
        self.rcc
            .apb1enr
            .modify(|r, w| unsafe { w.bits(r.bits() | APB1ENR_TIM2EN | APB1ENR_TIM3EN) });
    }

    fn route_pwm_output(&mut self, channel: Channel) {
        let pin = tim2_pin(channel);
        self.gpioa.moder.modify(|r, w| unsafe {
            w.bits((r.bits() & !(0b11 << (2 * pin))) | (MODER_ALTERNATE << (2 * pin)))
        });
        // Every TIM2 pin used here is below 8
        let shift = 4 * pin;
        self.gpioa
            .afrl
            .modify(|r, w| unsafe { w.bits((r.bits() & !(0xF << shift)) | (AF1 << shift)) });
    }
}

/// Port E pins driven through the bit set/reset register
pub struct LedBank {
    gpioe: pac::GPIOE,
}

impl LedBank {
    /// Clock port E and make every pin in `pins` a push-pull output
    pub fn new(gpioe: pac::GPIOE, rcc: &pac::RCC, pins: u16) -> Self {
        rcc.ahbenr
            .modify(|r, w| unsafe { w.bits(r.bits() | AHBENR_IOPEEN) });

        let (mut clear, mut set) = (0u32, 0u32);
        for pin in 0..16u32 {
            if pins & (1 << pin) != 0 {
                clear |= 0b11 << (2 * pin);
                set |= MODER_OUTPUT << (2 * pin);
            }
        }
        gpioe
            .moder
            .modify(|r, w| unsafe { w.bits((r.bits() & !clear) | set) });

        Self { gpioe }
    }
}

impl OutputBank for LedBank {
    fn write_set_reset(&mut self, word: u32) {
        self.gpioe.bsrr.write(|w| unsafe { w.bits(word) });
    }
}
