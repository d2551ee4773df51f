//! TIM2/TIM3 register access

use saw_core::Channel;
use saw_hal::{PwmMode, PwmTimer, TickerTimer};

use crate::pac;

const CR1_CEN: u32 = 1 << 0;
const CR1_ARPE: u32 = 1 << 7;
const DIER_UIE: u32 = 1 << 0;
const SR_UIF: u32 = 1 << 0;
const EGR_UG: u32 = 1 << 0;

// Per-channel fields within CCMRx, shifted by 8 for the odd channel
const CCMR_OCPE: u32 = 1 << 3;
const CCMR_OCM: u32 = 0b111 << 4;
const CCMR_CCS: u32 = 0b11;

/// TIM3 as the sample-rate ticker
pub struct Ticker {
    tim: pac::TIM3,
}

impl Ticker {
    pub fn new(tim: pac::TIM3) -> Self {
        Self { tim }
    }

    pub fn free(self) -> pac::TIM3 {
        self.tim
    }
}

impl TickerTimer for Ticker {
    fn set_prescaler(&mut self, prescaler: u16) {
        self.tim.psc.write(|w| unsafe { w.bits(u32::from(prescaler)) });
    }

    fn set_auto_reload(&mut self, period: u16) {
        self.tim.arr.write(|w| unsafe { w.bits(u32::from(period)) });
    }

    fn enable_update_interrupt(&mut self) {
        self.tim
            .dier
            .modify(|r, w| unsafe { w.bits(r.bits() | DIER_UIE) });
    }

    fn start(&mut self) {
        self.tim
            .cr1
            .modify(|r, w| unsafe { w.bits(r.bits() | CR1_CEN) });
    }

    #[inline]
    fn is_update_pending(&self) -> bool {
        self.tim.sr.read().bits() & SR_UIF != 0
    }

    #[inline]
    fn clear_update_pending(&mut self) {
        // rc_w0: ones leave the other flags alone
        self.tim.sr.write(|w| unsafe { w.bits(!SR_UIF) });
    }
}

/// TIM2 as the PWM timer, channels 1 to 4
pub struct PwmOut {
    tim: pac::TIM2,
}

impl PwmOut {
    pub fn new(tim: pac::TIM2) -> Self {
        Self { tim }
    }

    pub fn free(self) -> pac::TIM2 {
        self.tim
    }

    fn modify_ccmr(&mut self, channel: Channel, clear: u32, set: u32) {
        let shift = (channel.index() as u32 % 2) * 8;
        let (clear, set) = (clear << shift, set << shift);
        match channel {
            Channel::Ch1 | Channel::Ch2 => self
                .tim
                .ccmr1_output()
                .modify(|r, w| unsafe { w.bits((r.bits() & !clear) | set) }),
            Channel::Ch3 | Channel::Ch4 => self
                .tim
                .ccmr2_output()
                .modify(|r, w| unsafe { w.bits((r.bits() & !clear) | set) }),
        }
    }
}

impl PwmTimer for PwmOut {
    fn set_prescaler(&mut self, prescaler: u16) {
        self.tim.psc.write(|w| unsafe { w.bits(u32::from(prescaler)) });
    }

    fn set_auto_reload(&mut self, value: u16) {
        self.tim.arr.write(|w| unsafe { w.bits(u32::from(value)) });
    }

    fn set_auto_reload_preload(&mut self, enable: bool) {
        self.tim.cr1.modify(|r, w| unsafe {
            if enable {
                w.bits(r.bits() | CR1_ARPE)
            } else {
                w.bits(r.bits() & !CR1_ARPE)
            }
        });
    }

    fn set_output_compare_mode(&mut self, channel: Channel, mode: PwmMode) {
        let ocm = match mode {
            PwmMode::Mode1 => 0b110,
            PwmMode::Mode2 => 0b111,
        };
        // CCxS = 00 selects output
        self.modify_ccmr(channel, CCMR_OCM | CCMR_CCS, ocm << 4);
    }

    fn set_output_compare_preload(&mut self, channel: Channel, enable: bool) {
        let set = if enable { CCMR_OCPE } else { 0 };
        self.modify_ccmr(channel, CCMR_OCPE, set);
    }

    #[inline]
    fn set_compare(&mut self, channel: Channel, value: u16) {
        let value = u32::from(value);
        match channel {
            Channel::Ch1 => self.tim.ccr1.write(|w| unsafe { w.bits(value) }),
            Channel::Ch2 => self.tim.ccr2.write(|w| unsafe { w.bits(value) }),
            Channel::Ch3 => self.tim.ccr3.write(|w| unsafe { w.bits(value) }),
            Channel::Ch4 => self.tim.ccr4.write(|w| unsafe { w.bits(value) }),
        }
    }

    fn enable_channel(&mut self, channel: Channel) {
        let cce = 1 << (4 * channel.index() as u32);
        self.tim
            .ccer
            .modify(|r, w| unsafe { w.bits(r.bits() | cce) });
    }

    fn generate_update(&mut self) {
        self.tim.egr.write(|w| unsafe { w.bits(EGR_UG) });
    }

    fn start(&mut self) {
        self.tim
            .cr1
            .modify(|r, w| unsafe { w.bits(r.bits() | CR1_CEN) });
    }
}
