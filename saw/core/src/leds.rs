//! Rotating LED ring pattern

use crate::{SawError, SawResult};

/// Eight LEDs wired to consecutive pins of one GPIO port.
///
/// The pattern starts with a single lit LED and rotates left one position
/// per step, wrapping bit 7 back to bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedRing {
    pattern: u8,
    base: u8,
}

impl LedRing {
    /// Pattern shown before the first rotation
    pub const INITIAL_PATTERN: u8 = 0x01;

    /// Ring whose first LED sits on pin `base`; the ring must end at or
    /// before pin 15.
    pub const fn new(base: u8) -> SawResult<Self> {
        if base > 8 {
            return Err(SawError::LedBaseOutOfRange { base });
        }
        Ok(Self {
            pattern: Self::INITIAL_PATTERN,
            base,
        })
    }

    pub const fn pattern(&self) -> u8 {
        self.pattern
    }

    /// Mask of the port pins driven by the ring
    pub const fn pin_mask(&self) -> u16 {
        0xFF << self.base
    }

    /// Word for a bit set/reset register: set bits in the low half light the
    /// pattern, reset bits in the high half clear every other ring LED.
    pub const fn set_reset_word(&self) -> u32 {
        let pattern = self.pattern as u32;
        let set = pattern << self.base;
        let reset = (!pattern & 0xFF) << (16 + self.base as u32);
        reset | set
    }

    /// Rotate the pattern one position
    pub fn rotate(&mut self) {
        self.pattern = self.pattern.rotate_left(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_half_of_port_e() {
        let ring = LedRing::new(8).unwrap();
        assert_eq!(ring.pin_mask(), 0xFF00);
        assert_eq!(ring.set_reset_word(), 0xFE00_0100);
    }

    #[test]
    fn rotation_wraps_msb_to_lsb() {
        let mut ring = LedRing::new(8).unwrap();
        for _ in 0..7 {
            ring.rotate();
        }
        assert_eq!(ring.pattern(), 0x80);
        assert_eq!(ring.set_reset_word(), 0x7F00_8000);
        ring.rotate();
        assert_eq!(ring.pattern(), LedRing::INITIAL_PATTERN);
    }

    #[test]
    fn ring_must_fit_the_port() {
        assert_eq!(LedRing::new(9), Err(SawError::LedBaseOutOfRange { base: 9 }));
        assert_eq!(LedRing::new(0).unwrap().set_reset_word(), 0x00FE_0001);
    }
}
