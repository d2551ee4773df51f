//! Sawtooth sample counter

use crate::SawPlan;

/// The sample counter advanced once per ticker interrupt.
///
/// The value stays in `[0, resolution)`. Each [`advance`](Self::advance) adds
/// the ramp step and resets to zero once the sum reaches the resolution, so
/// the update is a compare and a reset with no division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sawtooth {
    value: u16,
    resolution: u16,
    step: u16,
}

impl Sawtooth {
    /// Counter at zero for a validated plan
    pub const fn from_plan(plan: &SawPlan) -> Self {
        Self {
            value: 0,
            resolution: plan.resolution(),
            step: plan.step(),
        }
    }

    /// Advance by one sample and return the new value.
    #[inline(always)]
    pub fn advance(&mut self) -> u16 {
        self.value = match self.value.checked_add(self.step) {
            Some(next) if next < self.resolution => next,
            _ => 0,
        };
        self.value
    }

    /// Current sample
    #[inline]
    pub const fn value(&self) -> u16 {
        self.value
    }

    pub const fn resolution(&self) -> u16 {
        self.resolution
    }

    pub const fn step(&self) -> u16 {
        self.step
    }
}
