//! Clock-tree helpers for deriving timer input clocks

/// APB bus prescaler as programmed in the clock configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApbPrescaler {
    Div1,
    Div2,
    Div4,
    Div8,
    Div16,
}

impl ApbPrescaler {
    /// Division factor applied to HCLK
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div2 => 2,
            Self::Div4 => 4,
            Self::Div8 => 8,
            Self::Div16 => 16,
        }
    }
}

/// Bus clock feeding a timer bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTree {
    hclk_hz: u32,
    apb: ApbPrescaler,
}

impl ClockTree {
    /// Clock tree straight out of reset: 8 MHz HSI, no bus division.
    pub const RESET: Self = Self::new(8_000_000, ApbPrescaler::Div1);

    pub const fn new(hclk_hz: u32, apb: ApbPrescaler) -> Self {
        Self { hclk_hz, apb }
    }

    /// AHB clock, also the core clock
    pub const fn hclk_hz(&self) -> u32 {
        self.hclk_hz
    }

    /// APB peripheral clock
    pub const fn pclk_hz(&self) -> u32 {
        self.hclk_hz / self.apb.divisor()
    }

    /// Input clock of the timers on this bus.
    ///
    /// Timers run at PCLK when the APB prescaler is 1 and at twice PCLK
    /// otherwise.
    pub const fn timer_clock_hz(&self) -> u32 {
        match self.apb {
            ApbPrescaler::Div1 => self.pclk_hz(),
            _ => self.pclk_hz() * 2,
        }
    }
}

impl Default for ClockTree {
    fn default() -> Self {
        Self::RESET
    }
}
