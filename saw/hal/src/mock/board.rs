use heapless::Vec;
use saw_core::Channel;

use crate::mock::{Journal, Op};
use crate::{Board, InterruptController, OutputBank};

/// Interrupt lines the mock controller can hold unmasked
const MAX_ENABLED_IRQS: usize = 8;

/// Simulated clock gating and pin routing
#[derive(Debug, Default)]
pub struct MockBoard<'j> {
    clocks_enabled: bool,
    routed: Option<Channel>,
    journal: Option<&'j Journal>,
}

impl<'j> MockBoard<'j> {
    pub const fn new() -> Self {
        Self {
            clocks_enabled: false,
            routed: None,
            journal: None,
        }
    }

    pub const fn with_journal(journal: &'j Journal) -> Self {
        Self {
            clocks_enabled: false,
            routed: None,
            journal: Some(journal),
        }
    }

    pub const fn clocks_enabled(&self) -> bool {
        self.clocks_enabled
    }

    /// Channel whose pin was routed to the PWM timer
    pub const fn routed_channel(&self) -> Option<Channel> {
        self.routed
    }
}

impl Board for MockBoard<'_> {
    fn enable_peripheral_clocks(&mut self) {
        self.clocks_enabled = true;
        if let Some(journal) = self.journal {
            journal.record(Op::ClocksEnabled);
        }
    }

    fn route_pwm_output(&mut self, channel: Channel) {
        self.routed = Some(channel);
        if let Some(journal) = self.journal {
            journal.record(Op::OutputRouted(channel));
        }
    }
}

/// Simulated interrupt controller.
///
/// Holds up to eight unmasked lines; further lines are counted in
/// [`dropped`](Self::dropped) instead of being tracked.
#[derive(Debug, Default)]
pub struct MockNvic<'j> {
    enabled: Vec<u16, MAX_ENABLED_IRQS>,
    dropped: usize,
    journal: Option<&'j Journal>,
}

impl<'j> MockNvic<'j> {
    pub const fn new() -> Self {
        Self {
            enabled: Vec::new(),
            dropped: 0,
            journal: None,
        }
    }

    pub const fn with_journal(journal: &'j Journal) -> Self {
        Self {
            enabled: Vec::new(),
            dropped: 0,
            journal: Some(journal),
        }
    }

    /// Unmask requests that did not fit
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

impl InterruptController for MockNvic<'_> {
    fn enable_interrupt(&mut self, irq: u16) {
        if !self.enabled.contains(&irq) && self.enabled.push(irq).is_err() {
            self.dropped += 1;
        }
        if let Some(journal) = self.journal {
            journal.record(Op::InterruptEnabled(irq));
        }
    }

    fn is_enabled(&self, irq: u16) -> bool {
        self.enabled.contains(&irq)
    }
}

/// Simulated GPIO port with a bit set/reset register
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MockOutputBank {
    output: u16,
    writes: u32,
}

impl MockOutputBank {
    pub const fn new() -> Self {
        Self {
            output: 0,
            writes: 0,
        }
    }

    /// Output data register
    pub const fn output(&self) -> u16 {
        self.output
    }

    pub const fn writes(&self) -> u32 {
        self.writes
    }
}

impl OutputBank for MockOutputBank {
    fn write_set_reset(&mut self, word: u32) {
        let set = word as u16;
        let reset = (word >> 16) as u16;
        // Set wins when a pin appears in both halves.
        self.output = (self.output & !reset) | set;
        self.writes += 1;
    }
}
