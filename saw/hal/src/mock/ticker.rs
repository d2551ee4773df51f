use crate::mock::{Journal, Op, TickerOp};
use crate::TickerTimer;

/// Simulated sample-rate timer.
///
/// Overflows are injected with [`overflow`](Self::overflow) rather than
/// counted out; the interrupt line is requested while the update flag and
/// the update interrupt enable are both set.
#[derive(Debug)]
pub struct MockTicker<'j> {
    prescaler: u16,
    auto_reload: u16,
    update_interrupt: bool,
    counting: bool,
    pending: bool,
    overflow_in_handler: bool,
    overflows: u32,
    clears: u32,
    journal: Option<&'j Journal>,
}

impl<'j> MockTicker<'j> {
    /// Ticker in its reset state
    pub const fn new() -> Self {
        Self {
            prescaler: 0,
            auto_reload: 0xFFFF,
            update_interrupt: false,
            counting: false,
            pending: false,
            overflow_in_handler: false,
            overflows: 0,
            clears: 0,
            journal: None,
        }
    }

    /// Ticker recording its register operations in `journal`
    pub const fn with_journal(journal: &'j Journal) -> Self {
        let mut ticker = Self::new();
        ticker.journal = Some(journal);
        ticker
    }

    fn record(&self, op: TickerOp) {
        if let Some(journal) = self.journal {
            journal.record(Op::Ticker(op));
        }
    }

    /// Counter wrapped: raise the update flag if the timer is running
    pub fn overflow(&mut self) {
        if self.counting {
            self.pending = true;
            self.overflows += 1;
        }
    }

    /// Make the next flag clear be followed by another overflow, as if a
    /// sample period elapsed while the handler was running
    pub fn overflow_during_next_handler(&mut self) {
        self.overflow_in_handler = true;
    }

    /// Update flag set and update interrupt enabled
    pub const fn interrupt_requested(&self) -> bool {
        self.pending && self.update_interrupt
    }

    pub const fn prescaler(&self) -> u16 {
        self.prescaler
    }

    pub const fn auto_reload(&self) -> u16 {
        self.auto_reload
    }

    pub const fn is_update_interrupt_enabled(&self) -> bool {
        self.update_interrupt
    }

    pub const fn is_counting(&self) -> bool {
        self.counting
    }

    pub const fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Number of flag clears, including clears of an already clear flag
    pub const fn clears(&self) -> u32 {
        self.clears
    }
}

impl Default for MockTicker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerTimer for MockTicker<'_> {
    fn set_prescaler(&mut self, prescaler: u16) {
        self.prescaler = prescaler;
        self.record(TickerOp::Prescaler(prescaler));
    }

    fn set_auto_reload(&mut self, period: u16) {
        self.auto_reload = period;
        self.record(TickerOp::AutoReload(period));
    }

    fn enable_update_interrupt(&mut self) {
        self.update_interrupt = true;
        self.record(TickerOp::UpdateInterruptEnabled);
    }

    fn start(&mut self) {
        self.counting = true;
        self.record(TickerOp::Started);
    }

    fn is_update_pending(&self) -> bool {
        self.pending
    }

    fn clear_update_pending(&mut self) {
        self.pending = false;
        self.clears += 1;
        self.record(TickerOp::FlagCleared);
        if self.overflow_in_handler {
            self.overflow_in_handler = false;
            self.overflow();
        }
    }
}
