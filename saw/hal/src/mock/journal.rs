use core::cell::{Cell, RefCell};

use heapless::Vec;
use saw_core::Channel;

use crate::PwmMode;

/// Operations kept before the journal starts dropping entries
pub const JOURNAL_CAPACITY: usize = 64;

/// Ticker register operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerOp {
    Prescaler(u16),
    AutoReload(u16),
    UpdateInterruptEnabled,
    Started,
    FlagCleared,
}

/// PWM timer register operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmOp {
    Prescaler(u16),
    AutoReload(u16),
    AutoReloadPreload(bool),
    Mode(Channel, PwmMode),
    ComparePreload(Channel, bool),
    Compare(Channel, u16),
    ChannelEnabled(Channel),
    UpdateGenerated,
    Started,
}

/// One recorded peripheral operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    ClocksEnabled,
    OutputRouted(Channel),
    Ticker(TickerOp),
    Pwm(PwmOp),
    InterruptEnabled(u16),
}

/// Append-only record of operations shared by several mocks.
///
/// Keeps the first [`JOURNAL_CAPACITY`] operations and counts the rest.
#[derive(Debug, Default)]
pub struct Journal {
    ops: RefCell<Vec<Op, JOURNAL_CAPACITY>>,
    dropped: Cell<usize>,
}

impl Journal {
    pub const fn new() -> Self {
        Self {
            ops: RefCell::new(Vec::new()),
            dropped: Cell::new(0),
        }
    }

    pub fn record(&self, op: Op) {
        if self.ops.borrow_mut().push(op).is_err() {
            self.dropped.set(self.dropped.get() + 1);
        }
    }

    /// Snapshot of the recorded operations
    pub fn ops(&self) -> Vec<Op, JOURNAL_CAPACITY> {
        self.ops.borrow().clone()
    }

    /// Index of the first occurrence of `op`
    pub fn position(&self, op: Op) -> Option<usize> {
        self.ops.borrow().iter().position(|recorded| *recorded == op)
    }

    pub fn contains(&self, op: Op) -> bool {
        self.position(op).is_some()
    }

    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }

    /// Operations that did not fit
    pub fn dropped(&self) -> usize {
        self.dropped.get()
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
        self.dropped.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_counted_not_stored() {
        let journal = Journal::new();
        for _ in 0..JOURNAL_CAPACITY + 3 {
            journal.record(Op::ClocksEnabled);
        }
        assert_eq!(journal.len(), JOURNAL_CAPACITY);
        assert_eq!(journal.dropped(), 3);

        journal.clear();
        assert!(journal.is_empty());
        assert_eq!(journal.dropped(), 0);
    }

    #[test]
    fn position_finds_first_match() {
        let journal = Journal::new();
        journal.record(Op::ClocksEnabled);
        journal.record(Op::InterruptEnabled(29));
        journal.record(Op::InterruptEnabled(29));
        assert_eq!(journal.position(Op::InterruptEnabled(29)), Some(1));
        assert!(!journal.contains(Op::OutputRouted(Channel::Ch2)));
    }
}
