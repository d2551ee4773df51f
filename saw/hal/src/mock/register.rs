/// A register with a software-visible preload half and a hardware-visible
/// active half.
///
/// With preload enabled a write only reaches the active half on
/// [`latch`](Self::latch), which the simulated timer calls on every update
/// event. With preload disabled a write reaches both halves immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadRegister {
    pending: u16,
    active: u16,
    preload: bool,
}

impl PreloadRegister {
    pub const fn new(reset: u16, preload: bool) -> Self {
        Self {
            pending: reset,
            active: reset,
            preload,
        }
    }

    pub fn write(&mut self, value: u16) {
        self.pending = value;
        if !self.preload {
            self.active = value;
        }
    }

    /// Value software reads back
    pub const fn read(&self) -> u16 {
        self.pending
    }

    /// Value the hardware currently acts on
    pub const fn active(&self) -> u16 {
        self.active
    }

    pub fn set_preload(&mut self, enable: bool) {
        self.preload = enable;
    }

    pub const fn is_preloaded(&self) -> bool {
        self.preload
    }

    /// Transfer the pending value to the active half
    pub fn latch(&mut self) {
        self.active = self.pending;
    }
}
