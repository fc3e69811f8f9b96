use foundation::time::Millis;

/// Fixed-step timebase for the event loop.
///
/// Ticks are pure values so a run can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tick {
    /// 0-based tick index.
    pub index: u64,
    /// Fixed step between ticks.
    pub dt: Millis,
    /// Loop time at this tick.
    pub now: Millis,
}

impl Tick {
    pub fn new(index: u64, dt: Millis) -> Self {
        Self {
            index,
            dt,
            now: Millis(index.saturating_mul(dt.0)),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt)
    }
}
