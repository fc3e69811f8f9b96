use serde::{Deserialize, Serialize};

/// Monotonic milliseconds.
///
/// Used both as an instant on the event-loop timeline and as a duration.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, other: Millis) -> Millis {
        Millis(self.0.saturating_add(other.0))
    }

    /// Elapsed time since `earlier`; zero if `earlier` is in the future.
    pub fn since(self, earlier: Millis) -> Millis {
        Millis(self.0.saturating_sub(earlier.0))
    }

    /// Fraction of `duration` covered by `elapsed`, clamped to `[0, 1]`.
    ///
    /// A zero duration is always complete.
    pub fn progress(elapsed: Millis, duration: Millis) -> f64 {
        if duration.0 == 0 {
            return 1.0;
        }
        (elapsed.0 as f64 / duration.0 as f64).clamp(0.0, 1.0)
    }
}

impl std::ops::Add for Millis {
    type Output = Millis;

    fn add(self, other: Millis) -> Millis {
        self.saturating_add(other)
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
