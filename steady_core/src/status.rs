//! Snapshot of a stabilizer's state, for display and logging.

/// Public status of a stabilizer after its latest update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilityStatus<T> {
    /// Nothing accepted since creation, reset, or an out-of-range sample.
    Empty,
    /// Readings accepted but the current run has not lasted long enough.
    Settling { last: T },
    /// The current run is stable; `value` is its latest reading.
    Stable { value: T },
}

impl<T: Copy> StabilityStatus<T> {
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable { .. })
    }

    pub fn stable_value(&self) -> Option<T> {
        match self {
            Self::Stable { value } => Some(*value),
            _ => None,
        }
    }

    /// Short label used in trace lines and JSON output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Settling { .. } => "settling",
            Self::Stable { .. } => "stable",
        }
    }
}
