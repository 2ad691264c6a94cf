use core::fmt::{self, Display, Formatter};

/// Underlying type representing the number of steps.
type StepRepr = i32;

/// Number of steps, or an absolute axis position measured in steps.
///
/// `Steps` is careful to prevent overflows, so that it can be used safely to
/// track axis positions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct Steps(StepRepr);
impl Steps {
    /// Create a new number of steps.
    pub const fn new(steps: StepRepr) -> Self {
        Self(steps)
    }

    /// Zero steps.
    pub const fn zero() -> Self {
        Steps(0)
    }

    /// Returns the value represented by `Steps`.
    pub fn get_value(&self) -> StepRepr {
        self.0
    }

    /// Increment the value if it's safe to do so without an overflow.
    pub fn inc(&self) -> Option<Self> {
        self.0.checked_add_unsigned(1).map(Steps)
    }

    /// Decrement the value if it's safe to do so without an overflow.
    pub fn dec(&self) -> Option<Self> {
        self.0.checked_sub_unsigned(1).map(Steps)
    }

    /// Offsets the value by a signed amount, saturating at the limits.
    pub fn offset(&self, delta: StepRepr) -> Self {
        Steps(self.0.saturating_add(delta))
    }

    /// Signed distance from this position to `other`, saturating at the
    /// limits.
    pub fn distance_to(&self, other: Steps) -> StepRepr {
        other.0.saturating_sub(self.0)
    }
}

impl Display for Steps {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
