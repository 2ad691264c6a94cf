/// Describes the direction for an axis movement.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    /// Positive direction is associated with a "high" direction signal.
    Positive,
    /// Negative direction is associated with a "low" direction signal.
    Negative,
}
impl Direction {
    /// Returns the direction that moves towards a signed step offset.
    ///
    /// Zero is treated as positive.
    pub fn towards(offset: i32) -> Self {
        if offset < 0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    /// Returns the sign of the direction as `1` or `-1`.
    pub fn signum(&self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}
