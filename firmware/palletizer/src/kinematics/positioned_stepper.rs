use crate::Direction;
use crate::Stepper;
use crate::Steps;

/// Stepper which tracks its own position.
///
/// A `PositionedStepper` executes its stepping commands by wrapping some
/// underlying [Stepper]. The tracked position is only meaningful relative to
/// the gauge set by homing.
pub struct PositionedStepper<S> {
    stepper: S,
    position: Steps,
}
impl<S: Stepper> PositionedStepper<S> {
    /// Creates a new positioned stepper with a position of zero.
    ///
    /// # Parameters
    ///
    /// - `stepper`: The underlying stepper to use.
    pub fn new(stepper: S) -> Self {
        Self {
            stepper,
            position: Steps::zero(),
        }
    }

    /// Sets the current position of the stepper to a given value.
    ///
    /// This DOES NOT move the stepper. It simply redefines the position
    /// wherever the stepper currently is.
    pub fn set_gauge_position(&mut self, position: Steps) {
        self.position = position;
    }

    /// Returns the current position of the stepper.
    pub fn get_position(&self) -> Steps {
        self.position
    }

    /// Take a step.
    ///
    /// This takes a step with the underlying stepper provided that doing so
    /// would not overflow the step count.
    ///
    /// # Returns
    ///
    /// - `Some(steps)`: the new position, if the step was taken.
    /// - `None`: if no step could be taken without overflowing.
    pub fn step(&mut self, direction: Direction) -> Option<Steps> {
        let next_position = match direction {
            Direction::Negative => self.position.dec(),
            Direction::Positive => self.position.inc(),
        }?;
        self.stepper.step(direction);
        self.position = next_position;
        Some(next_position)
    }
}
