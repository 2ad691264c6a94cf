use crate::Direction;

/// Stepper motor driver.
///
/// Implementations emit a single pulse on the driver's step line, after
/// setting the direction line. Position tracking and speed control live in
/// [crate::PositionedStepper] and [crate::RampedStepper].
pub trait Stepper {
    /// Takes a single step in the supplied direction.
    ///
    /// # Parameters
    ///
    /// - `direction`: Direction in which to take the step.
    fn step(&mut self, direction: Direction);
}
