use super::brake::BrakeEnable;
use crate::{MicroSeconds, OutputLine, RampedStepper, Stepper};

/// Motor of an axis together with its brake and enable lines.
pub struct Drive<S, B, E> {
    pub motor: RampedStepper<S>,
    pub lines: BrakeEnable<B, E>,
}
impl<S: Stepper, B: OutputLine, E: OutputLine> Drive<S, B, E> {
    pub fn new(motor: RampedStepper<S>, lines: BrakeEnable<B, E>) -> Self {
        Self { motor, lines }
    }

    /// Advances the line timers, then runs the motor if the lines allow it.
    ///
    /// # Returns
    ///
    /// `true` while the motor has not reached its target.
    pub fn service(&mut self, now: MicroSeconds) -> bool {
        self.lines.tick(now);
        if !self.lines.ready_to_move() {
            return self.motor.distance_to_go() != 0;
        }
        self.motor.run(now)
    }

    /// Stops the motor where it is and engages the lines at once.
    pub fn clamp(&mut self) {
        self.motor.halt();
        self.lines.engage_now();
    }
}
