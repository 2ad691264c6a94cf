use crate::{Direction, MicroSeconds, PositionedStepper, Stepper, Steps};

#[allow(unused_imports)]
use micromath::F32Ext;

/// Non-blocking stepper with a trapezoidal speed profile.
///
/// The stepper is driven by calling [RampedStepper::run] as often as
/// possible. Each call takes at most one step, when the step interval for the
/// current speed has elapsed. Speeds are in steps per second and
/// accelerations in steps per second squared.
///
/// The speed profile starts from `sqrt(2 * acceleration)`, changes by
/// `acceleration / speed` after every step, and begins to decelerate once the
/// remaining distance is within the stopping distance `speed² / (2 *
/// acceleration)`.
pub struct RampedStepper<S> {
    stepper: PositionedStepper<S>,
    target: Steps,
    /// Current speed magnitude. Zero when stationary.
    speed: f32,
    direction: Direction,
    max_speed: f32,
    acceleration: f32,
    /// Time of the last step, or of the start of motion.
    last_step: Option<MicroSeconds>,
}
impl<S: Stepper> RampedStepper<S> {
    /// Creates a stationary stepper at position zero.
    ///
    /// # Parameters
    ///
    /// - `stepper`: Underlying stepper driver.
    /// - `max_speed`: Maximum speed.
    /// - `acceleration`: Acceleration. Zero or less means "no ramp".
    pub fn new(stepper: S, max_speed: f32, acceleration: f32) -> Self {
        let mut ramped = Self {
            stepper: PositionedStepper::new(stepper),
            target: Steps::zero(),
            speed: 0.0,
            direction: Direction::Positive,
            max_speed: 1.0,
            acceleration: 0.0,
            last_step: None,
        };
        ramped.set_max_speed(max_speed);
        ramped.set_acceleration(acceleration);
        ramped
    }

    /// Sets the maximum speed. Non-positive values are ignored.
    pub fn set_max_speed(&mut self, max_speed: f32) {
        if max_speed > 0.0 {
            self.max_speed = max_speed;
            if self.speed > max_speed {
                self.speed = max_speed;
            }
        }
    }

    /// Sets the acceleration. Negative values are treated as zero.
    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.acceleration = acceleration.max(0.0);
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Current position.
    pub fn position(&self) -> Steps {
        self.stepper.get_position()
    }

    /// Current target position.
    pub fn target(&self) -> Steps {
        self.target
    }

    /// Signed number of steps left to reach the target.
    pub fn distance_to_go(&self) -> i32 {
        self.position().distance_to(self.target)
    }

    /// Returns true while the motor has a non-zero speed.
    pub fn is_running(&self) -> bool {
        self.last_step.is_some()
    }

    /// Returns true once the target is reached and the motor has stopped.
    pub fn is_at_target(&self) -> bool {
        self.distance_to_go() == 0 && !self.is_running()
    }

    /// Sets a new absolute target. Motion continues from the current speed.
    pub fn move_to(&mut self, target: Steps) {
        self.target = target;
    }

    /// Sets a new target relative to the current position.
    pub fn move_by(&mut self, delta: i32) {
        self.move_to(self.position().offset(delta));
    }

    /// Redefines the current position, clearing any motion.
    ///
    /// This DOES NOT move the motor.
    pub fn set_current_position(&mut self, position: Steps) {
        self.stepper.set_gauge_position(position);
        self.target = position;
        self.halt();
    }

    /// Stops immediately, keeping the target so motion can be resumed.
    pub fn halt(&mut self) {
        self.speed = 0.0;
        self.last_step = None;
    }

    /// Stops immediately and abandons the target.
    pub fn hold_position(&mut self) {
        self.target = self.position();
        self.halt();
    }

    /// Decelerates to a stop as quickly as the acceleration allows.
    ///
    /// The target is replaced by the nearest position the motor can stop at.
    pub fn stop(&mut self) {
        if !self.is_running() {
            self.target = self.position();
            return;
        }
        let stopping = self.stopping_distance();
        let mut steps = stopping as i32;
        if (steps as f32) < stopping {
            steps += 1;
        }
        self.target = self.position().offset(self.direction.signum() * steps);
    }

    /// Takes a step if one is due.
    ///
    /// # Parameters
    ///
    /// - `now`: The current time.
    ///
    /// # Returns
    ///
    /// `true` while the target has not yet been reached.
    pub fn run(&mut self, now: MicroSeconds) -> bool {
        let to_go = self.distance_to_go();
        if to_go == 0 {
            self.halt();
            return false;
        }

        let last_step = match self.last_step {
            Some(last_step) => last_step,
            None => {
                // Start from rest; the first step falls due one interval later.
                self.direction = Direction::towards(to_go);
                self.speed = self.start_speed();
                self.last_step = Some(now);
                return true;
            }
        };

        if !now.has_elapsed(last_step, self.step_interval()) {
            return true;
        }
        if self.stepper.step(self.direction).is_none() {
            self.hold_position();
            return false;
        }
        self.last_step = Some(now);
        self.update_speed();
        self.distance_to_go() != 0
    }

    /// Speed for the first step from rest.
    fn start_speed(&self) -> f32 {
        if self.acceleration > 0.0 {
            (2.0 * self.acceleration).sqrt().min(self.max_speed)
        } else {
            self.max_speed
        }
    }

    /// Number of steps needed to stop from the current speed.
    fn stopping_distance(&self) -> f32 {
        if self.acceleration > 0.0 {
            self.speed * self.speed / (2.0 * self.acceleration)
        } else {
            0.0
        }
    }

    fn step_interval(&self) -> MicroSeconds {
        MicroSeconds::new((1_000_000.0 / self.speed) as u32)
    }

    /// Recomputes the speed after a step.
    fn update_speed(&mut self) {
        let to_go = self.distance_to_go();
        if to_go == 0 {
            self.halt();
            return;
        }
        let wanted = Direction::towards(to_go);
        if self.acceleration <= 0.0 {
            self.direction = wanted;
            self.speed = self.max_speed;
            return;
        }

        let start = self.start_speed();
        let delta = self.acceleration / self.speed;
        if wanted != self.direction {
            // Target is behind us: slow down to the start speed, then turn.
            self.speed -= delta;
            if self.speed <= start {
                self.speed = start;
                self.direction = wanted;
            }
        } else if to_go.unsigned_abs() as f32 <= self.stopping_distance() {
            self.speed = (self.speed - delta).max(start);
        } else {
            self.speed = (self.speed + delta).min(self.max_speed);
        }
        self.speed = self.speed.min(self.max_speed);
    }
}
