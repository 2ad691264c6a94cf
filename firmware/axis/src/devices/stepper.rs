use arduino_hal::{
    delay_us,
    port::{mode::Output, Pin, PinOps},
};
use palletizer::{Direction, MicroSeconds};

/// Stepper motor driver with pulse and direction inputs.
///
/// # Type Parameters
///
/// - `P`: pulse pin
/// - `D`: direction pin
pub struct Stepper<P, D> {
    /// Pin to use for pulses.
    pin_pulse: Pin<Output, P>,
    /// Pin to use for direction indication.
    pin_direction: Pin<Output, D>,
    /// Stores the current direction.
    direction: Direction,
    /// Width of a pulse.
    pulse_width: MicroSeconds,
    /// Setup time of the driver after a direction change.
    direction_setup: MicroSeconds,
}

impl<P: PinOps, D: PinOps> Stepper<P, D> {
    /// Creates a new `Stepper`.
    ///
    /// # Parameters
    ///
    /// - `pin_pulse`: Pin to use for pulse signals.
    /// - `pin_direction`: Pin to use for direction signals.
    /// - `pulse_width`: How long the pulse pin is held high.
    /// - `direction_setup`: Wait between a direction change and the next
    ///   pulse.
    pub fn new(
        pin_pulse: Pin<Output, P>,
        pin_direction: Pin<Output, D>,
        pulse_width: MicroSeconds,
        direction_setup: MicroSeconds,
    ) -> Self {
        let direction = Direction::Negative;
        let mut stepper = Self {
            pin_pulse,
            pin_direction,
            direction,
            pulse_width,
            direction_setup,
        };

        // The direction pin must agree with the stored direction.
        stepper.force_set_direction(direction);

        stepper
    }

    /// Emit one pulse.
    ///
    /// The pulse is only a few microseconds long; the time between pulses is
    /// decided by the caller.
    fn do_step(&mut self, direction: Direction) {
        self.set_direction(direction);
        self.pin_pulse.set_high();
        delay_us(self.pulse_width.get_value());
        self.pin_pulse.set_low();
    }

    /// Set the direction, but only if it needs changing.
    fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.force_set_direction(direction);
        }
    }

    fn force_set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Negative => self.pin_direction.set_low(),
            Direction::Positive => self.pin_direction.set_high(),
        }
        self.direction = direction;
        delay_us(self.direction_setup.get_value());
    }
}

impl<P: PinOps, D: PinOps> palletizer::Stepper for Stepper<P, D> {
    fn step(&mut self, direction: Direction) {
        self.do_step(direction);
    }
}
