use arduino_hal::port::{
    mode::{Input, PullUp},
    Pin, PinOps,
};
use palletizer::{LimitSwitchState, Polarity};

/// Homing sensor on a pulled-up input.
///
/// # Type Parameters
///
/// - `P`: pin
pub struct LimitSwitch<P> {
    pin: Pin<Input<PullUp>, P>,
    /// Level of the pin while the sensor is triggered.
    polarity: Polarity,
}
impl<P: PinOps> LimitSwitch<P> {
    /// Creates a new `LimitSwitch`.
    ///
    /// # Parameters
    ///
    /// - `pin`: Pin to use for the sensor.
    /// - `polarity`: `ActiveLow` for sensors that pull the line to ground
    ///   when triggered.
    pub fn new(pin: Pin<Input<PullUp>, P>, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Reads the state of the sensor.
    fn state(&self) -> LimitSwitchState {
        if self.pin.is_high() == self.polarity.level(true) {
            LimitSwitchState::AtLimit
        } else {
            LimitSwitchState::NotAtLimit
        }
    }
}

impl<P: PinOps> palletizer::LimitSwitch for LimitSwitch<P> {
    fn read_limitswitch_state(&self) -> LimitSwitchState {
        self.state()
    }
}
