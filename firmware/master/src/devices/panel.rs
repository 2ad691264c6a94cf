use core::convert::Infallible;

use arduino_hal::prelude::*;
use embedded_hal::digital::{InputPin, OutputPin};
use palletizer::master::{Panel, SystemState};

/// Status lamps and the shared indicator line.
///
/// # Type Parameters
///
/// - `R`, `G`, `Y`: red, green and yellow lamp pins
/// - `I`: indicator input pin
pub struct LampPanel<R, G, Y, I> {
    red: R,
    green: G,
    yellow: Y,
    /// Pulled low by any axis that is busy.
    indicator: I,
}
impl<R, G, Y, I> LampPanel<R, G, Y, I>
where
    R: OutputPin<Error = Infallible>,
    G: OutputPin<Error = Infallible>,
    Y: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
{
    pub fn new(red: R, green: G, yellow: Y, indicator: I) -> Self {
        Self {
            red,
            green,
            yellow,
            indicator,
        }
    }
}

impl<R, G, Y, I> Panel for LampPanel<R, G, Y, I>
where
    R: OutputPin<Error = Infallible>,
    G: OutputPin<Error = Infallible>,
    Y: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
{
    fn all_axes_idle(&mut self) -> bool {
        self.indicator.is_high().unwrap_infallible()
    }

    fn show_state(&mut self, state: SystemState) {
        self.red.set_low().unwrap_infallible();
        self.green.set_low().unwrap_infallible();
        self.yellow.set_low().unwrap_infallible();
        match state {
            SystemState::Idle | SystemState::Stopping => self.red.set_high(),
            SystemState::Running => self.green.set_high(),
            SystemState::Paused => self.yellow.set_high(),
        }
        .unwrap_infallible();
    }
}
