use core::convert::Infallible;

use arduino_hal::prelude::*;
use embedded_hal::digital::{OutputPin as HalOutputPin, PinState};

/// Digital output driving a brake, enable or indicator line.
///
/// # Type Parameters
///
/// - `P`: any infallible output pin
pub struct OutputPin<P> {
    pin: P,
}
impl<P: HalOutputPin<Error = Infallible>> OutputPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: HalOutputPin<Error = Infallible>> palletizer::OutputLine for OutputPin<P> {
    fn set_level(&mut self, high: bool) {
        self.pin.set_state(PinState::from(high)).unwrap_infallible();
    }
}
