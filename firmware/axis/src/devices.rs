mod clock;
mod limitswitch;
mod output_pin;
mod serial_link;
mod stepper;

pub use clock::Tc1Clock;
pub use limitswitch::LimitSwitch;
pub use output_pin::OutputPin;
pub use serial_link::{RxBuffer, SerialLink};
pub use stepper::Stepper;
