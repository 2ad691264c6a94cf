mod direction;
mod limit_switch;
mod output_line;
mod positioned_stepper;
mod ramped_stepper;
mod stepper;
mod steps;

pub use direction::Direction;
pub use limit_switch::{LimitSwitch, LimitSwitchState};
pub use output_line::{OutputLine, Polarity, Unconnected};
pub use positioned_stepper::PositionedStepper;
pub use ramped_stepper::RampedStepper;
pub use stepper::Stepper;
pub use steps::Steps;

#[cfg(test)]
pub use limit_switch::test::TestLimitSwitch;
#[cfg(test)]
pub use output_line::test::TestLine;
#[cfg(test)]
pub use stepper::tests::TestStepper;
