#![cfg_attr(not(test), no_std)]

#[macro_use]
mod logging;

pub mod axis;
mod kinematics;
pub mod master;
mod microseconds;
pub mod protocol;
pub mod transport;

pub use kinematics::Direction;
pub use kinematics::LimitSwitch;
pub use kinematics::LimitSwitchState;
pub use kinematics::OutputLine;
pub use kinematics::Polarity;
pub use kinematics::PositionedStepper;
pub use kinematics::RampedStepper;
pub use kinematics::Stepper;
pub use kinematics::Steps;
pub use kinematics::Unconnected;
pub use logging::Level;
pub use microseconds::Clock;
pub use microseconds::MicroSeconds;

#[cfg(test)]
pub use kinematics::TestLimitSwitch;
#[cfg(test)]
pub use kinematics::TestLine;
#[cfg(test)]
pub use kinematics::TestStepper;
