//! Firmware logic of a single axis controller.

mod brake;
mod config;
mod controller;
mod drive;
mod homing;
mod motion_queue;
mod sequencer;

pub use brake::BrakeEnable;
pub use config::{AxisConfig, HomingConfig, LineConfig, ReportConfig, MOTION_QUEUE_CAPACITY};
pub use controller::{AxisController, AxisHardware};
pub use drive::Drive;
pub use homing::{home, HomingError};
pub use motion_queue::{MotionQueue, MotionStep};
pub use sequencer::{LoadOutcome, MotorState, SequenceEvent, Sequencer};
