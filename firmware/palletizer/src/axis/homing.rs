use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

use super::config::HomingConfig;
use super::drive::Drive;
use crate::{Clock, LimitSwitch, LimitSwitchState, OutputLine, Stepper, Steps};

/// Reasons homing can fail.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum HomingError {
    /// The sensor was triggered and did not clear within the step budget.
    SensorStuck,
    /// The sensor did not trigger within the step budget.
    SensorNotFound,
}

impl Display for HomingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HomingError::SensorStuck => write!(f, "homing sensor did not clear"),
            HomingError::SensorNotFound => write!(f, "homing sensor not found"),
        }
    }
}

/// Homes an axis against its sensor.
///
/// This blocks until homing is finished. The sensor is approached from the
/// positive side. When the sensor is already triggered, the axis first
/// backs off until it clears. After the edge is found, the motor
/// decelerates, then returns by exactly the overshoot, and that position
/// becomes zero.
///
/// The lines are released with their normal dwell before moving, and
/// engaged at once afterwards. The previous speed and acceleration are
/// restored whatever the outcome.
///
/// # Parameters
///
/// - `drive`: Motor and lines of the axis.
/// - `sensor`: Homing sensor.
/// - `clock`: Time source.
/// - `config`: Homing speeds and step budget.
///
/// # Returns
///
/// - `Ok(overshoot)`: the number of steps travelled past the edge while
///   stopping.
/// - `Err(error)`: if the edge could not be found. The position is not
///   changed.
pub fn home<S, B, E, L, C>(
    drive: &mut Drive<S, B, E>,
    sensor: &L,
    clock: &C,
    config: &HomingConfig,
) -> Result<i32, HomingError>
where
    S: Stepper,
    B: OutputLine,
    E: OutputLine,
    L: LimitSwitch,
    C: Clock,
{
    let saved_speed = drive.motor.max_speed();
    let saved_acceleration = drive.motor.acceleration();
    drive.motor.set_max_speed(config.speed);
    drive.motor.set_acceleration(config.acceleration);

    drive.motor.hold_position();
    drive.lines.request_release(clock.now());
    while !drive.lines.ready_to_move() {
        drive.lines.tick(clock.now());
    }

    let result = seek_edge(drive, sensor, clock, config.step_budget).map(|()| {
        drive.motor.stop();
        let overshoot = drive.motor.distance_to_go();
        run_to_target(drive, clock);
        drive.motor.move_by(-overshoot);
        run_to_target(drive, clock);
        drive.motor.set_current_position(Steps::zero());
        overshoot
    });
    if result.is_err() {
        drive.motor.hold_position();
    }

    drive.motor.set_max_speed(saved_speed);
    drive.motor.set_acceleration(saved_acceleration);
    drive.lines.engage_now();
    result
}

/// Moves until the sensor edge is reached from the positive side.
fn seek_edge<S, B, E, L, C>(
    drive: &mut Drive<S, B, E>,
    sensor: &L,
    clock: &C,
    budget: i32,
) -> Result<(), HomingError>
where
    S: Stepper,
    B: OutputLine,
    E: OutputLine,
    L: LimitSwitch,
    C: Clock,
{
    let triggered = || sensor.read_limitswitch_state() == LimitSwitchState::AtLimit;

    if triggered() {
        drive.motor.move_by(budget);
        run_while(drive, clock, triggered);
        if triggered() {
            return Err(HomingError::SensorStuck);
        }
        drive.motor.hold_position();
    }

    drive.motor.move_by(-budget);
    run_while(drive, clock, || !triggered());
    if triggered() {
        Ok(())
    } else {
        Err(HomingError::SensorNotFound)
    }
}

/// Runs the motor while `condition` holds and the target is not reached.
fn run_while<S, B, E, C>(drive: &mut Drive<S, B, E>, clock: &C, condition: impl Fn() -> bool)
where
    S: Stepper,
    B: OutputLine,
    E: OutputLine,
    C: Clock,
{
    while condition() && drive.service(clock.now()) {}
}

fn run_to_target<S, B, E, C>(drive: &mut Drive<S, B, E>, clock: &C)
where
    S: Stepper,
    B: OutputLine,
    E: OutputLine,
    C: Clock,
{
    while drive.service(clock.now()) {}
}
