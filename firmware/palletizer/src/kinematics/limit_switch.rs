/// Abstraction for the homing sensor.
///
/// The sensor sits at the negative end of travel. It just has a state;
/// either at the limit (triggered), or not at the limit.
pub trait LimitSwitch {
    fn read_limitswitch_state(&self) -> LimitSwitchState;
}

/// State of a limit switch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LimitSwitchState {
    /// The sensor is triggered.
    AtLimit,
    /// The sensor is clear.
    NotAtLimit,
}
