use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

use crate::protocol::SystemControl;

/// Operating state of the whole machine.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum SystemState {
    Idle,
    Running,
    Paused,
    /// Waiting for the batch in flight before going idle.
    Stopping,
}

impl Display for SystemState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemState::Idle => "IDLE",
            SystemState::Running => "RUNNING",
            SystemState::Paused => "PAUSED",
            SystemState::Stopping => "STOPPING",
        };
        write!(f, "STATE:{}", name)
    }
}

/// Side effect the master must carry out after a transition.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Effect {
    Nothing,
    /// Dispatch from the queue if nothing is in flight.
    DispatchNext,
    ClearQueue,
    /// Dispatching halts. Axes may be told to pause.
    Pause,
    /// Dispatching continues. Axes may be told to resume.
    Resume,
    /// The batch in flight runs to completion. Paused axes must be resumed.
    Finish,
}

/// Result of a state machine event.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Transition {
    pub state: SystemState,
    pub effect: Effect,
}
impl Transition {
    fn to(state: SystemState, effect: Effect) -> Self {
        Self { state, effect }
    }
}

/// Applies a system-control token.
///
/// # Parameters
///
/// - `state`: Current state.
/// - `control`: Received token.
/// - `in_flight`: Whether a batch is still running on the axes.
pub fn on_control(state: SystemState, control: SystemControl, in_flight: bool) -> Transition {
    use SystemState::*;
    match (state, control) {
        (Idle, SystemControl::Play) => Transition::to(Running, Effect::DispatchNext),
        (Paused, SystemControl::Play) => Transition::to(Running, Effect::Resume),
        (Running, SystemControl::Idle | SystemControl::Stop) if in_flight => {
            Transition::to(Stopping, Effect::Nothing)
        }
        (Paused, SystemControl::Idle | SystemControl::Stop) if in_flight => {
            Transition::to(Stopping, Effect::Finish)
        }
        (Running | Paused | Idle, SystemControl::Idle | SystemControl::Stop) => {
            Transition::to(Idle, Effect::ClearQueue)
        }
        (Running, SystemControl::Pause) => Transition::to(Paused, Effect::Pause),
        (state, _) => Transition::to(state, Effect::Nothing),
    }
}

/// Applies the completion of the batch in flight.
///
/// # Parameters
///
/// - `state`: Current state.
/// - `queue_empty`: Whether commands are waiting.
pub fn on_batch_complete(state: SystemState, queue_empty: bool) -> Transition {
    match state {
        SystemState::Stopping => Transition::to(SystemState::Idle, Effect::ClearQueue),
        SystemState::Running if queue_empty => Transition::to(SystemState::Idle, Effect::Nothing),
        SystemState::Running => Transition::to(SystemState::Running, Effect::DispatchNext),
        state => Transition::to(state, Effect::Nothing),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn control() -> impl Strategy<Value = SystemControl> {
        prop::sample::select(vec![
            SystemControl::Idle,
            SystemControl::Play,
            SystemControl::Pause,
            SystemControl::Stop,
        ])
    }

    fn state() -> impl Strategy<Value = SystemState> {
        prop::sample::select(vec![
            SystemState::Idle,
            SystemState::Running,
            SystemState::Paused,
            SystemState::Stopping,
        ])
    }

    #[test]
    fn test_play() {
        assert_eq!(
            Transition::to(SystemState::Running, Effect::DispatchNext),
            on_control(SystemState::Idle, SystemControl::Play, false)
        );
        assert_eq!(
            Transition::to(SystemState::Running, Effect::Resume),
            on_control(SystemState::Paused, SystemControl::Play, true)
        );
        assert_eq!(
            Transition::to(SystemState::Stopping, Effect::Nothing),
            on_control(SystemState::Stopping, SystemControl::Play, true)
        );
    }

    #[test]
    fn test_stop_defers_while_in_flight() {
        for control in [SystemControl::Idle, SystemControl::Stop] {
            assert_eq!(
                Transition::to(SystemState::Stopping, Effect::Nothing),
                on_control(SystemState::Running, control, true)
            );
            assert_eq!(
                Transition::to(SystemState::Stopping, Effect::Finish),
                on_control(SystemState::Paused, control, true)
            );
            for state in [SystemState::Running, SystemState::Paused] {
                assert_eq!(
                    Transition::to(SystemState::Idle, Effect::ClearQueue),
                    on_control(state, control, false)
                );
            }
        }
    }

    #[test]
    fn test_pause() {
        assert_eq!(
            Transition::to(SystemState::Paused, Effect::Pause),
            on_control(SystemState::Running, SystemControl::Pause, true)
        );
        assert_eq!(
            Transition::to(SystemState::Idle, Effect::Nothing),
            on_control(SystemState::Idle, SystemControl::Pause, false)
        );
    }

    #[test]
    fn test_batch_complete() {
        assert_eq!(
            Transition::to(SystemState::Idle, Effect::ClearQueue),
            on_batch_complete(SystemState::Stopping, false)
        );
        assert_eq!(
            Transition::to(SystemState::Running, Effect::DispatchNext),
            on_batch_complete(SystemState::Running, false)
        );
        assert_eq!(
            Transition::to(SystemState::Idle, Effect::Nothing),
            on_batch_complete(SystemState::Running, true)
        );
        assert_eq!(
            Transition::to(SystemState::Paused, Effect::Nothing),
            on_batch_complete(SystemState::Paused, false)
        );
    }

    #[test]
    fn test_status_text() {
        assert_eq!("STATE:STOPPING", SystemState::Stopping.to_string());
        assert_eq!("STATE:IDLE", SystemState::Idle.to_string());
    }

    proptest! {
        #[test]
        fn test_repeated_pause_is_idempotent(state in state(), in_flight: bool) {
            let once = on_control(state, SystemControl::Pause, in_flight);
            let twice = on_control(once.state, SystemControl::Pause, in_flight);
            assert_eq!(once.state, twice.state);
            assert_eq!(Effect::Nothing, twice.effect);
        }

        #[test]
        fn test_stopping_only_leaves_on_completion(control in control(), in_flight: bool) {
            let transition = on_control(SystemState::Stopping, control, in_flight);
            assert_eq!(SystemState::Stopping, transition.state);
        }
    }
}
