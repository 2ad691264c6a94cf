use ufmt_macros::uDebug;

use super::drive::Drive;
use super::motion_queue::{MotionQueue, MotionStep};
use crate::{MicroSeconds, OutputLine, Stepper};

/// What the motor of an axis is doing.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum MotorState {
    Idle,
    Moving,
    Delaying,
    Paused,
}

/// Something the axis should report.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SequenceEvent {
    /// A move step started.
    Moving,
    /// A delay started.
    Delaying,
    /// The last step of the sequence finished.
    Completed,
}

/// Result of loading a sequence.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct LoadOutcome {
    pub loaded: usize,
    /// Steps that did not fit in the queue.
    pub dropped: usize,
    pub event: Option<SequenceEvent>,
}

/// Executes a queue of motion steps without blocking.
///
/// Every operation takes the [Drive] it acts on, plus the current time. Each
/// call reports at most one [SequenceEvent]. `Completed` is reported at most
/// once per loaded sequence.
pub struct Sequencer<const N: usize> {
    queue: MotionQueue<N>,
    state: MotorState,
    delay_started: MicroSeconds,
    /// State to return to on resume.
    paused_from: MotorState,
    /// Progress of a delay interrupted by a pause.
    delay_elapsed: MicroSeconds,
    completion_reported: bool,
}
impl<const N: usize> Sequencer<N> {
    pub fn new() -> Self {
        Self {
            queue: MotionQueue::new(),
            state: MotorState::Idle,
            delay_started: MicroSeconds::zero(),
            paused_from: MotorState::Idle,
            delay_elapsed: MicroSeconds::zero(),
            completion_reported: true,
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn queue(&self) -> &MotionQueue<N> {
        &self.queue
    }

    /// Returns true while a sequence has work left, paused or not.
    pub fn is_busy(&self) -> bool {
        match self.state {
            MotorState::Moving | MotorState::Delaying => true,
            MotorState::Paused => self.paused_from != MotorState::Idle,
            MotorState::Idle => false,
        }
    }

    /// Replaces the queue with a new sequence and starts its first step.
    ///
    /// An empty sequence stops the motor and completes at once.
    pub fn load<S, B, E>(
        &mut self,
        steps: impl IntoIterator<Item = MotionStep>,
        drive: &mut Drive<S, B, E>,
        now: MicroSeconds,
    ) -> LoadOutcome
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        let dropped = self.queue.load(steps);
        self.completion_reported = false;
        let event = if self.queue.is_empty() {
            drive.motor.hold_position();
            drive.lines.request_engage(now);
            self.finish()
        } else {
            self.execute_current(drive, now)
        };
        LoadOutcome {
            loaded: self.queue.len(),
            dropped,
            event,
        }
    }

    /// Advances the sequence.
    ///
    /// Call once per control loop iteration.
    pub fn tick<S, B, E>(&mut self, drive: &mut Drive<S, B, E>, now: MicroSeconds) -> Option<SequenceEvent>
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        drive.lines.tick(now);
        match self.state {
            MotorState::Idle | MotorState::Paused => None,
            MotorState::Delaying => {
                let step = match self.queue.current() {
                    Some(step) => *step,
                    None => return self.finish(),
                };
                let delay = MicroSeconds::from_millis(step.pre_move_delay_ms.unwrap_or(0));
                if !now.has_elapsed(self.delay_started, delay) {
                    return None;
                }
                if step.delay_only {
                    self.queue.complete_current();
                    self.advance(drive, now)
                } else {
                    Some(self.begin_motion(&step, drive, now))
                }
            }
            MotorState::Moving => {
                if drive.lines.ready_to_move() {
                    drive.motor.run(now);
                }
                if !drive.motor.is_at_target() {
                    return None;
                }
                self.queue.complete_current();
                drive.lines.request_engage(now);
                self.advance(drive, now)
            }
        }
    }

    /// Stops motion at once and clamps the axis.
    ///
    /// Pausing an already paused sequence only re-asserts the clamp.
    pub fn pause<S, B, E>(&mut self, drive: &mut Drive<S, B, E>, now: MicroSeconds)
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        if self.state != MotorState::Paused {
            if self.state == MotorState::Delaying {
                self.delay_elapsed = now.since(self.delay_started);
            }
            self.paused_from = self.state;
        }
        drive.clamp();
        self.state = MotorState::Paused;
    }

    /// Continues a paused sequence.
    ///
    /// A move re-releases the lines, so motion restarts only after the
    /// release dwell. A delay continues with the time it had left.
    pub fn resume<S, B, E>(&mut self, drive: &mut Drive<S, B, E>, now: MicroSeconds) -> Option<SequenceEvent>
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        if self.state != MotorState::Paused {
            return None;
        }
        match self.paused_from {
            MotorState::Moving => {
                self.state = MotorState::Moving;
                if drive.motor.distance_to_go() != 0 {
                    drive.lines.request_release(now);
                }
                Some(SequenceEvent::Moving)
            }
            MotorState::Delaying => {
                self.state = MotorState::Delaying;
                self.delay_started = now.rewind(self.delay_elapsed);
                Some(SequenceEvent::Delaying)
            }
            MotorState::Idle | MotorState::Paused => {
                self.state = MotorState::Idle;
                None
            }
        }
    }

    /// Abandons the sequence, stops the motor and clamps the axis.
    ///
    /// No completion is reported for the abandoned sequence.
    pub fn reset<S, B, E>(&mut self, drive: &mut Drive<S, B, E>)
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        self.queue.clear();
        drive.motor.hold_position();
        drive.lines.engage_now();
        self.state = MotorState::Idle;
        self.paused_from = MotorState::Idle;
        self.completion_reported = true;
    }

    fn execute_current<S, B, E>(&mut self, drive: &mut Drive<S, B, E>, now: MicroSeconds) -> Option<SequenceEvent>
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        let step = match self.queue.current() {
            Some(step) => *step,
            None => return self.finish(),
        };
        if step.pre_move_delay_ms.is_some() {
            self.state = MotorState::Delaying;
            self.delay_started = now;
            Some(SequenceEvent::Delaying)
        } else {
            Some(self.begin_motion(&step, drive, now))
        }
    }

    fn begin_motion<S, B, E>(&mut self, step: &MotionStep, drive: &mut Drive<S, B, E>, now: MicroSeconds) -> SequenceEvent
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        drive.lines.request_release(now);
        drive.motor.set_max_speed(step.speed);
        drive.motor.move_to(step.target);
        self.state = MotorState::Moving;
        SequenceEvent::Moving
    }

    fn advance<S, B, E>(&mut self, drive: &mut Drive<S, B, E>, now: MicroSeconds) -> Option<SequenceEvent>
    where
        S: Stepper,
        B: OutputLine,
        E: OutputLine,
    {
        if self.queue.advance() {
            self.execute_current(drive, now)
        } else {
            self.finish()
        }
    }

    fn finish(&mut self) -> Option<SequenceEvent> {
        self.state = MotorState::Idle;
        if self.completion_reported {
            None
        } else {
            self.completion_reported = true;
            Some(SequenceEvent::Completed)
        }
    }
}

impl<const N: usize> Default for Sequencer<N> {
    fn default() -> Self {
        Self::new()
    }
}
