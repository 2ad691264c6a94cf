use crate::protocol::RunToken;
use crate::Steps;

/// One step of a motion sequence.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MotionStep {
    pub target: Steps,
    /// Steps per second.
    pub speed: f32,
    /// Wait before moving. For a delay-only step this is the whole step.
    pub pre_move_delay_ms: Option<u32>,
    pub delay_only: bool,
    pub completed: bool,
}
impl MotionStep {
    /// A move to an absolute target.
    pub fn move_to(target: Steps, speed: f32) -> Self {
        Self {
            target,
            speed,
            pre_move_delay_ms: None,
            delay_only: false,
            completed: false,
        }
    }

    /// A timed pause with no motion.
    pub fn delay(ms: u32, speed: f32) -> Self {
        Self {
            target: Steps::zero(),
            speed,
            pre_move_delay_ms: Some(ms),
            delay_only: true,
            completed: false,
        }
    }

    pub fn from_token(token: RunToken, speed: f32) -> Self {
        match token {
            RunToken::MoveTo(target) => Self::move_to(target, speed),
            RunToken::Delay(ms) => Self::delay(ms, speed),
        }
    }

    /// Wire tokens for this step.
    ///
    /// A move with a pre-move delay is written as a delay token followed by
    /// a move token, which decode back as two separate steps.
    pub fn tokens(&self) -> impl Iterator<Item = RunToken> {
        let delay = self.pre_move_delay_ms.map(RunToken::Delay);
        let target = (!self.delay_only).then_some(RunToken::MoveTo(self.target));
        delay.into_iter().chain(target)
    }
}

/// Fixed-capacity FIFO of motion steps with a cursor on the current step.
pub struct MotionQueue<const N: usize> {
    steps: heapless::Vec<MotionStep, N>,
    cursor: usize,
}
impl<const N: usize> MotionQueue<N> {
    pub fn new() -> Self {
        Self {
            steps: heapless::Vec::new(),
            cursor: 0,
        }
    }

    /// Replaces the contents with new steps.
    ///
    /// # Returns
    ///
    /// The number of steps that did not fit and were dropped.
    pub fn load(&mut self, steps: impl IntoIterator<Item = MotionStep>) -> usize {
        self.clear();
        let mut dropped = 0;
        for step in steps {
            if self.steps.push(step).is_err() {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.steps.clear();
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&MotionStep> {
        self.steps.get(self.cursor)
    }

    pub fn complete_current(&mut self) {
        if let Some(step) = self.steps.get_mut(self.cursor) {
            step.completed = true;
        }
    }

    /// Moves the cursor to the next step.
    ///
    /// # Returns
    ///
    /// `true` if there is a next step.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.steps.len() {
            self.cursor += 1;
        }
        self.cursor < self.steps.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[MotionStep] {
        &self.steps
    }
}

impl<const N: usize> Default for MotionQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
