use super::config::CompletionStrategy;
use crate::protocol::{AxisSet, Feedback, Opcode};
use crate::MicroSeconds;

/// Kind of batch in flight, which decides what feedback ends it.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BatchKind {
    Run,
    Zero,
}
impl BatchKind {
    fn opcode(&self) -> Opcode {
        match self {
            BatchKind::Run => Opcode::Run,
            BatchKind::Zero => Opcode::Zero,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Batch {
    kind: BatchKind,
    expected: AxisSet,
    reported: AxisSet,
}

/// Tracks the batch in flight until every axis has finished it.
///
/// At most one batch is tracked. Completion is only checked once per poll
/// interval.
pub struct CompletionTracker {
    strategy: CompletionStrategy,
    poll_interval: MicroSeconds,
    batch: Option<Batch>,
    last_poll: MicroSeconds,
}
impl CompletionTracker {
    pub fn new(strategy: CompletionStrategy, poll_interval: MicroSeconds) -> Self {
        Self {
            strategy,
            poll_interval,
            batch: None,
            last_poll: MicroSeconds::zero(),
        }
    }

    /// Starts tracking a batch sent to the `expected` axes.
    pub fn begin(&mut self, kind: BatchKind, expected: AxisSet, now: MicroSeconds) {
        self.batch = Some(Batch {
            kind,
            expected,
            reported: AxisSet::empty(),
        });
        self.last_poll = now;
    }

    /// Returns true while a batch is in flight.
    pub fn is_running(&self) -> bool {
        self.batch.is_some()
    }

    /// Notes axis feedback. Only terminal feedback for the batch in flight,
    /// from an expected axis, counts.
    pub fn record(&mut self, feedback: &Feedback) {
        if let Some(batch) = self.batch.as_mut() {
            if batch.expected.contains(feedback.axis)
                && feedback.is_terminal_for(batch.kind.opcode().feedback_word())
            {
                batch.reported.insert(feedback.axis);
            }
        }
    }

    /// Checks for completion, at most once per poll interval.
    ///
    /// # Parameters
    ///
    /// - `now`: Current time.
    /// - `all_axes_idle`: Reads the shared indicator line. Only called with
    ///   [CompletionStrategy::IndicatorLine].
    ///
    /// # Returns
    ///
    /// `true` exactly once, when the batch in flight has completed.
    pub fn poll(&mut self, now: MicroSeconds, all_axes_idle: impl FnOnce() -> bool) -> bool {
        let batch = match self.batch {
            Some(batch) => batch,
            None => return false,
        };
        if !now.has_elapsed(self.last_poll, self.poll_interval) {
            return false;
        }
        self.last_poll = now;
        let complete = match self.strategy {
            CompletionStrategy::IndicatorLine => all_axes_idle(),
            CompletionStrategy::Messages => batch.reported.is_superset(batch.expected),
        };
        if complete {
            self.batch = None;
        }
        complete
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::{AxisId, FeedbackMessage};

    fn tracker(strategy: CompletionStrategy) -> CompletionTracker {
        CompletionTracker::new(strategy, MicroSeconds::from_millis(50))
    }

    fn ms(millis: u32) -> MicroSeconds {
        MicroSeconds::from_millis(millis)
    }

    #[test]
    fn test_waits_for_every_expected_axis() {
        let mut tracker = tracker(CompletionStrategy::Messages);
        let expected = AxisSet::single(AxisId::X).union(AxisSet::single(AxisId::Y));
        tracker.begin(BatchKind::Run, expected, ms(0));

        tracker.record(&Feedback::new(AxisId::X, FeedbackMessage::SequenceCompleted));
        assert!(!tracker.poll(ms(50), || true));
        assert!(tracker.is_running());

        tracker.record(&Feedback::new(AxisId::Y, FeedbackMessage::Moving));
        tracker.record(&Feedback::new(AxisId::Z, FeedbackMessage::SequenceCompleted));
        tracker.record(&Feedback::new(AxisId::Y, FeedbackMessage::Done("ZERO")));
        assert!(!tracker.poll(ms(100), || true));

        tracker.record(&Feedback::new(AxisId::Y, FeedbackMessage::SequenceCompleted));
        assert!(!tracker.poll(ms(120), || true));
        assert!(tracker.poll(ms(150), || false));
        assert!(!tracker.is_running());
        assert!(!tracker.poll(ms(500), || true));
    }

    #[test]
    fn test_zero_batch() {
        let mut tracker = tracker(CompletionStrategy::Messages);
        let expected = AxisSet::single(AxisId::T).union(AxisSet::single(AxisId::G));
        tracker.begin(BatchKind::Zero, expected, ms(0));
        tracker.record(&Feedback::new(AxisId::T, FeedbackMessage::Done("ZERO")));
        tracker.record(&Feedback::new(AxisId::G, FeedbackMessage::Failed("ZERO")));
        assert!(tracker.poll(ms(60), || false));
    }

    #[test]
    fn test_run_feedback_does_not_end_zero_batch() {
        let mut tracker = tracker(CompletionStrategy::Messages);
        tracker.begin(BatchKind::Zero, AxisSet::single(AxisId::X), ms(0));
        tracker.record(&Feedback::new(AxisId::X, FeedbackMessage::SequenceCompleted));
        assert!(!tracker.poll(ms(60), || true));
        tracker.record(&Feedback::new(AxisId::X, FeedbackMessage::Done("ZERO")));
        assert!(tracker.poll(ms(120), || true));
    }

    #[test]
    fn test_indicator_line() {
        let mut tracker = tracker(CompletionStrategy::IndicatorLine);
        tracker.begin(BatchKind::Run, AxisSet::all(), ms(1000));
        assert!(!tracker.poll(ms(1049), || panic!("polled too early")));
        assert!(!tracker.poll(ms(1050), || false));
        assert!(tracker.poll(ms(1100), || true));
    }
}
