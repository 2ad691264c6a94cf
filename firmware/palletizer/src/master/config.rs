use crate::protocol::AxisSet;
use crate::MicroSeconds;

/// Number of operator commands the master can hold.
pub const DEFAULT_QUEUE_CAPACITY: usize = 5;

/// How the master detects that a batch has finished on every axis.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CompletionStrategy {
    /// Read the shared wired-OR indicator line through the panel.
    IndicatorLine,
    /// Wait for a terminal feedback line from every expected axis.
    Messages,
}

/// What happens to pending commands when a new coordinate batch arrives.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QueuePolicy {
    /// Queue the batch behind the pending commands.
    Append,
    /// Discard the pending commands first.
    Overwrite,
}

/// Configuration of the master.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MasterConfig {
    pub completion: CompletionStrategy,
    pub queue_policy: QueuePolicy,
    /// Interval between completion checks.
    pub poll_interval: MicroSeconds,
    /// Axes present on the bus. Broadcast batches expect all of them.
    pub roster: AxisSet,
    /// Send `all;3` on PAUSE and `all;4` when playing from Paused.
    pub forward_pause: bool,
    /// Copy every line from the axis bus to the operator.
    pub echo_feedback: bool,
    /// Send `INFO` lines to the operator.
    pub verbose: bool,
}
impl MasterConfig {
    /// Default configuration of the master.
    pub const fn new() -> Self {
        Self {
            completion: CompletionStrategy::Messages,
            queue_policy: QueuePolicy::Append,
            poll_interval: MicroSeconds::from_millis(50),
            roster: AxisSet::all(),
            forward_pause: false,
            echo_feedback: false,
            verbose: false,
        }
    }
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self::new()
    }
}
