use core::fmt::{Display, Write};

use super::completion::{BatchKind, CompletionTracker};
use super::config::{MasterConfig, QueuePolicy};
use super::queue::{CommandQueue, QueueError};
use super::state::{on_batch_complete, on_control, Effect, SystemState, Transition};
use super::store::QueueStore;
use crate::logging::Level;
use crate::protocol::{
    classify, split_payload, AxisCommand, AxisSelector, AxisSet, CoordinateGroups, Feedback,
    FeedbackMessage, Opcode, OperatorCommand, ProtocolError, SystemControl, BUS_LINE_LEN, DONE,
    NEXT, OPERATOR_LINE_LEN,
};
use crate::transport::{LineChannel, Transport};
use crate::MicroSeconds;

/// Operator panel of the master.
pub trait Panel {
    /// Returns true when the shared indicator line shows every axis idle.
    fn all_axes_idle(&mut self) -> bool;

    /// Shows the system state on the status lamps.
    fn show_state(&mut self, state: SystemState);
}

/// Panel with no lamps and no indicator line.
///
/// Reports every axis as idle, so it should only be paired with
/// [CompletionStrategy::Messages](super::CompletionStrategy::Messages).
pub struct NoPanel;
impl Panel for NoPanel {
    fn all_axes_idle(&mut self) -> bool {
        true
    }

    fn show_state(&mut self, _state: SystemState) {}
}

/// Master orchestrator.
///
/// Accepts commands from the operator, keeps them in a durable queue, and
/// sends them to the axes one batch at a time. The next batch is only sent
/// once every axis of the previous one has finished.
///
/// # Type Parameters
///
/// - `O`: operator transport
/// - `A`: axis bus transport
/// - `Q`: durable queue store
/// - `P`: operator panel
/// - `N`: queue capacity
pub struct Master<O, A, Q, P, const N: usize> {
    config: MasterConfig,
    operator: LineChannel<O, OPERATOR_LINE_LEN>,
    bus: LineChannel<A, BUS_LINE_LEN>,
    queue: CommandQueue<Q, N>,
    panel: P,
    state: SystemState,
    completion: CompletionTracker,
    /// A `NEXT` was sent and not yet answered.
    next_outstanding: bool,
    /// The producer answered with `END_QUEUE`.
    producer_drained: bool,
}
impl<O, A, Q, P, const N: usize> Master<O, A, Q, P, N>
where
    O: Transport,
    A: Transport,
    Q: QueueStore,
    P: Panel,
{
    /// Creates the master in the Idle state, restoring any commands left in
    /// the store.
    pub fn new(config: MasterConfig, operator: O, bus: A, store: Q, panel: P) -> Self {
        let mut master = Self {
            config,
            operator: LineChannel::new(operator),
            bus: LineChannel::new(bus),
            queue: CommandQueue::new(store),
            panel,
            state: SystemState::Idle,
            completion: CompletionTracker::new(config.completion, config.poll_interval),
            next_outstanding: false,
            producer_drained: false,
        };
        match master.queue.restore() {
            Ok(count) => info!(master, "restored {} queued commands", count),
            Err(e) => error!(master, "{}, queue kept in memory", e),
        }
        master.publish_state();
        master
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn queue(&self) -> &CommandQueue<Q, N> {
        &self.queue
    }

    /// Returns true while a batch is in flight.
    pub fn sequence_running(&self) -> bool {
        self.completion.is_running()
    }

    /// Services both links, completion and flow control.
    ///
    /// Call once per main loop iteration.
    pub fn tick(&mut self, now: MicroSeconds) {
        while let Some(result) = self.operator.poll_line() {
            match result {
                Ok(line) => self.receive_operator(&line, now),
                Err(e) => error!(self, "operator: {}", e),
            }
        }
        while let Some(result) = self.bus.poll_line() {
            match result {
                Ok(line) => self.receive_feedback(&line),
                Err(e) => error!(self, "bus: {}", e),
            }
        }
        self.poll_completion(now);
        self.request_next();
    }

    /// Handles a line from the producer. A line may carry several commands
    /// joined by `NEXT`.
    pub fn receive_operator(&mut self, line: &str, now: MicroSeconds) {
        self.next_outstanding = false;
        for part in split_payload(line) {
            self.submit(part, now);
        }
    }

    /// Handles one operator command.
    ///
    /// System-control tokens act at once. Other commands are sent straight
    /// to the axes when nothing is in flight and the state allows it, and
    /// queued otherwise.
    pub fn submit(&mut self, line: &str, now: MicroSeconds) {
        let command = match classify(line) {
            Ok(command) => command,
            Err(e) => {
                error!(self, "{}: {}", e, line);
                return;
            }
        };
        let immediate = match command {
            OperatorCommand::Control(control) => {
                self.apply_control(control, now);
                return;
            }
            OperatorCommand::EndQueue => {
                self.producer_drained = true;
                return;
            }
            OperatorCommand::Coordinates(_) => {
                if self.config.queue_policy == QueuePolicy::Overwrite {
                    self.queue.clear();
                    self.check_store();
                }
                self.state == SystemState::Running
            }
            OperatorCommand::Zero | OperatorCommand::SetSpeed { .. } => {
                matches!(self.state, SystemState::Running | SystemState::Idle)
            }
        };
        self.producer_drained = false;

        if immediate && !self.completion.is_running() {
            self.dispatch(command, now);
            return;
        }
        match self.queue.push(line) {
            Ok(()) => info!(self, "queued {}", line),
            Err(QueueError::Full) => error!(self, "queue full, dropped {}", line),
            Err(e) => error!(self, "{}, dropped", e),
        }
        self.check_store();
    }

    /// Sends a command to the axes and starts tracking it.
    fn dispatch(&mut self, command: OperatorCommand, now: MicroSeconds) {
        let roster = self.config.roster;
        match command {
            OperatorCommand::Zero => {
                self.send_to_axes(AxisCommand::new(AxisSelector::Broadcast, Opcode::Zero, ""));
                self.completion.begin(BatchKind::Zero, roster, now);
            }
            OperatorCommand::SetSpeed { selector, value } => {
                self.send_to_axes(AxisCommand::new(selector, Opcode::SetSpeed, value));
            }
            OperatorCommand::Coordinates(batch) => {
                let mut expected = AxisSet::empty();
                for group in CoordinateGroups::new(batch) {
                    match group {
                        Ok(group) => {
                            self.send_to_axes(format_args!(
                                "{};{};{}",
                                group.selector,
                                Opcode::Run,
                                group.run_params()
                            ));
                            expected = expected.union(group.selector.axes_within(roster));
                        }
                        Err(ProtocolError::UnknownAxis) => error!(self, "unknown axis in {}", batch),
                        Err(e) => error!(self, "{} in {}", e, batch),
                    }
                }
                if expected.is_empty() {
                    error!(self, "no axis in {}", batch);
                } else {
                    self.completion.begin(BatchKind::Run, expected, now);
                }
            }
            OperatorCommand::Control(_) | OperatorCommand::EndQueue => {}
        }
    }

    /// Dispatches queued commands until a batch is in flight.
    fn dispatch_next(&mut self, now: MicroSeconds) {
        while self.state == SystemState::Running && !self.completion.is_running() {
            let entry = match self.queue.pop() {
                Some(entry) => entry,
                None => break,
            };
            self.check_store();
            match classify(&entry) {
                Ok(command) => self.dispatch(command, now),
                Err(e) => error!(self, "{}: {}", e, entry),
            }
        }
    }

    fn apply_control(&mut self, control: SystemControl, now: MicroSeconds) {
        let transition = on_control(self.state, control, self.completion.is_running());
        self.apply(transition, now);
    }

    fn poll_completion(&mut self, now: MicroSeconds) {
        let panel = &mut self.panel;
        if self.completion.poll(now, || panel.all_axes_idle()) {
            self.complete_batch(now);
        }
    }

    fn complete_batch(&mut self, now: MicroSeconds) {
        self.operator.send_line(DONE);
        let transition = on_batch_complete(self.state, self.queue.is_empty());
        self.apply(transition, now);
    }

    fn apply(&mut self, transition: Transition, now: MicroSeconds) {
        self.set_state(transition.state);
        match transition.effect {
            Effect::Nothing => {}
            Effect::DispatchNext => self.dispatch_next(now),
            Effect::ClearQueue => {
                self.queue.clear();
                self.check_store();
            }
            Effect::Pause => {
                if self.config.forward_pause {
                    self.send_to_axes(AxisCommand::new(AxisSelector::Broadcast, Opcode::Pause, ""));
                }
            }
            Effect::Resume => {
                self.resume_axes();
                self.dispatch_next(now);
            }
            Effect::Finish => self.resume_axes(),
        }
    }

    /// Undoes a forwarded pause.
    fn resume_axes(&mut self) {
        if self.config.forward_pause {
            self.send_to_axes(AxisCommand::new(AxisSelector::Broadcast, Opcode::Resume, ""));
        }
    }

    fn receive_feedback(&mut self, line: &str) {
        if self.config.echo_feedback {
            self.operator.send_line(line);
        }
        let feedback = match Feedback::decode(line) {
            Ok(feedback) => feedback,
            Err(_) => return,
        };
        if let FeedbackMessage::Failed(word) = feedback.message {
            error!(self, "axis {} {} failed", feedback.axis, word);
        }
        self.completion.record(&feedback);
    }

    /// Asks the producer for another command while there is room.
    fn request_next(&mut self) {
        if self.next_outstanding || self.producer_drained || self.queue.is_full() {
            return;
        }
        self.operator.send_line(NEXT);
        self.next_outstanding = true;
    }

    fn set_state(&mut self, state: SystemState) {
        if state != self.state {
            self.state = state;
            self.publish_state();
        }
    }

    fn publish_state(&mut self) {
        let mut line: heapless::String<16> = heapless::String::new();
        let _ = write!(line, "{}", self.state);
        self.operator.send_line(&line);
        self.panel.show_state(self.state);
    }

    fn send_to_axes(&mut self, command: impl Display) {
        let mut line: heapless::String<BUS_LINE_LEN> = heapless::String::new();
        if write!(line, "{}", command).is_ok() {
            self.bus.send_line(&line);
        } else {
            error!(self, "bus line too long");
        }
    }

    fn check_store(&mut self) {
        if let Some(e) = self.queue.take_store_fault() {
            error!(self, "{}, queue kept in memory", e);
        }
    }

    fn log_line(&mut self, level: Level, line: &str) {
        if level == Level::Error || self.config.verbose {
            self.operator.send_line(line);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::axis::{AxisConfig, AxisController, AxisHardware};
    use crate::master::store::test::MemoryStore;
    use crate::microseconds::test::TestClock;
    use crate::protocol::AxisId;
    use crate::transport::NullSink;
    use crate::{TestLimitSwitch, TestLine, TestStepper};
    use crate::master::{CompletionStrategy, DEFAULT_QUEUE_CAPACITY};
    use crate::transport::test::TestLink;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct TestPanel {
        idle: Arc<Mutex<bool>>,
        shown: Arc<Mutex<Vec<SystemState>>>,
    }
    impl Panel for TestPanel {
        fn all_axes_idle(&mut self) -> bool {
            *self.idle.lock().unwrap()
        }

        fn show_state(&mut self, state: SystemState) {
            self.shown.lock().unwrap().push(state);
        }
    }

    type TestMaster = Master<TestLink, TestLink, MemoryStore, TestPanel, DEFAULT_QUEUE_CAPACITY>;

    struct Rig {
        master: TestMaster,
        operator: TestLink,
        bus: TestLink,
        store: MemoryStore,
        panel: TestPanel,
        now: u32,
    }

    fn rig_with(config: MasterConfig, store: MemoryStore) -> Rig {
        let operator = TestLink::new();
        let bus = TestLink::new();
        let panel = TestPanel::default();
        let master = Master::new(config, operator.clone(), bus.clone(), store.clone(), panel.clone());
        Rig {
            master,
            operator,
            bus,
            store,
            panel,
            now: 0,
        }
    }

    fn rig() -> Rig {
        rig_with(MasterConfig::new(), MemoryStore::formatted())
    }

    impl Rig {
        /// Feeds operator lines, then ticks once.
        fn operator_says(&mut self, lines: &[&str]) {
            for line in lines {
                self.operator.feed_line(line);
            }
            self.tick(1);
        }

        /// Feeds axis feedback lines, then ticks past a completion poll.
        fn axes_say(&mut self, lines: &[&str]) {
            for line in lines {
                self.bus.feed_line(line);
            }
            self.tick(60);
        }

        fn tick(&mut self, millis: u32) {
            self.now += millis;
            self.master.tick(MicroSeconds::from_millis(self.now));
        }

        /// Operator output other than flow control.
        fn operator_output(&self) -> Vec<String> {
            self.operator.take_sent().into_iter().filter(|l| l != NEXT).collect()
        }
    }

    #[test]
    fn test_boot() {
        let rig = rig();
        assert_eq!(SystemState::Idle, rig.master.state());
        assert_eq!(vec!["STATE:IDLE".to_string()], rig.operator.take_sent());
        assert_eq!(vec![SystemState::Idle], *rig.panel.shown.lock().unwrap());
    }

    #[test]
    fn test_scenario_two_axis_batch() {
        let mut rig = rig();
        rig.operator_says(&["PLAY", "x(100),y(200)"]);
        assert_eq!(vec!["x;1;100", "y;1;200"], rig.bus.take_sent());
        assert!(rig.master.sequence_running());
        assert_eq!(SystemState::Running, rig.master.state());

        rig.axes_say(&["x;MOVING", "y;MOVING", "x;SEQUENCE COMPLETED"]);
        assert!(rig.master.sequence_running());
        rig.axes_say(&["y;SEQUENCE COMPLETED"]);
        assert!(!rig.master.sequence_running());

        let output = rig.operator_output();
        assert!(output.contains(&DONE.to_string()));
        // Nothing queued, so the machine goes idle.
        assert_eq!(Some(&"STATE:IDLE".to_string()), output.last());
        assert_eq!(SystemState::Idle, rig.master.state());
    }

    #[test]
    fn test_scenario_set_speed() {
        let mut rig = rig();
        rig.operator_says(&["SPEED;x;500"]);
        assert_eq!(vec!["x;6;500"], rig.bus.take_sent());
        assert!(!rig.master.sequence_running());

        rig.operator_says(&["SPEED;250"]);
        assert_eq!(vec!["all;6;250"], rig.bus.take_sent());
        assert!(!rig.master.sequence_running());
        assert!(rig.master.queue().is_empty());
    }

    #[test]
    fn test_scenario_queue_full() {
        let mut rig = rig();
        for i in 0..5 {
            rig.operator_says(&[&format!("x({})", i * 10)]);
        }
        rig.operator.take_sent();
        rig.operator_says(&["x(99)"]);

        assert_eq!(5, rig.master.queue().len());
        assert_eq!(vec!["ERROR: queue full, dropped x(99)"], rig.operator_output());
        assert!(rig.bus.sent().is_empty());
    }

    #[test]
    fn test_scenario_stop_while_in_flight() {
        let mut rig = rig();
        rig.operator_says(&["PLAY", "x(100)", "y(5)", "z(7)"]);
        assert_eq!(vec!["x;1;100"], rig.bus.take_sent());
        assert_eq!(2, rig.master.queue().len());

        rig.operator_says(&["IDLE"]);
        assert_eq!(SystemState::Stopping, rig.master.state());
        assert_eq!(2, rig.master.queue().len());

        rig.axes_say(&["x;SEQUENCE COMPLETED"]);
        assert_eq!(SystemState::Idle, rig.master.state());
        assert!(rig.master.queue().is_empty());
        assert!(rig.store.log().is_empty());
        assert!(rig.bus.sent().is_empty());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut rig = rig();
        rig.operator_says(&["PLAY", "x(100)", "y(5)"]);
        rig.operator.take_sent();
        rig.operator_says(&["PAUSE", "pause"]);

        assert_eq!(SystemState::Paused, rig.master.state());
        assert_eq!(1, rig.master.queue().len());
        assert_eq!(vec!["STATE:PAUSED"], rig.operator_output());
    }

    #[test]
    fn test_paused_queue_waits_for_play() {
        let mut rig = rig();
        rig.operator_says(&["PLAY", "x(100)", "PAUSE", "y(5)"]);
        rig.bus.take_sent();
        rig.axes_say(&["x;SEQUENCE COMPLETED"]);
        assert!(rig.bus.sent().is_empty());
        assert_eq!(SystemState::Paused, rig.master.state());

        rig.operator_says(&["PLAY"]);
        assert_eq!(vec!["y;1;5"], rig.bus.take_sent());
    }

    #[test]
    fn test_forward_pause() {
        let config = MasterConfig {
            forward_pause: true,
            ..MasterConfig::new()
        };
        let mut rig = rig_with(config, MemoryStore::formatted());
        rig.operator_says(&["PLAY", "x(100)", "PAUSE", "PLAY"]);
        assert_eq!(vec!["x;1;100", "all;3", "all;4"], rig.bus.take_sent());
    }

    #[test]
    fn test_stop_resumes_forwarded_pause() {
        let config = MasterConfig {
            forward_pause: true,
            ..MasterConfig::new()
        };
        let mut rig = rig_with(config, MemoryStore::formatted());
        rig.operator_says(&["PLAY", "x(100)", "PAUSE", "STOP"]);
        assert_eq!(vec!["x;1;100", "all;3", "all;4"], rig.bus.take_sent());
        assert_eq!(SystemState::Stopping, rig.master.state());

        rig.axes_say(&["x;SEQUENCE COMPLETED"]);
        assert_eq!(SystemState::Idle, rig.master.state());
    }

    /// One axis controller wired to the bus of a master rig.
    struct AxisBench {
        controller: AxisController<
            TestLink,
            TestStepper,
            TestLine,
            TestLine,
            TestLine,
            TestLimitSwitch,
            NullSink,
        >,
        link: TestLink,
        stepper: TestStepper,
        clock: TestClock,
    }
    impl AxisBench {
        fn new(id: AxisId) -> Self {
            let link = TestLink::new();
            let stepper = TestStepper::new(0);
            let hardware = AxisHardware {
                stepper: stepper.clone(),
                brake: TestLine::new(),
                enable: TestLine::new(),
                indicator: TestLine::new(),
                sensor: TestLimitSwitch::edge(stepper.clone(), 0),
            };
            Self {
                controller: AxisController::new(AxisConfig::new(id), link.clone(), hardware, NullSink),
                link,
                stepper,
                clock: TestClock::new(0, 100),
            }
        }

        /// Runs master and axis side by side for `millis`, carrying bus
        /// lines both ways.
        fn run_with(&mut self, rig: &mut Rig, millis: u32) {
            for _ in 0..millis {
                rig.tick(1);
                for line in rig.bus.take_sent() {
                    self.link.feed_line(&line);
                }
                self.clock.advance(MicroSeconds::from_millis(1));
                self.controller.poll(&self.clock);
                for line in self.link.take_sent() {
                    rig.bus.feed_line(&line);
                }
            }
        }
    }

    #[test]
    fn test_stop_after_pause_reaches_idle_with_axes() {
        let config = MasterConfig {
            forward_pause: true,
            ..MasterConfig::new()
        };
        let mut rig = rig_with(config, MemoryStore::formatted());
        let mut axis = AxisBench::new(AxisId::X);

        rig.operator_says(&["PLAY", "x(400)"]);
        axis.run_with(&mut rig, 1500);
        rig.operator_says(&["PAUSE"]);
        axis.run_with(&mut rig, 1000);
        let paused_at = axis.stepper.get_position();
        assert!(paused_at > 0 && paused_at < 400);
        axis.run_with(&mut rig, 1000);
        assert_eq!(paused_at, axis.stepper.get_position());

        rig.operator_says(&["STOP"]);
        assert_eq!(SystemState::Stopping, rig.master.state());
        axis.run_with(&mut rig, 60_000);

        assert_eq!(SystemState::Idle, rig.master.state());
        assert!(!rig.master.sequence_running());
        assert_eq!(400, axis.stepper.get_position());
        let output = rig.operator_output();
        assert!(output.contains(&DONE.to_string()));
        assert_eq!(Some(&"STATE:IDLE".to_string()), output.last());
    }

    #[test]
    fn test_queued_batches_dispatch_in_order() {
        let mut rig = rig();
        rig.operator_says(&["PLAY", "x(1,d20,2)", "ZERO", "SPEED;g;40", "y(3),all(4)"]);
        assert_eq!(vec!["x;1;1;d20;2"], rig.bus.take_sent());
        assert_eq!(3, rig.master.queue().len());

        rig.axes_say(&["x;SEQUENCE COMPLETED"]);
        assert_eq!(vec!["all;2"], rig.bus.take_sent());

        // A zero batch waits for the whole roster.
        rig.axes_say(&["x;ZERO DONE", "y;ZERO DONE", "z;ZERO DONE", "t;ZERO DONE"]);
        assert!(rig.bus.sent().is_empty());
        rig.axes_say(&["g;ZERO FAILED"]);
        // Set speed is fire and forget, so the next batch follows at once.
        assert_eq!(vec!["g;6;40", "y;1;3", "all;1;4"], rig.bus.take_sent());
        assert!(rig.master.queue().is_empty());
    }

    #[test]
    fn test_flow_control() {
        let mut rig = rig();
        rig.tick(1);
        assert_eq!(vec!["STATE:IDLE", NEXT], rig.operator.take_sent());
        rig.tick(1);
        assert!(rig.operator.take_sent().is_empty());

        rig.operator_says(&["x(1) NEXT y(2)"]);
        assert_eq!(2, rig.master.queue().len());
        assert_eq!(vec![NEXT], rig.operator.take_sent());

        rig.operator_says(&["END_QUEUE"]);
        rig.tick(1);
        assert!(rig.operator.take_sent().is_empty());

        rig.operator_says(&["z(3)"]);
        assert_eq!(vec![NEXT], rig.operator.take_sent());
        assert_eq!(3, rig.master.queue().len());
    }

    #[test]
    fn test_no_next_when_full() {
        let mut rig = rig();
        rig.operator_says(&["a(1)", "x(1)", "x(2)", "x(3)", "x(4)", "x(5)"]);
        assert!(rig.master.queue().is_full());
        rig.operator.take_sent();
        rig.operator_says(&["x(6)"]);
        assert!(!rig.operator.take_sent().contains(&NEXT.to_string()));
    }

    #[test]
    fn test_overwrite_policy() {
        let config = MasterConfig {
            queue_policy: QueuePolicy::Overwrite,
            ..MasterConfig::new()
        };
        let mut rig = rig_with(config, MemoryStore::formatted());
        rig.operator_says(&["x(1)", "x(2)", "ZERO"]);
        rig.operator_says(&["y(3)"]);
        assert_eq!(vec!["y(3)"], rig.master.queue().iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_indicator_completion() {
        let config = MasterConfig {
            completion: CompletionStrategy::IndicatorLine,
            ..MasterConfig::new()
        };
        let mut rig = rig_with(config, MemoryStore::formatted());
        rig.operator_says(&["PLAY", "x(5)", "y(6)"]);
        rig.bus.take_sent();
        rig.tick(60);
        assert!(rig.master.sequence_running());

        *rig.panel.idle.lock().unwrap() = true;
        rig.tick(60);
        assert_eq!(vec!["y;1;6"], rig.bus.take_sent());
    }

    #[test]
    fn test_restores_queue_at_boot() {
        let store = MemoryStore::formatted();
        {
            let mut rig = rig_with(MasterConfig::new(), store.clone());
            rig.operator_says(&["x(1)", "y(2)"]);
        }
        let mut rig = rig_with(MasterConfig::new(), store);
        assert_eq!(2, rig.master.queue().len());
        rig.operator_says(&["PLAY"]);
        assert_eq!(vec!["x;1;1"], rig.bus.take_sent());
    }

    #[test]
    fn test_store_failure_keeps_running() {
        let mut rig = rig_with(MasterConfig::new(), MemoryStore::new());
        assert!(rig
            .operator_output()
            .contains(&"ERROR: store unavailable, queue kept in memory".to_string()));
        rig.operator_says(&["x(1)"]);
        assert_eq!(1, rig.master.queue().len());
    }

    #[test]
    fn test_bad_lines_are_dropped() {
        let mut rig = rig();
        rig.operator.take_sent();
        rig.operator_says(&["PLAY", "hello", "q(1)", "x(1"]);
        assert!(rig.bus.sent().is_empty());
        assert!(!rig.master.sequence_running());
        let output = rig.operator_output();
        assert!(output.contains(&"ERROR: unknown command: hello".to_string()));
    }

    #[test]
    fn test_echo_feedback() {
        let config = MasterConfig {
            echo_feedback: true,
            ..MasterConfig::new()
        };
        let mut rig = rig_with(config, MemoryStore::formatted());
        rig.operator.take_sent();
        rig.axes_say(&["x;POS:1 TARGET:2"]);
        assert_eq!(vec!["x;POS:1 TARGET:2"], rig.operator_output());
    }
}
