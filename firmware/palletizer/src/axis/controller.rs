use core::fmt::Write;

use super::brake::BrakeEnable;
use super::config::{AxisConfig, MOTION_QUEUE_CAPACITY};
use super::drive::Drive;
use super::homing::{home, HomingError};
use super::motion_queue::MotionStep;
use super::sequencer::{MotorState, SequenceEvent, Sequencer};
use crate::logging::Level;
use crate::protocol::{
    run_tokens, AxisCommand, AxisId, Feedback, FeedbackMessage, Opcode, BUS_LINE_LEN,
};
use crate::transport::{LineChannel, LineSink, Transport};
use crate::{Clock, LimitSwitch, MicroSeconds, OutputLine, RampedStepper, Stepper, Steps};

/// Hardware of one axis.
///
/// # Type Parameters
///
/// - `S`: stepper driver
/// - `B`: brake line
/// - `E`: driver enable line
/// - `I`: shared indicator line
/// - `L`: homing sensor
pub struct AxisHardware<S, B, E, I, L> {
    pub stepper: S,
    pub brake: B,
    pub enable: E,
    pub indicator: I,
    pub sensor: L,
}

/// Controller of a single axis.
///
/// Receives axis-directed lines from the bus, runs the motion sequencer and
/// reports back on the bus. Lines addressed to other axes are ignored, as
/// are lines that fail to decode.
///
/// # Type Parameters
///
/// - `T`: bus transport
/// - `D`: sink for log lines
pub struct AxisController<T, S, B, E, I, L, D> {
    config: AxisConfig,
    bus: LineChannel<T, BUS_LINE_LEN>,
    drive: Drive<S, B, E>,
    sequencer: Sequencer<MOTION_QUEUE_CAPACITY>,
    indicator: I,
    sensor: L,
    debug: D,
    /// Time and position of the last position report.
    last_report: Option<(MicroSeconds, Steps)>,
}
impl<T, S, B, E, I, L, D> AxisController<T, S, B, E, I, L, D>
where
    T: Transport,
    S: Stepper,
    B: OutputLine,
    E: OutputLine,
    I: OutputLine,
    L: LimitSwitch,
    D: LineSink,
{
    /// Creates a controller with the axis clamped and the indicator idle.
    pub fn new(config: AxisConfig, bus: T, hardware: AxisHardware<S, B, E, I, L>, debug: D) -> Self {
        let motor = RampedStepper::new(
            hardware.stepper,
            config.default_speed,
            config.acceleration_for(config.default_speed),
        );
        let lines = BrakeEnable::new(hardware.brake, config.brake, hardware.enable, config.enable);
        let mut controller = Self {
            config,
            bus: LineChannel::new(bus),
            drive: Drive::new(motor, lines),
            sequencer: Sequencer::new(),
            indicator: hardware.indicator,
            sensor: hardware.sensor,
            debug,
            last_report: None,
        };
        controller.set_busy(false);
        info!(controller, "axis {} ready", controller.config.id);
        controller
    }

    pub fn id(&self) -> AxisId {
        self.config.id
    }

    pub fn motor_state(&self) -> MotorState {
        self.sequencer.state()
    }

    pub fn position(&self) -> Steps {
        self.drive.motor.position()
    }

    /// Handles received lines, then advances motion.
    ///
    /// Call once per control loop iteration.
    pub fn poll<C: Clock>(&mut self, clock: &C) {
        while let Some(result) = self.bus.poll_line() {
            match result {
                Ok(line) => self.handle_line(&line, clock),
                Err(e) => error!(self, "bus: {}", e),
            }
        }
        self.tick(clock.now());
    }

    /// Handles a line received from the bus.
    pub fn handle_line<C: Clock>(&mut self, line: &str, clock: &C) {
        let command = match AxisCommand::decode(line) {
            Ok(command) => command,
            Err(_) => return,
        };
        if !command.selector.matches(self.config.id) {
            return;
        }

        let now = clock.now();
        match command.opcode {
            Opcode::None => {}
            Opcode::Run => self.run_sequence(command.params, now),
            Opcode::Zero => {
                self.sequencer.reset(&mut self.drive);
                self.zero(Opcode::Zero, clock);
            }
            Opcode::Pause => {
                self.sequencer.pause(&mut self.drive, now);
                self.report(FeedbackMessage::Done(Opcode::Pause.feedback_word()));
            }
            Opcode::Resume => {
                if let Some(event) = self.sequencer.resume(&mut self.drive, now) {
                    self.report_event(event);
                }
                self.report(FeedbackMessage::Done(Opcode::Resume.feedback_word()));
            }
            Opcode::Reset => {
                self.sequencer.reset(&mut self.drive);
                self.set_busy(false);
                self.zero(Opcode::Reset, clock);
            }
            Opcode::SetSpeed => self.set_speed(command.params),
        }
    }

    /// Advances motion and sends any due reports.
    pub fn tick(&mut self, now: MicroSeconds) {
        if let Some(event) = self.sequencer.tick(&mut self.drive, now) {
            self.report_event(event);
        }
        self.report_position(now);
    }

    fn run_sequence(&mut self, params: &str, now: MicroSeconds) {
        let speed = self.drive.motor.max_speed();
        let mut rejected = 0usize;
        let steps = run_tokens(params).filter_map(|token| match token {
            Ok(token) => Some(MotionStep::from_token(token, speed)),
            Err(_) => {
                rejected += 1;
                None
            }
        });
        let outcome = self.sequencer.load(steps, &mut self.drive, now);
        if rejected > 0 {
            error!(self, "dropped {} invalid tokens", rejected);
        }
        if outcome.dropped > 0 {
            error!(self, "queue full, dropped {} steps", outcome.dropped);
        }
        info!(self, "loaded {} steps", outcome.loaded);
        self.set_busy(self.sequencer.is_busy());
        if let Some(event) = outcome.event {
            self.report_event(event);
        }
    }

    fn zero<C: Clock>(&mut self, opcode: Opcode, clock: &C) {
        self.set_busy(true);
        let result = home(&mut self.drive, &self.sensor, clock, &self.config.homing);
        self.set_busy(false);
        let word = opcode.feedback_word();
        match result {
            Ok(overshoot) => {
                info!(self, "homed, overshoot {}", overshoot);
                self.report(FeedbackMessage::Done(word));
            }
            Err(e) => {
                self.log_homing_error(e);
                self.report(FeedbackMessage::Failed(word));
            }
        }
    }

    fn set_speed(&mut self, params: &str) {
        match params.trim().parse::<f32>() {
            Ok(speed) if speed > 0.0 => {
                self.drive.motor.set_max_speed(speed);
                self.drive
                    .motor
                    .set_acceleration(self.config.acceleration_for(speed));
                self.report(FeedbackMessage::Done(Opcode::SetSpeed.feedback_word()));
            }
            _ => self.report(FeedbackMessage::InvalidSpeedValue),
        }
    }

    fn report_event(&mut self, event: SequenceEvent) {
        match event {
            SequenceEvent::Moving => self.report(FeedbackMessage::Moving),
            SequenceEvent::Delaying => self.report(FeedbackMessage::Delaying),
            SequenceEvent::Completed => {
                self.set_busy(false);
                self.report(FeedbackMessage::SequenceCompleted);
            }
        }
    }

    /// Sends a position report when enough time has passed or the axis has
    /// moved far enough.
    fn report_position(&mut self, now: MicroSeconds) {
        let position = self.drive.motor.position();
        let (stale, moved) = match self.last_report {
            Some((time, last)) => (
                now.has_elapsed(time, self.config.report.interval),
                last.distance_to(position).unsigned_abs(),
            ),
            None => (true, u32::MAX),
        };
        let running = self.drive.motor.is_running();
        let due = stale || moved > self.config.report.distance;
        if due && (running || moved > self.config.report.min_distance) {
            self.report(FeedbackMessage::Position {
                position,
                target: self.drive.motor.target(),
            });
            self.last_report = Some((now, position));
        }
    }

    fn report(&mut self, message: FeedbackMessage) {
        let mut line: heapless::String<BUS_LINE_LEN> = heapless::String::new();
        if write!(line, "{}", Feedback::new(self.config.id, message)).is_ok() {
            self.bus.send_line(&line);
        }
    }

    fn set_busy(&mut self, busy: bool) {
        self.indicator.set_level(self.config.indicator.level(busy));
    }

    fn log_homing_error(&mut self, e: HomingError) {
        error!(self, "{}", e);
    }

    fn log_line(&mut self, level: Level, line: &str) {
        if level == Level::Error || self.config.verbose {
            self.debug.send_line(line);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::microseconds::test::TestClock;
    use crate::transport::test::TestLink;
    use crate::transport::NullSink;
    use crate::{LimitSwitchState, TestLimitSwitch, TestLine, TestStepper};

    type TestController =
        AxisController<TestLink, TestStepper, TestLine, TestLine, TestLine, TestLimitSwitch, NullSink>;

    struct Rig {
        controller: TestController,
        bus: TestLink,
        stepper: TestStepper,
        indicator: TestLine,
        clock: TestClock,
    }

    fn rig(id: AxisId) -> Rig {
        let bus = TestLink::new();
        let stepper = TestStepper::new(500);
        let indicator = TestLine::new();
        let hardware = AxisHardware {
            stepper: stepper.clone(),
            brake: TestLine::new(),
            enable: TestLine::new(),
            indicator: indicator.clone(),
            sensor: TestLimitSwitch::edge(stepper.clone(), 0),
        };
        let controller = AxisController::new(AxisConfig::new(id), bus.clone(), hardware, NullSink);
        Rig {
            controller,
            bus,
            stepper,
            indicator,
            clock: TestClock::new(0, 100),
        }
    }

    impl Rig {
        /// Polls every millisecond for `millis`, returning non-position
        /// feedback.
        fn run(&mut self, millis: u32) -> Vec<String> {
            for _ in 0..millis {
                self.clock.advance(MicroSeconds::from_millis(1));
                self.controller.poll(&self.clock);
            }
            self.bus
                .take_sent()
                .into_iter()
                .filter(|line| !line.contains("POS:"))
                .collect()
        }

        /// Indicator line shows busy. It is active low.
        fn busy(&self) -> bool {
            !self.indicator.level()
        }
    }

    #[test]
    fn test_scenario_delay_then_move() {
        let mut rig = rig(AxisId::X);
        rig.bus.feed_line("x;1;d200;300");
        let feedback = rig.run(20_000);
        assert_eq!(vec!["x;DELAYING", "x;MOVING", "x;SEQUENCE COMPLETED"], feedback);
        assert_eq!(Steps::new(300), rig.controller.position());
        assert_eq!(800, rig.stepper.get_position());
        assert!(!rig.busy());
        assert!(rig.run(5000).is_empty());
    }

    #[test]
    fn test_ignores_other_axes_and_garbage() {
        let mut rig = rig(AxisId::Y);
        rig.bus.feed_line("x;1;100");
        rig.bus.feed_line("hello");
        rig.bus.feed_line("y;9;100");
        assert!(rig.run(1000).is_empty());
        assert_eq!(MotorState::Idle, rig.controller.motor_state());
    }

    #[test]
    fn test_broadcast_run() {
        let mut rig = rig(AxisId::G);
        rig.bus.feed_line("ALL;1;-20");
        let feedback = rig.run(10_000);
        assert_eq!(vec!["g;MOVING", "g;SEQUENCE COMPLETED"], feedback);
        assert_eq!(Steps::new(-20), rig.controller.position());
    }

    #[test]
    fn test_busy_while_running() {
        let mut rig = rig(AxisId::X);
        rig.bus.feed_line("x;1;400");
        rig.run(100);
        assert!(rig.busy());
        rig.run(20_000);
        assert!(!rig.busy());
    }

    #[test]
    fn test_empty_run_completes() {
        let mut rig = rig(AxisId::X);
        rig.bus.feed_line("x;1");
        assert_eq!(vec!["x;SEQUENCE COMPLETED"], rig.run(10));
    }

    #[test]
    fn test_zero() {
        let mut rig = rig(AxisId::T);
        rig.bus.feed_line("t;2");
        assert_eq!(vec!["t;ZERO DONE"], rig.run(1));
        assert_eq!(0, rig.stepper.get_position());
        assert_eq!(Steps::zero(), rig.controller.position());
        assert!(!rig.busy());
    }

    #[test]
    fn test_zero_failure() {
        let bus = TestLink::new();
        let hardware = AxisHardware {
            stepper: TestStepper::new(0),
            brake: TestLine::new(),
            enable: TestLine::new(),
            indicator: TestLine::new(),
            sensor: TestLimitSwitch::new(LimitSwitchState::NotAtLimit),
        };
        let mut config = AxisConfig::new(AxisId::Z);
        config.homing.step_budget = 10;
        let mut controller: TestController = AxisController::new(config, bus.clone(), hardware, NullSink);
        controller.handle_line("z;2", &TestClock::new(0, 1000));
        assert!(bus.sent().contains(&"z;ZERO FAILED".to_string()));
    }

    #[test]
    fn test_set_speed() {
        let mut rig = rig(AxisId::X);
        rig.bus.feed_line("x;6;500");
        rig.bus.feed_line("x;6;-1");
        rig.bus.feed_line("x;6;abc");
        assert_eq!(
            vec!["x;SPEED DONE", "x;INVALID SPEED VALUE", "x;INVALID SPEED VALUE"],
            rig.run(1)
        );
        assert_eq!(500.0, rig.controller.drive.motor.max_speed());
        assert_eq!(300.0, rig.controller.drive.motor.acceleration());
    }

    #[test]
    fn test_pause_resume() {
        let mut rig = rig(AxisId::X);
        rig.bus.feed_line("x;1;600");
        rig.run(1500);
        rig.bus.feed_line("x;3");
        assert_eq!(vec!["x;PAUSE DONE"], rig.run(1));
        let paused_at = rig.stepper.get_position();
        rig.run(2000);
        assert_eq!(paused_at, rig.stepper.get_position());
        assert_eq!(MotorState::Paused, rig.controller.motor_state());

        rig.bus.feed_line("x;4");
        let feedback = rig.run(30_000);
        assert_eq!(vec!["x;MOVING", "x;RESUME DONE", "x;SEQUENCE COMPLETED"], feedback);
        assert_eq!(Steps::new(600), rig.controller.position());
    }

    #[test]
    fn test_reset_homes() {
        let mut rig = rig(AxisId::X);
        rig.bus.feed_line("x;1;5000");
        rig.run(1500);
        rig.bus.feed_line("x;5");
        let feedback = rig.run(100);
        assert_eq!(vec!["x;RESET DONE"], feedback);
        assert_eq!(0, rig.stepper.get_position());
        assert_eq!(MotorState::Idle, rig.controller.motor_state());
    }

    #[test]
    fn test_position_reports_are_rate_limited() {
        let mut rig = rig(AxisId::X);
        rig.run(10);
        // One report at start up, then silence while stationary.
        rig.bus.take_sent();
        rig.run(10);
        let reports: Vec<String> = rig.bus.take_sent();
        assert!(reports.is_empty());

        rig.bus.feed_line("x;1;700");
        let mut count = 0;
        for _ in 0..20_000 {
            rig.clock.advance(MicroSeconds::from_millis(1));
            rig.controller.poll(&rig.clock);
            count += rig.bus.take_sent().iter().filter(|l| l.starts_with("x;POS:")).count();
        }
        // 700 steps at more than 50 steps apart, plus the time-gated ones.
        assert!(count >= 2);
        assert!(count <= 700 / 50 + 20);
    }
}
