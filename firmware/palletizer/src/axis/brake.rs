use super::config::LineConfig;
use crate::{MicroSeconds, OutputLine};

/// Output line guarded by release and engage timers.
///
/// "Released" is the state in which the axis may move: brake off, or driver
/// energised. The line starts engaged.
struct GuardedLine<P> {
    line: P,
    config: LineConfig,
    /// Logical level of the line while released.
    active_when_released: bool,
    released: bool,
    release_started: Option<MicroSeconds>,
    engage_started: Option<MicroSeconds>,
}
impl<P: OutputLine> GuardedLine<P> {
    fn new(line: P, config: LineConfig, active_when_released: bool) -> Self {
        let mut guarded = Self {
            line,
            config,
            active_when_released,
            released: true,
            release_started: None,
            engage_started: None,
        };
        guarded.write(false);
        guarded
    }

    fn write(&mut self, released: bool) {
        let active = released == self.active_when_released;
        self.line.set_level(self.config.polarity.level(active));
        self.released = released;
    }

    fn request_release(&mut self, now: MicroSeconds) {
        self.engage_started = None;
        if self.released {
            return;
        }
        self.write(true);
        if self.config.release_delay > MicroSeconds::zero() {
            self.release_started = Some(now);
        }
    }

    fn request_engage(&mut self, now: MicroSeconds) {
        if !self.released || self.engage_started.is_some() {
            return;
        }
        self.release_started = None;
        if self.config.engage_delay > MicroSeconds::zero() {
            self.engage_started = Some(now);
        } else {
            self.write(false);
        }
    }

    fn engage_now(&mut self) {
        self.release_started = None;
        self.engage_started = None;
        self.write(false);
    }

    /// Expires timers. The deferred engage only happens if `may_engage`.
    fn tick(&mut self, now: MicroSeconds, may_engage: bool) {
        if let Some(start) = self.release_started {
            if now.has_elapsed(start, self.config.release_delay) {
                self.release_started = None;
            }
        }
        if let Some(start) = self.engage_started {
            if may_engage && now.has_elapsed(start, self.config.engage_delay) {
                self.engage_started = None;
                self.write(false);
            }
        }
    }

    fn is_settled_released(&self) -> bool {
        self.released && self.release_started.is_none() && self.engage_started.is_none()
    }

    fn is_engage_pending(&self) -> bool {
        self.engage_started.is_some()
    }
}

/// Coordinates the brake and driver-enable lines of an axis.
///
/// Releasing sets both outputs at once and starts their release timers;
/// motion must wait for [BrakeEnable::ready_to_move]. Engaging is deferred by
/// the engage timers, and the brake never engages while the enable line
/// still has an engage pending.
///
/// # Type Parameters
///
/// - `B`: brake line
/// - `E`: enable line
pub struct BrakeEnable<B, E> {
    brake: GuardedLine<B>,
    enable: GuardedLine<E>,
}
impl<B: OutputLine, E: OutputLine> BrakeEnable<B, E> {
    /// Creates the coordinator and drives both lines to engaged.
    pub fn new(brake: B, brake_config: LineConfig, enable: E, enable_config: LineConfig) -> Self {
        Self {
            brake: GuardedLine::new(brake, brake_config, false),
            enable: GuardedLine::new(enable, enable_config, true),
        }
    }

    /// Releases the brake and energises the driver.
    ///
    /// Does nothing to a line that is already released, other than
    /// cancelling a pending engage.
    pub fn request_release(&mut self, now: MicroSeconds) {
        self.brake.request_release(now);
        self.enable.request_release(now);
    }

    /// Starts the engage timers.
    pub fn request_engage(&mut self, now: MicroSeconds) {
        self.enable.request_engage(now);
        self.brake.request_engage(now);
    }

    /// Engages the brake and de-energises the driver immediately.
    pub fn engage_now(&mut self) {
        self.brake.engage_now();
        self.enable.engage_now();
    }

    /// Clears expired timers and performs deferred engages.
    pub fn tick(&mut self, now: MicroSeconds) {
        self.enable.tick(now, true);
        let may_engage = !self.enable.is_engage_pending();
        self.brake.tick(now, may_engage);
    }

    /// Returns true once both lines are released and their dwell has passed.
    pub fn ready_to_move(&self) -> bool {
        self.brake.is_settled_released() && self.enable.is_settled_released()
    }

    /// Returns true if the brake is mechanically engaged.
    pub fn is_brake_engaged(&self) -> bool {
        !self.brake.released
    }

    /// Returns true if both lines are engaged with no timer running.
    pub fn is_engaged(&self) -> bool {
        !self.brake.released
            && !self.enable.released
            && self.brake.release_started.is_none()
            && self.enable.release_started.is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Polarity, TestLine};

    const BRAKE: LineConfig = LineConfig {
        polarity: Polarity::ActiveHigh,
        release_delay: MicroSeconds::from_millis(500),
        engage_delay: MicroSeconds::from_millis(1500),
    };
    const ENABLE: LineConfig = LineConfig {
        polarity: Polarity::ActiveLow,
        release_delay: MicroSeconds::from_millis(300),
        engage_delay: MicroSeconds::from_millis(2000),
    };

    fn ms(millis: u32) -> MicroSeconds {
        MicroSeconds::from_millis(millis)
    }

    /// Returns the coordinator plus handles on the brake and enable lines.
    fn coordinator() -> (BrakeEnable<TestLine, TestLine>, TestLine, TestLine) {
        let brake = TestLine::new();
        let enable = TestLine::new();
        let lines = BrakeEnable::new(brake.clone(), BRAKE, enable.clone(), ENABLE);
        (lines, brake, enable)
    }

    #[test]
    fn test_starts_engaged() {
        let (lines, brake, enable) = coordinator();
        // Brake is active high and engaged; enable is active low and inactive.
        assert!(brake.level());
        assert!(enable.level());
        assert!(lines.is_engaged());
        assert!(!lines.ready_to_move());
    }

    #[test]
    fn test_release_dwell() {
        let (mut lines, brake, enable) = coordinator();
        lines.request_release(ms(1000));
        assert!(!brake.level());
        assert!(!enable.level());
        assert!(!lines.is_brake_engaged());

        lines.tick(ms(1499));
        assert!(!lines.ready_to_move());
        lines.tick(ms(1500));
        assert!(lines.ready_to_move());
    }

    #[test]
    fn test_release_is_idempotent() {
        let (mut lines, brake, _) = coordinator();
        lines.request_release(ms(0));
        let writes = brake.writes();
        lines.tick(ms(600));
        lines.request_release(ms(600));
        assert_eq!(writes, brake.writes());
        assert!(lines.ready_to_move());
    }

    #[test]
    fn test_engage_waits_for_enable() {
        let (mut lines, brake, enable) = coordinator();
        lines.request_release(ms(0));
        lines.tick(ms(600));
        lines.request_engage(ms(1000));
        assert!(!lines.ready_to_move());

        // The brake timer expires first but the enable line is still pending.
        lines.tick(ms(2500));
        assert!(!brake.level());
        assert!(!enable.level());

        lines.tick(ms(3000));
        assert!(brake.level());
        assert!(enable.level());
        assert!(lines.is_engaged());
    }

    #[test]
    fn test_release_cancels_pending_engage() {
        let (mut lines, brake, _) = coordinator();
        lines.request_release(ms(0));
        lines.tick(ms(600));
        lines.request_engage(ms(1000));
        lines.request_release(ms(1200));
        assert!(lines.ready_to_move());
        lines.tick(ms(10_000));
        assert!(!brake.level());
        assert!(!lines.is_brake_engaged());
    }

    #[test]
    fn test_engage_now() {
        let (mut lines, brake, enable) = coordinator();
        lines.request_release(ms(0));
        lines.engage_now();
        assert!(brake.level());
        assert!(enable.level());
        assert!(lines.is_engaged());
        lines.tick(ms(5000));
        assert!(lines.is_engaged());
    }

    #[test]
    fn test_zero_delays() {
        let zero = LineConfig {
            polarity: Polarity::ActiveHigh,
            release_delay: MicroSeconds::zero(),
            engage_delay: MicroSeconds::zero(),
        };
        let mut lines = BrakeEnable::new(TestLine::new(), zero, TestLine::new(), zero);
        lines.request_release(ms(0));
        assert!(lines.ready_to_move());
        lines.request_engage(ms(0));
        assert!(lines.is_engaged());
    }

    #[test]
    fn test_without_brake() {
        let enable = TestLine::new();
        let mut lines = BrakeEnable::new(crate::Unconnected, BRAKE, enable.clone(), ENABLE);
        lines.request_release(ms(0));
        lines.tick(ms(500));
        assert!(lines.ready_to_move());
        assert!(!enable.level());
    }
}
