use crate::protocol::AxisId;
use crate::{MicroSeconds, Polarity};

/// Number of motion steps an axis can hold.
pub const MOTION_QUEUE_CAPACITY: usize = 5;

/// Timing and polarity of a guarded output line.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LineConfig {
    pub polarity: Polarity,
    /// Dwell after releasing before motion may start.
    pub release_delay: MicroSeconds,
    /// Wait after motion before the line is engaged.
    pub engage_delay: MicroSeconds,
}

/// Speeds used while homing.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct HomingConfig {
    /// Steps per second.
    pub speed: f32,
    /// Steps per second squared.
    pub acceleration: f32,
    /// Furthest the axis travels while looking for the sensor edge.
    pub step_budget: i32,
}

/// When position reports are sent.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ReportConfig {
    /// Report at least this often.
    pub interval: MicroSeconds,
    /// Report whenever the axis moved more than this many steps.
    pub distance: u32,
    /// A stationary axis is only reported if it moved more than this.
    pub min_distance: u32,
}

/// Configuration of an axis controller.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct AxisConfig {
    pub id: AxisId,
    /// The brake line is active when the brake is engaged.
    pub brake: LineConfig,
    /// The enable line is active when the driver is energised.
    pub enable: LineConfig,
    /// The indicator line is active while the axis is busy.
    pub indicator: Polarity,
    /// Maximum speed at power up, in steps per second.
    pub default_speed: f32,
    /// Acceleration as a multiple of the maximum speed.
    pub speed_ratio: f32,
    pub homing: HomingConfig,
    pub report: ReportConfig,
    /// Send `INFO` lines to the debug sink.
    pub verbose: bool,
}
impl AxisConfig {
    /// Default configuration for an axis.
    pub const fn new(id: AxisId) -> Self {
        Self {
            id,
            brake: LineConfig {
                polarity: Polarity::ActiveHigh,
                release_delay: MicroSeconds::from_millis(500),
                engage_delay: MicroSeconds::from_millis(1500),
            },
            enable: LineConfig {
                polarity: Polarity::ActiveLow,
                release_delay: MicroSeconds::from_millis(500),
                engage_delay: MicroSeconds::from_millis(1500),
            },
            indicator: Polarity::ActiveLow,
            default_speed: 200.0,
            speed_ratio: 0.6,
            homing: HomingConfig {
                speed: 200.0,
                acceleration: 100.0,
                step_budget: 20_000,
            },
            report: ReportConfig {
                interval: MicroSeconds::from_millis(2000),
                distance: 50,
                min_distance: 10,
            },
            verbose: false,
        }
    }

    /// Acceleration to pair with a maximum speed.
    pub fn acceleration_for(&self, speed: f32) -> f32 {
        speed * self.speed_ratio
    }
}
