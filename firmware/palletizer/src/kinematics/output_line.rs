/// Digital output line, such as a brake relay or a driver enable input.
pub trait OutputLine {
    /// Drives the line high (`true`) or low (`false`).
    fn set_level(&mut self, high: bool);
}

/// Electrical polarity of a line.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Polarity {
    /// The line is active when high.
    ActiveHigh,
    /// The line is active when low.
    ActiveLow,
}
impl Polarity {
    /// Returns the electrical level for a logical state.
    pub fn level(&self, active: bool) -> bool {
        match self {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        }
    }
}

/// An output that is not wired to anything.
pub struct Unconnected;
impl OutputLine for Unconnected {
    fn set_level(&mut self, _high: bool) {}
}
