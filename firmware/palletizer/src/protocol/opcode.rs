use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

/// Numeric command code of an axis-directed line.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Opcode {
    None,
    /// Load and start a motion sequence.
    Run,
    /// Home the axis.
    Zero,
    Pause,
    Resume,
    /// Abort, then home.
    Reset,
    /// Change the maximum speed.
    SetSpeed,
}
impl Opcode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Opcode::None),
            1 => Some(Opcode::Run),
            2 => Some(Opcode::Zero),
            3 => Some(Opcode::Pause),
            4 => Some(Opcode::Resume),
            5 => Some(Opcode::Reset),
            6 => Some(Opcode::SetSpeed),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Opcode::None => 0,
            Opcode::Run => 1,
            Opcode::Zero => 2,
            Opcode::Pause => 3,
            Opcode::Resume => 4,
            Opcode::Reset => 5,
            Opcode::SetSpeed => 6,
        }
    }

    /// Command word used in `<cmd> DONE` feedback.
    pub fn feedback_word(&self) -> &'static str {
        match self {
            Opcode::None => "NONE",
            Opcode::Run => "RUN",
            Opcode::Zero => "ZERO",
            Opcode::Pause => "PAUSE",
            Opcode::Resume => "RESUME",
            Opcode::Reset => "RESET",
            Opcode::SetSpeed => "SPEED",
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
