//! Wire text exchanged between the operator, the master and the axes.
//!
//! All lines are ASCII and newline-terminated. Decoding is lenient: callers
//! drop lines that fail to decode rather than treating them as faults.

mod axis_command;
mod axis_id;
mod feedback;
mod opcode;
mod operator;
mod run_params;

use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

pub use axis_command::AxisCommand;
pub use axis_id::{parse_selector, AxisId, AxisSelector, AxisSet};
pub use feedback::{Feedback, FeedbackMessage};
pub use opcode::Opcode;
pub use operator::{
    classify, split_payload, CoordinateGroup, CoordinateGroups, OperatorCommand,
    SemicolonParams, SystemControl, DONE, END_QUEUE, NEXT,
};
pub use run_params::{parse_run_token, parse_steps, run_tokens, RunParams, RunToken};

#[cfg(test)]
pub use axis_id::test::{axis_id, axis_selector};
#[cfg(test)]
pub use run_params::test::run_token;

/// Longest line carried on the axis bus, excluding the newline.
pub const BUS_LINE_LEN: usize = 96;

/// Longest line accepted from the operator, excluding the newline.
pub const OPERATOR_LINE_LEN: usize = 192;

/// Reasons a line or token could not be decoded.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum ProtocolError {
    /// The line lacks the `;` separator.
    MissingSeparator,
    /// The axis identifier is not one of `x`, `y`, `z`, `t`, `g` or `all`.
    UnknownAxis,
    /// The opcode is not a known number.
    UnknownOpcode,
    /// A token that should be a number is not.
    InvalidNumber,
    /// A coordinate group is missing a parenthesis.
    UnbalancedParentheses,
    /// The operator line is not a recognised command.
    UnknownCommand,
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MissingSeparator => write!(f, "missing separator"),
            ProtocolError::UnknownAxis => write!(f, "unknown axis"),
            ProtocolError::UnknownOpcode => write!(f, "unknown opcode"),
            ProtocolError::InvalidNumber => write!(f, "invalid number"),
            ProtocolError::UnbalancedParentheses => write!(f, "unbalanced parentheses"),
            ProtocolError::UnknownCommand => write!(f, "unknown command"),
        }
    }
}
