use core::fmt::{self, Display, Formatter};

use winnow::combinator::preceded;
use winnow::token::literal;
use winnow::{Parser, Result};

use super::{parse_steps, AxisId, ProtocolError};
use crate::Steps;

/// Status text reported by an axis.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FeedbackMessage<'a> {
    Moving,
    Delaying,
    Position { position: Steps, target: Steps },
    /// The last step of a sequence finished.
    SequenceCompleted,
    /// `<cmd> DONE`, carrying the command word.
    Done(&'a str),
    /// `<cmd> FAILED`, carrying the command word.
    Failed(&'a str),
    InvalidSpeedValue,
    /// Any other text, forwarded verbatim.
    Other(&'a str),
}
impl<'a> FeedbackMessage<'a> {
    /// Decodes the text after the axis identifier.
    pub fn decode(text: &'a str) -> Self {
        let text = text.trim();
        match text {
            "MOVING" => return FeedbackMessage::Moving,
            "DELAYING" => return FeedbackMessage::Delaying,
            "SEQUENCE COMPLETED" => return FeedbackMessage::SequenceCompleted,
            "INVALID SPEED VALUE" => return FeedbackMessage::InvalidSpeedValue,
            _ => {}
        }
        if let Ok((position, target)) = parse_position.parse(text) {
            return FeedbackMessage::Position { position, target };
        }
        if let Some(word) = command_word(text, " DONE") {
            return FeedbackMessage::Done(word);
        }
        if let Some(word) = command_word(text, " FAILED") {
            return FeedbackMessage::Failed(word);
        }
        FeedbackMessage::Other(text)
    }
}

impl Display for FeedbackMessage<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackMessage::Moving => f.write_str("MOVING"),
            FeedbackMessage::Delaying => f.write_str("DELAYING"),
            FeedbackMessage::Position { position, target } => {
                write!(f, "POS:{} TARGET:{}", position, target)
            }
            FeedbackMessage::SequenceCompleted => f.write_str("SEQUENCE COMPLETED"),
            FeedbackMessage::Done(word) => write!(f, "{} DONE", word),
            FeedbackMessage::Failed(word) => write!(f, "{} FAILED", word),
            FeedbackMessage::InvalidSpeedValue => f.write_str("INVALID SPEED VALUE"),
            FeedbackMessage::Other(text) => f.write_str(text),
        }
    }
}

/// Feedback line: `<axisId>;<text>`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Feedback<'a> {
    pub axis: AxisId,
    pub message: FeedbackMessage<'a>,
}
impl<'a> Feedback<'a> {
    pub fn new(axis: AxisId, message: FeedbackMessage<'a>) -> Self {
        Self { axis, message }
    }

    /// Decodes a feedback line received from the bus.
    pub fn decode(line: &'a str) -> core::result::Result<Self, ProtocolError> {
        let (id, text) = line
            .trim()
            .split_once(';')
            .ok_or(ProtocolError::MissingSeparator)?;
        let mut chars = id.trim().chars();
        let axis = match (chars.next(), chars.next()) {
            (Some(c), None) => AxisId::from_char(c),
            _ => None,
        }
        .ok_or(ProtocolError::UnknownAxis)?;
        Ok(Self::new(axis, FeedbackMessage::decode(text)))
    }

    /// Returns true if this feedback ends an axis's part in a batch started
    /// by the command `word` (`RUN` or `ZERO`).
    pub fn is_terminal_for(&self, word: &str) -> bool {
        match self.message {
            FeedbackMessage::SequenceCompleted => word == "RUN",
            FeedbackMessage::Done(done) | FeedbackMessage::Failed(done) => done == word,
            _ => false,
        }
    }
}

impl Display for Feedback<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.axis, self.message)
    }
}

/// Returns the upper-case command word before `suffix`.
fn command_word<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let word = text.strip_suffix(suffix)?;
    let valid = !word.is_empty() && word.bytes().all(|b| b.is_ascii_uppercase());
    valid.then_some(word)
}

fn parse_position<'s>(input: &mut &'s str) -> Result<(Steps, Steps)> {
    let position = preceded(literal("POS:"), parse_steps).parse_next(input)?;
    let target = preceded(literal(" TARGET:"), parse_steps).parse_next(input)?;
    Ok((position, target))
}
