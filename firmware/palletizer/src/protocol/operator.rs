use core::fmt::{self, Display, Formatter, Write};

use ufmt_macros::uDebug;
use winnow::ascii::Caseless;
use winnow::combinator::{alt, opt, terminated};
use winnow::token::{literal, take_till};
use winnow::{Parser, Result};

use super::{parse_selector, AxisSelector, ProtocolError};

/// Sent by the master to ask the producer for another command line.
pub const NEXT: &str = "NEXT";

/// Sent by the producer when it has nothing more to queue.
pub const END_QUEUE: &str = "END_QUEUE";

/// Sent by the master when a batch has completed on every axis.
pub const DONE: &str = "DONE";

/// System-control tokens.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum SystemControl {
    Idle,
    Play,
    Pause,
    Stop,
}

/// A line received from the operator, classified.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum OperatorCommand<'a> {
    Control(SystemControl),
    EndQueue,
    /// Home every axis.
    Zero,
    /// Set the maximum speed of one or every axis.
    SetSpeed {
        selector: AxisSelector,
        value: &'a str,
    },
    /// Coordinate batch, like `x(100,d50,200),y(30)`.
    Coordinates(&'a str),
}

/// Classifies an operator line.
///
/// Control and flow tokens are matched case-insensitively after trimming.
/// Coordinate batches are only checked for an opening parenthesis here; the
/// groups are parsed when the batch is dispatched.
///
/// # Returns
///
/// - `Ok(command)`: for a recognised line.
/// - `Err(ProtocolError::UnknownAxis)` or `Err(ProtocolError::InvalidNumber)`:
///   for a malformed `SPEED` line.
/// - `Err(ProtocolError::UnknownCommand)`: for anything else.
pub fn classify(line: &str) -> core::result::Result<OperatorCommand<'_>, ProtocolError> {
    let text = line.trim();
    if let Ok(control) = parse_control.parse(text) {
        return Ok(OperatorCommand::Control(control));
    }
    if text.eq_ignore_ascii_case(END_QUEUE) {
        return Ok(OperatorCommand::EndQueue);
    }
    if text.eq_ignore_ascii_case("ZERO") {
        return Ok(OperatorCommand::Zero);
    }

    let mut input = text;
    if parse_speed_prefix.parse_next(&mut input).is_ok() {
        return parse_speed(input);
    }

    if text.contains('(') {
        Ok(OperatorCommand::Coordinates(text))
    } else {
        Err(ProtocolError::UnknownCommand)
    }
}

/// Splits a producer payload that may carry several commands joined by
/// `NEXT` markers.
pub fn split_payload(line: &str) -> impl Iterator<Item = &str> {
    line.split(NEXT).map(str::trim).filter(|part| !part.is_empty())
}

/// Parses the part of a `SPEED` line after `SPEED;`.
fn parse_speed(text: &str) -> core::result::Result<OperatorCommand<'_>, ProtocolError> {
    let mut input = text;
    let selector = parse_speed_selector
        .parse_next(&mut input)
        .map_err(|_| ProtocolError::UnknownAxis)?;
    let value = input.trim();
    if value.contains(';') {
        return Err(ProtocolError::UnknownAxis);
    }
    value
        .parse::<f32>()
        .map_err(|_| ProtocolError::InvalidNumber)?;
    Ok(OperatorCommand::SetSpeed {
        selector: selector.unwrap_or(AxisSelector::Broadcast),
        value,
    })
}

fn parse_speed_prefix<'s>(input: &mut &'s str) -> Result<()> {
    literal(Caseless("SPEED;")).void().parse_next(input)
}

fn parse_speed_selector<'s>(input: &mut &'s str) -> Result<Option<AxisSelector>> {
    opt(terminated(parse_selector, literal(";"))).parse_next(input)
}

fn parse_control<'s>(input: &mut &'s str) -> Result<SystemControl> {
    alt((
        literal(Caseless("IDLE")).value(SystemControl::Idle),
        literal(Caseless("PLAY")).value(SystemControl::Play),
        literal(Caseless("PAUSE")).value(SystemControl::Pause),
        literal(Caseless("STOP")).value(SystemControl::Stop),
    ))
    .parse_next(input)
}

/// One `axisId(p,p,...)` group of a coordinate batch.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CoordinateGroup<'a> {
    pub selector: AxisSelector,
    /// Parameters as written by the operator, comma separated.
    pub params: &'a str,
}
impl<'a> CoordinateGroup<'a> {
    /// Parameters in Run payload form.
    pub fn run_params(&self) -> SemicolonParams<'a> {
        SemicolonParams(self.params)
    }
}

/// Formats comma-separated parameters with `;` separators.
pub struct SemicolonParams<'a>(pub &'a str);

impl Display for SemicolonParams<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for c in self.0.trim().chars() {
            f.write_char(if c == ',' { ';' } else { c })?;
        }
        Ok(())
    }
}

/// Iterator over the groups of a coordinate batch.
///
/// A group with an unknown axis is yielded as an error and skipped. A missing
/// parenthesis yields [ProtocolError::UnbalancedParentheses] and ends the
/// iteration, discarding the rest of the line.
pub struct CoordinateGroups<'a> {
    rest: &'a str,
}
impl<'a> CoordinateGroups<'a> {
    pub fn new(batch: &'a str) -> Self {
        Self { rest: batch }
    }
}

impl<'a> Iterator for CoordinateGroups<'a> {
    type Item = core::result::Result<CoordinateGroup<'a>, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.trim().is_empty() {
            return None;
        }
        match parse_group.parse_next(&mut self.rest) {
            Ok((id, params)) => Some(
                AxisSelector::parse_text(id)
                    .map(|selector| CoordinateGroup { selector, params })
                    .ok_or(ProtocolError::UnknownAxis),
            ),
            Err(_) => {
                self.rest = "";
                Some(Err(ProtocolError::UnbalancedParentheses))
            }
        }
    }
}

/// Parse one group and the text up to and including the following comma.
fn parse_group<'s>(input: &mut &'s str) -> Result<(&'s str, &'s str)> {
    let id = take_till(0.., '(').parse_next(input)?;
    literal("(").parse_next(input)?;
    let params = take_till(0.., ')').parse_next(input)?;
    literal(")").parse_next(input)?;
    let _ = take_till(0.., ',').parse_next(input)?;
    let _ = opt(literal(",")).parse_next(input)?;
    Ok((id, params))
}
