use core::fmt::{self, Display, Formatter};

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, preceded};
use winnow::token::one_of;
use winnow::{Parser, Result};

use super::ProtocolError;
use crate::Steps;

/// One token of a Run payload.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RunToken {
    /// Move to an absolute position, like `300` or `-25`.
    MoveTo(Steps),
    /// Pause for a number of milliseconds, like `d200`.
    Delay(u32),
}

impl Display for RunToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RunToken::MoveTo(target) => write!(f, "{}", target),
            RunToken::Delay(ms) => write!(f, "d{}", ms),
        }
    }
}

/// Parses a single Run token, ignoring surrounding whitespace.
pub fn parse_run_token(text: &str) -> core::result::Result<RunToken, ProtocolError> {
    parse_run_token_
        .parse(text.trim())
        .map_err(|_| ProtocolError::InvalidNumber)
}

/// Splits a Run payload into tokens.
///
/// Tokens are separated by `;`. Empty tokens are skipped; tokens that fail to
/// parse are yielded as errors so the caller can drop and report them.
pub fn run_tokens(
    params: &str,
) -> impl Iterator<Item = core::result::Result<RunToken, ProtocolError>> + '_ {
    params
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_run_token)
}

/// Formats a list of tokens as a Run payload.
pub struct RunParams<'a>(pub &'a [RunToken]);

impl Display for RunParams<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

fn parse_run_token_<'s>(input: &mut &'s str) -> Result<RunToken> {
    alt((
        preceded(one_of(['d', 'D']), digit1.try_map(str::parse::<u32>)).map(RunToken::Delay),
        parse_steps.map(RunToken::MoveTo),
    ))
    .parse_next(input)
}

/// Parse a signed step count.
pub fn parse_steps<'s>(input: &mut &'s str) -> Result<Steps> {
    (opt(one_of(['+', '-'])), digit1)
        .take()
        .try_map(str::parse::<i32>)
        .map(Steps::new)
        .parse_next(input)
}
