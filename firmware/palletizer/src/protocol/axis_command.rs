use core::fmt::{self, Display, Formatter};

use winnow::ascii::digit1;
use winnow::{Parser, Result};

use super::{AxisSelector, Opcode, ProtocolError};

/// Axis-directed line: `<axisId>;<opcode>[;<params>]`.
///
/// The parameters are borrowed from the decoded line and interpreted by the
/// handler for the opcode.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct AxisCommand<'a> {
    pub selector: AxisSelector,
    pub opcode: Opcode,
    pub params: &'a str,
}
impl<'a> AxisCommand<'a> {
    pub fn new(selector: AxisSelector, opcode: Opcode, params: &'a str) -> Self {
        Self {
            selector,
            opcode,
            params,
        }
    }

    /// Decodes a line received from the bus.
    ///
    /// Surrounding whitespace is ignored and the axis identifier is
    /// case-insensitive.
    ///
    /// # Returns
    ///
    /// - `Ok(command)`: if the line is well formed.
    /// - `Err(ProtocolError::MissingSeparator)`: if the line has no `;`.
    /// - `Err(_)`: if the axis or opcode is not recognised.
    pub fn decode(line: &'a str) -> core::result::Result<Self, ProtocolError> {
        let (selector_text, rest) = line
            .trim()
            .split_once(';')
            .ok_or(ProtocolError::MissingSeparator)?;
        let selector =
            AxisSelector::parse_text(selector_text).ok_or(ProtocolError::UnknownAxis)?;
        let (opcode_text, params) = rest.split_once(';').unwrap_or((rest, ""));
        let opcode = parse_opcode
            .parse(opcode_text.trim())
            .map_err(|_| ProtocolError::UnknownOpcode)?;
        Ok(Self::new(selector, opcode, params.trim()))
    }
}

impl Display for AxisCommand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.selector, self.opcode)?;
        if !self.params.is_empty() {
            write!(f, ";{}", self.params)?;
        }
        Ok(())
    }
}

/// Parse a numeric opcode.
fn parse_opcode<'s>(input: &mut &'s str) -> Result<Opcode> {
    digit1
        .try_map(str::parse::<u8>)
        .verify_map(Opcode::from_code)
        .parse_next(input)
}
