use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;
use winnow::ascii::Caseless;
use winnow::combinator::alt;
use winnow::token::{any, literal};
use winnow::{Parser, Result};

/// Identity of a physical axis.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum AxisId {
    X,
    Y,
    Z,
    /// Turntable.
    T,
    /// Gripper.
    G,
}
impl AxisId {
    /// Every axis of the machine, in bus order.
    pub const ALL: [AxisId; 5] = [AxisId::X, AxisId::Y, AxisId::Z, AxisId::T, AxisId::G];

    /// Looks up an axis by its wire character, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(AxisId::X),
            'y' => Some(AxisId::Y),
            'z' => Some(AxisId::Z),
            't' => Some(AxisId::T),
            'g' => Some(AxisId::G),
            _ => None,
        }
    }

    /// Lowercase wire character of the axis.
    pub fn as_char(&self) -> char {
        match self {
            AxisId::X => 'x',
            AxisId::Y => 'y',
            AxisId::Z => 'z',
            AxisId::T => 't',
            AxisId::G => 'g',
        }
    }

    fn bit(&self) -> u8 {
        match self {
            AxisId::X => 1 << 0,
            AxisId::Y => 1 << 1,
            AxisId::Z => 1 << 2,
            AxisId::T => 1 << 3,
            AxisId::G => 1 << 4,
        }
    }
}

impl Display for AxisId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Addressee of an axis-directed line.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum AxisSelector {
    /// A single axis.
    One(AxisId),
    /// Every axis on the bus (`all` on the wire).
    Broadcast,
}
impl AxisSelector {
    /// Returns true if a line with this selector is addressed to `axis`.
    pub fn matches(&self, axis: AxisId) -> bool {
        match self {
            AxisSelector::One(id) => *id == axis,
            AxisSelector::Broadcast => true,
        }
    }

    /// Parses a complete selector, ignoring surrounding whitespace.
    pub fn parse_text(text: &str) -> Option<Self> {
        parse_selector.parse(text.trim()).ok()
    }

    /// The set of axes from `roster` that this selector addresses.
    pub fn axes_within(&self, roster: AxisSet) -> AxisSet {
        match self {
            AxisSelector::One(id) => AxisSet::single(*id),
            AxisSelector::Broadcast => roster,
        }
    }
}

impl Display for AxisSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AxisSelector::One(id) => id.fmt(f),
            AxisSelector::Broadcast => f.write_str("all"),
        }
    }
}

/// Parse an axis selector: an axis character or `all`, in any case.
pub fn parse_selector<'s>(input: &mut &'s str) -> Result<AxisSelector> {
    alt((
        literal(Caseless("all")).value(AxisSelector::Broadcast),
        any.verify_map(AxisId::from_char).map(AxisSelector::One),
    ))
    .parse_next(input)
}

/// Small set of axes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct AxisSet(u8);
impl AxisSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every axis in [AxisId::ALL].
    pub const fn all() -> Self {
        Self(0b1_1111)
    }

    pub fn single(axis: AxisId) -> Self {
        Self(axis.bit())
    }

    pub fn insert(&mut self, axis: AxisId) {
        self.0 |= axis.bit();
    }

    pub fn union(&self, other: AxisSet) -> AxisSet {
        AxisSet(self.0 | other.0)
    }

    pub fn contains(&self, axis: AxisId) -> bool {
        self.0 & axis.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if every axis of `other` is also in this set.
    pub fn is_superset(&self, other: AxisSet) -> bool {
        self.0 & other.0 == other.0
    }
}
