//! Four-valued logic used for every pin and net on the board.
//!
//! The operators are implemented on [`LogicState`] through [`std::ops`]
//! (`!`, `&`, `|`, `^`), with [`LogicState::nand`] and [`LogicState::nor`]
//! for the inverted forms. A known `0` dominates AND and a known `1`
//! dominates OR, so a grounded gate input forces the output even if
//! the other input is indeterminate.

use serde::{Deserialize, Serialize};

/// The state of a single signal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogicState {
    /// Logic low.
    #[default]
    #[serde(rename = "0")]
    Low,
    /// Logic high.
    #[serde(rename = "1")]
    High,
    /// High impedance (undriven or tristated).
    #[serde(rename = "Z")]
    Imped,
    /// Unknown (conflicting or indeterminate).
    #[serde(rename = "X")]
    Unk,
}

impl LogicState {
    /// All four states, in display order.
    pub const ALL: [LogicState; 4] = [LogicState::Low, LogicState::High, LogicState::Imped, LogicState::Unk];

    /// Whether this is a known `0` or `1`.
    pub fn is_two_valued(self) -> bool {
        matches!(self, LogicState::Low | LogicState::High)
    }

    /// Whether this is a known `1`.
    pub fn is_high(self) -> bool {
        self == LogicState::High
    }

    /// `NOT(AND(self, rhs))`.
    pub fn nand(self, rhs: Self) -> Self {
        !(self & rhs)
    }

    /// `NOT(OR(self, rhs))`.
    pub fn nor(self, rhs: Self) -> Self {
        !(self | rhs)
    }
}

impl std::fmt::Display for LogicState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        match self {
            LogicState::Low   => f.write_char('0'),
            LogicState::High  => f.write_char('1'),
            LogicState::Imped => f.write_char('Z'),
            LogicState::Unk   => f.write_char('X'),
        }
    }
}

/// Error returned when an indeterminate state is converted to a `bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotTwoValuedErr(LogicState);
impl NotTwoValuedErr {
    /// The offending state.
    pub fn state(&self) -> LogicState { self.0 }
}

impl TryFrom<LogicState> for bool {
    type Error = NotTwoValuedErr;

    fn try_from(value: LogicState) -> Result<Self, Self::Error> {
        match value {
            LogicState::Low  => Ok(false),
            LogicState::High => Ok(true),
            st => Err(NotTwoValuedErr(st)),
        }
    }
}
impl From<bool> for LogicState {
    fn from(value: bool) -> Self {
        match value {
            true => Self::High,
            false => Self::Low,
        }
    }
}

impl std::ops::Not for LogicState {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            LogicState::High => Self::Low,
            LogicState::Low  => Self::High,
            _                => Self::Unk,
        }
    }
}
impl std::ops::BitAnd for LogicState {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        // 0 & a = 0
        // 1 & 1 = 1
        // X, o.w.
        match (self, rhs) {
            (LogicState::Low, _) | (_, LogicState::Low) => LogicState::Low,
            (LogicState::High, LogicState::High) => LogicState::High,
            _ => LogicState::Unk,
        }
    }
}
impl std::ops::BitOr for LogicState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        // 1 | a = 1
        // 0 | 0 = 0
        // X, o.w.
        match (self, rhs) {
            (LogicState::High, _) | (_, LogicState::High) => LogicState::High,
            (LogicState::Low, LogicState::Low) => LogicState::Low,
            _ => LogicState::Unk,
        }
    }
}
impl std::ops::BitXor for LogicState {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        match Option::zip(bool::try_from(self).ok(), bool::try_from(rhs).ok()) {
            Some((a, b)) => Self::from(a ^ b),
            None => Self::Unk,
        }
    }
}
