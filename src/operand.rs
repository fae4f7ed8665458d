//! Operand tokens: registers, literal immediates and `offset(base)` memory
//! references.

use crate::error::OperandError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NUM_REGS: u8 = 32;
pub const ZERO_ALIAS: &str = "zero";
pub const LITERAL_MARKER: char = '#';

/// General-purpose register index, always `< 32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reg(u8);

impl Reg {
    pub const ZERO: Reg = Reg(0);

    pub fn new(index: u8) -> Option<Self> {
        (index < NUM_REGS).then_some(Reg(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl From<Reg> for u32 {
    fn from(r: Reg) -> u32 {
        r.0 as u32
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl FromStr for Reg {
    type Err = OperandError;

    /// Accepts `zero`, `rN`/`RN`, or a bare index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case(ZERO_ALIAS) {
            return Ok(Reg::ZERO);
        }
        let digits = t.strip_prefix(['r', 'R']).unwrap_or(t);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OperandError::InvalidRegister(s.to_string()));
        }
        digits
            .parse::<u8>()
            .ok()
            .and_then(Reg::new)
            .ok_or_else(|| OperandError::InvalidRegister(s.to_string()))
    }
}

pub fn parse_reg(s: &str) -> Result<Reg, OperandError> {
    s.parse()
}

/// Parses a signed decimal immediate, with or without the `#` marker.
pub fn parse_imm(s: &str) -> Result<i32, OperandError> {
    let t = s.trim();
    let t = t.strip_prefix(LITERAL_MARKER).unwrap_or(t).trim();
    t.parse::<i32>()
        .map_err(|_| OperandError::InvalidImmediate(s.to_string()))
}

/// A `offset(base)` memory reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mem {
    pub offset: i32,
    pub base: Reg,
}

impl Mem {
    pub fn new(offset: i32, base: Reg) -> Self {
        Self { offset, base }
    }
}

impl fmt::Display for Mem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.offset, self.base)
    }
}

impl FromStr for Mem {
    type Err = OperandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || OperandError::MalformedOperand(s.to_string());
        let (off, rest) = s.trim().split_once('(').ok_or_else(malformed)?;
        let base = rest.strip_suffix(')').ok_or_else(malformed)?;
        let off = off.trim();
        let offset = if off.is_empty() {
            0
        } else {
            off.parse::<i32>()
                .map_err(|_| OperandError::InvalidImmediate(off.to_string()))?
        };
        Ok(Mem { offset, base: base.parse()? })
    }
}

pub fn parse_mem(s: &str) -> Result<Mem, OperandError> {
    s.parse()
}
