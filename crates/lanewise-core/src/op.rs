//! Operation names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Any of the seven operations, as selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Wrapping / IEEE sum of all elements.
    Sum,
    /// Smallest element.
    Min,
    /// Largest element.
    Max,
    /// `lhs[i] + rhs[i]`.
    Add,
    /// `lhs[i] - rhs[i]`.
    Sub,
    /// `lhs[i] * rhs[i]`.
    Mul,
    /// `lhs[i] / rhs[i]`.
    Div,
}

impl Op {
    /// All operations, reductions first.
    pub const ALL: [Op; 7] = [
        Op::Sum,
        Op::Min,
        Op::Max,
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Div,
    ];

    /// Lowercase operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Op::Sum => "sum",
            Op::Min => "min",
            Op::Max => "max",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
        }
    }

    /// The reduction this names, if any.
    #[must_use]
    pub const fn as_reduce(self) -> Option<ReduceOp> {
        match self {
            Op::Sum => Some(ReduceOp::Sum),
            Op::Min => Some(ReduceOp::Min),
            Op::Max => Some(ReduceOp::Max),
            _ => None,
        }
    }

    /// The paired arithmetic operation this names, if any.
    #[must_use]
    pub const fn as_binary(self) -> Option<BinaryOp> {
        match self {
            Op::Add => Some(BinaryOp::Add),
            Op::Sub => Some(BinaryOp::Sub),
            Op::Mul => Some(BinaryOp::Mul),
            Op::Div => Some(BinaryOp::Div),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Op {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownOp(s.to_string()))
    }
}

/// Reductions over a single buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// Sum of all elements.
    Sum,
    /// Smallest element.
    Min,
    /// Largest element.
    Max,
}

impl From<ReduceOp> for Op {
    fn from(op: ReduceOp) -> Self {
        match op {
            ReduceOp::Sum => Op::Sum,
            ReduceOp::Min => Op::Min,
            ReduceOp::Max => Op::Max,
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Op::from(*self).fmt(f)
    }
}

/// Elementwise arithmetic over two equal-length buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
}

impl From<BinaryOp> for Op {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Op::Add,
            BinaryOp::Sub => Op::Sub,
            BinaryOp::Mul => Op::Mul,
            BinaryOp::Div => Op::Div,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Op::from(*self).fmt(f)
    }
}
