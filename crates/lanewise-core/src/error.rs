//! Error types for lanewise-core.
//!
//! The typed entry points in [`crate::dispatch`] fail fast with a panic on
//! contract violations. The dynamically-typed adapter in [`crate::generic`]
//! reports the same violations as [`Error`] values instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::element::ElementKind;
use crate::op::Op;

/// Lanewise error types.
#[derive(Error, Debug)]
pub enum Error {
    /// A reduction was requested over an empty buffer.
    #[error("cannot {op} an empty buffer")]
    EmptyInput {
        /// The reduction that was requested.
        op: Op,
    },

    /// Buffers of a paired operation differ in length.
    #[error("buffer length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Length of the output buffer.
        expected: usize,
        /// Length of the offending input.
        actual: usize,
    },

    /// Buffers of a paired operation hold different element kinds.
    #[error("element kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        /// Kind of the output buffer.
        expected: ElementKind,
        /// Kind of the offending input.
        actual: ElementKind,
    },

    /// An integer divisor is zero.
    #[error("integer division by zero at index {index}")]
    DivisionByZero {
        /// Position of the first zero divisor.
        index: usize,
    },

    /// A paired operation was passed where a reduction is required.
    #[error("'{0}' is not a reduction")]
    NotAReduction(Op),

    /// A reduction was passed where a paired operation is required.
    #[error("'{0}' is not a paired arithmetic operation")]
    NotBinary(Op),

    /// Unrecognized element kind name.
    #[error("unknown element kind: {0}")]
    UnknownKind(String),

    /// Unrecognized operation name.
    #[error("unknown operation: {0}")]
    UnknownOp(String),

    /// Unrecognized instruction-set name.
    #[error("unknown instruction set: {0}")]
    UnknownIsa(String),

    /// A textual value does not parse as the requested kind.
    #[error("invalid {kind} value '{value}'")]
    InvalidValue {
        /// Target kind.
        kind: ElementKind,
        /// The rejected text.
        value: String,
    },

    /// Capability detection already ran with a different configuration.
    #[error("capabilities already initialized; configure() must run before the first dispatch")]
    AlreadyInitialized,

    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for lanewise operations.
pub type Result<T> = std::result::Result<T, Error>;
