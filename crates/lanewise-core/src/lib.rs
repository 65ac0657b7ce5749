//! # Lanewise Core
//!
//! Elementwise numeric operations over dense slices, routed at runtime to the
//! fastest execution path the current processor supports.
//!
//! ## Features
//!
//! - **Seven operations**: `sum`, `min`, `max` reductions and `add`, `sub`,
//!   `mul`, `div` paired arithmetic
//! - **Ten element kinds**: `u8`..`u64`, `i8`..`i64`, `f32`, `f64`
//! - **Runtime dispatch**: AVX2 on x86_64, NEON on aarch64, detected once per process
//! - **Scalar fallback**: a portable reference engine, bit-identical for integers
//! - **Generic adapter**: one generic entry point per operation, plus a
//!   dynamically-typed API that selects the operation by name
//!
//! ## Quick Start
//!
//! ```rust
//! use lanewise_core::{add_f32, sum_i32};
//!
//! assert_eq!(sum_i32(&[1, 2, 3]), 6);
//!
//! let mut out = [0.0_f32; 3];
//! add_f32(&mut out, &[1.0, 2.0, 3.0], &[0.5, 0.5, 0.5]);
//! assert_eq!(out, [1.5, 2.5, 3.5]);
//! ```
//!
//! The generic adapter accepts any element type and falls back to the scalar
//! engine for types outside the accelerated set:
//!
//! ```rust
//! use lanewise_core::generic;
//!
//! assert_eq!(generic::max(&[3_u16, 9, 4]), 9);
//! assert_eq!(generic::sum(&[1_usize, 2, 3]), 6);
//! ```

#![warn(missing_docs)]
#![cfg_attr(
    test,
    allow(
        clippy::float_cmp,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )
)]

/// Invokes `$mac!` with the fixed list of `(ElementKind variant => native type)`
/// pairs. Every per-kind surface in the crate is expanded from this one list.
macro_rules! with_kinds {
    ($mac:ident) => {
        $mac! {
            U8 => u8,
            U16 => u16,
            U32 => u32,
            U64 => u64,
            I8 => i8,
            I16 => i16,
            I32 => i32,
            I64 => i64,
            F32 => f32,
            F64 => f64
        }
    };
}

pub mod capability;
#[cfg(test)]
mod capability_tests;
pub mod config;
pub mod dispatch;
pub mod element;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod generic;
pub mod harness;
mod kernels;
pub mod op;
pub mod scalar;
#[cfg(test)]
mod scalar_tests;
pub mod vector;
#[cfg(test)]
mod vector_tests;

pub use capability::{
    simd_level, with_capabilities, CapabilityOverride, Capabilities, Isa, SimdLevel,
};
pub use config::{ConfigError, DispatchConfig, LanewiseConfig, LoggingConfig};
pub use dispatch::*;
pub use element::{Element, ElementKind, Numeric};
pub use error::{Error, Result};
pub use harness::{compare, compare_all, Comparison, LatencyStats};
pub use op::{BinaryOp, Op, ReduceOp};
pub use vector::{Value, Vector, VectorMut, VectorRef};
