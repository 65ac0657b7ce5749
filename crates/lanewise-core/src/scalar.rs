//! Portable implementations of every operation.
//!
//! These functions serve as:
//! - The path dispatch takes when no accelerated kernel applies
//! - Reference implementations for testing kernel correctness
//! - The engine behind the generic adapter for types outside [`crate::ElementKind`]
//!
//! Everything is generic over [`Numeric`], so integer arithmetic wraps and float
//! arithmetic is IEEE 754. Loops run in index order.

use crate::element::Numeric;
use crate::error::{Error, Result};
use crate::op::{BinaryOp, ReduceOp};

// =============================================================================
// Reductions
// =============================================================================

/// Left-to-right sum. Integers wrap; an empty input sums to zero.
#[inline]
#[must_use]
pub fn sum<T: Numeric>(input: &[T]) -> T {
    input.iter().fold(T::ZERO, |acc, &v| acc.lane_add(v))
}

/// Smallest element under strict `<`, starting from `input[0]`.
///
/// For floats a NaN is only returned when it is the first element.
///
/// # Panics
///
/// Panics if `input` is empty.
#[inline]
#[must_use]
pub fn min<T: Numeric>(input: &[T]) -> T {
    let (&first, rest) = split_first(input, ReduceOp::Min);
    rest.iter()
        .fold(first, |best, &v| if v < best { v } else { best })
}

/// Largest element under strict `>`, starting from `input[0]`.
///
/// # Panics
///
/// Panics if `input` is empty.
#[inline]
#[must_use]
pub fn max<T: Numeric>(input: &[T]) -> T {
    let (&first, rest) = split_first(input, ReduceOp::Max);
    rest.iter()
        .fold(first, |best, &v| if v > best { v } else { best })
}

/// Runs the reduction named by `op`.
///
/// # Panics
///
/// Panics if `op` is `Min` or `Max` and `input` is empty.
#[must_use]
pub fn reduce<T: Numeric>(op: ReduceOp, input: &[T]) -> T {
    match op {
        ReduceOp::Sum => sum(input),
        ReduceOp::Min => min(input),
        ReduceOp::Max => max(input),
    }
}

fn split_first<T>(input: &[T], op: ReduceOp) -> (&T, &[T]) {
    match input.split_first() {
        Some(parts) => parts,
        None => panic!("{}", Error::EmptyInput { op: op.into() }),
    }
}

// =============================================================================
// Operand validation
// =============================================================================

/// Checks a paired call before anything is written.
///
/// Fails when `lhs` or `rhs` differs in length from the output, or when an
/// integer division has a zero divisor.
pub(crate) fn validate_operands<T: Numeric>(
    op: BinaryOp,
    out_len: usize,
    lhs: &[T],
    rhs: &[T],
) -> Result<()> {
    for actual in [lhs.len(), rhs.len()] {
        if actual != out_len {
            return Err(Error::LengthMismatch {
                expected: out_len,
                actual,
            });
        }
    }
    if let Some(index) = first_zero_divisor(op, rhs) {
        return Err(Error::DivisionByZero { index });
    }
    Ok(())
}

/// [`validate_operands`], panicking with the error message.
#[inline]
#[track_caller]
pub(crate) fn check_operands<T: Numeric>(op: BinaryOp, out_len: usize, lhs: &[T], rhs: &[T]) {
    if let Err(err) = validate_operands(op, out_len, lhs, rhs) {
        panic!("{err}");
    }
}

/// Index of the first zero divisor of an integer division, if any.
#[inline]
pub(crate) fn first_zero_divisor<T: Numeric>(op: BinaryOp, rhs: &[T]) -> Option<usize> {
    if op == BinaryOp::Div && T::INTEGRAL {
        rhs.iter().position(|v| v.is_zero())
    } else {
        None
    }
}

// =============================================================================
// Paired arithmetic
// =============================================================================

/// Binds `$f` to the lane function for `$op`, so the loop body is
/// monomorphized per operation instead of matching per element.
macro_rules! with_lane_fn {
    ($op:expr, $f:ident => $body:expr) => {
        match $op {
            BinaryOp::Add => {
                let $f = <T as Numeric>::lane_add;
                $body
            }
            BinaryOp::Sub => {
                let $f = <T as Numeric>::lane_sub;
                $body
            }
            BinaryOp::Mul => {
                let $f = <T as Numeric>::lane_mul;
                $body
            }
            BinaryOp::Div => {
                let $f = <T as Numeric>::lane_div;
                $body
            }
        }
    };
}

/// `out[i] = op(lhs[i], rhs[i])` without validation.
pub(crate) fn zip_into<T: Numeric>(op: BinaryOp, out: &mut [T], lhs: &[T], rhs: &[T]) {
    with_lane_fn!(op, f => {
        for ((o, &a), &b) in out.iter_mut().zip(lhs).zip(rhs) {
            *o = f(a, b);
        }
    });
}

/// `lhs[i] = op(lhs[i], rhs[i])` without validation.
pub(crate) fn zip_assign<T: Numeric>(op: BinaryOp, lhs: &mut [T], rhs: &[T]) {
    with_lane_fn!(op, f => {
        for (a, &b) in lhs.iter_mut().zip(rhs) {
            *a = f(*a, b);
        }
    });
}

/// `rhs[i] = op(lhs[i], rhs[i])` without validation.
pub(crate) fn zip_assign_rhs<T: Numeric>(op: BinaryOp, lhs: &[T], rhs: &mut [T]) {
    with_lane_fn!(op, f => {
        for (&a, b) in lhs.iter().zip(rhs.iter_mut()) {
            *b = f(a, *b);
        }
    });
}

/// `out[i] = lhs[i] <op> rhs[i]` for every index.
///
/// # Panics
///
/// Panics if the lengths differ, or on integer division with a zero divisor.
/// Nothing is written in either case.
pub fn apply<'a, T: Numeric>(op: BinaryOp, out: &'a mut [T], lhs: &[T], rhs: &[T]) -> &'a mut [T] {
    check_operands(op, out.len(), lhs, rhs);
    zip_into(op, out, lhs, rhs);
    out
}

/// `lhs[i] = lhs[i] <op> rhs[i]`: the output is the left operand.
///
/// # Panics
///
/// Same conditions as [`apply`].
pub fn apply_assign<T: Numeric>(op: BinaryOp, lhs: &mut [T], rhs: &[T]) {
    check_operands(op, lhs.len(), lhs, rhs);
    zip_assign(op, lhs, rhs);
}

/// `rhs[i] = lhs[i] <op> rhs[i]`: the output is the right operand.
///
/// # Panics
///
/// Same conditions as [`apply`].
pub fn apply_assign_rhs<T: Numeric>(op: BinaryOp, lhs: &[T], rhs: &mut [T]) {
    check_operands(op, rhs.len(), lhs, rhs);
    zip_assign_rhs(op, lhs, rhs);
}

macro_rules! scalar_binary {
    ($($name:ident => $op:ident),*) => {
        paste::paste! {
            $(
                #[doc = concat!("`out[i] = lhs[i] ", stringify!($name), " rhs[i]`. See [`apply`].")]
                #[inline]
                pub fn $name<'a, T: Numeric>(out: &'a mut [T], lhs: &[T], rhs: &[T]) -> &'a mut [T] {
                    apply(BinaryOp::$op, out, lhs, rhs)
                }

                #[doc = concat!("In-place `", stringify!($name), "` into the left operand. See [`apply_assign`].")]
                #[inline]
                pub fn [<$name _assign>]<T: Numeric>(lhs: &mut [T], rhs: &[T]) {
                    apply_assign(BinaryOp::$op, lhs, rhs);
                }

                #[doc = concat!("In-place `", stringify!($name), "` into the right operand. See [`apply_assign_rhs`].")]
                #[inline]
                pub fn [<$name _assign_rhs>]<T: Numeric>(lhs: &[T], rhs: &mut [T]) {
                    apply_assign_rhs(BinaryOp::$op, lhs, rhs);
                }
            )*
        }
    };
}

scalar_binary!(add => Add, sub => Sub, mul => Mul, div => Div);
