//! Type-erased entry points.
//!
//! Two surfaces route to the same dispatch functions:
//!
//! - **Generic**: [`sum`], [`min`], [`max`], [`add`] .. [`div_assign_rhs`] for
//!   any `T: Numeric`. The runtime type is matched against [`ElementKind`];
//!   a kind in the accelerated set goes to [`crate::dispatch`], anything else
//!   (`usize`, `isize`, user types) runs on [`crate::scalar`].
//! - **Dynamic**: [`reduce`], [`apply`], [`apply_into`], [`apply_assign`] take
//!   an [`Op`] chosen at runtime and tagged buffers, and report contract
//!   violations as [`Error`] values rather than panicking.

use crate::dispatch;
use crate::element::{Element, ElementKind, Numeric};
use crate::error::{Error, Result};
use crate::op::{BinaryOp, Op, ReduceOp};
use crate::scalar;
use crate::vector::{Value, Vector, VectorMut, VectorRef};

// =============================================================================
// Reinterpretation
// =============================================================================

/// # Safety
///
/// `U` must be the same type as `T`.
#[inline(always)]
unsafe fn cast_slice<T, U>(input: &[T]) -> &[U] {
    std::slice::from_raw_parts(input.as_ptr().cast::<U>(), input.len())
}

/// # Safety
///
/// `U` must be the same type as `T`.
#[inline(always)]
unsafe fn cast_slice_mut<T, U>(input: &mut [T]) -> &mut [U] {
    std::slice::from_raw_parts_mut(input.as_mut_ptr().cast::<U>(), input.len())
}

/// # Safety
///
/// `U` must be the same type as `T`.
#[inline(always)]
unsafe fn cast_value<T: Copy, U: Copy>(value: T) -> U {
    std::mem::transmute_copy(&value)
}

/// The three output placements of a paired call.
enum Operands<'a, T> {
    Distinct {
        out: &'a mut [T],
        lhs: &'a [T],
        rhs: &'a [T],
    },
    IntoLhs {
        lhs: &'a mut [T],
        rhs: &'a [T],
    },
    IntoRhs {
        lhs: &'a [T],
        rhs: &'a mut [T],
    },
}

impl<'a, T> Operands<'a, T> {
    /// # Safety
    ///
    /// `U` must be the same type as `T`.
    unsafe fn cast<U>(self) -> Operands<'a, U> {
        match self {
            Operands::Distinct { out, lhs, rhs } => Operands::Distinct {
                out: cast_slice_mut(out),
                lhs: cast_slice(lhs),
                rhs: cast_slice(rhs),
            },
            Operands::IntoLhs { lhs, rhs } => Operands::IntoLhs {
                lhs: cast_slice_mut(lhs),
                rhs: cast_slice(rhs),
            },
            Operands::IntoRhs { lhs, rhs } => Operands::IntoRhs {
                lhs: cast_slice(lhs),
                rhs: cast_slice_mut(rhs),
            },
        }
    }

    fn dispatch(self, op: BinaryOp)
    where
        T: Element,
    {
        match self {
            Operands::Distinct { out, lhs, rhs } => {
                dispatch::apply(op, out, lhs, rhs);
            }
            Operands::IntoLhs { lhs, rhs } => dispatch::apply_assign(op, lhs, rhs),
            Operands::IntoRhs { lhs, rhs } => dispatch::apply_assign_rhs(op, lhs, rhs),
        }
    }

    fn scalar(self, op: BinaryOp)
    where
        T: Numeric,
    {
        match self {
            Operands::Distinct { out, lhs, rhs } => {
                scalar::apply(op, out, lhs, rhs);
            }
            Operands::IntoLhs { lhs, rhs } => scalar::apply_assign(op, lhs, rhs),
            Operands::IntoRhs { lhs, rhs } => scalar::apply_assign_rhs(op, lhs, rhs),
        }
    }
}

// =============================================================================
// Generic routing
// =============================================================================

fn route_reduce<T: Numeric>(op: ReduceOp, input: &[T]) -> T {
    macro_rules! route {
        ($($kind:ident => $ty:ident),*) => {
            match ElementKind::of::<T>() {
                $(
                    Some(ElementKind::$kind) => {
                        // SAFETY: `ElementKind::of` matched, so `T` is `$ty`.
                        let input = unsafe { cast_slice::<T, $ty>(input) };
                        let result = dispatch::reduce::<$ty>(op, input);
                        // SAFETY: as above.
                        unsafe { cast_value::<$ty, T>(result) }
                    }
                )*
                None => {
                    if input.is_empty() {
                        panic!("{}", Error::EmptyInput { op: op.into() });
                    }
                    scalar::reduce(op, input)
                }
            }
        };
    }
    with_kinds!(route)
}

fn route_binary<T: Numeric>(op: BinaryOp, operands: Operands<'_, T>) {
    macro_rules! route {
        ($($kind:ident => $ty:ident),*) => {
            match ElementKind::of::<T>() {
                $(
                    // SAFETY: `ElementKind::of` matched, so `T` is `$ty`.
                    Some(ElementKind::$kind) => unsafe { operands.cast::<$ty>() }.dispatch(op),
                )*
                None => operands.scalar(op),
            }
        };
    }
    with_kinds!(route)
}

/// Sum of all elements, routed by runtime type.
///
/// # Panics
///
/// Panics if `input` is empty.
#[must_use]
pub fn sum<T: Numeric>(input: &[T]) -> T {
    route_reduce(ReduceOp::Sum, input)
}

/// Smallest element, routed by runtime type.
///
/// # Panics
///
/// Panics if `input` is empty.
#[must_use]
pub fn min<T: Numeric>(input: &[T]) -> T {
    route_reduce(ReduceOp::Min, input)
}

/// Largest element, routed by runtime type.
///
/// # Panics
///
/// Panics if `input` is empty.
#[must_use]
pub fn max<T: Numeric>(input: &[T]) -> T {
    route_reduce(ReduceOp::Max, input)
}

macro_rules! generic_binary {
    ($($name:ident => $op:ident),*) => {
        paste::paste! {
            $(
                #[doc = concat!("`out[i] = lhs[i] ", stringify!($name), " rhs[i]`, routed by runtime type.")]
                ///
                /// # Panics
                ///
                /// Panics if the lengths differ, or on integer division with a zero divisor.
                pub fn $name<'a, T: Numeric>(out: &'a mut [T], lhs: &[T], rhs: &[T]) -> &'a mut [T] {
                    route_binary(BinaryOp::$op, Operands::Distinct { out: &mut *out, lhs, rhs });
                    out
                }

                #[doc = concat!("In-place `", stringify!($name), "` into the left operand, routed by runtime type.")]
                pub fn [<$name _assign>]<T: Numeric>(lhs: &mut [T], rhs: &[T]) {
                    route_binary(BinaryOp::$op, Operands::IntoLhs { lhs, rhs });
                }

                #[doc = concat!("In-place `", stringify!($name), "` into the right operand, routed by runtime type.")]
                pub fn [<$name _assign_rhs>]<T: Numeric>(lhs: &[T], rhs: &mut [T]) {
                    route_binary(BinaryOp::$op, Operands::IntoRhs { lhs, rhs });
                }
            )*
        }
    };
}

generic_binary!(add => Add, sub => Sub, mul => Mul, div => Div);

// =============================================================================
// Dynamic surface
// =============================================================================

/// Runs a reduction selected at runtime.
///
/// # Errors
///
/// [`Error::NotAReduction`] for a paired operation, [`Error::EmptyInput`] for
/// an empty buffer.
pub fn reduce(op: Op, input: VectorRef<'_>) -> Result<Value> {
    let reduce_op = op.as_reduce().ok_or(Error::NotAReduction(op))?;
    if input.is_empty() {
        return Err(Error::EmptyInput { op });
    }

    macro_rules! reduce_tagged {
        ($($kind:ident => $ty:ident),*) => {
            match input {
                $(VectorRef::$kind(values) => Value::$kind(dispatch::reduce(reduce_op, values)),)*
            }
        };
    }
    Ok(with_kinds!(reduce_tagged))
}

/// Runs a paired operation selected at runtime into `out`.
///
/// # Errors
///
/// [`Error::NotBinary`], [`Error::KindMismatch`], [`Error::LengthMismatch`] or
/// [`Error::DivisionByZero`]. `out` is untouched on error.
pub fn apply_into(op: Op, out: VectorMut<'_>, lhs: VectorRef<'_>, rhs: VectorRef<'_>) -> Result<()> {
    let binary_op = op.as_binary().ok_or(Error::NotBinary(op))?;

    macro_rules! apply_tagged {
        ($($kind:ident => $ty:ident),*) => {
            match (out, lhs, rhs) {
                $(
                    (VectorMut::$kind(out), VectorRef::$kind(lhs), VectorRef::$kind(rhs)) => {
                        scalar::validate_operands(binary_op, out.len(), lhs, rhs)?;
                        dispatch::apply(binary_op, out, lhs, rhs);
                        Ok(())
                    }
                )*
                (out, lhs, rhs) => Err(kind_mismatch(out.kind(), lhs.kind(), rhs.kind())),
            }
        };
    }
    with_kinds!(apply_tagged)
}

/// Runs a paired operation selected at runtime, writing into the left operand.
///
/// # Errors
///
/// Same as [`apply_into`]. `lhs` is untouched on error.
pub fn apply_assign(op: Op, lhs: VectorMut<'_>, rhs: VectorRef<'_>) -> Result<()> {
    let binary_op = op.as_binary().ok_or(Error::NotBinary(op))?;

    macro_rules! assign_tagged {
        ($($kind:ident => $ty:ident),*) => {
            match (lhs, rhs) {
                $(
                    (VectorMut::$kind(lhs), VectorRef::$kind(rhs)) => {
                        scalar::validate_operands(binary_op, lhs.len(), lhs, rhs)?;
                        dispatch::apply_assign(binary_op, lhs, rhs);
                        Ok(())
                    }
                )*
                (lhs, rhs) => Err(kind_mismatch(lhs.kind(), lhs.kind(), rhs.kind())),
            }
        };
    }
    with_kinds!(assign_tagged)
}

/// Runs a paired operation selected at runtime into a newly allocated buffer.
///
/// # Errors
///
/// Same as [`apply_into`].
pub fn apply(op: Op, lhs: VectorRef<'_>, rhs: VectorRef<'_>) -> Result<Vector> {
    let mut out = Vector::zeros(lhs.kind(), lhs.len());
    apply_into(op, out.as_mut(), lhs, rhs)?;
    Ok(out)
}

fn kind_mismatch(expected: ElementKind, lhs: ElementKind, rhs: ElementKind) -> Error {
    let actual = if lhs == expected { rhs } else { lhs };
    Error::KindMismatch { expected, actual }
}
