//! Runtime dispatch between accelerated kernels and the scalar engine.
//!
//! Each call reads [`capability::current`] and asks the element type for a
//! kernel table under those flags. With a table, validated raw buffers are
//! handed to the kernel; without one, the call runs on [`crate::scalar`].
//! Both paths return the same shape: a value for reductions, the output
//! buffer for paired arithmetic.
//!
//! # Entry points
//!
//! - Generic, one per operation: [`sum`], [`min`], [`max`], [`add`],
//!   [`add_assign`], [`add_assign_rhs`], ... and the op-selected [`reduce`],
//!   [`apply`], [`apply_assign`], [`apply_assign_rhs`]
//! - Typed, one per (operation, kind): `sum_u8` .. `div_assign_rhs_f64`
//!
//! # Panics
//!
//! Contract violations fail fast before any kernel runs or any element is
//! written: empty reduction input, buffers of different lengths, and integer
//! division by a zero divisor (the message names the first offending index).

use crate::capability;
use crate::element::{Element, ElementKind, Numeric};
use crate::error::Error;
use crate::op::{BinaryOp, ReduceOp};
use crate::scalar;

// =============================================================================
// Generic implementations
// =============================================================================

/// Runs the reduction named by `op`.
///
/// # Panics
///
/// Panics if `input` is empty.
#[inline]
#[must_use]
pub fn reduce<T: Element>(op: ReduceOp, input: &[T]) -> T {
    if input.is_empty() {
        panic!("{}", Error::EmptyInput { op: op.into() });
    }

    match T::kernels(capability::current()) {
        Some(kernels) => {
            let kernel = kernels.reduce(op);
            let mut result = T::ZERO;
            // SAFETY: See kernels module invariants.
            // - `input` is non-empty and valid for `input.len()` reads.
            // - `result` is a live local, valid for one write.
            // - The table exists only if the processor supports its extension.
            unsafe { kernel(input.as_ptr(), &mut result, input.len()) };
            result
        }
        None => scalar::reduce(op, input),
    }
}

/// Sum of all elements. Integers wrap.
///
/// # Panics
///
/// Panics if `input` is empty.
#[inline]
#[must_use]
pub fn sum<T: Element>(input: &[T]) -> T {
    reduce(ReduceOp::Sum, input)
}

/// Smallest element.
///
/// # Panics
///
/// Panics if `input` is empty.
#[inline]
#[must_use]
pub fn min<T: Element>(input: &[T]) -> T {
    reduce(ReduceOp::Min, input)
}

/// Largest element.
///
/// # Panics
///
/// Panics if `input` is empty.
#[inline]
#[must_use]
pub fn max<T: Element>(input: &[T]) -> T {
    reduce(ReduceOp::Max, input)
}

/// `out[i] = lhs[i] <op> rhs[i]`, returning `out`.
///
/// # Panics
///
/// Panics if the lengths differ, or on integer division with a zero divisor.
#[inline]
pub fn apply<'a, T: Element>(op: BinaryOp, out: &'a mut [T], lhs: &[T], rhs: &[T]) -> &'a mut [T] {
    scalar::check_operands(op, out.len(), lhs, rhs);
    if out.is_empty() {
        return out;
    }

    match T::kernels(capability::current()) {
        Some(kernels) => {
            let kernel = kernels.binary(op);
            // SAFETY: See kernels module invariants.
            // - All three buffers are non-empty with length `out.len()`.
            // - `out` is exclusively borrowed, so it cannot overlap the inputs.
            // - Integer divisors were checked for zero above.
            unsafe { kernel(lhs.as_ptr(), rhs.as_ptr(), out.as_mut_ptr(), out.len()) };
        }
        None => scalar::zip_into(op, out, lhs, rhs),
    }
    out
}

/// `lhs[i] = lhs[i] <op> rhs[i]`.
///
/// # Panics
///
/// Same conditions as [`apply`].
#[inline]
pub fn apply_assign<T: Element>(op: BinaryOp, lhs: &mut [T], rhs: &[T]) {
    scalar::check_operands(op, lhs.len(), lhs, rhs);
    if lhs.is_empty() {
        return;
    }

    match T::kernels(capability::current()) {
        Some(kernels) => {
            let kernel = kernels.binary(op);
            let out = lhs.as_mut_ptr();
            // SAFETY: See kernels module invariants.
            // - `out` doubles as the left operand; kernels load each block
            //   before storing it.
            // - Lengths match and are non-empty; divisors were checked.
            unsafe { kernel(out.cast_const(), rhs.as_ptr(), out, lhs.len()) };
        }
        None => scalar::zip_assign(op, lhs, rhs),
    }
}

/// `rhs[i] = lhs[i] <op> rhs[i]`.
///
/// # Panics
///
/// Same conditions as [`apply`].
#[inline]
pub fn apply_assign_rhs<T: Element>(op: BinaryOp, lhs: &[T], rhs: &mut [T]) {
    scalar::check_operands(op, rhs.len(), lhs, rhs);
    if rhs.is_empty() {
        return;
    }

    match T::kernels(capability::current()) {
        Some(kernels) => {
            let kernel = kernels.binary(op);
            let out = rhs.as_mut_ptr();
            // SAFETY: See kernels module invariants.
            // - `out` doubles as the right operand; kernels load each block
            //   before storing it.
            // - Lengths match and are non-empty; divisors were checked.
            unsafe { kernel(lhs.as_ptr(), out.cast_const(), out, rhs.len()) };
        }
        None => scalar::zip_assign_rhs(op, lhs, rhs),
    }
}

macro_rules! generic_binary {
    ($($name:ident => $op:ident),*) => {
        paste::paste! {
            $(
                #[doc = concat!("`out[i] = lhs[i] ", stringify!($name), " rhs[i]`, returning `out`. See [`apply`].")]
                #[inline]
                pub fn $name<'a, T: Element>(out: &'a mut [T], lhs: &[T], rhs: &[T]) -> &'a mut [T] {
                    apply(BinaryOp::$op, out, lhs, rhs)
                }

                #[doc = concat!("In-place `", stringify!($name), "` into the left operand. See [`apply_assign`].")]
                #[inline]
                pub fn [<$name _assign>]<T: Element>(lhs: &mut [T], rhs: &[T]) {
                    apply_assign(BinaryOp::$op, lhs, rhs);
                }

                #[doc = concat!("In-place `", stringify!($name), "` into the right operand. See [`apply_assign_rhs`].")]
                #[inline]
                pub fn [<$name _assign_rhs>]<T: Element>(lhs: &[T], rhs: &mut [T]) {
                    apply_assign_rhs(BinaryOp::$op, lhs, rhs);
                }
            )*
        }
    };
}

generic_binary!(add => Add, sub => Sub, mul => Mul, div => Div);

// =============================================================================
// Typed entry points
// =============================================================================

macro_rules! typed_binary {
    ($ty:ident: $($name:ident => $op:ident),*) => {
        paste::paste! {
            $(
                #[doc = concat!("`out[i] = lhs[i] ", stringify!($name), " rhs[i]` over `", stringify!($ty), "`. See [`apply`].")]
                #[inline]
                pub fn [<$name _ $ty>]<'a>(out: &'a mut [$ty], lhs: &[$ty], rhs: &[$ty]) -> &'a mut [$ty] {
                    apply(BinaryOp::$op, out, lhs, rhs)
                }

                #[doc = concat!("In-place `", stringify!($name), "` of `", stringify!($ty), "` into the left operand.")]
                #[inline]
                pub fn [<$name _assign_ $ty>](lhs: &mut [$ty], rhs: &[$ty]) {
                    apply_assign(BinaryOp::$op, lhs, rhs);
                }

                #[doc = concat!("In-place `", stringify!($name), "` of `", stringify!($ty), "` into the right operand.")]
                #[inline]
                pub fn [<$name _assign_rhs_ $ty>](lhs: &[$ty], rhs: &mut [$ty]) {
                    apply_assign_rhs(BinaryOp::$op, lhs, rhs);
                }
            )*
        }
    };
}

macro_rules! typed_entry_points {
    ($($kind:ident => $ty:ident),*) => {
        paste::paste! {
            $(
                #[doc = concat!("Sum of a `", stringify!($ty), "` buffer.\n\n# Panics\n\nPanics if `input` is empty.")]
                #[inline]
                #[must_use]
                pub fn [<sum_ $ty>](input: &[$ty]) -> $ty {
                    reduce(ReduceOp::Sum, input)
                }

                #[doc = concat!("Smallest element of a `", stringify!($ty), "` buffer.\n\n# Panics\n\nPanics if `input` is empty.")]
                #[inline]
                #[must_use]
                pub fn [<min_ $ty>](input: &[$ty]) -> $ty {
                    reduce(ReduceOp::Min, input)
                }

                #[doc = concat!("Largest element of a `", stringify!($ty), "` buffer.\n\n# Panics\n\nPanics if `input` is empty.")]
                #[inline]
                #[must_use]
                pub fn [<max_ $ty>](input: &[$ty]) -> $ty {
                    reduce(ReduceOp::Max, input)
                }

                typed_binary!($ty: add => Add, sub => Sub, mul => Mul, div => Div);
            )*

            /// Forces capability detection and runs each reduction once per kind,
            /// so the first measured call does not pay for detection.
            pub fn warmup() {
                let level = capability::simd_level();
                $(
                    let data: [$ty; 2] = [<$ty as Numeric>::ZERO; 2];
                    std::hint::black_box(sum(&data));
                    std::hint::black_box(min(&data));
                    std::hint::black_box(max(&data));
                )*
                tracing::debug!(level = %level, kinds = ElementKind::ALL.len(), "dispatch warmed up");
            }
        }
    };
}

with_kinds!(typed_entry_points);
