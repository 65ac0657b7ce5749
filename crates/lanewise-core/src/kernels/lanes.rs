//! Block-structured loops shared by the per-ISA kernels.
//!
//! Each routine keeps one block of `LANES` elements in a local array, which is
//! the shape LLVM lowers to packed vector code once the routine is inlined into
//! a `#[target_feature]` wrapper. `LANES` is chosen per ISA so one block fills
//! one vector register.
//!
//! Integer results are bit-identical to the scalar engine: wrapping addition is
//! associative, and min/max pick the same value regardless of scan order.
//! Float sums accumulate per lane, so they differ from the left-to-right scalar
//! sum by rounding only.

use std::ptr;

use crate::element::Numeric;

/// Per-lane sum, folded in lane order, then the tail.
#[inline(always)]
pub(super) unsafe fn sum<T: Numeric, const LANES: usize>(
    input: *const T,
    result: *mut T,
    len: usize,
) {
    let input = std::slice::from_raw_parts(input, len);
    let mut acc = [T::ZERO; LANES];
    let mut blocks = input.chunks_exact(LANES);
    for block in &mut blocks {
        for (a, &v) in acc.iter_mut().zip(block) {
            *a = a.lane_add(v);
        }
    }

    let mut total = T::ZERO;
    for a in acc {
        total = total.lane_add(a);
    }
    for &v in blocks.remainder() {
        total = total.lane_add(v);
    }
    result.write(total);
}

/// Per-lane strict-less scan seeded with `input[0]`.
///
/// A NaN only survives when it is the seed, exactly as in the scalar scan.
#[inline(always)]
pub(super) unsafe fn min<T: Numeric, const LANES: usize>(
    input: *const T,
    result: *mut T,
    len: usize,
) {
    extremum::<T, LANES>(input, result, len, |candidate, best| candidate < best);
}

/// Per-lane strict-greater scan seeded with `input[0]`.
#[inline(always)]
pub(super) unsafe fn max<T: Numeric, const LANES: usize>(
    input: *const T,
    result: *mut T,
    len: usize,
) {
    extremum::<T, LANES>(input, result, len, |candidate, best| candidate > best);
}

#[inline(always)]
unsafe fn extremum<T: Numeric, const LANES: usize>(
    input: *const T,
    result: *mut T,
    len: usize,
    better: impl Fn(T, T) -> bool,
) {
    let input = std::slice::from_raw_parts(input, len);
    let seed = input[0];
    let mut acc = [seed; LANES];
    let mut blocks = input.chunks_exact(LANES);
    for block in &mut blocks {
        for (a, &v) in acc.iter_mut().zip(block) {
            if better(v, *a) {
                *a = v;
            }
        }
    }

    let mut best = seed;
    for a in acc {
        if better(a, best) {
            best = a;
        }
    }
    for &v in blocks.remainder() {
        if better(v, best) {
            best = v;
        }
    }
    result.write(first_tied_zero(input, best));
}

/// Replaces a zero extremum with the first zero of `input`.
///
/// `0.0` and `-0.0` compare equal, so a lane fold picks between them by lane
/// rather than by index. The scalar scan keeps the first one it meets.
#[inline(always)]
pub(super) fn first_tied_zero<T: Numeric>(input: &[T], best: T) -> T {
    if T::INTEGRAL || !best.is_zero() {
        return best;
    }
    input.iter().copied().find(|v| v.is_zero()).unwrap_or(best)
}

/// `out[i] = op(lhs[i], rhs[i])`, one block at a time.
///
/// Blocks are copied into locals before the result is stored, so `out` may be
/// the same buffer as `lhs` or `rhs`. No references are formed over the caller's
/// buffers for the same reason.
#[inline(always)]
pub(super) unsafe fn binary<T: Numeric, const LANES: usize>(
    lhs: *const T,
    rhs: *const T,
    out: *mut T,
    len: usize,
    op: impl Fn(T, T) -> T,
) {
    let mut base = 0;
    while base + LANES <= len {
        let mut a = [T::ZERO; LANES];
        let mut b = [T::ZERO; LANES];
        ptr::copy_nonoverlapping(lhs.add(base), a.as_mut_ptr(), LANES);
        ptr::copy_nonoverlapping(rhs.add(base), b.as_mut_ptr(), LANES);
        for (x, &y) in a.iter_mut().zip(&b) {
            *x = op(*x, y);
        }
        ptr::copy_nonoverlapping(a.as_ptr(), out.add(base), LANES);
        base += LANES;
    }

    while base < len {
        out.add(base)
            .write(op(lhs.add(base).read(), rhs.add(base).read()));
        base += 1;
    }
}
