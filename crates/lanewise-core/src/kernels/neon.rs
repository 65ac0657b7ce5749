//! NEON kernels for aarch64.
//!
//! Integer and `f64` kernels inline the `lanes` block loops at 128 bits per
//! block. `f32` uses explicit intrinsics. `vminq_f32`/`vmaxq_f32` propagate
//! NaN, which the scalar scan does not, so min/max select through a strict
//! compare instead.

use std::arch::aarch64::*;
use std::mem::size_of;

use super::{lanes, KernelSet};
use crate::element::Numeric;

/// Bytes in one NEON register.
const REGISTER_BYTES: usize = 16;

const F32_LANES: usize = 4;

macro_rules! block_kernels {
    ($($ty:ident),*) => {
        paste::paste! {
            $(
                #[target_feature(enable = "neon")]
                unsafe fn [<sum_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                    lanes::sum::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(input, result, len);
                }

                #[target_feature(enable = "neon")]
                unsafe fn [<min_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                    lanes::min::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(input, result, len);
                }

                #[target_feature(enable = "neon")]
                unsafe fn [<max_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                    lanes::max::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(input, result, len);
                }

                #[target_feature(enable = "neon")]
                unsafe fn [<add_ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                    lanes::binary::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(
                        lhs, rhs, out, len, <$ty as Numeric>::lane_add,
                    );
                }

                #[target_feature(enable = "neon")]
                unsafe fn [<sub_ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                    lanes::binary::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(
                        lhs, rhs, out, len, <$ty as Numeric>::lane_sub,
                    );
                }

                #[target_feature(enable = "neon")]
                unsafe fn [<mul_ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                    lanes::binary::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(
                        lhs, rhs, out, len, <$ty as Numeric>::lane_mul,
                    );
                }

                #[target_feature(enable = "neon")]
                unsafe fn [<div_ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                    lanes::binary::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(
                        lhs, rhs, out, len, <$ty as Numeric>::lane_div,
                    );
                }

                pub(super) const [<KERNELS_ $ty:upper>]: KernelSet<$ty> = KernelSet {
                    sum: [<sum_ $ty>],
                    min: [<min_ $ty>],
                    max: [<max_ $ty>],
                    add: [<add_ $ty>],
                    sub: [<sub_ $ty>],
                    mul: [<mul_ $ty>],
                    div: [<div_ $ty>],
                };
            )*
        }
    };
}

block_kernels!(u8, u16, u32, u64, i8, i16, i32, i64, f64);

// =============================================================================
// f32
// =============================================================================

#[target_feature(enable = "neon")]
unsafe fn sum_f32(input: *const f32, result: *mut f32, len: usize) {
    let blocks = len / F32_LANES;
    let mut acc = vdupq_n_f32(0.0);
    for i in 0..blocks {
        acc = vaddq_f32(acc, vld1q_f32(input.add(i * F32_LANES)));
    }

    let mut partial = [0.0_f32; F32_LANES];
    vst1q_f32(partial.as_mut_ptr(), acc);
    let mut total = 0.0_f32;
    for v in partial {
        total += v;
    }
    for i in blocks * F32_LANES..len {
        total += *input.add(i);
    }
    result.write(total);
}

#[target_feature(enable = "neon")]
unsafe fn min_f32(input: *const f32, result: *mut f32, len: usize) {
    let seed = *input;
    let blocks = len / F32_LANES;
    let mut acc = vdupq_n_f32(seed);
    for i in 0..blocks {
        let v = vld1q_f32(input.add(i * F32_LANES));
        acc = vbslq_f32(vcltq_f32(v, acc), v, acc);
    }

    let mut partial = [seed; F32_LANES];
    vst1q_f32(partial.as_mut_ptr(), acc);
    let mut best = seed;
    for v in partial {
        if v < best {
            best = v;
        }
    }
    for i in blocks * F32_LANES..len {
        let v = *input.add(i);
        if v < best {
            best = v;
        }
    }
    result.write(lanes::first_tied_zero(std::slice::from_raw_parts(input, len), best));
}

#[target_feature(enable = "neon")]
unsafe fn max_f32(input: *const f32, result: *mut f32, len: usize) {
    let seed = *input;
    let blocks = len / F32_LANES;
    let mut acc = vdupq_n_f32(seed);
    for i in 0..blocks {
        let v = vld1q_f32(input.add(i * F32_LANES));
        acc = vbslq_f32(vcgtq_f32(v, acc), v, acc);
    }

    let mut partial = [seed; F32_LANES];
    vst1q_f32(partial.as_mut_ptr(), acc);
    let mut best = seed;
    for v in partial {
        if v > best {
            best = v;
        }
    }
    for i in blocks * F32_LANES..len {
        let v = *input.add(i);
        if v > best {
            best = v;
        }
    }
    result.write(lanes::first_tied_zero(std::slice::from_raw_parts(input, len), best));
}

macro_rules! f32_binary {
    ($($name:ident => $intrinsic:ident, $op:tt);* $(;)?) => {
        $(
            #[target_feature(enable = "neon")]
            unsafe fn $name(lhs: *const f32, rhs: *const f32, out: *mut f32, len: usize) {
                let blocks = len / F32_LANES;
                for i in 0..blocks {
                    let offset = i * F32_LANES;
                    let a = vld1q_f32(lhs.add(offset));
                    let b = vld1q_f32(rhs.add(offset));
                    vst1q_f32(out.add(offset), $intrinsic(a, b));
                }
                for i in blocks * F32_LANES..len {
                    *out.add(i) = *lhs.add(i) $op *rhs.add(i);
                }
            }
        )*
    };
}

f32_binary! {
    add_f32 => vaddq_f32, +;
    sub_f32 => vsubq_f32, -;
    mul_f32 => vmulq_f32, *;
    div_f32 => vdivq_f32, /;
}

pub(super) const KERNELS_F32: KernelSet<f32> = KernelSet {
    sum: sum_f32,
    min: min_f32,
    max: max_f32,
    add: add_f32,
    sub: sub_f32,
    mul: mul_f32,
    div: div_f32,
};
