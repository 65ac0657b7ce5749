//! AVX2 kernels for x86_64.
//!
//! Integer kernels inline the block loops from `lanes` into an AVX2-enabled
//! wrapper, one 256-bit register per block. `f32` and `f64` use explicit
//! intrinsics. All functions require runtime AVX2 detection before calling.

#![allow(clippy::cast_possible_truncation)]

use std::arch::x86_64::*;
use std::mem::size_of;

use super::{lanes, KernelSet};
use crate::element::Numeric;

/// Bytes in one AVX2 register.
const REGISTER_BYTES: usize = 32;

// =============================================================================
// Integer kernels
// =============================================================================

macro_rules! block_kernels {
    ($($ty:ident),*) => {
        paste::paste! {
            $(
                #[target_feature(enable = "avx2")]
                unsafe fn [<sum_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                    lanes::sum::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(input, result, len);
                }

                #[target_feature(enable = "avx2")]
                unsafe fn [<min_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                    lanes::min::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(input, result, len);
                }

                #[target_feature(enable = "avx2")]
                unsafe fn [<max_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                    lanes::max::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(input, result, len);
                }

                #[target_feature(enable = "avx2")]
                unsafe fn [<add_ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                    lanes::binary::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(
                        lhs, rhs, out, len, <$ty as Numeric>::lane_add,
                    );
                }

                #[target_feature(enable = "avx2")]
                unsafe fn [<sub_ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                    lanes::binary::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(
                        lhs, rhs, out, len, <$ty as Numeric>::lane_sub,
                    );
                }

                #[target_feature(enable = "avx2")]
                unsafe fn [<mul_ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                    lanes::binary::<$ty, { REGISTER_BYTES / size_of::<$ty>() }>(
                        lhs, rhs, out, len, <$ty as Numeric>::lane_mul,
                    );
                }

                // AVX2 has no packed integer division; the block loop still
                // keeps loads and stores vectorized around the scalar divides.
                #[target_feature(enable = "avx2")]
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

block_kernels!(u8, u16, u32, u64, i8, i16, i32, i64);

// =============================================================================
// Float kernels
// =============================================================================

macro_rules! float_binary {
    ($ty:ident, $lanes:literal, $load:ident, $store:ident, $name:ident, $intrinsic:ident, $op:tt) => {
        paste::paste! {
            #[target_feature(enable = "avx2")]
            unsafe fn [<$name _ $ty>](lhs: *const $ty, rhs: *const $ty, out: *mut $ty, len: usize) {
                let blocks = len / $lanes;
                for i in 0..blocks {
                    let offset = i * $lanes;
                    let a = $load(lhs.add(offset));
                    let b = $load(rhs.add(offset));
                    $store(out.add(offset), $intrinsic(a, b));
                }
                for i in blocks * $lanes..len {
                    *out.add(i) = *lhs.add(i) $op *rhs.add(i);
                }
            }
        }
    };
}

macro_rules! float_kernels {
    (
        $ty:ident,
        lanes: $lanes:literal,
        load: $load:ident,
        store: $store:ident,
        splat: $splat:ident,
        zero: $zero:ident,
        add: $add:ident,
        sub: $sub:ident,
        mul: $mul:ident,
        div: $div:ident,
        min: $min:ident,
        max: $max:ident
    ) => {
        paste::paste! {
            /// Single accumulator; lane partial sums are folded in lane order.
            #[target_feature(enable = "avx2")]
            unsafe fn [<sum_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                let blocks = len / $lanes;
                let mut acc = $zero();
                for i in 0..blocks {
                    acc = $add(acc, $load(input.add(i * $lanes)));
                }

                let mut partial: [$ty; $lanes] = [0.0; $lanes];
                $store(partial.as_mut_ptr(), acc);
                let mut total: $ty = 0.0;
                for v in partial {
                    total += v;
                }
                for i in blocks * $lanes..len {
                    total += *input.add(i);
                }
                result.write(total);
            }

            #[target_feature(enable = "avx2")]
            unsafe fn [<min_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                let seed = *input;
                let blocks = len / $lanes;
                let mut acc = $splat(seed);
                for i in 0..blocks {
                    // min(v, acc) keeps `acc` unless `v < acc`, so a NaN in `v` is skipped.
                    acc = $min($load(input.add(i * $lanes)), acc);
                }

                let mut partial: [$ty; $lanes] = [seed; $lanes];
                $store(partial.as_mut_ptr(), acc);
                let mut best = seed;
                for v in partial {
                    if v < best {
                        best = v;
                    }
                }
                for i in blocks * $lanes..len {
                    let v = *input.add(i);
                    if v < best {
                        best = v;
                    }
                }
                result.write(lanes::first_tied_zero(std::slice::from_raw_parts(input, len), best));
            }

            #[target_feature(enable = "avx2")]
            unsafe fn [<max_ $ty>](input: *const $ty, result: *mut $ty, len: usize) {
                let seed = *input;
                let blocks = len / $lanes;
                let mut acc = $splat(seed);
                for i in 0..blocks {
                    acc = $max($load(input.add(i * $lanes)), acc);
                }

                let mut partial: [$ty; $lanes] = [seed; $lanes];
                $store(partial.as_mut_ptr(), acc);
                let mut best = seed;
                for v in partial {
                    if v > best {
                        best = v;
                    }
                }
                for i in blocks * $lanes..len {
                    let v = *input.add(i);
                    if v > best {
                        best = v;
                    }
                }
                result.write(lanes::first_tied_zero(std::slice::from_raw_parts(input, len), best));
            }

            float_binary!($ty, $lanes, $load, $store, add, $add, +);
            float_binary!($ty, $lanes, $load, $store, sub, $sub, -);
            float_binary!($ty, $lanes, $load, $store, mul, $mul, *);
            float_binary!($ty, $lanes, $load, $store, div, $div, /);

            pub(super) const [<KERNELS_ $ty:upper>]: KernelSet<$ty> = KernelSet {
                sum: [<sum_ $ty>],
                min: [<min_ $ty>],
                max: [<max_ $ty>],
                add: [<add_ $ty>],
                sub: [<sub_ $ty>],
                mul: [<mul_ $ty>],
                div: [<div_ $ty>],
            };
        }
    };
}

float_kernels!(
    f32,
    lanes: 8,
    load: _mm256_loadu_ps,
    store: _mm256_storeu_ps,
    splat: _mm256_set1_ps,
    zero: _mm256_setzero_ps,
    add: _mm256_add_ps,
    sub: _mm256_sub_ps,
    mul: _mm256_mul_ps,
    div: _mm256_div_ps,
    min: _mm256_min_ps,
    max: _mm256_max_ps
);

float_kernels!(
    f64,
    lanes: 4,
    load: _mm256_loadu_pd,
    store: _mm256_storeu_pd,
    splat: _mm256_set1_pd,
    zero: _mm256_setzero_pd,
    add: _mm256_add_pd,
    sub: _mm256_sub_pd,
    mul: _mm256_mul_pd,
    div: _mm256_div_pd,
    min: _mm256_min_pd,
    max: _mm256_max_pd
);
